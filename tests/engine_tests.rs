//! Integration tests for the transition engine.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use switchyard::{
    async_trait, CallbackError, ConfigError, Context, EngineError, FireHandle, Handler,
    MachineModel, StateMachine, TransitionListener,
};

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
enum Step {
    One,
    Two,
    Three,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
enum Go {
    Advance,
    Reset,
    Noise,
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct ChainContext {
    state: Option<Step>,
    log: Vec<String>,
    armed: bool,
    actions: u32,
}

impl Context<Step> for ChainContext {
    fn state(&self) -> Option<&Step> {
        self.state.as_ref()
    }

    fn set_state(&mut self, state: Step) {
        self.state = Some(state);
    }
}

/// Logs entry/exit and optionally fires a follow-up trigger from entry.
struct LogHandler {
    name: &'static str,
    fire_on_enter: Option<Go>,
}

impl LogHandler {
    fn named(name: &'static str) -> Self {
        Self {
            name,
            fire_on_enter: None,
        }
    }
}

#[async_trait]
impl Handler<Go, ChainContext> for LogHandler {
    async fn entering(
        &self,
        fire: &FireHandle<Go>,
        context: &mut ChainContext,
    ) -> Result<(), CallbackError> {
        context.log.push(format!("entering {}", self.name));
        if let Some(trigger) = &self.fire_on_enter {
            fire.fire(trigger.clone());
        }
        Ok(())
    }

    async fn exiting(&self, context: &mut ChainContext) -> Result<(), CallbackError> {
        context.log.push(format!("exiting {}", self.name));
        Ok(())
    }
}

/// One -> Two -> Three, advanced by `Go::Advance`.
fn chain_model() -> Result<MachineModel<Step, Go, ChainContext>, ConfigError> {
    let mut model = MachineModel::new();
    model
        .state(Step::One)
        .handled_by(LogHandler::named("One"))
        .on(Go::Advance)?
        .goes_to(Step::Two)?;
    model
        .state(Step::Two)
        .handled_by(LogHandler::named("Two"))
        .on(Go::Advance)?
        .goes_to(Step::Three)?;
    model.state(Step::Three).handled_by(LogHandler::named("Three"));
    model.mark_initial(Step::One);
    Ok(model)
}

#[tokio::test]
async fn chain_runs_lifecycle_callbacks_in_order() {
    let mut machine = StateMachine::new(chain_model().unwrap(), ChainContext::default());
    machine.start().await.unwrap();
    machine.fire(Go::Advance).await.unwrap();
    machine.fire(Go::Advance).await.unwrap();

    assert_eq!(machine.current_state(), Some(&Step::Three));
    assert_eq!(
        machine.context().log,
        vec![
            "entering One",
            "exiting One",
            "entering Two",
            "exiting Two",
            "entering Three",
        ]
    );
}

#[tokio::test]
async fn unresolved_trigger_names_trigger_and_state() {
    let mut machine = StateMachine::new(chain_model().unwrap(), ChainContext::default());
    machine.start().await.unwrap();

    let err = machine.fire(Go::Noise).await.unwrap_err();

    assert!(matches!(err, EngineError::UnresolvedTrigger { .. }));
    let message = err.to_string();
    assert!(message.contains("Noise"));
    assert!(message.contains("One"));
}

#[tokio::test]
async fn invalid_trigger_listener_recovers_and_processing_continues() {
    let seen: Arc<Mutex<Vec<(Step, Go)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut machine = StateMachine::new(chain_model().unwrap(), ChainContext::default())
        .with_invalid_trigger_listener(move |state: &Step, trigger: &Go| {
            sink.lock().unwrap().push((state.clone(), trigger.clone()));
        });
    machine.start().await.unwrap();

    machine.fire(Go::Noise).await.unwrap();
    machine.fire(Go::Advance).await.unwrap();

    assert_eq!(machine.current_state(), Some(&Step::Two));
    assert_eq!(seen.lock().unwrap().as_slice(), [(Step::One, Go::Noise)]);
}

#[tokio::test]
async fn single_passing_guard_decides_the_target() {
    let mut model = MachineModel::new();
    model
        .state(Step::One)
        .handled_by(LogHandler::named("One"));
    model
        .state(Step::One)
        .on_if(Go::Advance, |ctx: &ChainContext| ctx.armed)
        .unwrap()
        .goes_to(Step::Two)
        .unwrap();
    model
        .state(Step::One)
        .on_if(Go::Advance, |ctx: &ChainContext| !ctx.armed)
        .unwrap()
        .goes_to(Step::Three)
        .unwrap();
    model.state(Step::Two).handled_by(LogHandler::named("Two"));
    model.state(Step::Three).handled_by(LogHandler::named("Three"));
    model.mark_initial(Step::One);

    let context = ChainContext {
        armed: false,
        ..ChainContext::default()
    };
    let mut machine = StateMachine::new(model, context);
    machine.start().await.unwrap();
    machine.fire(Go::Advance).await.unwrap();

    assert_eq!(machine.current_state(), Some(&Step::Three));
}

#[tokio::test]
async fn default_trigger_applies_on_miss_and_is_overridden_locally() {
    let mut model = chain_model().unwrap();
    model
        .default_state()
        .on(Go::Reset)
        .unwrap()
        .goes_to(Step::One)
        .unwrap();
    // Step::Two opts out of the cross-cutting reset.
    model
        .state(Step::Two)
        .on(Go::Reset)
        .unwrap()
        .ignore()
        .unwrap();

    let mut machine = StateMachine::new(model, ChainContext::default());
    machine.start().await.unwrap();
    machine.fire(Go::Advance).await.unwrap();

    // Local ignore wins over the default transition.
    machine.fire(Go::Reset).await.unwrap();
    assert_eq!(machine.current_state(), Some(&Step::Two));

    // Step::Three has no local entry: the default applies.
    machine.fire(Go::Advance).await.unwrap();
    machine.fire(Go::Reset).await.unwrap();
    assert_eq!(machine.current_state(), Some(&Step::One));
}

#[tokio::test]
async fn ignored_trigger_runs_no_callbacks() {
    let mut model = chain_model().unwrap();
    model
        .state(Step::One)
        .on(Go::Reset)
        .unwrap()
        .ignore()
        .unwrap();

    let mut machine = StateMachine::new(model, ChainContext::default());
    machine.start().await.unwrap();
    let log_before = machine.context().log.clone();

    machine.fire(Go::Reset).await.unwrap();

    assert_eq!(machine.current_state(), Some(&Step::One));
    assert_eq!(machine.context().log, log_before);
    assert_eq!(machine.context().actions, 0);
}

#[tokio::test]
async fn actions_mutate_the_context_without_changing_state() {
    let mut model = chain_model().unwrap();
    model
        .state(Step::One)
        .on(Go::Reset)
        .unwrap()
        .execute(|ctx: &mut ChainContext| -> Result<(), CallbackError> {
            ctx.actions += 1;
            Ok(())
        })
        .unwrap();

    let mut machine = StateMachine::new(model, ChainContext::default());
    machine.start().await.unwrap();
    machine.fire(Go::Reset).await.unwrap();
    machine.fire(Go::Reset).await.unwrap();

    assert_eq!(machine.current_state(), Some(&Step::One));
    assert_eq!(machine.context().actions, 2);
}

#[tokio::test]
async fn nested_fire_is_processed_after_the_inflight_trigger() {
    let mut model = MachineModel::new();
    model
        .state(Step::One)
        .handled_by(LogHandler::named("One"))
        .on(Go::Advance)
        .unwrap()
        .goes_to(Step::Two)
        .unwrap();
    // Entering Two immediately queues the next advance.
    model
        .state(Step::Two)
        .handled_by(LogHandler {
            name: "Two",
            fire_on_enter: Some(Go::Advance),
        })
        .on(Go::Advance)
        .unwrap()
        .goes_to(Step::Three)
        .unwrap();
    model.state(Step::Three).handled_by(LogHandler::named("Three"));
    model.mark_initial(Step::One);

    let mut machine = StateMachine::new(model, ChainContext::default());
    machine.start().await.unwrap();
    machine.fire(Go::Advance).await.unwrap();

    // The nested trigger ran after the first one completed, never
    // interleaved: the log shows one clean pass through the chain.
    assert_eq!(machine.current_state(), Some(&Step::Three));
    assert_eq!(
        machine.context().log,
        vec![
            "entering One",
            "exiting One",
            "entering Two",
            "exiting Two",
            "entering Three",
        ]
    );
}

#[tokio::test]
async fn resumed_context_skips_reentry_and_continues() {
    let mut machine = StateMachine::new(chain_model().unwrap(), ChainContext::default());
    machine.start().await.unwrap();
    machine.fire(Go::Advance).await.unwrap();
    assert_eq!(machine.current_state(), Some(&Step::Two));

    // Serialize at a quiescent point and rebuild from scratch.
    let json = machine.checkpoint().to_json().unwrap();
    drop(machine);

    let restored: switchyard::Checkpoint<ChainContext> =
        switchyard::Checkpoint::from_json(&json).unwrap();
    let mut resumed = StateMachine::new(chain_model().unwrap(), restored.into_context());
    resumed.start().await.unwrap();

    assert_eq!(resumed.current_state(), Some(&Step::Two));
    let reentries = resumed
        .context()
        .log
        .iter()
        .filter(|line| *line == "entering Two")
        .count();
    assert_eq!(reentries, 1, "resume must not re-run the entry callback");

    resumed.fire(Go::Advance).await.unwrap();
    assert_eq!(resumed.current_state(), Some(&Step::Three));
    assert!(resumed
        .context()
        .log
        .iter()
        .any(|line| line == "entering Three"));
}

struct SpyTransitionListener {
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TransitionListener<Step, Go> for SpyTransitionListener {
    async fn on_transition(
        &self,
        trigger: Option<&Go>,
        source: Option<&Step>,
        target: &Step,
    ) -> Result<(), CallbackError> {
        let line = match (trigger, source) {
            (Some(trigger), Some(source)) => format!("{source:?} -[{trigger:?}]-> {target:?}"),
            _ => format!("start -> {target:?}"),
        };
        self.log.lock().unwrap().push(line);
        Ok(())
    }
}

#[tokio::test]
async fn transition_listener_sees_start_and_transitions() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut machine = StateMachine::new(chain_model().unwrap(), ChainContext::default())
        .with_transition_listener(SpyTransitionListener {
            log: Arc::clone(&log),
        });

    machine.start().await.unwrap();
    machine.fire(Go::Advance).await.unwrap();

    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["start -> One", "One -[Advance]-> Two"]
    );
}

struct FailingHandler;

#[async_trait]
impl Handler<Go, ChainContext> for FailingHandler {
    async fn entering(
        &self,
        _fire: &FireHandle<Go>,
        _context: &mut ChainContext,
    ) -> Result<(), CallbackError> {
        Err("disk full".into())
    }

    async fn exiting(&self, _context: &mut ChainContext) -> Result<(), CallbackError> {
        Ok(())
    }
}

#[tokio::test]
async fn handler_failure_aborts_the_drain_and_discards_the_queue() {
    let mut model = MachineModel::new();
    model
        .state(Step::One)
        .handled_by(LogHandler::named("One"))
        .on(Go::Advance)
        .unwrap()
        .goes_to(Step::Two)
        .unwrap();
    model
        .state(Step::Two)
        .handled_by(FailingHandler)
        .on(Go::Advance)
        .unwrap()
        .goes_to(Step::Three)
        .unwrap();
    model.state(Step::Three).handled_by(LogHandler::named("Three"));
    model.mark_initial(Step::One);

    let mut machine = StateMachine::new(model, ChainContext::default());
    machine.start().await.unwrap();

    let err = machine.fire(Go::Advance).await.unwrap_err();
    assert!(matches!(err, EngineError::Callback(_)));
    assert!(err.to_string().contains("disk full"));

    // The transition itself committed before entry failed; there is no
    // rollback and no re-entry attempt.
    assert_eq!(machine.current_state(), Some(&Step::Two));
}

#[tokio::test]
async fn valid_triggers_cover_the_current_state_only() {
    let mut model = chain_model().unwrap();
    model
        .state(Step::One)
        .on(Go::Reset)
        .unwrap()
        .ignore()
        .unwrap();
    model.default_state().on(Go::Noise).unwrap().ignore().unwrap();

    let mut machine = StateMachine::new(model, ChainContext::default());
    assert!(machine.valid_triggers().is_empty());

    machine.start().await.unwrap();
    let mut triggers = machine.valid_triggers();
    triggers.sort_by_key(|t| format!("{t:?}"));
    assert_eq!(triggers, vec![Go::Advance, Go::Reset]);

    machine.fire(Go::Advance).await.unwrap();
    assert_eq!(machine.valid_triggers(), vec![Go::Advance]);
}

#[tokio::test]
async fn start_without_initial_state_fails() {
    let mut model: MachineModel<Step, Go, ChainContext> = MachineModel::new();
    model.state(Step::One).handled_by(LogHandler::named("One"));

    let mut machine = StateMachine::new(model, ChainContext::default());
    let err = machine.start().await.unwrap_err();
    assert!(matches!(err, EngineError::MissingInitialState));
}

#[tokio::test]
async fn start_with_unconfigured_initial_state_fails() {
    let mut model: MachineModel<Step, Go, ChainContext> = MachineModel::new();
    model.mark_initial(Step::One);

    let mut machine = StateMachine::new(model, ChainContext::default());
    let err = machine.start().await.unwrap_err();
    assert!(matches!(err, EngineError::UnknownState { .. }));
}

#[tokio::test]
async fn start_into_handlerless_state_fails() {
    let mut model: MachineModel<Step, Go, ChainContext> = MachineModel::new();
    model.state(Step::One);
    model.mark_initial(Step::One);

    let mut machine = StateMachine::new(model, ChainContext::default());
    let err = machine.start().await.unwrap_err();
    assert!(matches!(err, EngineError::MissingHandler { .. }));
}

#[tokio::test]
async fn guard_and_unguarded_conflicts_fail_at_configuration_time() {
    let mut model: MachineModel<Step, Go, ChainContext> = MachineModel::new();
    model
        .state(Step::One)
        .on(Go::Advance)
        .unwrap()
        .goes_to(Step::Two)
        .unwrap();
    let err = model
        .state(Step::One)
        .on_if(Go::Advance, |ctx: &ChainContext| ctx.armed)
        .unwrap_err();
    assert!(matches!(err, ConfigError::GuardedAfterUnguarded { .. }));

    // And in the opposite registration order.
    let mut model: MachineModel<Step, Go, ChainContext> = MachineModel::new();
    model
        .state(Step::One)
        .on_if(Go::Advance, |ctx: &ChainContext| ctx.armed)
        .unwrap()
        .goes_to(Step::Two)
        .unwrap();
    let err = model.state(Step::One).on(Go::Advance).unwrap_err();
    assert!(matches!(err, ConfigError::UnguardedAfterGuarded { .. }));
}
