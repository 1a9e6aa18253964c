//! Checkpoint and Resume
//!
//! This example demonstrates serializing a running machine's context and
//! resuming it in a fresh instance.
//!
//! Key concepts:
//! - The context carries the machine's recorded state
//! - Capturing a versioned checkpoint at a quiescent point
//! - Resuming without re-running the parked state's entry callback
//!
//! Run with: cargo run --example checkpoint_resume

use serde::{Deserialize, Serialize};
use switchyard::{
    async_trait, CallbackError, Checkpoint, Context, FireHandle, Handler, MachineModel,
    StateMachine,
};

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
enum ImportState {
    Pending,
    Loading,
    Done,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum ImportEvent {
    Begin,
    Finish,
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct ImportContext {
    state: Option<ImportState>,
    rows_loaded: u64,
    entries: Vec<String>,
}

impl Context<ImportState> for ImportContext {
    fn state(&self) -> Option<&ImportState> {
        self.state.as_ref()
    }

    fn set_state(&mut self, state: ImportState) {
        self.state = Some(state);
    }
}

struct Step {
    name: &'static str,
}

#[async_trait]
impl Handler<ImportEvent, ImportContext> for Step {
    async fn entering(
        &self,
        _fire: &FireHandle<ImportEvent>,
        ctx: &mut ImportContext,
    ) -> Result<(), CallbackError> {
        ctx.entries.push(format!("entered {}", self.name));
        Ok(())
    }

    async fn exiting(&self, ctx: &mut ImportContext) -> Result<(), CallbackError> {
        ctx.entries.push(format!("left {}", self.name));
        Ok(())
    }
}

fn build_model() -> Result<
    MachineModel<ImportState, ImportEvent, ImportContext>,
    Box<dyn std::error::Error>,
> {
    let mut model = MachineModel::new();
    model
        .state(ImportState::Pending)
        .handled_by(Step { name: "pending" })
        .on(ImportEvent::Begin)?
        .goes_to(ImportState::Loading)?;
    model
        .state(ImportState::Loading)
        .handled_by(Step { name: "loading" })
        .on(ImportEvent::Finish)?
        .goes_to(ImportState::Done)?;
    model.state(ImportState::Done).handled_by(Step { name: "done" });
    model.mark_initial(ImportState::Pending);
    Ok(model)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First run: advance into Loading, then snapshot.
    let mut machine = StateMachine::new(build_model()?, ImportContext::default());
    machine.start().await?;
    machine.fire(ImportEvent::Begin).await?;
    machine.context_mut().rows_loaded = 1500;

    let json = machine.checkpoint().to_json()?;
    println!("Checkpointed at {:?}", machine.current_state());
    println!("Checkpoint payload: {json}");
    drop(machine);

    // Second run: restore the context and pick up where we left off. The
    // entry callback for Loading does not run again.
    let restored: Checkpoint<ImportContext> = Checkpoint::from_json(&json)?;
    let mut resumed = StateMachine::new(build_model()?, restored.into_context());
    resumed.start().await?;
    println!("Resumed in {:?}", resumed.current_state());
    println!("Rows already loaded: {}", resumed.context().rows_loaded);

    resumed.fire(ImportEvent::Finish).await?;
    println!("Final state: {:?}", resumed.current_state());
    for entry in &resumed.context().entries {
        println!("  log: {entry}");
    }
    Ok(())
}
