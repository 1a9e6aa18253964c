//! Order Processing
//!
//! This example demonstrates a queued-trigger order workflow.
//!
//! Key concepts:
//! - Declarative states with entry/exit handlers
//! - Guarded transitions (payment must clear before packing)
//! - A default trigger shared by every state (cancellation)
//! - Firing follow-up triggers from inside an entry handler
//!
//! Run with: cargo run --example order_processing

use switchyard::{
    async_trait, CallbackError, Context, FireHandle, Handler, MachineModel, StateMachine,
};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum OrderState {
    Received,
    Picking,
    Packed,
    Shipped,
    Cancelled,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum OrderEvent {
    Approve,
    ItemsPicked,
    Dispatch,
    Cancel,
}

#[derive(Default)]
struct OrderContext {
    state: Option<OrderState>,
    paid: bool,
    items: u32,
    notes: Vec<String>,
}

impl Context<OrderState> for OrderContext {
    fn state(&self) -> Option<&OrderState> {
        self.state.as_ref()
    }

    fn set_state(&mut self, state: OrderState) {
        self.state = Some(state);
    }
}

struct Stage {
    name: &'static str,
}

#[async_trait]
impl Handler<OrderEvent, OrderContext> for Stage {
    async fn entering(
        &self,
        _fire: &FireHandle<OrderEvent>,
        ctx: &mut OrderContext,
    ) -> Result<(), CallbackError> {
        ctx.notes.push(format!("entered {}", self.name));
        Ok(())
    }

    async fn exiting(&self, ctx: &mut OrderContext) -> Result<(), CallbackError> {
        ctx.notes.push(format!("left {}", self.name));
        Ok(())
    }
}

/// The picking floor reports completion on its own once entered.
struct PickingFloor;

#[async_trait]
impl Handler<OrderEvent, OrderContext> for PickingFloor {
    async fn entering(
        &self,
        fire: &FireHandle<OrderEvent>,
        ctx: &mut OrderContext,
    ) -> Result<(), CallbackError> {
        ctx.notes.push("picking started".to_string());
        ctx.items = 3;
        fire.fire(OrderEvent::ItemsPicked);
        Ok(())
    }

    async fn exiting(&self, ctx: &mut OrderContext) -> Result<(), CallbackError> {
        ctx.notes.push("picking done".to_string());
        Ok(())
    }
}

fn build_model() -> Result<MachineModel<OrderState, OrderEvent, OrderContext>, Box<dyn std::error::Error>>
{
    let mut model = MachineModel::new();

    model
        .state(OrderState::Received)
        .handled_by(Stage { name: "received" })
        .on_if(OrderEvent::Approve, |ctx: &OrderContext| ctx.paid)?
        .goes_to(OrderState::Picking)?;
    model
        .state(OrderState::Received)
        .on_if(OrderEvent::Approve, |ctx: &OrderContext| !ctx.paid)?
        .ignore()?;

    model
        .state(OrderState::Picking)
        .handled_by(PickingFloor)
        .on(OrderEvent::ItemsPicked)?
        .goes_to(OrderState::Packed)?;

    model
        .state(OrderState::Packed)
        .handled_by(Stage { name: "packed" })
        .on(OrderEvent::Dispatch)?
        .goes_to(OrderState::Shipped)?;

    model
        .state(OrderState::Shipped)
        .handled_by(Stage { name: "shipped" });
    model
        .state(OrderState::Cancelled)
        .handled_by(Stage { name: "cancelled" });

    // Any state can be cancelled unless it says otherwise.
    model
        .default_state()
        .on(OrderEvent::Cancel)?
        .goes_to(OrderState::Cancelled)?;
    model
        .state(OrderState::Shipped)
        .on(OrderEvent::Cancel)?
        .ignore()?;

    model.mark_initial(OrderState::Received);
    Ok(model)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let context = OrderContext {
        paid: true,
        ..OrderContext::default()
    };

    let mut machine = StateMachine::new(build_model()?, context).with_transition_listener(
        |trigger: Option<&OrderEvent>, source: Option<&OrderState>, target: &OrderState| {
            match (trigger, source) {
                (Some(trigger), Some(source)) => {
                    println!("  {source:?} -[{trigger:?}]-> {target:?}")
                }
                _ => println!("  starting in {target:?}"),
            }
        },
    );

    println!("Processing order:");
    machine.start().await?;
    // Approve kicks off picking; the picking floor fires ItemsPicked itself.
    machine.fire(OrderEvent::Approve).await?;
    machine.fire(OrderEvent::Dispatch).await?;

    // Shipped orders opt out of the default cancellation.
    machine.fire(OrderEvent::Cancel).await?;

    println!("Final state: {:?}", machine.current_state());
    println!("Items picked: {}", machine.context().items);
    for note in &machine.context().notes {
        println!("  note: {note}");
    }
    Ok(())
}
