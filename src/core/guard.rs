//! Guard predicates for controlling trigger selection.
//!
//! Guards are synchronous boolean functions over the context. They decide
//! whether a guarded trigger configuration applies; when several guarded
//! configurations exist for the same trigger they are scanned in
//! registration order and the first passing guard wins.

/// Synchronous predicate that decides whether a guarded trigger
/// configuration applies.
///
/// Guards must not suspend and must not have side effects beyond reading
/// the context; they are evaluated inside the resolver between suspension
/// points.
///
/// # Example
///
/// ```rust
/// use switchyard::Guard;
///
/// struct TurnstileContext {
///     coins: u32,
/// }
///
/// let has_coin = Guard::new(|ctx: &TurnstileContext| ctx.coins > 0);
///
/// assert!(has_coin.check(&TurnstileContext { coins: 1 }));
/// assert!(!has_coin.check(&TurnstileContext { coins: 0 }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate over the context.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the predicate against the context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}
