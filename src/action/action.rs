use std::fmt;

/// The contract every dispatchable value satisfies.
///
/// Actions describe an intended state change and carry a mandatory
/// discriminator, returned by [`kind`](Action::kind). They should be cheap
/// to move: an action travels through the middleware chain by value and is
/// handed back to the caller once the dispatch completes.
///
/// `Debug` lets interceptors log actions; `Send + 'static` lets dispatch
/// capabilities cross threads.
pub trait Action: fmt::Debug + Send + 'static {
    /// The discriminator carried by every action.
    fn kind(&self) -> &str;
}

/// Bare string actions, handy for small state machines and tests.
impl Action for &'static str {
    fn kind(&self) -> &str {
        *self
    }
}
