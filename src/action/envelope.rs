use crate::action::Action;

/// An action as delivered to reducers: either an application action or one
/// of the store's private lifecycle markers.
///
/// The lifecycle markers (initialization, reducer replacement, and the
/// unknown-action probe) can only be constructed inside the crate, so
/// application action kinds can never collide with them. Reducers handle
/// them through the `None` arm of [`action`](ActionEnvelope::action):
///
/// ```
/// use canister::ActionEnvelope;
///
/// fn counter(state: Option<i64>, action: &ActionEnvelope<&'static str>) -> Option<i64> {
///     let state = state.unwrap_or(0);
///     match action.action() {
///         Some(&"increment") => Some(state + 1),
///         _ => Some(state),
///     }
/// }
///
/// let envelope = ActionEnvelope::app("increment");
/// assert_eq!(counter(None, &envelope), Some(1));
/// ```
#[derive(Debug)]
pub struct ActionEnvelope<A> {
    inner: Inner<A>,
}

#[derive(Debug)]
enum Inner<A> {
    Init,
    Replace,
    Probe,
    App(A),
}

impl<A> ActionEnvelope<A> {
    /// Wrap an application action for delivery to a reducer.
    pub fn app(action: A) -> Self {
        Self {
            inner: Inner::App(action),
        }
    }

    pub(crate) fn init() -> Self {
        Self { inner: Inner::Init }
    }

    pub(crate) fn replace() -> Self {
        Self {
            inner: Inner::Replace,
        }
    }

    pub(crate) fn probe() -> Self {
        Self {
            inner: Inner::Probe,
        }
    }

    /// The application action, or `None` for lifecycle markers.
    pub fn action(&self) -> Option<&A> {
        match &self.inner {
            Inner::App(action) => Some(action),
            _ => None,
        }
    }

    /// Whether this is the store's initialization marker.
    pub fn is_init(&self) -> bool {
        matches!(self.inner, Inner::Init)
    }

    /// Whether this is the store's reducer-replacement marker.
    pub fn is_replace(&self) -> bool {
        matches!(self.inner, Inner::Replace)
    }

    pub(crate) fn into_action(self) -> Option<A> {
        match self.inner {
            Inner::App(action) => Some(action),
            _ => None,
        }
    }
}

impl<A: Action> ActionEnvelope<A> {
    /// A short label for error messages and logs.
    pub fn kind_label(&self) -> &str {
        match &self.inner {
            Inner::App(action) => action.kind(),
            Inner::Init => "init",
            Inner::Replace => "replace",
            Inner::Probe => "probe-unknown",
        }
    }
}
