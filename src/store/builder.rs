use crate::action::Action;
use crate::error::StoreError;
use crate::reducer::BoxedReducer;
use crate::store::store::Store;

/// The store-construction capability handed to enhancers.
pub type StoreCreator<S, A> =
    Box<dyn FnOnce(BoxedReducer<S, A>, Option<S>) -> Result<Store<S, A>, StoreError> + Send>;

/// A higher-order wrapper around store construction.
///
/// An enhancer receives the underlying construction capability and returns
/// a capability of the same shape, typically building the base store and
/// decorating part of it. [`apply_middleware`](crate::apply_middleware) is
/// the canonical enhancer. Exactly one enhancer may be installed per store;
/// several must be pre-composed into one.
pub type Enhancer<S, A> = Box<dyn FnOnce(StoreCreator<S, A>) -> StoreCreator<S, A> + Send>;

/// Configures and builds a [`Store`].
pub struct StoreBuilder<S, A> {
    reducer: BoxedReducer<S, A>,
    preloaded: Option<S>,
    enhancers: Vec<Enhancer<S, A>>,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    pub(crate) fn new(reducer: BoxedReducer<S, A>) -> Self {
        Self {
            reducer,
            preloaded: None,
            enhancers: Vec::new(),
        }
    }

    /// Seed the store with an existing state, e.g. one restored from a
    /// previous session. The reducer still runs once over it during
    /// construction.
    pub fn preloaded_state(mut self, state: S) -> Self {
        self.preloaded = Some(state);
        self
    }

    /// Install an enhancer. Calling this more than once is a configuration
    /// error reported by [`build`](StoreBuilder::build).
    pub fn enhancer(mut self, enhancer: Enhancer<S, A>) -> Self {
        self.enhancers.push(enhancer);
        self
    }

    /// Build the store.
    ///
    /// With an enhancer installed, construction is delegated entirely: the
    /// enhancer wraps the base construction capability and its result
    /// produces the finished store.
    pub fn build(mut self) -> Result<Store<S, A>, StoreError> {
        if self.enhancers.len() > 1 {
            return Err(StoreError::MultipleEnhancers);
        }
        let create: StoreCreator<S, A> = Box::new(Store::create);
        let create = match self.enhancers.pop() {
            Some(enhance) => enhance(create),
            None => create,
        };
        create(self.reducer, self.preloaded)
    }
}
