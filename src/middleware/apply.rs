use std::sync::{Arc, RwLock, Weak};

use crate::action::Action;
use crate::compose::{compose, ComposeFn};
use crate::error::StoreError;
use crate::reducer::BoxedReducer;
use crate::store::{DispatchFn, Enhancer, StoreCreator};

/// The capability object handed to each middleware.
///
/// `dispatch` is late-bound: it resolves to the final composed dispatch at
/// call time, so a middleware may capture this object once during setup and
/// still send follow-up actions through the entire chain later. Dispatching
/// before the chain is assembled is an error.
pub struct MiddlewareApi<S, A> {
    state: Arc<dyn Fn() -> Result<S, StoreError> + Send + Sync>,
    dispatch: Arc<RwLock<LateDispatch<A>>>,
}

impl<S, A> Clone for MiddlewareApi<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

enum LateDispatch<A> {
    /// The chain is still being assembled.
    Unbound,
    /// Bound to the composed dispatch, which is owned by the enhanced
    /// store; the binding is weak so a leaked api cannot keep the store
    /// alive.
    Bound(Weak<dyn Fn(A) -> Result<A, StoreError> + Send + Sync>),
}

impl<S, A: Action> MiddlewareApi<S, A> {
    /// A clone of the store's current state.
    pub fn get_state(&self) -> Result<S, StoreError> {
        (self.state)()
    }

    /// Dispatch through the full chain, resolved at call time.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        let bound = match &*self.dispatch.read().unwrap() {
            LateDispatch::Unbound => return Err(StoreError::DispatchDuringMiddlewareSetup),
            LateDispatch::Bound(weak) => weak.upgrade(),
        };
        match bound {
            Some(dispatch) => dispatch(action),
            None => Err(StoreError::StoreGone),
        }
    }
}

/// An interceptor on the dispatch path.
///
/// `wrap` is called once while the chain is assembled; the returned
/// dispatch runs for every action, forwarding to `next` (the rest of the
/// chain, ending at the store's raw dispatch) or short-circuiting.
pub trait Middleware<S, A>: Send + Sync {
    fn wrap(&self, api: MiddlewareApi<S, A>, next: DispatchFn<A>) -> DispatchFn<A>;
}

/// Build a store enhancer installing the given middleware chain.
///
/// The chain wraps the base store's raw dispatch right to left, so the
/// first-supplied middleware sees each action first on the way in and last
/// on the way out.
pub fn apply_middleware<S, A>(middlewares: Vec<Box<dyn Middleware<S, A>>>) -> Enhancer<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    Box::new(move |create: StoreCreator<S, A>| {
        Box::new(
            move |reducer: BoxedReducer<S, A>, preloaded: Option<S>| {
                let store = create(reducer, preloaded)?;

                let cell = Arc::new(RwLock::new(LateDispatch::Unbound));
                let api = MiddlewareApi {
                    state: store.state_reader(),
                    dispatch: Arc::clone(&cell),
                };

                let wrappers: Vec<ComposeFn<DispatchFn<A>>> = middlewares
                    .into_iter()
                    .map(|middleware| {
                        let api = api.clone();
                        Box::new(move |next: DispatchFn<A>| middleware.wrap(api.clone(), next))
                            as ComposeFn<DispatchFn<A>>
                    })
                    .collect();

                let dispatch = compose(wrappers)(store.dispatch_fn());
                *cell.write().unwrap() = LateDispatch::Bound(Arc::downgrade(&dispatch));

                Ok(store.with_dispatch(dispatch))
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionEnvelope;
    use crate::store::Store;
    use std::sync::Mutex;

    fn counter(state: Option<i64>, action: &ActionEnvelope<&'static str>) -> Option<i64> {
        let state = state.unwrap_or(0);
        match action.action() {
            Some(&"add") => Some(state + 1),
            _ => Some(state),
        }
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl<S> Middleware<S, &'static str> for Recorder {
        fn wrap(
            &self,
            _api: MiddlewareApi<S, &'static str>,
            next: DispatchFn<&'static str>,
        ) -> DispatchFn<&'static str> {
            let label = self.label;
            let log = Arc::clone(&self.log);
            Arc::new(move |action| {
                log.lock().unwrap().push(format!("{}:in", label));
                let result = next(action);
                log.lock().unwrap().push(format!("{}:out", label));
                result
            })
        }
    }

    #[test]
    fn the_first_middleware_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = Store::builder(counter)
            .enhancer(apply_middleware(vec![
                Box::new(Recorder {
                    label: "a",
                    log: Arc::clone(&log),
                }),
                Box::new(Recorder {
                    label: "b",
                    log: Arc::clone(&log),
                }),
            ]))
            .build()
            .unwrap();

        store.dispatch("add").unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:in", "b:in", "b:out", "a:out"]
        );
        assert_eq!(store.get_state().unwrap(), 1);
    }

    struct SetupProbe {
        seen: Arc<Mutex<Option<StoreError>>>,
    }

    impl<S> Middleware<S, &'static str> for SetupProbe {
        fn wrap(
            &self,
            api: MiddlewareApi<S, &'static str>,
            next: DispatchFn<&'static str>,
        ) -> DispatchFn<&'static str> {
            *self.seen.lock().unwrap() = api.dispatch("early").err();
            next
        }
    }

    #[test]
    fn dispatching_during_setup_is_rejected() {
        let seen = Arc::new(Mutex::new(None));
        let store = Store::builder(counter)
            .enhancer(apply_middleware(vec![Box::new(SetupProbe {
                seen: Arc::clone(&seen),
            })]))
            .build()
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            Some(StoreError::DispatchDuringMiddlewareSetup)
        );
        // setup failure is the middleware's problem, the store still works
        store.dispatch("add").unwrap();
        assert_eq!(store.get_state().unwrap(), 1);
    }

    struct FollowUp;

    impl<S: 'static> Middleware<S, &'static str> for FollowUp {
        fn wrap(
            &self,
            api: MiddlewareApi<S, &'static str>,
            next: DispatchFn<&'static str>,
        ) -> DispatchFn<&'static str> {
            Arc::new(move |action| {
                if action == "double" {
                    api.dispatch("add")?;
                    api.dispatch("add")?;
                    Ok(action)
                } else {
                    next(action)
                }
            })
        }
    }

    #[test]
    fn a_captured_api_reaches_the_final_dispatch() {
        let store = Store::builder(counter)
            .enhancer(apply_middleware(vec![Box::new(FollowUp)]))
            .build()
            .unwrap();

        // "double" is swallowed and replayed as two "add"s through the chain
        store.dispatch("double").unwrap();
        assert_eq!(store.get_state().unwrap(), 2);
    }

    struct StashApi {
        cell: Arc<Mutex<Option<MiddlewareApi<i64, &'static str>>>>,
    }

    impl Middleware<i64, &'static str> for StashApi {
        fn wrap(
            &self,
            api: MiddlewareApi<i64, &'static str>,
            next: DispatchFn<&'static str>,
        ) -> DispatchFn<&'static str> {
            *self.cell.lock().unwrap() = Some(api);
            next
        }
    }

    #[test]
    fn a_leaked_api_cannot_outlive_the_store() {
        let cell = Arc::new(Mutex::new(None));
        let store = Store::builder(counter)
            .enhancer(apply_middleware(vec![Box::new(StashApi {
                cell: Arc::clone(&cell),
            })]))
            .build()
            .unwrap();

        let api = cell.lock().unwrap().take().unwrap();
        assert_eq!(api.dispatch("add").unwrap(), "add");
        assert_eq!(api.get_state().unwrap(), 1);

        drop(store);
        assert_eq!(api.dispatch("add").unwrap_err(), StoreError::StoreGone);
    }

    #[test]
    fn middleware_sees_actions_before_the_reducer() {
        struct Swap;

        impl<S> Middleware<S, &'static str> for Swap {
            fn wrap(
                &self,
                _api: MiddlewareApi<S, &'static str>,
                next: DispatchFn<&'static str>,
            ) -> DispatchFn<&'static str> {
                Arc::new(move |action| {
                    if action == "bump" {
                        next("add")
                    } else {
                        next(action)
                    }
                })
            }
        }

        let store = Store::builder(counter)
            .enhancer(apply_middleware(vec![Box::new(Swap)]))
            .build()
            .unwrap();

        assert_eq!(store.dispatch("bump").unwrap(), "add");
        assert_eq!(store.get_state().unwrap(), 1);
    }
}
