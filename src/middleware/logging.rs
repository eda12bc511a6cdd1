use std::sync::Arc;

use crate::action::Action;
use crate::middleware::{Middleware, MiddlewareApi};
use crate::store::DispatchFn;

/// Logs every action crossing the dispatch path at debug level.
pub struct LoggingMiddleware;

impl<S, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn wrap(&self, _api: MiddlewareApi<S, A>, next: DispatchFn<A>) -> DispatchFn<A> {
        Arc::new(move |action: A| {
            log::debug!("dispatching \"{}\": {:?}", action.kind(), action);
            let result = next(action);
            if let Err(error) = &result {
                log::debug!("dispatch failed: {}", error);
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionEnvelope;
    use crate::middleware::apply_middleware;
    use crate::store::Store;

    fn counter(state: Option<i64>, action: &ActionEnvelope<&'static str>) -> Option<i64> {
        let state = state.unwrap_or(0);
        match action.action() {
            Some(&"add") => Some(state + 1),
            _ => Some(state),
        }
    }

    #[test]
    fn logging_is_transparent_to_the_dispatch() {
        let store = Store::builder(counter)
            .enhancer(apply_middleware(vec![Box::new(LoggingMiddleware)]))
            .build()
            .unwrap();

        assert_eq!(store.dispatch("add").unwrap(), "add");
        assert_eq!(store.get_state().unwrap(), 1);
    }
}
