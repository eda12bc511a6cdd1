//! # Canister
//!
//! A predictable state container for Rust.
//!
//! Canister keeps application state in a single store, updated only by
//! dispatching actions through pure transition functions:
//!
//! - `Store<S, A>` - the state cell, dispatch protocol and subscriptions
//! - `Reducer` / `combine_reducers` - pure transition functions and their
//!   composition over a keyed state object
//! - `apply_middleware` / `compose` - an interceptor chain on the dispatch
//!   path, built by right-to-left function composition
//! - `bind_action_creator` - self-dispatching action constructors
//!
//! ## Example
//!
//! ```
//! use canister::{ActionEnvelope, Store};
//!
//! fn counter(state: Option<i64>, action: &ActionEnvelope<&'static str>) -> Option<i64> {
//!     let state = state.unwrap_or(0);
//!     match action.action() {
//!         Some(&"increment") => Some(state + 1),
//!         Some(&"decrement") => Some(state - 1),
//!         _ => Some(state),
//!     }
//! }
//!
//! let store = Store::new(counter).unwrap();
//! let _subscription = store.subscribe(|| println!("state changed")).unwrap();
//!
//! store.dispatch("increment").unwrap();
//! store.dispatch("increment").unwrap();
//! store.dispatch("decrement").unwrap();
//! assert_eq!(store.get_state().unwrap(), 1);
//! ```

pub mod action;
pub mod bind;
pub mod compose;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod store;

// Re-export main types for convenience
pub use action::{kind_of, Action, ActionEnvelope, DynAction};
pub use bind::{bind_action_creator, bind_action_creators, ActionCreator, BoundActionCreator};
pub use compose::{compose, ComposeFn};
pub use error::{ActionError, ShapeError, StoreError};
pub use middleware::{apply_middleware, LoggingMiddleware, Middleware, MiddlewareApi};
pub use reducer::{
    combine_reducers, BoxedReducer, CombinedReducer, Reducer, SliceReducer, SliceReducers, Slices,
};
pub use store::{DispatchFn, Enhancer, StateObserver, Store, StoreBuilder, StoreCreator, Subscription};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        fn counter(state: Option<i64>, action: &ActionEnvelope<&'static str>) -> Option<i64> {
            let state = state.unwrap_or(0);
            match action.action() {
                Some(&"increment") => Some(state + 1),
                _ => Some(state),
            }
        }

        let store = Store::new(counter).unwrap();
        store.dispatch("increment").unwrap();
        assert_eq!(store.get_state().unwrap(), 1);
    }
}
