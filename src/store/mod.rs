//! The store engine: state cell, listener registry, dispatch protocol.
//!
//! A store is built from a reducer (optionally with a preloaded state and
//! an enhancer), mutated only through `dispatch`, and observed through
//! subscriptions.

mod builder;
mod store;
mod subscription;

pub use builder::{Enhancer, StoreBuilder, StoreCreator};
pub use store::{DispatchFn, StateObserver, Store};
pub use subscription::Subscription;
