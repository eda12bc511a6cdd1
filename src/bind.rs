//! Binding action creators to a dispatch capability.
//!
//! An action creator is a plain function producing an action from a
//! payload. Binding wraps it so calling the bound form dispatches the
//! produced action immediately, letting callers hand out self-contained
//! functions instead of a store handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::Action;
use crate::error::StoreError;
use crate::store::DispatchFn;

/// A function producing an action from a payload.
pub type ActionCreator<P, A> = Box<dyn Fn(P) -> A + Send + Sync>;

/// An action creator bound to a dispatch capability.
pub type BoundActionCreator<P, A> = Box<dyn Fn(P) -> Result<A, StoreError> + Send + Sync>;

/// Bind a single action creator to a dispatch capability.
///
/// The bound function forwards the produced action to `dispatch` and
/// returns the dispatched action.
pub fn bind_action_creator<P, A, F>(
    creator: F,
    dispatch: DispatchFn<A>,
) -> impl Fn(P) -> Result<A, StoreError> + Send + Sync
where
    A: Action,
    F: Fn(P) -> A + Send + Sync,
{
    move |payload| dispatch(creator(payload))
}

/// Bind a mapping of named action creators to a dispatch capability.
///
/// Returns a mapping with the same keys, every creator wrapped into a
/// dispatch call.
pub fn bind_action_creators<P, A>(
    creators: BTreeMap<String, ActionCreator<P, A>>,
    dispatch: DispatchFn<A>,
) -> BTreeMap<String, BoundActionCreator<P, A>>
where
    P: 'static,
    A: Action,
{
    creators
        .into_iter()
        .map(|(name, creator)| {
            let dispatch = Arc::clone(&dispatch);
            let bound: BoundActionCreator<P, A> =
                Box::new(move |payload| dispatch(creator(payload)));
            (name, bound)
        })
        .collect()
}
