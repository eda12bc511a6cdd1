use thiserror::Error;

/// Errors returned by store construction and store operations.
///
/// Configuration errors surface at the call that violates the contract;
/// invariant violations surface when an operation runs in a state where it
/// is illegal; shape errors come from transition functions and are wrapped
/// here when they reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// State was read while the reducer was executing.
    #[error(
        "cannot read the state while the reducer is executing; the reducer \
         already receives the state as an argument, pass it down instead of \
         reading it from the store"
    )]
    StateReadDuringDispatch,

    /// A listener was added while the reducer was executing.
    #[error(
        "cannot subscribe while the reducer is executing; subscribe before \
         dispatching and read the latest state inside the listener"
    )]
    SubscribeDuringDispatch,

    /// A listener was removed while the reducer was executing.
    #[error("cannot unsubscribe a listener while the reducer is executing")]
    UnsubscribeDuringDispatch,

    /// A dispatch was started while another dispatch was still in flight.
    #[error("reducers and listeners may not dispatch actions")]
    NestedDispatch,

    /// More than one enhancer was handed to the store builder.
    #[error(
        "multiple enhancers are not supported; compose them into a single \
         enhancer before building the store"
    )]
    MultipleEnhancers,

    /// A middleware dispatched while the interceptor chain was still being
    /// assembled.
    #[error(
        "dispatching while constructing middleware is not allowed; other \
         middleware would not be applied to this dispatch"
    )]
    DispatchDuringMiddlewareSetup,

    /// A captured dispatch capability outlived every handle to its store.
    #[error("the store behind this dispatch capability has been dropped")]
    StoreGone,

    /// A transition function violated the definite-state contract.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// A transition function failed to produce a definite state.
///
/// Reducers must return the previous state for actions they do not
/// recognize, and a concrete initial state when given no previous state;
/// "no value" belongs inside the state type, never in its absence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The root reducer returned no state.
    #[error(
        "the reducer returned no state when handling \"{action_kind}\"; to \
         ignore an action, return the previous state unchanged"
    )]
    MissingState { action_kind: String },

    /// A slice reducer returned no state when asked for its initial state.
    #[error(
        "the slice reducer for key \"{key}\" returned no state during \
         initialization; when given no previous state it must return a \
         concrete initial state"
    )]
    SliceInit { key: String },

    /// A slice reducer returned no state when probed with an unknown
    /// action.
    #[error(
        "the slice reducer for key \"{key}\" returned no state when probed \
         with an unknown action; do not special-case the store's private \
         lifecycle actions, return the previous state for anything \
         unrecognized"
    )]
    SliceProbe { key: String },

    /// A slice reducer returned no state during a regular reduction.
    #[error(
        "the slice reducer for key \"{key}\" returned no state when \
         handling \"{action_kind}\"; to ignore an action, return the \
         previous state unchanged"
    )]
    Slice { key: String, action_kind: String },
}

/// A value failed validation at the dynamic action boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The value is not a plain structured record.
    #[error(
        "actions must be plain structured records, received {kind}; use \
         middleware to dispatch other kinds of values"
    )]
    NotARecord { kind: &'static str },

    /// The record has no `"type"` field.
    #[error("actions must carry a \"type\" field")]
    MissingKind,

    /// The record's `"type"` field is not a string.
    #[error("the \"type\" field of an action must be a string, received {kind}")]
    KindNotAString { kind: &'static str },
}
