//! Transition functions and their composition.
//!
//! A reducer computes the next state from the current state and an action.
//! Plain reducers are ordinary functions; `combine_reducers` merges a set
//! of named slice reducers into one reducer over a keyed state object.

mod combine;
mod reducer;

pub use combine::{combine_reducers, CombinedReducer, SliceReducer, SliceReducers, Slices};
pub use reducer::{BoxedReducer, Reducer};
