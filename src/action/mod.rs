//! Actions and the envelope reducers receive them in.
//!
//! This module provides the dispatchable side of the system:
//! - `Action`: the contract every dispatchable value satisfies
//! - `ActionEnvelope`: an action together with the store's private
//!   lifecycle markers
//! - `DynAction`: validated dynamic actions for trust boundaries

mod action;
mod dynamic;
mod envelope;

pub use action::Action;
pub use dynamic::{kind_of, DynAction};
pub use envelope::ActionEnvelope;
