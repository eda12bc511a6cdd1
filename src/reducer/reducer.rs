use crate::action::{Action, ActionEnvelope};
use crate::error::ShapeError;

/// A pure transition function: current state and an action in, next state
/// out.
///
/// `state` is `None` only while the store establishes its initial state;
/// the reducer must then return a concrete default. For any action it does
/// not recognize, a reducer must return the previous state unchanged.
///
/// Plain functions of the matching shape implement this trait directly;
/// returning `None` from one is a contract violation, surfaced to the
/// dispatching caller as a shape error. A reducer that wants to hold "no
/// value" must encode that inside its state type instead.
pub trait Reducer<S, A>: Send + Sync {
    /// Compute the next state.
    fn reduce(&self, state: Option<S>, action: &ActionEnvelope<A>) -> Result<S, ShapeError>;
}

/// A replaceable reducer, as held by the store.
pub type BoxedReducer<S, A> = Box<dyn Reducer<S, A>>;

impl<S, A, F> Reducer<S, A> for F
where
    A: Action,
    F: Fn(Option<S>, &ActionEnvelope<A>) -> Option<S> + Send + Sync,
{
    fn reduce(&self, state: Option<S>, action: &ActionEnvelope<A>) -> Result<S, ShapeError> {
        self(state, action).ok_or_else(|| ShapeError::MissingState {
            action_kind: action.kind_label().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(state: Option<i64>, action: &ActionEnvelope<&'static str>) -> Option<i64> {
        let state = state.unwrap_or(0);
        match action.action() {
            Some(&"increment") => Some(state + 1),
            _ => Some(state),
        }
    }

    #[test]
    fn functions_reduce_directly() {
        let next = counter.reduce(Some(3), &ActionEnvelope::app("increment"));
        assert_eq!(next, Ok(4));
    }

    #[test]
    fn initialization_produces_the_default() {
        let initial = counter.reduce(None, &ActionEnvelope::init());
        assert_eq!(initial, Ok(0));
    }

    #[test]
    fn missing_state_becomes_a_shape_error() {
        fn broken(_state: Option<i64>, _action: &ActionEnvelope<&'static str>) -> Option<i64> {
            None
        }

        let error = broken.reduce(Some(1), &ActionEnvelope::app("boom")).unwrap_err();
        assert_eq!(
            error,
            ShapeError::MissingState {
                action_kind: "boom".to_string()
            }
        );
    }
}
