use serde_json::Value;

use crate::action::Action;
use crate::error::ActionError;

/// A short descriptive label for a dynamic value, used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An action crossing a trust boundary, such as deserialized input or a
/// cross-module handoff.
///
/// Typed actions prove their contract at compile time; a `DynAction` proves
/// it at construction instead: the value must be a plain structured record
/// carrying a string `"type"` field. Once built it behaves like any other
/// action.
///
/// ```
/// use canister::DynAction;
/// use serde_json::json;
///
/// let action = DynAction::new(json!({ "type": "todo/add", "text": "milk" })).unwrap();
/// assert_eq!(canister::Action::kind(&action), "todo/add");
///
/// assert!(DynAction::new(json!([1, 2, 3])).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynAction {
    kind: String,
    value: Value,
}

impl DynAction {
    /// Validate a dynamic value into an action.
    pub fn new(value: Value) -> Result<Self, ActionError> {
        if !value.is_object() {
            return Err(ActionError::NotARecord {
                kind: kind_of(&value),
            });
        }
        let kind = match value.get("type") {
            None => return Err(ActionError::MissingKind),
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(ActionError::KindNotAString {
                    kind: kind_of(other),
                })
            }
        };
        Ok(Self { kind, value })
    }

    /// The underlying record.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Unwrap the underlying record.
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl Action for DynAction {
    fn kind(&self) -> &str {
        &self.kind
    }
}

impl TryFrom<Value> for DynAction {
    type Error = ActionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_records_with_a_string_type() {
        let action = DynAction::new(json!({ "type": "add", "amount": 2 })).unwrap();
        assert_eq!(action.kind(), "add");
        assert_eq!(action.value()["amount"], json!(2));
    }

    #[test]
    fn rejects_values_that_are_not_records() {
        let error = DynAction::new(json!("add")).unwrap_err();
        assert_eq!(error, ActionError::NotARecord { kind: "string" });

        let error = DynAction::new(json!([1, 2])).unwrap_err();
        assert_eq!(error, ActionError::NotARecord { kind: "array" });
    }

    #[test]
    fn rejects_records_without_a_usable_type() {
        let error = DynAction::new(json!({ "payload": 1 })).unwrap_err();
        assert_eq!(error, ActionError::MissingKind);

        let error = DynAction::new(json!({ "type": 7 })).unwrap_err();
        assert_eq!(error, ActionError::KindNotAString { kind: "number" });
    }

    #[test]
    fn kind_labels_cover_every_variant() {
        assert_eq!(kind_of(&Value::Null), "null");
        assert_eq!(kind_of(&json!(true)), "boolean");
        assert_eq!(kind_of(&json!(1.5)), "number");
        assert_eq!(kind_of(&json!("s")), "string");
        assert_eq!(kind_of(&json!([])), "array");
        assert_eq!(kind_of(&json!({})), "object");
    }
}
