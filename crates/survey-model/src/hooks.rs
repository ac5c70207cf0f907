//! Per-variant behaviour plugged into [`Question`](crate::Question).

use serde_json::Value;

use crate::{Localization, SurveyError};

/// Behaviour a question variant layers over the shared question lifecycle.
///
/// Every method has a default, so a variant only overrides what it changes.
pub trait QuestionHooks: 'static {
    /// Reshape a stored value on its way out of storage.
    fn value_from_data(&self, value: Value) -> Value {
        value
    }

    /// Reshape a value on its way into storage.
    fn value_to_data(&self, value: Value) -> Value {
        value
    }

    /// Called after the question's value changed, with the new value.
    fn on_value_changed(&mut self, _value: &Value) {}

    /// Extra checks run after the required check.
    fn check_for_errors(
        &self,
        _value: &Value,
        _errors: &mut Vec<SurveyError>,
        _strings: &dyn Localization,
    ) {
    }

    /// Whether the variant can carry a comment.
    fn supports_comment(&self) -> bool {
        true
    }

    /// Whether the variant can carry an "other" item.
    fn supports_other(&self) -> bool {
        false
    }

    /// Called when `has_other` flips.
    fn has_other_changed(&mut self, _has_other: bool) {}
}

/// A plain question: value stored as-is, optional comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain {
    /// Whether an "other" item may be enabled.
    pub other: bool,
}

impl Plain {
    /// Plain hooks that also allow an "other" item.
    pub fn with_other() -> Self {
        Self { other: true }
    }
}

impl QuestionHooks for Plain {
    fn supports_other(&self) -> bool {
        self.other
    }
}
