//! Error type for condition compilation and evaluation.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while compiling or evaluating a condition expression.
pub enum ExprError {
    #[error("cannot parse condition '{expression}': {message}")]
    /// The expression (after `{name}` rewriting) is not a valid Rhai expression.
    Parse {
        /// Expression text as written by the author.
        expression: String,
        /// Parser message.
        message: String,
    },
    #[error("cannot evaluate condition '{expression}': {message}")]
    /// Evaluation raised a runtime error (type mismatch, limits, unknown function).
    Eval {
        /// Expression text as written by the author.
        expression: String,
        /// Runtime error message.
        message: String,
    },
    #[error("condition '{expression}' produced {type_name}, expected a boolean")]
    /// Evaluation succeeded but did not produce a boolean.
    NotBoolean {
        /// Expression text as written by the author.
        expression: String,
        /// Rhai type name of the produced value.
        type_name: String,
    },
}
