//! Condition expressions, text templates and answer-value helpers shared by the survey model.
//!
//! - [`ConditionRunner`]: evaluate `enable_if` / `visible_if` style boolean expressions
//! - [`TemplateProcessor`]: expand `{name}` placeholders in titles and templates
//! - [`is_value_empty`]: the single emptiness predicate used for answers

mod condition;
mod error;
mod template;
mod value;

#[cfg(test)]
mod test_template;

pub use condition::ConditionRunner;
pub use error::ExprError;
pub use template::{FnSource, TemplateProcessor, TemplateSource};
pub use value::{ValueMap, display_value, is_value_empty, lookup};
