//! Survey question model.
//!
//! - [`Question`]: answer and comment storage, the validation pipeline, `visible_if` /
//!   `enable_if` conditions and title rendering
//! - [`DynamicMatrixQuestion`]: a question whose answer is a growable array of rows
//! - [`Survey`]: in-memory container and answer store; [`Form`] drives a set of questions
//! - [`loader`]: RON loading for [`SurveySettings`] and other documents

mod answerable;
mod container;
mod data;
mod error;
mod form;
mod hooks;
pub mod loader;
mod locale;
mod matrix;
mod question;
mod settings;
mod survey;
mod validators;

#[cfg(test)]
mod test_question;
#[cfg(test)]
mod test_validators;

pub use answerable::Answerable;
pub use container::SurveyContainer;
pub use data::DataProvider;
pub use error::{Error, ErrorKind, SurveyError};
pub use form::Form;
pub use hooks::{Plain, QuestionHooks};
pub use locale::{Localization, Strings, default_strings, format_string};
pub use matrix::{
    DynamicMatrixQuestion, DynamicRows, MAX_ROW_COUNT, MatrixRowModel, normalized_value,
};
pub use question::{Property, Question, QuestionEvent};
pub use settings::{ErrorLocation, SurveyMode, SurveySettings, TitleLocation};
pub use survey::{COMMENT_SUFFIX, Survey};
pub use survey_expr::{ConditionRunner, ExprError, ValueMap, is_value_empty};
pub use validators::{
    AnswerCountValidator, EmailValidator, NumericValidator, RegexValidator, TextValidator,
    Validator, ValidatorChain, ValidatorOwner, ValidatorResult,
};
