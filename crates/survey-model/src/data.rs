//! External storage for answers and comments.

use serde_json::Value;

/// Storage a question writes its answer and comment to, keyed by the question name.
///
/// Methods take `&self`: providers are shared between the questions of a survey and use
/// interior mutability. Access is single-threaded.
pub trait DataProvider {
    /// Stored answer for `name`, or `Value::Null`.
    fn get_value(&self, name: &str) -> Value;
    /// Store (or clear, for empty values) the answer for `name`.
    fn set_value(&self, name: &str, value: Value);
    /// Stored comment for `name`, or an empty string.
    fn get_comment(&self, name: &str) -> String;
    /// Store (or clear, for an empty string) the comment for `name`.
    fn set_comment(&self, name: &str, comment: &str);
}
