//! The container (survey) contract questions consume.

use crate::{ErrorLocation, Localization, SurveyError, TitleLocation};

/// Survey-wide services and settings a question reads.
pub trait SurveyContainer {
    /// Whether the whole survey is read-only.
    fn is_display_mode(&self) -> bool;
    /// Marker shown in the titles of required questions.
    fn required_text(&self) -> String;
    /// Configured first question number (digits or a single letter); empty means default.
    fn question_start_index(&self) -> String;
    /// Default title placement.
    fn question_title_location(&self) -> TitleLocation;
    /// Default error placement.
    fn question_error_location(&self) -> ErrorLocation;
    /// Title template, when the survey renders titles from one.
    fn question_title_template(&self) -> Option<String>;
    /// Custom, survey-level validation of the named question's answer.
    fn validate_question(&self, name: &str) -> Option<SurveyError>;
    /// Expand answer references in display text.
    fn process_text(&self, text: &str) -> String {
        text.to_string()
    }
    /// Strings for default messages and labels.
    fn localization(&self) -> &dyn Localization;
}
