//! Survey-wide settings, loadable from RON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether answers may be edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyMode {
    /// Answers are editable.
    #[default]
    Edit,
    /// Everything is read-only.
    Display,
}

/// Where a question title is placed relative to its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleLocation {
    /// Above the input.
    #[default]
    Top,
    /// Below the input.
    Bottom,
    /// Left of the input.
    Left,
}

/// Where a question's errors are placed relative to its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLocation {
    /// Above the input.
    #[default]
    Top,
    /// Below the input.
    Bottom,
}

/// Settings a survey container exposes to its questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveySettings {
    /// Edit or display mode.
    pub mode: SurveyMode,
    /// Marker rendered in titles of required questions.
    pub required_text: String,
    /// First question number: digits (`"5"`) or a single letter (`"A"`). Empty means 1.
    pub question_start_index: String,
    /// Title template with `{no}`, `{title}` and `{require}` placeholders.
    pub question_title_template: Option<String>,
    /// Default title placement.
    pub question_title_location: TitleLocation,
    /// Default error placement.
    pub question_error_location: ErrorLocation,
    /// Whether visible questions are numbered.
    pub show_question_numbers: bool,
    /// Localization overrides, keyed like the built-in strings.
    pub strings: BTreeMap<String, String>,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            mode: SurveyMode::Edit,
            required_text: "*".to_string(),
            question_start_index: String::new(),
            question_title_template: None,
            question_title_location: TitleLocation::Top,
            question_error_location: ErrorLocation::Top,
            show_question_numbers: true,
            strings: BTreeMap::new(),
        }
    }
}
