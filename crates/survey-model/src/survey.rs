//! In-memory survey: answer storage plus container settings.

use std::{cell::RefCell, fmt};

use serde_json::Value;
use survey_expr::{TemplateProcessor, ValueMap, is_value_empty};
use tracing::trace;

use crate::{
    DataProvider, ErrorKind, ErrorLocation, Localization, Strings, SurveyContainer, SurveyError,
    SurveyMode, SurveySettings, TitleLocation,
};

/// Suffix appended to a question name to form the key its comment is stored under.
pub const COMMENT_SUFFIX: &str = "-Comment";

/// Survey-level validation hook: `(question name, answer) -> message`.
type QuestionValidator = Box<dyn Fn(&str, &Value) -> Option<String>>;

/// Answers and settings for one survey session.
///
/// Comments share the answer map under `"<name>-Comment"`, so [`Survey::values`] is a complete
/// snapshot of the session. Empty answers are removed rather than stored.
pub struct Survey {
    /// Container settings.
    settings: SurveySettings,
    /// Localization built from the settings' overrides.
    strings: Strings,
    /// Answers and comments.
    values: RefCell<ValueMap>,
    /// Expands `{name}` references in question titles.
    text_processor: TemplateProcessor,
    /// Optional custom validation.
    validator: Option<QuestionValidator>,
}

impl fmt::Debug for Survey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Survey")
            .field("settings", &self.settings)
            .field("values", &self.values.borrow())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl Default for Survey {
    fn default() -> Self {
        Self::new(SurveySettings::default())
    }
}

impl Survey {
    /// Create an empty survey with `settings`.
    pub fn new(settings: SurveySettings) -> Self {
        let strings = Strings::with_overrides(settings.strings.clone());
        Self {
            settings,
            strings,
            values: RefCell::new(ValueMap::new()),
            text_processor: TemplateProcessor::new(),
            validator: None,
        }
    }

    /// Install a survey-level validation hook consulted after a question's own checks pass.
    pub fn with_question_validator(
        mut self,
        validator: impl Fn(&str, &Value) -> Option<String> + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Container settings.
    pub fn settings(&self) -> &SurveySettings {
        &self.settings
    }

    /// Snapshot of all answers and comments.
    pub fn values(&self) -> ValueMap {
        self.values.borrow().clone()
    }

    /// Replace all answers and comments, dropping empty entries.
    pub fn set_values(&self, values: ValueMap) {
        let mut stored = self.values.borrow_mut();
        *stored = values
            .into_iter()
            .filter(|(_, v)| !is_value_empty(v))
            .collect();
    }

    /// Key the comment for `name` is stored under.
    pub fn comment_key(name: &str) -> String {
        format!("{name}{COMMENT_SUFFIX}")
    }
}

impl DataProvider for Survey {
    fn get_value(&self, name: &str) -> Value {
        self.values
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set_value(&self, name: &str, value: Value) {
        trace!(question = name, "survey_value_set");
        let mut values = self.values.borrow_mut();
        if is_value_empty(&value) {
            values.remove(name);
        } else {
            values.insert(name.to_string(), value);
        }
    }

    fn get_comment(&self, name: &str) -> String {
        match self.values.borrow().get(&Self::comment_key(name)) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    fn set_comment(&self, name: &str, comment: &str) {
        let key = Self::comment_key(name);
        let mut values = self.values.borrow_mut();
        if comment.is_empty() {
            values.remove(&key);
        } else {
            values.insert(key, Value::String(comment.to_string()));
        }
    }
}

impl SurveyContainer for Survey {
    fn is_display_mode(&self) -> bool {
        self.settings.mode == SurveyMode::Display
    }

    fn required_text(&self) -> String {
        self.settings.required_text.clone()
    }

    fn question_start_index(&self) -> String {
        self.settings.question_start_index.clone()
    }

    fn question_title_location(&self) -> TitleLocation {
        self.settings.question_title_location
    }

    fn question_error_location(&self) -> ErrorLocation {
        self.settings.question_error_location
    }

    fn question_title_template(&self) -> Option<String> {
        self.settings
            .question_title_template
            .clone()
            .filter(|t| !t.is_empty())
    }

    fn validate_question(&self, name: &str) -> Option<SurveyError> {
        let validator = self.validator.as_ref()?;
        let value = self.get_value(name);
        validator(name, &value).map(|text| SurveyError::new(ErrorKind::Container, text))
    }

    fn process_text(&self, text: &str) -> String {
        let values = self.values.borrow();
        self.text_processor.process(text, &*values)
    }

    fn localization(&self) -> &dyn Localization {
        &self.strings
    }
}
