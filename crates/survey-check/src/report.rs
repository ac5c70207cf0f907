//! Per-question summary printed by `survey-check`.

use std::fmt;

use serde_json::Value;
use survey_model::{Form, SurveyError};

/// What `check` reports for one question.
#[derive(Debug, Clone)]
pub struct QuestionReport {
    /// Title as rendered (number, required marker, processed title).
    pub title: String,
    /// Current answer.
    pub value: Value,
    /// Current comment.
    pub comment: String,
    /// Whether the question is shown.
    pub visible: bool,
    /// Whether the question is read-only.
    pub read_only: bool,
    /// Errors from the latest check.
    pub errors: Vec<SurveyError>,
}

impl QuestionReport {
    /// Whether the question failed validation.
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for QuestionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.title)?;
        match &self.value {
            Value::Null => write!(f, "(no answer)")?,
            value => write!(f, "{value}")?,
        }
        if !self.visible {
            write!(f, " [hidden]")?;
        } else if self.read_only {
            write!(f, " [read-only]")?;
        }
        if !self.comment.is_empty() {
            write!(f, "\n    comment: {}", self.comment)?;
        }
        for error in &self.errors {
            write!(f, "\n    error: {error}")?;
        }
        Ok(())
    }
}

/// Check every visible question of `form` and summarize each one.
pub fn collect(form: &mut Form) -> Vec<QuestionReport> {
    form.has_errors(true);
    form.questions_mut()
        .iter_mut()
        .map(|question| QuestionReport {
            title: question.full_title(),
            value: question.value(),
            comment: question.comment(),
            visible: question.is_visible(),
            read_only: question.is_read_only(),
            errors: if question.is_visible() {
                question.errors().to_vec()
            } else {
                Vec::new()
            },
        })
        .collect()
}
