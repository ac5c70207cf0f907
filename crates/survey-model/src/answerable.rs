//! Object-safe view of a question, used where questions of different variants are mixed.

use std::{any::Any, rc::Rc};

use serde_json::Value;
use survey_expr::ValueMap;

use crate::{DataProvider, Question, QuestionHooks, SurveyContainer, SurveyError};

/// What a form needs from any question, whatever its variant.
pub trait Answerable {
    /// Identifier and storage key.
    fn name(&self) -> &str;
    /// Current answer.
    fn value(&self) -> Value;
    /// Replace the answer and notify.
    fn set_value(&mut self, value: Value);
    /// Current comment.
    fn comment(&self) -> String;
    /// Replace the comment.
    fn set_comment(&mut self, comment: String);
    /// Whether the answer is empty.
    fn is_empty(&self) -> bool;
    /// Rebuild the error list; `true` when errors were found.
    fn has_errors(&mut self, notify: bool) -> bool;
    /// Errors from the latest check.
    fn errors(&self) -> &[SurveyError];
    /// Number of errors from the latest check.
    fn current_error_count(&self) -> usize {
        self.errors().len()
    }
    /// Whether the question is shown.
    fn is_visible(&self) -> bool;
    /// Whether editing is disabled.
    fn is_read_only(&self) -> bool;
    /// Position among visible questions, or -1.
    fn visible_index(&self) -> i32;
    /// Set the position among visible questions.
    fn set_visible_index(&mut self, index: i32);
    /// Title as rendered.
    fn full_title(&mut self) -> String;
    /// Re-evaluate conditions against `values`.
    fn run_condition(&mut self, values: &ValueMap);
    /// Apply an answer that changed on the survey side.
    fn on_survey_value_changed(&mut self, value: Value);
    /// React to another answer changing.
    fn on_any_value_changed(&mut self, name: &str);
    /// Attach the owning container.
    fn set_survey(&mut self, survey: Rc<dyn SurveyContainer>);
    /// Attach answer storage.
    fn set_data(&mut self, data: Rc<dyn DataProvider>);
    /// Downcast support.
    fn as_any(&self) -> &dyn Any;
    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<H: QuestionHooks> Answerable for Question<H> {
    fn name(&self) -> &str {
        Self::name(self)
    }

    fn value(&self) -> Value {
        Self::value(self)
    }

    fn set_value(&mut self, value: Value) {
        Self::set_value(self, value);
    }

    fn comment(&self) -> String {
        Self::comment(self)
    }

    fn set_comment(&mut self, comment: String) {
        Self::set_comment(self, comment);
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn has_errors(&mut self, notify: bool) -> bool {
        Self::has_errors(self, notify)
    }

    fn errors(&self) -> &[SurveyError] {
        Self::errors(self)
    }

    fn is_visible(&self) -> bool {
        Self::is_visible(self)
    }

    fn is_read_only(&self) -> bool {
        Self::is_read_only(self)
    }

    fn visible_index(&self) -> i32 {
        Self::visible_index(self)
    }

    fn set_visible_index(&mut self, index: i32) {
        Self::set_visible_index(self, index);
    }

    fn full_title(&mut self) -> String {
        Self::full_title(self)
    }

    fn run_condition(&mut self, values: &ValueMap) {
        Self::run_condition(self, values);
    }

    fn on_survey_value_changed(&mut self, value: Value) {
        Self::on_survey_value_changed(self, value);
    }

    fn on_any_value_changed(&mut self, name: &str) {
        Self::on_any_value_changed(self, name);
    }

    fn set_survey(&mut self, survey: Rc<dyn SurveyContainer>) {
        Self::set_survey(self, survey);
    }

    fn set_data(&mut self, data: Rc<dyn DataProvider>) {
        Self::set_data(self, data);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
