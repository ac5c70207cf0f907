//! A survey session driving a set of questions.

use std::rc::Rc;

use serde_json::Value;
use survey_expr::ValueMap;
use tracing::debug;

use crate::{Answerable, DataProvider, Survey, SurveyError};

/// Questions bound to one [`Survey`].
///
/// The form routes answer changes through the survey so conditions, numbering and titles of
/// every question stay current.
pub struct Form {
    /// Shared container and answer storage.
    survey: Rc<Survey>,
    /// Questions in display order.
    questions: Vec<Box<dyn Answerable>>,
}

impl Form {
    /// An empty form over `survey`.
    pub fn new(survey: Survey) -> Self {
        Self {
            survey: Rc::new(survey),
            questions: Vec::new(),
        }
    }

    /// The survey holding settings and answers.
    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    /// Attach `question` to the survey and append it.
    pub fn add_question(&mut self, mut question: impl Answerable + 'static) {
        question.set_survey(self.survey.clone());
        question.set_data(self.survey.clone());
        self.questions.push(Box::new(question));
    }

    /// Questions in display order.
    pub fn questions(&self) -> &[Box<dyn Answerable>] {
        &self.questions
    }

    /// Questions in display order, mutably.
    pub fn questions_mut(&mut self) -> &mut [Box<dyn Answerable>] {
        &mut self.questions
    }

    /// The question called `name`.
    pub fn question(&self, name: &str) -> Option<&dyn Answerable> {
        self.questions
            .iter()
            .find(|q| q.name() == name)
            .map(|q| &**q)
    }

    /// The question called `name`, mutably.
    pub fn question_mut(&mut self, name: &str) -> Option<&mut (dyn Answerable + 'static)> {
        self.questions
            .iter_mut()
            .find(|q| q.name() == name)
            .map(|q| &mut **q)
    }

    /// The question called `name` as its concrete type.
    pub fn question_as<T: 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.question_mut(name)?.as_any_mut().downcast_mut::<T>()
    }

    /// Store an answer and propagate it to conditions and titles.
    pub fn set_value(&mut self, name: &str, value: Value) {
        self.survey.set_value(name, value.clone());
        if let Some(question) = self.question_mut(name) {
            question.on_survey_value_changed(value);
        }
        self.run_conditions();
        for question in &mut self.questions {
            question.on_any_value_changed(name);
        }
    }

    /// Replace every answer and comment at once, then refresh all questions.
    pub fn set_values(&mut self, values: ValueMap) {
        self.survey.set_values(values);
        for question in &mut self.questions {
            let value = self.survey.get_value(question.name());
            question.on_survey_value_changed(value);
        }
        self.run_conditions();
    }

    /// Store a comment for the question called `name`.
    pub fn set_comment(&mut self, name: &str, comment: &str) {
        match self.question_mut(name) {
            Some(question) => question.set_comment(comment.to_string()),
            None => self.survey.set_comment(name, comment),
        }
    }

    /// Re-evaluate every question's conditions against the current answers.
    pub fn run_conditions(&mut self) {
        let values = self.survey.values();
        for question in &mut self.questions {
            question.run_condition(&values);
        }
        self.update_visible_indices();
    }

    /// Number the visible questions, or clear the numbers when numbering is off.
    pub fn update_visible_indices(&mut self) {
        let numbered = self.survey.settings().show_question_numbers;
        let mut next = 0;
        for question in &mut self.questions {
            if numbered && question.is_visible() {
                question.set_visible_index(next);
                next += 1;
            } else {
                question.set_visible_index(-1);
            }
        }
    }

    /// Check every visible question; `true` when any has errors.
    pub fn has_errors(&mut self, notify: bool) -> bool {
        let mut failed = 0;
        for question in &mut self.questions {
            if question.is_visible() && question.has_errors(notify) {
                failed += 1;
            }
        }
        debug!(questions = self.questions.len(), failed, "form_checked");
        failed > 0
    }

    /// Errors of every question that has any, in display order.
    pub fn errors(&self) -> Vec<(String, Vec<SurveyError>)> {
        self.questions
            .iter()
            .filter(|q| q.current_error_count() > 0)
            .map(|q| (q.name().to_string(), q.errors().to_vec()))
            .collect()
    }
}
