//! Form definitions: the RON document describing a survey's questions.

use std::{collections::BTreeSet, path::Path};

use serde::Deserialize;
use survey_model::{
    AnswerCountValidator, DynamicMatrixQuestion, EmailValidator, Error, Form, NumericValidator,
    Question, QuestionHooks, RegexValidator, Survey, SurveySettings, TextValidator,
    ValidatorChain, loader,
};
use tracing::debug;

/// Row count of a matrix when the definition does not set one.
const fn default_row_count() -> i64 {
    2
}

/// A whole form: survey settings plus questions in display order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormDefinition {
    /// Survey-wide settings.
    #[serde(default)]
    pub settings: SurveySettings,
    /// Questions in display order.
    pub questions: Vec<QuestionDef>,
}

/// One question of a form.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionDef {
    /// Identifier and answer key.
    pub name: String,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Whether an answer is mandatory.
    #[serde(default)]
    pub is_required: bool,
    /// Replacement for the default required message.
    #[serde(default)]
    pub required_error_text: Option<String>,
    /// Visibility expression.
    #[serde(default)]
    pub visible_if: String,
    /// Enablement expression.
    #[serde(default)]
    pub enable_if: String,
    /// Whether a comment box is shown.
    #[serde(default)]
    pub has_comment: bool,
    /// Label of the comment box.
    #[serde(default)]
    pub comment_text: Option<String>,
    /// Validators, in run order.
    #[serde(default)]
    pub validators: Vec<ValidatorDef>,
    /// Question variant.
    #[serde(default)]
    pub kind: QuestionKind,
}

/// Question variants a definition can ask for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum QuestionKind {
    /// A single free-form answer.
    #[default]
    Text,
    /// A dynamic matrix.
    Matrix {
        /// Initial number of rows.
        #[serde(default = "default_row_count")]
        row_count: i64,
        /// Rows that must be filled in.
        #[serde(default)]
        min_row_count: usize,
    },
}

/// Validators a definition can attach to a question.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ValidatorDef {
    /// Numeric answer within optional bounds.
    Numeric {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<f64>,
        /// Custom message.
        #[serde(default)]
        text: Option<String>,
    },
    /// Text length bounds; 0 means unbounded.
    Text {
        /// Minimum length.
        #[serde(default)]
        min_length: usize,
        /// Maximum length.
        #[serde(default)]
        max_length: usize,
        /// Custom message.
        #[serde(default)]
        text: Option<String>,
    },
    /// Number of selected items; 0 means unbounded.
    AnswerCount {
        /// Minimum number of items.
        #[serde(default)]
        min_count: usize,
        /// Maximum number of items.
        #[serde(default)]
        max_count: usize,
        /// Custom message.
        #[serde(default)]
        text: Option<String>,
    },
    /// Text matching a regular expression.
    Regex {
        /// Pattern source.
        pattern: String,
        /// Custom message.
        #[serde(default)]
        text: Option<String>,
    },
    /// Text shaped like an e-mail address.
    Email {
        /// Custom message.
        #[serde(default)]
        text: Option<String>,
    },
}

impl ValidatorDef {
    /// Build the validator and append it to `chain`.
    fn push_into(&self, chain: &mut ValidatorChain) -> Result<(), String> {
        match self {
            Self::Numeric { min, max, text } => {
                let mut validator = NumericValidator::new(*min, *max);
                validator.text.clone_from(text);
                chain.push(validator);
            }
            Self::Text {
                min_length,
                max_length,
                text,
            } => {
                let mut validator = TextValidator::new(*min_length, *max_length);
                validator.text.clone_from(text);
                chain.push(validator);
            }
            Self::AnswerCount {
                min_count,
                max_count,
                text,
            } => {
                let mut validator = AnswerCountValidator::new(*min_count, *max_count);
                validator.text.clone_from(text);
                chain.push(validator);
            }
            Self::Regex { pattern, text } => {
                let mut validator = RegexValidator::new(pattern)
                    .map_err(|err| format!("invalid pattern {pattern:?}: {err}"))?;
                validator.text.clone_from(text);
                chain.push(validator);
            }
            Self::Email { text } => {
                let mut validator = EmailValidator::new();
                validator.text.clone_from(text);
                chain.push(validator);
            }
        }
        Ok(())
    }
}

impl QuestionDef {
    /// Copy the variant-independent settings onto `question`.
    fn configure<H: QuestionHooks>(&self, question: &mut Question<H>) -> Result<(), String> {
        if let Some(title) = &self.title {
            question.set_title(title.clone());
        }
        question.set_is_required(self.is_required);
        if let Some(text) = &self.required_error_text {
            question.set_required_error_text(text.clone());
        }
        question.set_visible_if(self.visible_if.clone());
        question.set_enable_if(self.enable_if.clone());
        question.set_has_comment(self.has_comment);
        if let Some(text) = &self.comment_text {
            question.set_comment_text(text.clone());
        }
        for validator in &self.validators {
            validator
                .push_into(question.validators_mut())
                .map_err(|err| format!("question `{}`: {err}", self.name))?;
        }
        Ok(())
    }

    /// Build the question and add it to `form`.
    fn add_to(&self, form: &mut Form) -> Result<(), String> {
        match &self.kind {
            QuestionKind::Text => {
                let mut question = Question::new(self.name.clone());
                self.configure(&mut question)?;
                form.add_question(question);
            }
            QuestionKind::Matrix {
                row_count,
                min_row_count,
            } => {
                let mut question = DynamicMatrixQuestion::matrix(self.name.clone());
                if !question.set_row_count(*row_count) {
                    return Err(format!(
                        "question `{}`: row_count {row_count} is out of range",
                        self.name
                    ));
                }
                question.set_min_row_count(*min_row_count);
                self.configure(&mut question)?;
                question.visible_rows();
                form.add_question(question);
            }
        }
        Ok(())
    }
}

impl FormDefinition {
    /// Load a definition from a `.ron` file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        loader::from_ron_path(path)
    }

    /// Parse a definition from RON text.
    #[cfg(test)]
    pub fn parse(source: &str) -> Result<Self, Error> {
        loader::from_ron_str(source, None)
    }

    /// Build a form with every question attached; `path` labels errors.
    pub fn build(&self, path: Option<&Path>) -> Result<Form, Error> {
        let invalid = |message: String| Error::Validation {
            path: path.map(Path::to_path_buf),
            message,
        };

        let mut seen = BTreeSet::new();
        for question in &self.questions {
            if question.name.trim().is_empty() {
                return Err(invalid("question with an empty name".to_string()));
            }
            if !seen.insert(question.name.as_str()) {
                return Err(invalid(format!(
                    "duplicate question name `{}`",
                    question.name
                )));
            }
        }

        let mut form = Form::new(Survey::new(self.settings.clone()));
        for question in &self.questions {
            question.add_to(&mut form).map_err(invalid)?;
        }
        form.run_conditions();
        debug!(questions = self.questions.len(), "form_built");
        Ok(form)
    }
}
