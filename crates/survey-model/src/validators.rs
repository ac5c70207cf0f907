//! Answer validators and the chain that runs them.
//!
//! A validator either accepts an answer (`None`), rejects it with an error, or accepts it while
//! handing back a normalized value (for example `"42"` becomes `42`). The chain stops at the
//! first error.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::{Localization, SurveyError, format_string};

/// Matches a plausible e-mail address.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@(([^<>()\[\]\\.,;:\s@"]+\.)+[^<>()\[\]\\.,;:\s@"]{2,})$"#,
    )
    .case_insensitive(true)
    .build()
    .expect("email pattern is valid")
});

/// Outcome of a validator that had something to say.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorResult {
    /// Normalized replacement for the answer.
    pub value: Option<Value>,
    /// Rejection.
    pub error: Option<SurveyError>,
}

impl ValidatorResult {
    /// A rejection.
    fn rejected(error: SurveyError) -> Self {
        Self {
            value: None,
            error: Some(error),
        }
    }
}

/// A single check over an answer.
pub trait Validator: fmt::Debug {
    /// Check `value`. `name` labels the value in default messages.
    fn validate(
        &self,
        value: &Value,
        name: Option<&str>,
        strings: &dyn Localization,
    ) -> Option<ValidatorResult>;
}

/// Something whose answer can be run through a [`ValidatorChain`].
pub trait ValidatorOwner {
    /// Answer to validate.
    fn validated_value(&self) -> Value;
    /// Replace the answer with a validator's normalized value.
    fn set_validated_value(&mut self, value: Value);
    /// Label used in default messages; `None` reads as "value".
    fn validator_title(&self) -> Option<String>;
    /// Strings for default messages.
    fn localization(&self) -> &dyn Localization;
}

/// Ordered validators; the first rejection wins.
#[derive(Debug, Default)]
pub struct ValidatorChain {
    /// Validators in run order.
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validator.
    pub fn push(&mut self, validator: impl Validator + 'static) {
        self.validators.push(Box::new(validator));
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator against the owner's answer, stopping at the first error.
    ///
    /// Normalized values are written back to the owner before the next validator runs.
    pub fn run(&self, owner: &mut dyn ValidatorOwner) -> Option<SurveyError> {
        for validator in &self.validators {
            let value = owner.validated_value();
            let title = owner.validator_title();
            let Some(result) = validator.validate(&value, title.as_deref(), owner.localization())
            else {
                continue;
            };
            if let Some(error) = result.error {
                return Some(error);
            }
            if let Some(value) = result.value {
                owner.set_validated_value(value);
            }
        }
        None
    }
}

/// Interpret an answer as a number; numeric strings count.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// JSON value for `n`, preferring an integer when `n` is integral.
fn number_value(n: f64) -> Value {
    #[allow(clippy::cast_possible_truncation)]
    let int = n as i64;
    #[allow(clippy::cast_precision_loss)]
    let exact = int as f64 == n;
    if exact { Value::from(int) } else { Value::from(n) }
}

/// Requires a numeric answer, optionally within `[min_value, max_value]`.
#[derive(Debug, Clone, Default)]
pub struct NumericValidator {
    /// Inclusive lower bound.
    pub min_value: Option<f64>,
    /// Inclusive upper bound.
    pub max_value: Option<f64>,
    /// Custom message replacing the defaults.
    pub text: Option<String>,
}

impl NumericValidator {
    /// Validator for numbers in `[min_value, max_value]` (either bound optional).
    pub fn new(min_value: Option<f64>, max_value: Option<f64>) -> Self {
        Self {
            min_value,
            max_value,
            text: None,
        }
    }

    /// Replace the default message.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Message for an out-of-range number.
    fn range_text(&self, name: Option<&str>, strings: &dyn Localization) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        let name = name.unwrap_or("value");
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => format_string(
                &strings.get_string("numericMinMax"),
                &[name.to_string(), min.to_string(), max.to_string()],
            ),
            (Some(min), None) => format_string(
                &strings.get_string("numericMin"),
                &[name.to_string(), min.to_string()],
            ),
            (None, Some(max)) => format_string(
                &strings.get_string("numericMax"),
                &[name.to_string(), max.to_string()],
            ),
            (None, None) => String::new(),
        }
    }
}

impl Validator for NumericValidator {
    fn validate(
        &self,
        value: &Value,
        name: Option<&str>,
        strings: &dyn Localization,
    ) -> Option<ValidatorResult> {
        let Some(number) = as_number(value) else {
            let text = self
                .text
                .clone()
                .unwrap_or_else(|| strings.get_string("numericError"));
            return Some(ValidatorResult::rejected(SurveyError::validation(text)));
        };

        let below = self.min_value.is_some_and(|min| number < min);
        let above = self.max_value.is_some_and(|max| number > max);
        if below || above {
            return Some(ValidatorResult::rejected(SurveyError::validation(
                self.range_text(name, strings),
            )));
        }

        if value.is_number() {
            None
        } else {
            Some(ValidatorResult {
                value: Some(number_value(number)),
                error: None,
            })
        }
    }
}

/// Bounds the length of a text answer. A bound of 0 is "no bound".
#[derive(Debug, Clone, Default)]
pub struct TextValidator {
    /// Minimum number of characters.
    pub min_length: usize,
    /// Maximum number of characters.
    pub max_length: usize,
    /// Custom message replacing the defaults.
    pub text: Option<String>,
}

impl TextValidator {
    /// Validator for texts of `min_length..=max_length` characters.
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
            text: None,
        }
    }

    /// Replace the default message.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Default message for the configured bounds.
    fn default_text(&self, strings: &dyn Localization) -> String {
        match (self.min_length, self.max_length) {
            (0, max) => format_string(&strings.get_string("textMaxLength"), &[max.to_string()]),
            (min, 0) => format_string(&strings.get_string("textMinLength"), &[min.to_string()]),
            (min, max) => format_string(
                &strings.get_string("textMinMaxLength"),
                &[min.to_string(), max.to_string()],
            ),
        }
    }
}

impl Validator for TextValidator {
    fn validate(
        &self,
        value: &Value,
        _name: Option<&str>,
        strings: &dyn Localization,
    ) -> Option<ValidatorResult> {
        let Value::String(text) = value else {
            return None;
        };
        let len = text.chars().count();
        let too_short = self.min_length > 0 && len < self.min_length;
        let too_long = self.max_length > 0 && len > self.max_length;
        if !too_short && !too_long {
            return None;
        }
        let message = self
            .text
            .clone()
            .unwrap_or_else(|| self.default_text(strings));
        Some(ValidatorResult::rejected(SurveyError::validation(message)))
    }
}

/// Bounds the number of selected items in an array answer. A bound of 0 is "no bound".
#[derive(Debug, Clone, Default)]
pub struct AnswerCountValidator {
    /// Minimum number of items.
    pub min_count: usize,
    /// Maximum number of items.
    pub max_count: usize,
    /// Custom message replacing the defaults.
    pub text: Option<String>,
}

impl AnswerCountValidator {
    /// Validator for arrays of `min_count..=max_count` items.
    pub fn new(min_count: usize, max_count: usize) -> Self {
        Self {
            min_count,
            max_count,
            text: None,
        }
    }

    /// Replace the default message.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl Validator for AnswerCountValidator {
    fn validate(
        &self,
        value: &Value,
        _name: Option<&str>,
        strings: &dyn Localization,
    ) -> Option<ValidatorResult> {
        let Value::Array(items) = value else {
            return None;
        };
        let count = items.len();
        let message = if self.min_count > 0 && count < self.min_count {
            format_string(&strings.get_string("minSelectError"), &[self.min_count.to_string()])
        } else if self.max_count > 0 && count > self.max_count {
            format_string(&strings.get_string("maxSelectError"), &[self.max_count.to_string()])
        } else {
            return None;
        };
        let message = self.text.clone().unwrap_or(message);
        Some(ValidatorResult::rejected(SurveyError::validation(message)))
    }
}

/// Requires a text answer to match a regular expression.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    /// Compiled pattern.
    regex: Regex,
    /// Custom message replacing the default.
    pub text: Option<String>,
}

impl RegexValidator {
    /// Compile `pattern` into a validator.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            text: None,
        })
    }

    /// Replace the default message.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The pattern source.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Validator for RegexValidator {
    fn validate(
        &self,
        value: &Value,
        _name: Option<&str>,
        strings: &dyn Localization,
    ) -> Option<ValidatorResult> {
        let Value::String(text) = value else {
            return None;
        };
        if self.regex.is_match(text) {
            return None;
        }
        let message = self
            .text
            .clone()
            .unwrap_or_else(|| strings.get_string("invalidFormat"));
        Some(ValidatorResult::rejected(SurveyError::validation(message)))
    }
}

/// Requires a text answer to look like an e-mail address.
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    /// Custom message replacing the default.
    pub text: Option<String>,
}

impl EmailValidator {
    /// An e-mail validator with the default message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default message.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl Validator for EmailValidator {
    fn validate(
        &self,
        value: &Value,
        _name: Option<&str>,
        strings: &dyn Localization,
    ) -> Option<ValidatorResult> {
        let Value::String(text) = value else {
            return None;
        };
        if EMAIL.is_match(text.trim()) {
            return None;
        }
        let message = self
            .text
            .clone()
            .unwrap_or_else(|| strings.get_string("invalidEmail"));
        Some(ValidatorResult::rejected(SurveyError::validation(message)))
    }
}
