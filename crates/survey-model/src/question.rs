//! The question model: value and comment storage, validation, conditions and titles.

use std::{collections::VecDeque, fmt, mem, rc::Rc};

use serde_json::Value;
use survey_expr::{ConditionRunner, FnSource, TemplateProcessor, ValueMap, is_value_empty};
use tracing::{debug, trace};

use crate::{
    DataProvider, ErrorLocation, Localization, Plain, QuestionHooks, SurveyContainer,
    SurveyError, TitleLocation, Validator, ValidatorChain, ValidatorOwner, default_strings,
};

/// A flag whose change is announced with [`QuestionEvent::PropertyChanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// `is_required`
    IsRequired,
    /// `read_only`
    ReadOnly,
    /// `visible`
    Visible,
    /// `has_comment`
    HasComment,
    /// `has_other`
    HasOther,
    /// Row count of a dynamic matrix.
    RowCount,
}

/// Notifications delivered to question listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionEvent {
    /// The answer changed.
    ValueChanged,
    /// The comment changed, or the answer was replaced from the survey side.
    CommentChanged,
    /// The error list changed after a notifying check.
    ErrorsChanged,
    /// The rendered title may have changed.
    TitleChanged,
    /// A flag changed.
    PropertyChanged(Property),
}

/// Callback registered with [`Question::on_event`].
type Listener<H> = Box<dyn FnMut(&mut Question<H>, QuestionEvent)>;

/// Localization of the attached container, or the shared English strings.
fn strings_for(survey: Option<&Rc<dyn SurveyContainer>>) -> &dyn Localization {
    match survey {
        Some(survey) => survey.localization(),
        None => default_strings(),
    }
}

/// Question number for the zero-based `index` given a configured start.
///
/// A start with leading digits counts from that number; a single other character counts by
/// character code (`"A"` gives `A`, `B`, ...); anything else, or a number that would overflow,
/// counts from 1.
fn question_number(start: &str, index: u32) -> String {
    let digits: String = start.chars().take_while(char::is_ascii_digit).collect();
    if let Ok(first) = digits.parse::<u64>()
        && let Some(number) = first.checked_add(u64::from(index))
    {
        return number.to_string();
    }
    let mut chars = start.chars();
    if let (Some(first), None) = (chars.next(), chars.next())
        && let Some(letter) = u32::from(first)
            .checked_add(index)
            .and_then(char::from_u32)
    {
        return letter.to_string();
    }
    (u64::from(index) + 1).to_string()
}

/// A single survey question.
///
/// The answer lives in the attached [`DataProvider`] under the question's name, or in a private
/// slot when no provider is attached. `H` supplies variant behaviour; see
/// [`DynamicMatrixQuestion`](crate::DynamicMatrixQuestion) for the matrix variant.
pub struct Question<H: QuestionHooks = Plain> {
    /// Identifier, also the storage key.
    name: String,
    /// Display title; the name is used when unset.
    title: Option<String>,
    /// Variant behaviour.
    pub(crate) hooks: H,
    /// Owning container.
    survey: Option<Rc<dyn SurveyContainer>>,
    /// Answer storage.
    data: Option<Rc<dyn DataProvider>>,
    /// Answer when no provider is attached.
    question_value: Value,
    /// Comment when no provider is attached.
    question_comment: String,
    /// Whether an answer is mandatory.
    is_required: bool,
    /// Whether editing is disabled for this question.
    read_only: bool,
    /// Whether the question is shown.
    visible: bool,
    /// Whether a comment box is shown.
    has_comment: bool,
    /// Whether an "other" item is shown.
    has_other: bool,
    /// Label of the comment / other box.
    comment_text: Option<String>,
    /// Replacement for the localized required message.
    required_error_text: Option<String>,
    /// Title placement override.
    title_location: Option<TitleLocation>,
    /// Error placement override.
    error_location: Option<ErrorLocation>,
    /// Position among visible questions, or -1.
    visible_index: i32,
    /// Visibility expression.
    visible_if: String,
    /// Enablement expression.
    enable_if: String,
    /// Runner for `visible_if`, built on first use.
    visible_runner: Option<ConditionRunner>,
    /// Runner for `enable_if`, built on first use.
    enable_runner: Option<ConditionRunner>,
    /// Expands the container's title template, built on first use.
    title_processor: Option<TemplateProcessor>,
    /// Validators run on non-empty answers.
    validators: ValidatorChain,
    /// Errors from the latest check.
    errors: Vec<SurveyError>,
    /// Set while `ValueChanged` is being delivered.
    value_changed_firing: bool,
    /// Set while a value that originated in the survey is being applied.
    value_changed_in_survey: bool,
    /// Registered listeners.
    listeners: Vec<Listener<H>>,
    /// Events waiting for delivery.
    pending: VecDeque<QuestionEvent>,
    /// Set while listeners are running.
    dispatching: bool,
}

impl<H: QuestionHooks + fmt::Debug> fmt::Debug for Question<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("hooks", &self.hooks)
            .field("value", &self.value())
            .field("is_required", &self.is_required)
            .field("read_only", &self.read_only)
            .field("visible", &self.visible)
            .field("visible_index", &self.visible_index)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::multiple_inherent_impl)]
impl Question {
    /// A plain question called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_hooks(name, Plain::default())
    }
}

impl<H: QuestionHooks> Question<H> {
    /// A question called `name` with variant behaviour `hooks`.
    pub fn with_hooks(name: impl Into<String>, hooks: H) -> Self {
        Self {
            name: name.into(),
            title: None,
            hooks,
            survey: None,
            data: None,
            question_value: Value::Null,
            question_comment: String::new(),
            is_required: false,
            read_only: false,
            visible: true,
            has_comment: false,
            has_other: false,
            comment_text: None,
            required_error_text: None,
            title_location: None,
            error_location: None,
            visible_index: -1,
            visible_if: String::new(),
            enable_if: String::new(),
            visible_runner: None,
            enable_runner: None,
            title_processor: None,
            validators: ValidatorChain::new(),
            errors: Vec::new(),
            value_changed_firing: false,
            value_changed_in_survey: false,
            listeners: Vec::new(),
            pending: VecDeque::new(),
            dispatching: false,
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark the question as required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    /// Add a validator to the chain.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(validator);
        self
    }

    /// Set the visibility expression.
    pub fn with_visible_if(mut self, expression: impl Into<String>) -> Self {
        self.visible_if = expression.into();
        self
    }

    /// Set the enablement expression.
    pub fn with_enable_if(mut self, expression: impl Into<String>) -> Self {
        self.enable_if = expression.into();
        self
    }

    /// Identifier and storage key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant behaviour.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Register a listener for every [`QuestionEvent`].
    ///
    /// Listeners run synchronously and may mutate the question. Events raised while listeners
    /// are running are queued and delivered, in order, before the outermost call returns.
    pub fn on_event(&mut self, listener: impl FnMut(&mut Self, QuestionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver `event` to the listeners.
    pub(crate) fn fire(&mut self, event: QuestionEvent) {
        self.pending.push_back(event);
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        let mut listeners = mem::take(&mut self.listeners);
        while let Some(event) = self.pending.pop_front() {
            // A value set while ValueChanged is being delivered must not notify again.
            let was_firing = self.value_changed_firing;
            if event == QuestionEvent::ValueChanged {
                self.value_changed_firing = true;
            }
            for listener in &mut listeners {
                listener(self, event);
            }
            self.value_changed_firing = was_firing;
        }
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
        self.dispatching = false;
    }

    /// Attach the owning container.
    pub fn set_survey(&mut self, survey: Rc<dyn SurveyContainer>) {
        self.survey = Some(survey);
    }

    /// The owning container, if attached.
    pub fn survey(&self) -> Option<&Rc<dyn SurveyContainer>> {
        self.survey.as_ref()
    }

    /// Attach answer storage and pick up whatever it already holds for this question.
    pub fn set_data(&mut self, data: Rc<dyn DataProvider>) {
        self.data = Some(data);
        let current = self.value();
        self.on_survey_value_changed(current);
    }

    /// Strings for default messages.
    pub fn localization(&self) -> &dyn Localization {
        strings_for(self.survey.as_ref())
    }

    /// Current answer.
    pub fn value(&self) -> Value {
        let raw = match &self.data {
            Some(data) => data.get_value(&self.name),
            None => self.question_value.clone(),
        };
        self.hooks.value_from_data(raw)
    }

    /// Replace the answer and notify listeners.
    ///
    /// A listener that sets the value again while `ValueChanged` is being delivered updates the
    /// value without a second notification.
    pub fn set_value(&mut self, value: Value) {
        self.set_new_value(value);
        if self.value_changed_firing {
            return;
        }
        trace!(question = %self.name, "value_changed");
        self.value_changed_firing = true;
        self.fire(QuestionEvent::ValueChanged);
        self.value_changed_firing = false;
    }

    /// Store `value` and run the variant's change hook, without notifying.
    fn set_new_value(&mut self, value: Value) {
        let stored = self.hooks.value_to_data(value);
        match &self.data {
            Some(data) if !self.value_changed_in_survey => data.set_value(&self.name, stored),
            Some(_) => {}
            None => self.question_value = stored,
        }
        let current = self.value();
        self.hooks.on_value_changed(&current);
    }

    /// Whether the answer is empty.
    pub fn is_empty(&self) -> bool {
        is_value_empty(&self.value())
    }

    /// Apply a value that changed on the survey side, without writing it back.
    pub fn on_survey_value_changed(&mut self, value: Value) {
        self.value_changed_in_survey = true;
        let value = self.hooks.value_from_data(value);
        self.set_value(value);
        self.fire(QuestionEvent::CommentChanged);
        self.value_changed_in_survey = false;
    }

    /// Current comment.
    pub fn comment(&self) -> String {
        match &self.data {
            Some(data) => data.get_comment(&self.name),
            None => self.question_comment.clone(),
        }
    }

    /// Replace the comment. Setting the current text again does nothing.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        if self.comment() == comment {
            return;
        }
        match &self.data {
            Some(data) => data.set_comment(&self.name, &comment),
            None => self.question_comment = comment,
        }
        self.fire(QuestionEvent::CommentChanged);
    }

    /// Label of the comment / other box.
    pub fn comment_text(&self) -> String {
        self.comment_text
            .clone()
            .unwrap_or_else(|| self.localization().get_string("otherItemText"))
    }

    /// Replace the label of the comment / other box.
    pub fn set_comment_text(&mut self, text: impl Into<String>) {
        self.comment_text = Some(text.into());
    }

    /// Message used when a required question has no answer.
    pub fn required_error_text(&self) -> String {
        self.required_error_text
            .clone()
            .unwrap_or_else(|| self.localization().get_string("requiredError"))
    }

    /// Replace the required message.
    pub fn set_required_error_text(&mut self, text: impl Into<String>) {
        self.required_error_text = Some(text.into());
    }

    /// Validators run on non-empty answers.
    pub fn validators(&self) -> &ValidatorChain {
        &self.validators
    }

    /// Mutable access to the validator chain.
    pub fn validators_mut(&mut self) -> &mut ValidatorChain {
        &mut self.validators
    }

    /// Errors from the latest check.
    pub fn errors(&self) -> &[SurveyError] {
        &self.errors
    }

    /// Number of errors from the latest check.
    pub fn current_error_count(&self) -> usize {
        self.errors.len()
    }

    /// Append an error and notify.
    pub fn add_error(&mut self, error: SurveyError) {
        self.errors.push(error);
        self.fire(QuestionEvent::ErrorsChanged);
    }

    /// Rebuild the error list and report whether it is non-empty.
    ///
    /// The required check and the variant's checks run first; the validator chain only runs on
    /// a non-empty answer with no errors so far, and the container's validation only when
    /// everything else passed. With `notify`, `ErrorsChanged` fires when the count changed or
    /// errors were present before.
    pub fn has_errors(&mut self, notify: bool) -> bool {
        let previous = self.errors.len();
        self.errors.clear();
        let value = self.value();

        if self.is_required && is_value_empty(&value) {
            let text = self.required_error_text();
            self.errors.push(SurveyError::required(text));
        }
        let strings = strings_for(self.survey.as_ref());
        self.hooks
            .check_for_errors(&value, &mut self.errors, strings);

        if self.errors.is_empty() && !is_value_empty(&value) {
            let chain = mem::take(&mut self.validators);
            let error = chain.run(self);
            self.validators = chain;
            self.errors.extend(error);
        }

        if self.errors.is_empty()
            && let Some(error) = self
                .survey
                .as_ref()
                .and_then(|survey| survey.validate_question(&self.name))
        {
            self.errors.push(error);
        }

        debug!(question = %self.name, errors = self.errors.len(), "question_checked");
        if notify && (previous != self.errors.len() || previous > 0) {
            self.fire(QuestionEvent::ErrorsChanged);
        }
        !self.errors.is_empty()
    }

    /// Whether an answer is mandatory.
    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Change whether an answer is mandatory.
    pub fn set_is_required(&mut self, required: bool) {
        if self.is_required == required {
            return;
        }
        self.is_required = required;
        self.fire(QuestionEvent::PropertyChanged(Property::IsRequired));
        self.fire(QuestionEvent::TitleChanged);
    }

    /// The question's own read-only flag.
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Change the question's own read-only flag.
    pub fn set_read_only(&mut self, read_only: bool) {
        if self.read_only == read_only {
            return;
        }
        self.read_only = read_only;
        self.fire(QuestionEvent::PropertyChanged(Property::ReadOnly));
    }

    /// Whether editing is disabled, by the question or by a survey in display mode.
    pub fn is_read_only(&self) -> bool {
        self.read_only
            || self
                .survey
                .as_ref()
                .is_some_and(|survey| survey.is_display_mode())
    }

    /// Whether the question is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the question.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.fire(QuestionEvent::PropertyChanged(Property::Visible));
    }

    /// Whether a comment box is shown.
    pub fn has_comment(&self) -> bool {
        self.has_comment
    }

    /// Show or hide the comment box. Turning it on turns the "other" item off.
    pub fn set_has_comment(&mut self, has_comment: bool) {
        if !self.hooks.supports_comment() || self.has_comment == has_comment {
            return;
        }
        self.has_comment = has_comment;
        if has_comment && self.has_other {
            self.has_other = false;
            self.hooks.has_other_changed(false);
            self.fire(QuestionEvent::PropertyChanged(Property::HasOther));
        }
        self.fire(QuestionEvent::PropertyChanged(Property::HasComment));
    }

    /// Whether an "other" item is shown.
    pub fn has_other(&self) -> bool {
        self.has_other
    }

    /// Show or hide the "other" item. Turning it on turns the comment box off.
    pub fn set_has_other(&mut self, has_other: bool) {
        if !self.hooks.supports_other() || self.has_other == has_other {
            return;
        }
        self.has_other = has_other;
        if has_other && self.has_comment {
            self.has_comment = false;
            self.fire(QuestionEvent::PropertyChanged(Property::HasComment));
        }
        self.hooks.has_other_changed(has_other);
        self.fire(QuestionEvent::PropertyChanged(Property::HasOther));
    }

    /// Visibility expression.
    pub fn visible_if(&self) -> &str {
        &self.visible_if
    }

    /// Replace the visibility expression.
    pub fn set_visible_if(&mut self, expression: impl Into<String>) {
        self.visible_if = expression.into();
    }

    /// Enablement expression.
    pub fn enable_if(&self) -> &str {
        &self.enable_if
    }

    /// Replace the enablement expression.
    pub fn set_enable_if(&mut self, expression: impl Into<String>) {
        self.enable_if = expression.into();
    }

    /// Re-evaluate `visible_if` and `enable_if` against `values`.
    ///
    /// An empty expression leaves the matching flag untouched.
    pub fn run_condition(&mut self, values: &ValueMap) {
        if !self.visible_if.is_empty() {
            let runner = self
                .visible_runner
                .get_or_insert_with(|| ConditionRunner::new(self.visible_if.clone()));
            runner.set_expression(self.visible_if.clone());
            let visible = runner.run(values);
            self.set_visible(visible);
        }
        if !self.enable_if.is_empty() {
            let runner = self
                .enable_runner
                .get_or_insert_with(|| ConditionRunner::new(self.enable_if.clone()));
            runner.set_expression(self.enable_if.clone());
            let enabled = runner.run(values);
            self.set_read_only(!enabled);
        }
    }

    /// Title, falling back to the name.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
        self.fire(QuestionEvent::TitleChanged);
    }

    /// Title with answer references expanded by the container.
    pub fn processed_title(&self) -> String {
        match &self.survey {
            Some(survey) => survey.process_text(self.title()),
            None => self.title().to_string(),
        }
    }

    /// Required marker for the title, empty for optional questions.
    pub fn required_text(&self) -> String {
        match &self.survey {
            Some(survey) if self.is_required => survey.required_text(),
            _ => String::new(),
        }
    }

    /// Position among visible questions, or -1.
    pub fn visible_index(&self) -> i32 {
        self.visible_index
    }

    /// Set the position among visible questions.
    pub fn set_visible_index(&mut self, index: i32) {
        if self.visible_index == index {
            return;
        }
        self.visible_index = index;
        self.fire(QuestionEvent::TitleChanged);
    }

    /// Display number, empty when the question is not numbered.
    pub fn no(&self) -> String {
        let Ok(index) = u32::try_from(self.visible_index) else {
            return String::new();
        };
        let start = self
            .survey
            .as_ref()
            .map(|survey| survey.question_start_index())
            .unwrap_or_default();
        question_number(&start, index)
    }

    /// Title as rendered: number, required marker and processed title.
    ///
    /// A container title template takes over the layout, with `{no}`, `{title}` and `{require}`
    /// matched case-insensitively.
    pub fn full_title(&mut self) -> String {
        let no = self.no();
        let require = self.required_text();
        let title = self.processed_title();

        let template = self
            .survey
            .as_ref()
            .and_then(|survey| survey.question_title_template());
        if let Some(template) = template {
            let part = |name: &str| match name.to_lowercase().as_str() {
                "no" => Some(no.clone()),
                "title" => Some(title.clone()),
                "require" => Some(require.clone()),
                _ => None,
            };
            let source = FnSource {
                has_value: |name: &str| part(name).is_some(),
                value: |name: &str| part(name),
            };
            let processor = self
                .title_processor
                .get_or_insert_with(TemplateProcessor::new);
            return processor.process(&template, &source);
        }

        let mut text = title;
        if !require.is_empty() {
            text = format!("{require} {text}");
        }
        if !no.is_empty() {
            text = format!("{no}. {text}");
        }
        text
    }

    /// Title placement: the question's own, else the container's.
    pub fn title_location(&self) -> TitleLocation {
        self.title_location.unwrap_or_else(|| {
            self.survey
                .as_ref()
                .map(|survey| survey.question_title_location())
                .unwrap_or_default()
        })
    }

    /// Override the title placement.
    pub fn set_title_location(&mut self, location: Option<TitleLocation>) {
        self.title_location = location;
    }

    /// Error placement: the question's own, else the container's.
    pub fn error_location(&self) -> ErrorLocation {
        self.error_location.unwrap_or_else(|| {
            self.survey
                .as_ref()
                .map(|survey| survey.question_error_location())
                .unwrap_or_default()
        })
    }

    /// Override the error placement.
    pub fn set_error_location(&mut self, location: Option<ErrorLocation>) {
        self.error_location = location;
    }

    /// React to another answer changing: titles referencing `{name}` need re-rendering.
    pub fn on_any_value_changed(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        let reference = format!("{{{}", name.to_lowercase());
        if self.title().to_lowercase().contains(&reference) {
            self.fire(QuestionEvent::TitleChanged);
        }
    }
}

impl<H: QuestionHooks> ValidatorOwner for Question<H> {
    fn validated_value(&self) -> Value {
        self.value()
    }

    fn set_validated_value(&mut self, value: Value) {
        self.set_value(value);
    }

    fn validator_title(&self) -> Option<String> {
        None
    }

    fn localization(&self) -> &dyn Localization {
        strings_for(self.survey.as_ref())
    }
}
