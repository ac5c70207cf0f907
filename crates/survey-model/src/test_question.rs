#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        collections::BTreeMap,
        rc::Rc,
    };

    use serde_json::{Value, json};

    use crate::*;

    fn record<H: QuestionHooks>(question: &mut Question<H>) -> Rc<RefCell<Vec<QuestionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        question.on_event(move |_, event| sink.borrow_mut().push(event));
        events
    }

    fn count(events: &Rc<RefCell<Vec<QuestionEvent>>>, wanted: QuestionEvent) -> usize {
        events.borrow().iter().filter(|e| **e == wanted).count()
    }

    fn survey_with(settings: SurveySettings) -> Rc<Survey> {
        Rc::new(Survey::new(settings))
    }

    fn values(pairs: &[(&str, Value)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn required_empty_reports_one_error() {
        let mut q = Question::new("q").with_required(true);
        assert!(q.has_errors(true));
        assert_eq!(q.errors().len(), 1);
        assert_eq!(q.errors()[0].kind, ErrorKind::Required);
        assert_eq!(q.errors()[0].text, "Please answer the question.");

        q.set_required_error_text("Tell us!");
        q.set_value(json!("   "));
        assert!(q.has_errors(false));
        assert_eq!(q.errors()[0].text, "Tell us!");

        q.set_value(json!("answered"));
        assert!(!q.has_errors(false));
        assert_eq!(q.current_error_count(), 0);
    }

    #[test]
    fn validator_failure_skips_container_validation() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let survey = Rc::new(Survey::default().with_question_validator(move |_, value| {
            seen.set(seen.get() + 1);
            (value == &json!(13)).then(|| "unlucky".to_string())
        }));
        let mut q = Question::new("n").with_validator(NumericValidator::new(Some(10.0), None));
        q.set_survey(survey.clone());
        q.set_data(survey);

        q.set_value(json!(5));
        assert!(q.has_errors(false));
        assert_eq!(q.errors().len(), 1);
        assert_eq!(q.errors()[0].kind, ErrorKind::Validation);
        assert_eq!(calls.get(), 0);

        q.set_value(json!(20));
        assert!(!q.has_errors(false));
        assert_eq!(calls.get(), 1);

        q.set_value(json!(13));
        assert!(q.has_errors(false));
        assert_eq!(q.errors()[0].kind, ErrorKind::Container);
        assert_eq!(q.errors()[0].text, "unlucky");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn required_error_skips_validators() {
        let mut q = Question::new("q")
            .with_required(true)
            .with_validator(TextValidator::new(3, 0));
        assert!(q.has_errors(false));
        assert_eq!(q.errors().len(), 1);
        assert_eq!(q.errors()[0].kind, ErrorKind::Required);
    }

    #[test]
    fn validator_can_normalize_value() {
        let mut q = Question::new("n").with_validator(NumericValidator::new(None, None));
        q.set_value(json!("42"));
        assert!(!q.has_errors(false));
        assert_eq!(q.value(), json!(42));
    }

    #[test]
    fn reentrant_set_value_notifies_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut q = Question::new("q");
        q.on_event(move |q, event| {
            if event == QuestionEvent::ValueChanged {
                counter.set(counter.get() + 1);
                q.set_value(json!("inner"));
            }
        });
        q.set_value(json!("outer"));
        assert_eq!(fired.get(), 1);
        assert_eq!(q.value(), json!("inner"));

        q.set_value(json!("again"));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn value_set_from_another_listener_notifies_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut q = Question::new("q");
        q.on_event(move |q, event| match event {
            QuestionEvent::CommentChanged => q.set_value(json!(1)),
            QuestionEvent::ValueChanged => {
                counter.set(counter.get() + 1);
                q.set_value(json!(counter.get() + 10));
            }
            _ => {}
        });
        q.set_comment("x");
        assert_eq!(fired.get(), 1);
        assert_eq!(q.value(), json!(11));
    }

    #[test]
    fn events_raised_by_listeners_are_delivered_in_order() {
        let mut q = Question::new("q");
        q.on_event(|q, event| {
            if event == QuestionEvent::ValueChanged {
                q.set_comment("from listener");
            }
        });
        let events = record(&mut q);
        q.set_value(json!(1));
        assert_eq!(
            *events.borrow(),
            vec![QuestionEvent::ValueChanged, QuestionEvent::CommentChanged]
        );
    }

    #[test]
    fn comment_is_independent_of_value() {
        let mut q = Question::new("q");
        q.set_value(json!("a"));
        q.set_comment("note");
        assert_eq!(q.value(), json!("a"));
        assert_eq!(q.comment(), "note");

        q.set_value(Value::Null);
        assert_eq!(q.comment(), "note");
        assert!(q.is_empty());
    }

    #[test]
    fn setting_same_comment_is_silent() {
        let mut q = Question::new("q");
        let events = record(&mut q);
        q.set_comment("x");
        q.set_comment("x");
        assert_eq!(count(&events, QuestionEvent::CommentChanged), 1);
    }

    #[test]
    fn errors_changed_follows_counts() {
        let mut q = Question::new("q").with_required(true);
        let events = record(&mut q);
        q.has_errors(true);
        q.has_errors(true);
        q.set_value(json!("ok"));
        q.has_errors(true);
        q.has_errors(true);
        q.has_errors(false);
        assert_eq!(count(&events, QuestionEvent::ErrorsChanged), 3);

        q.add_error(SurveyError::new(ErrorKind::Custom, "manual"));
        assert_eq!(count(&events, QuestionEvent::ErrorsChanged), 4);
        assert_eq!(q.current_error_count(), 1);
    }

    #[test]
    fn default_numbering_starts_at_one() {
        let mut q = Question::new("q");
        assert_eq!(q.no(), "");
        q.set_visible_index(0);
        assert_eq!(q.no(), "1");
        q.set_visible_index(4);
        assert_eq!(q.no(), "5");
    }

    #[test]
    fn numbering_follows_start_index() {
        let cases = [("A", 2, "C"), ("a", 0, "a"), ("5", 1, "6"), ("0", 0, "0"), ("", 2, "3")];
        for (start, index, expected) in cases {
            let survey = survey_with(SurveySettings {
                question_start_index: start.to_string(),
                ..SurveySettings::default()
            });
            let mut q = Question::new("q");
            q.set_survey(survey);
            q.set_visible_index(index);
            assert_eq!(q.no(), expected, "start {start:?} index {index}");
        }
    }

    #[test]
    fn numbering_past_u64_max_counts_from_one() {
        let survey = survey_with(SurveySettings {
            question_start_index: u64::MAX.to_string(),
            ..SurveySettings::default()
        });
        let mut q = Question::new("q");
        q.set_survey(survey);
        q.set_visible_index(0);
        assert_eq!(q.no(), u64::MAX.to_string());
        q.set_visible_index(1);
        assert_eq!(q.no(), "2");
    }

    #[test]
    fn full_title_joins_parts() {
        let survey = survey_with(SurveySettings::default());
        let mut q = Question::new("age").with_title("Age").with_required(true);
        assert_eq!(q.full_title(), "Age");

        q.set_survey(survey);
        assert_eq!(q.full_title(), "* Age");
        q.set_visible_index(0);
        assert_eq!(q.full_title(), "1. * Age");
        q.set_is_required(false);
        assert_eq!(q.full_title(), "1. Age");
    }

    #[test]
    fn full_title_uses_container_template() {
        let survey = survey_with(SurveySettings {
            question_title_template: Some("{no}) {Title} {REQUIRE} {other}".to_string()),
            ..SurveySettings::default()
        });
        let mut q = Question::new("age").with_title("Age").with_required(true);
        q.set_survey(survey);
        q.set_visible_index(1);
        assert_eq!(q.full_title(), "2) Age * {other}");
    }

    #[test]
    fn processed_title_expands_answers() {
        let survey = survey_with(SurveySettings::default());
        survey.set_value("name", json!("Ann"));
        let mut q = Question::new("greeting").with_title("Hello {name}, {missing}");
        q.set_survey(survey);
        assert_eq!(q.processed_title(), "Hello Ann, {missing}");
        assert_eq!(q.title(), "Hello {name}, {missing}");
    }

    #[test]
    fn title_falls_back_to_name() {
        let q = Question::new("plain");
        assert_eq!(q.title(), "plain");
        assert_eq!(q.processed_title(), "plain");
    }

    #[test]
    fn title_changes_on_referenced_answers() {
        let mut q = Question::new("q").with_title("Thanks {Name}!");
        let events = record(&mut q);
        q.on_any_value_changed("name");
        q.on_any_value_changed("other");
        q.on_any_value_changed("");
        assert_eq!(count(&events, QuestionEvent::TitleChanged), 1);
    }

    #[test]
    fn enable_if_drives_read_only() {
        let mut q = Question::new("drink").with_enable_if("{age} >= 18");
        q.run_condition(&values(&[("age", json!(12))]));
        assert!(q.is_read_only());
        q.run_condition(&values(&[("age", json!(30))]));
        assert!(!q.is_read_only());

        q.set_enable_if("{age} >= 40");
        q.run_condition(&values(&[("age", json!(30))]));
        assert!(q.is_read_only());
    }

    #[test]
    fn missing_enable_if_leaves_read_only_alone() {
        let mut q = Question::new("q");
        q.set_read_only(true);
        q.run_condition(&values(&[("age", json!(30))]));
        assert!(q.read_only());
    }

    #[test]
    fn visible_if_drives_visibility() {
        let mut q = Question::new("why").with_visible_if("{happy} == false");
        let events = record(&mut q);
        q.run_condition(&values(&[("happy", json!(false))]));
        assert!(q.is_visible());
        q.run_condition(&values(&[("happy", json!(true))]));
        assert!(!q.is_visible());
        q.run_condition(&ValueMap::new());
        assert!(!q.is_visible());
        assert_eq!(
            count(&events, QuestionEvent::PropertyChanged(Property::Visible)),
            1
        );
    }

    #[test]
    fn display_mode_makes_everything_read_only() {
        let survey = survey_with(SurveySettings {
            mode: SurveyMode::Display,
            ..SurveySettings::default()
        });
        let mut q = Question::new("q");
        assert!(!q.is_read_only());
        q.set_survey(survey);
        assert!(q.is_read_only());
        assert!(!q.read_only());
    }

    #[test]
    fn provider_stores_value_and_comment() {
        let survey = survey_with(SurveySettings::default());
        let mut q = Question::new("q");
        q.set_data(survey.clone());
        q.set_value(json!("yes"));
        q.set_comment("because");
        let stored = survey.values();
        assert_eq!(stored.get("q"), Some(&json!("yes")));
        assert_eq!(stored.get("q-Comment"), Some(&json!("because")));

        q.set_value(json!(""));
        assert!(!survey.values().contains_key("q"));
    }

    #[test]
    fn attaching_provider_picks_up_stored_answer() {
        let survey = survey_with(SurveySettings::default());
        survey.set_value("q", json!(7));
        let mut q = Question::new("q");
        let events = record(&mut q);
        q.set_data(survey);
        assert_eq!(q.value(), json!(7));
        assert_eq!(count(&events, QuestionEvent::ValueChanged), 1);
    }

    #[test]
    fn survey_side_changes_are_not_written_back() {
        let survey = survey_with(SurveySettings::default());
        let mut q = Question::new("q");
        q.set_data(survey.clone());
        let events = record(&mut q);
        q.on_survey_value_changed(json!("external"));
        assert!(survey.values().is_empty());
        assert_eq!(count(&events, QuestionEvent::ValueChanged), 1);
        assert_eq!(count(&events, QuestionEvent::CommentChanged), 1);

        let mut detached = Question::new("d");
        detached.on_survey_value_changed(json!("kept"));
        assert_eq!(detached.value(), json!("kept"));
    }

    #[test]
    fn comment_and_other_are_exclusive() {
        let mut q = Question::with_hooks("q", Plain::with_other());
        q.set_has_comment(true);
        assert!(q.has_comment());
        q.set_has_other(true);
        assert!(q.has_other());
        assert!(!q.has_comment());
        q.set_has_comment(true);
        assert!(!q.has_other());

        let mut plain = Question::new("p");
        plain.set_has_other(true);
        assert!(!plain.has_other());
    }

    #[test]
    fn texts_come_from_localization() {
        let mut strings = BTreeMap::new();
        strings.insert("requiredError".to_string(), "Required!".to_string());
        let survey = survey_with(SurveySettings {
            strings,
            ..SurveySettings::default()
        });
        let mut q = Question::new("q").with_required(true);
        assert_eq!(q.comment_text(), "Other (describe)");
        q.set_survey(survey);
        q.has_errors(false);
        assert_eq!(q.errors()[0].text, "Required!");

        q.set_comment_text("Anything else?");
        assert_eq!(q.comment_text(), "Anything else?");
    }

    #[test]
    fn locations_fall_back_to_container() {
        let survey = survey_with(SurveySettings {
            question_title_location: TitleLocation::Left,
            question_error_location: ErrorLocation::Bottom,
            ..SurveySettings::default()
        });
        let mut q = Question::new("q");
        assert_eq!(q.title_location(), TitleLocation::Top);
        q.set_survey(survey);
        assert_eq!(q.title_location(), TitleLocation::Left);
        assert_eq!(q.error_location(), ErrorLocation::Bottom);
        q.set_title_location(Some(TitleLocation::Bottom));
        assert_eq!(q.title_location(), TitleLocation::Bottom);
    }
}
