#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::*;

    /// Minimal owner recording normalized values.
    struct Owner {
        value: Value,
        writes: usize,
    }

    impl Owner {
        fn new(value: Value) -> Self {
            Self { value, writes: 0 }
        }
    }

    impl ValidatorOwner for Owner {
        fn validated_value(&self) -> Value {
            self.value.clone()
        }

        fn set_validated_value(&mut self, value: Value) {
            self.value = value;
            self.writes += 1;
        }

        fn validator_title(&self) -> Option<String> {
            Some("age".to_string())
        }

        fn localization(&self) -> &dyn Localization {
            default_strings()
        }
    }

    fn error_text(result: Option<ValidatorResult>) -> Option<String> {
        result.and_then(|r| r.error).map(|e| e.text)
    }

    #[test]
    fn numeric_rejects_non_numbers() {
        let v = NumericValidator::new(None, None);
        let strings = default_strings();
        assert_eq!(
            error_text(v.validate(&json!("abc"), None, strings)).as_deref(),
            Some("The value should be numeric.")
        );
        assert!(v.validate(&json!(3.5), None, strings).is_none());
        assert!(v.validate(&json!(true), None, strings).is_some());
    }

    #[test]
    fn numeric_range_messages() {
        let strings = default_strings();
        let both = NumericValidator::new(Some(1.0), Some(10.0));
        assert_eq!(
            error_text(both.validate(&json!(11), Some("age"), strings)).as_deref(),
            Some("The 'age' should be equal or more than 1 and equal or less than 10")
        );
        let min = NumericValidator::new(Some(2.5), None);
        assert_eq!(
            error_text(min.validate(&json!(1), None, strings)).as_deref(),
            Some("The 'value' should be equal or more than 2.5")
        );
        let max = NumericValidator::new(None, Some(5.0)).with_text("too big");
        assert_eq!(
            error_text(max.validate(&json!(6), None, strings)).as_deref(),
            Some("too big")
        );
        assert!(both.validate(&json!(10), None, strings).is_none());
    }

    #[test]
    fn numeric_normalizes_strings() {
        let strings = default_strings();
        let v = NumericValidator::new(None, None);
        let result = v.validate(&json!(" 42 "), None, strings);
        assert_eq!(result.and_then(|r| r.value), Some(json!(42)));
        let result = v.validate(&json!("1.5"), None, strings);
        assert_eq!(result.and_then(|r| r.value), Some(json!(1.5)));
    }

    #[test]
    fn text_length_bounds() {
        let strings = default_strings();
        let both = TextValidator::new(2, 5);
        assert_eq!(
            error_text(both.validate(&json!("a"), None, strings)).as_deref(),
            Some("Please enter more than 2 and less than 5 symbols.")
        );
        assert!(both.validate(&json!("abc"), None, strings).is_none());
        assert!(both.validate(&json!(12345678), None, strings).is_none());

        let min = TextValidator::new(3, 0);
        assert_eq!(
            error_text(min.validate(&json!("ab"), None, strings)).as_deref(),
            Some("Please enter at least 3 symbols.")
        );
        let max = TextValidator::new(0, 2);
        assert_eq!(
            error_text(max.validate(&json!("héé"), None, strings)).as_deref(),
            Some("Please enter less than 2 symbols.")
        );
        assert!(max.validate(&json!("hé"), None, strings).is_none());
    }

    #[test]
    fn answer_count_bounds() {
        let strings = default_strings();
        let v = AnswerCountValidator::new(1, 2);
        assert_eq!(
            error_text(v.validate(&json!([]), None, strings)).as_deref(),
            Some("Please select at least 1 variants.")
        );
        assert_eq!(
            error_text(v.validate(&json!([1, 2, 3]), None, strings)).as_deref(),
            Some("Please select no more than 2 variants.")
        );
        assert!(v.validate(&json!([1]), None, strings).is_none());
        assert!(v.validate(&json!("x"), None, strings).is_none());
    }

    #[test]
    fn regex_matches_text() {
        let strings = default_strings();
        let v = RegexValidator::new(r"^\d{5}$").unwrap();
        assert_eq!(v.pattern(), r"^\d{5}$");
        assert!(v.validate(&json!("12345"), None, strings).is_none());
        assert_eq!(
            error_text(v.validate(&json!("1234"), None, strings)).as_deref(),
            Some("The value does not match the expected format.")
        );
        assert!(RegexValidator::new("(").is_err());
    }

    #[test]
    fn email_shape() {
        let strings = default_strings();
        let v = EmailValidator::new();
        assert!(v.validate(&json!("ann@example.com"), None, strings).is_none());
        assert!(v.validate(&json!("ANN@Example.COM"), None, strings).is_none());
        assert_eq!(
            error_text(v.validate(&json!("ann@"), None, strings)).as_deref(),
            Some("Please enter a valid e-mail address.")
        );
        assert!(v.validate(&json!(5), None, strings).is_none());
    }

    #[test]
    fn chain_stops_at_first_error() {
        let mut chain = ValidatorChain::new();
        chain.push(TextValidator::new(10, 0).with_text("short"));
        chain.push(EmailValidator::new().with_text("not an address"));
        assert_eq!(chain.len(), 2);

        let mut owner = Owner::new(json!("abc"));
        let error = chain.run(&mut owner);
        assert_eq!(error.map(|e| e.text).as_deref(), Some("short"));

        let mut owner = Owner::new(json!("long enough text"));
        let error = chain.run(&mut owner);
        assert_eq!(error.map(|e| e.text).as_deref(), Some("not an address"));
    }

    #[test]
    fn chain_passes_normalized_values_along() {
        let mut chain = ValidatorChain::new();
        chain.push(NumericValidator::new(None, None));
        chain.push(NumericValidator::new(None, Some(40.0)));

        let mut owner = Owner::new(json!("42"));
        let error = chain.run(&mut owner);
        assert_eq!(owner.value, json!(42));
        assert_eq!(owner.writes, 1);
        assert_eq!(
            error.map(|e| e.text).as_deref(),
            Some("The 'age' should be equal or less than 40")
        );
    }

    #[test]
    fn empty_chain_accepts() {
        let chain = ValidatorChain::new();
        assert!(chain.is_empty());
        let mut owner = Owner::new(json!("anything"));
        assert!(chain.run(&mut owner).is_none());
        assert_eq!(owner.writes, 0);
    }
}
