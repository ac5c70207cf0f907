#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{FnSource, TemplateProcessor, ValueMap, is_value_empty, lookup};

    #[test]
    fn expands_known_placeholders_only() {
        let processor = TemplateProcessor::new();
        let source = FnSource {
            has_value: |name: &str| name.eq_ignore_ascii_case("title"),
            value: |_: &str| Some("Age".to_string()),
        };
        assert_eq!(
            processor.process("{no}. {TITLE}!", &source),
            "{no}. Age!".to_string()
        );
    }

    #[test]
    fn known_placeholder_without_value_expands_to_nothing() {
        let processor = TemplateProcessor::new();
        let source = FnSource {
            has_value: |_: &str| true,
            value: |_: &str| None,
        };
        assert_eq!(processor.process("[{require}]", &source), "[]");
    }

    #[test]
    fn answers_map_is_a_source() {
        let mut answers = ValueMap::new();
        answers.insert("name".into(), json!("Ana"));
        answers.insert("age".into(), json!(30));
        answers.insert("pet".into(), json!({"kind": "cat"}));
        let processor = TemplateProcessor::new();
        assert_eq!(
            processor.process("{name} is {age}, owns a {pet.kind}; {unknown}", &answers),
            "Ana is 30, owns a cat; {unknown}"
        );
        assert!(processor.has_placeholders("hello {name}"));
        assert!(!processor.has_placeholders("hello"));
    }

    #[test]
    fn emptiness_predicate() {
        assert!(is_value_empty(&json!(null)));
        assert!(is_value_empty(&json!("")));
        assert!(is_value_empty(&json!("  ")));
        assert!(is_value_empty(&json!([])));
        assert!(is_value_empty(&json!({})));
        assert!(!is_value_empty(&json!(0)));
        assert!(!is_value_empty(&json!(false)));
        assert!(!is_value_empty(&json!([{}])));
    }

    #[test]
    fn lookup_prefers_exact_keys() {
        let mut answers = ValueMap::new();
        answers.insert("a.b".into(), json!(1));
        answers.insert("a".into(), json!({"b": 2, "list": [10, 20]}));
        assert_eq!(lookup(&answers, "a.b"), Some(&json!(1)));
        assert_eq!(lookup(&answers, "a.list.1"), Some(&json!(20)));
        assert_eq!(lookup(&answers, "a.missing"), None);
    }
}
