//! Localized strings used for default error texts and labels.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

/// Built-in English strings, keyed the way overrides are keyed.
const ENGLISH: &[(&str, &str)] = &[
    ("requiredError", "Please answer the question."),
    ("otherItemText", "Other (describe)"),
    ("addRow", "Add row"),
    ("removeRow", "Remove"),
    ("minRowCountError", "Please fill in at least {0} rows."),
    ("numericError", "The value should be numeric."),
    (
        "numericMinMax",
        "The '{0}' should be equal or more than {1} and equal or less than {2}",
    ),
    ("numericMin", "The '{0}' should be equal or more than {1}"),
    ("numericMax", "The '{0}' should be equal or less than {1}"),
    ("textMinLength", "Please enter at least {0} symbols."),
    ("textMaxLength", "Please enter less than {0} symbols."),
    (
        "textMinMaxLength",
        "Please enter more than {0} and less than {1} symbols.",
    ),
    ("minSelectError", "Please select at least {0} variants."),
    ("maxSelectError", "Please select no more than {0} variants."),
    ("invalidEmail", "Please enter a valid e-mail address."),
    ("invalidFormat", "The value does not match the expected format."),
];

/// Lookup of display strings by key.
pub trait Localization {
    /// String for `key`; unknown keys return the key itself.
    fn get_string(&self, key: &str) -> String;
}

/// English defaults plus per-survey overrides.
#[derive(Debug, Clone, Default)]
pub struct Strings {
    /// Overrides checked before the built-in table.
    overrides: BTreeMap<String, String>,
}

impl Strings {
    /// English defaults only.
    pub fn new() -> Self {
        Self::default()
    }

    /// English defaults with `overrides` taking precedence.
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl Localization for Strings {
    fn get_string(&self, key: &str) -> String {
        if let Some(text) = self.overrides.get(key) {
            return text.clone();
        }
        ENGLISH
            .iter()
            .find(|(k, _)| *k == key)
            .map_or_else(|| key.to_string(), |(_, text)| (*text).to_string())
    }
}

/// Shared English strings for questions that are not attached to a survey.
pub fn default_strings() -> &'static Strings {
    static DEFAULT: Lazy<Strings> = Lazy::new(Strings::new);
    &DEFAULT
}

/// Substitute positional `{0}`, `{1}`, ... markers in `template`.
pub fn format_string(template: &str, args: &[String]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (i, arg)| {
            text.replace(&format!("{{{i}}}"), arg)
        })
}
