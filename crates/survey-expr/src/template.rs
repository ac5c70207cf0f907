//! Placeholder expansion for text templates such as `"{no}. {title} {require}"`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{ValueMap, display_value, lookup};

/// Matches a single `{name}` placeholder.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is valid"));

/// Supplies values for placeholder names.
pub trait TemplateSource {
    /// Whether `name` is a placeholder this source knows about.
    fn has_value(&self, name: &str) -> bool;
    /// Value for a known placeholder; `None` expands to an empty string.
    fn value(&self, name: &str) -> Option<String>;
}

impl TemplateSource for ValueMap {
    fn has_value(&self, name: &str) -> bool {
        lookup(self, name).is_some()
    }

    fn value(&self, name: &str) -> Option<String> {
        lookup(self, name).map(display_value)
    }
}

/// A [`TemplateSource`] assembled from two callbacks.
pub struct FnSource<H, V> {
    /// Answers "is this placeholder known?".
    pub has_value: H,
    /// Produces the replacement for a known placeholder.
    pub value: V,
}

impl<H, V> TemplateSource for FnSource<H, V>
where
    H: Fn(&str) -> bool,
    V: Fn(&str) -> Option<String>,
{
    fn has_value(&self, name: &str) -> bool {
        (self.has_value)(name)
    }

    fn value(&self, name: &str) -> Option<String> {
        (self.value)(name)
    }
}

/// Expands `{name}` placeholders using a [`TemplateSource`].
///
/// Unknown placeholders are kept verbatim, so templates can be processed more than once by
/// different sources.
#[derive(Debug, Clone)]
pub struct TemplateProcessor {
    /// Compiled placeholder pattern.
    pattern: Regex,
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self {
            pattern: PLACEHOLDER.clone(),
        }
    }
}

impl TemplateProcessor {
    /// Create a processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand every placeholder in `text` that `source` knows.
    pub fn process(&self, text: &str, source: &dyn TemplateSource) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures<'_>| {
                let name = &caps[1];
                if source.has_value(name) {
                    source.value(name).unwrap_or_default()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    /// Whether `text` contains at least one placeholder.
    pub fn has_placeholders(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}
