//! Collected project answers.
//!
//! A [`Configuration`] is the ordered set of answers gathered once at the
//! start of a run. It is immutable after construction and is handed by
//! reference to the placeholder engine and the template copier.

use std::path::{Component, Path};

use crate::error::{InitError, Result};

/// Name used when the user leaves the project name blank.
pub const DEFAULT_PROJECT_NAME: &str = "demo";

/// Key of the project name answer.
pub const NAME_KEY: &str = "name";
/// Key of the project description answer.
pub const DESCRIPTION_KEY: &str = "description";
/// Key of the author answer.
pub const AUTHOR_KEY: &str = "author";

/// Ordered, immutable mapping of answer keys to values.
///
/// The `name` entry is always present and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    entries: Vec<(String, String)>,
}

impl Configuration {
    /// Build a configuration from the three standard answers.
    pub fn new(name: &str, description: &str, author: &str) -> Self {
        Self::from_entries([
            (NAME_KEY, name),
            (DESCRIPTION_KEY, description),
            (AUTHOR_KEY, author),
        ])
    }

    /// Build a configuration from arbitrary entries, keeping first-seen order.
    ///
    /// A repeated key overwrites the earlier value in place. A missing or
    /// blank `name` is replaced by [`DEFAULT_PROJECT_NAME`].
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut collected: Vec<(String, String)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match collected.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => collected.push((key, value)),
            }
        }

        match collected.iter_mut().find(|(k, _)| k == NAME_KEY) {
            Some(slot) => {
                let trimmed = slot.1.trim();
                slot.1 = if trimmed.is_empty() {
                    DEFAULT_PROJECT_NAME.to_string()
                } else {
                    trimmed.to_string()
                };
            }
            None => collected.insert(0, (NAME_KEY.to_string(), DEFAULT_PROJECT_NAME.to_string())),
        }

        Self { entries: collected }
    }

    /// The project name.
    pub fn name(&self) -> &str {
        self.get(NAME_KEY).unwrap_or(DEFAULT_PROJECT_NAME)
    }

    /// Look up an answer by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a key has an answer.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: `name` is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check that a project name can safely become a directory under the
/// working directory.
///
/// The destination is force-removed before copying, so the name must be a
/// single normal path component.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| InitError::ConfigValidationError {
        message: format!("Invalid project name '{}': {}", name, reason),
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(invalid("must be a single directory name")),
    }

    if name.contains('/') || name.contains('\\') {
        return Err(invalid("must not contain path separators"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_standard_order() {
        let config = Configuration::new("myapp", "An app", "Ada");
        let keys: Vec<&str> = config.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "description", "author"]);
        assert_eq!(config.get("author"), Some("Ada"));
    }

    #[test]
    fn empty_name_falls_back_to_default() {
        let config = Configuration::new("", "desc", "me");
        assert_eq!(config.name(), "demo");
    }

    #[test]
    fn whitespace_name_falls_back_to_default() {
        let config = Configuration::new("   ", "", "");
        assert_eq!(config.name(), DEFAULT_PROJECT_NAME);
    }

    #[test]
    fn name_is_trimmed() {
        let config = Configuration::new("  myapp ", "", "");
        assert_eq!(config.name(), "myapp");
    }

    #[test]
    fn missing_name_is_inserted_first() {
        let config = Configuration::from_entries([("author", "Ada")]);
        assert_eq!(config.iter().next(), Some(("name", "demo")));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn repeated_key_overwrites_in_place() {
        let config = Configuration::from_entries([
            ("name", "first"),
            ("author", "Ada"),
            ("name", "second"),
        ]);
        assert_eq!(config.name(), "second");
        let keys: Vec<&str> = config.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "author"]);
    }

    #[test]
    fn empty_values_are_kept_for_other_keys() {
        let config = Configuration::new("app", "", "");
        assert_eq!(config.get("description"), Some(""));
        assert!(config.contains_key("author"));
        assert!(!config.contains_key("license"));
        assert!(!config.is_empty());
    }

    #[test]
    fn validate_accepts_plain_names() {
        assert!(validate_project_name("myapp").is_ok());
        assert!(validate_project_name("my-app_2").is_ok());
        assert!(validate_project_name(".hidden").is_ok());
    }

    #[test]
    fn validate_rejects_traversal_and_separators() {
        for name in ["..", ".", "a/b", "../up", "/abs", "a\\b", ""] {
            assert!(
                matches!(
                    validate_project_name(name),
                    Err(InitError::ConfigValidationError { .. })
                ),
                "expected rejection for {name:?}"
            );
        }
    }
}
