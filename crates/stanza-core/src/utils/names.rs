//! Immutable name sets for rule options.

use std::collections::BTreeSet;

/// A fixed set of identifier names, built once when a rule is configured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameSet(BTreeSet<String>);

impl NameSet {
    /// Builds a set from any iterator of names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Uses `configured` when present and non-empty, `defaults` otherwise.
    #[must_use]
    pub fn or_defaults(configured: Option<Vec<String>>, defaults: &[&str]) -> Self {
        match configured {
            Some(names) if !names.is_empty() => Self::new(names),
            _ => Self::new(defaults.iter().copied()),
        }
    }

    /// Returns true if `name` is in the set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_defaults() {
        let set = NameSet::or_defaults(None, &["console", "logger"]);
        assert!(set.contains("console"));
        assert_eq!(set.len(), 2);

        let empty = NameSet::or_defaults(Some(Vec::new()), &["console"]);
        assert!(empty.contains("console"));
    }

    #[test]
    fn configured_names_replace_defaults() {
        let set = NameSet::or_defaults(Some(vec!["log".into()]), &["console"]);
        assert!(set.contains("log"));
        assert!(!set.contains("console"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["log"]);
    }
}
