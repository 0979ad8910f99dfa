//! Failure configurations: which units were failed when a trace was recorded.
//!
//! A [`Configuration`] is a set of component names. It plays two roles:
//!
//! - As a key into a unit's trace and distribution maps, naming the
//!   sub-configuration of the system the unit was profiled under.
//! - At simulation time, as the current failure frontier (the topmost failed
//!   components seen from the root).
//!
//! Names are kept in a `BTreeSet` so configurations compare, hash, and
//! display canonically regardless of insertion order. The distinguished
//! *fresh* configuration (no failures yet) is the empty set; a unit's
//! "previous configuration has never been set" state is expressed with
//! `Option<Configuration>` rather than a sentinel member.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A canonical set of failed component names.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(BTreeSet<String>);

impl Configuration {
    /// The distinguished initial configuration: nothing has failed.
    pub fn fresh() -> Self {
        Self::default()
    }

    pub fn is_fresh(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Parse a `failed="NAME1,NAME2"` attribute list. Empty input (or input
    /// that is all separators/whitespace) is the fresh configuration.
    pub fn from_failed_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    }
}

impl FromIterator<String> for Configuration {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Configuration {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(String::from).collect())
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_fresh() {
            return write!(f, "fresh");
        }
        let mut first = true;
        for name in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{name}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_is_empty() {
        let fresh = Configuration::fresh();
        assert!(fresh.is_fresh());
        assert_eq!(fresh.to_string(), "fresh");
    }

    #[test]
    fn test_canonical_order() {
        let a: Configuration = ["gpu", "cpu0"].into_iter().collect();
        let b: Configuration = ["cpu0", "gpu"].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "cpu0,gpu");
    }

    #[test]
    fn test_from_failed_list() {
        let config = Configuration::from_failed_list("cpu0, gpu");
        assert!(config.contains("cpu0"));
        assert!(config.contains("gpu"));
        assert_eq!(config.len(), 2);

        assert!(Configuration::from_failed_list("").is_fresh());
        assert!(Configuration::from_failed_list(" , ").is_fresh());
    }

    #[test]
    fn test_map_key_equality() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Configuration::from_failed_list("a,b"), 1);
        assert_eq!(map.get(&Configuration::from_failed_list("b, a")), Some(&1));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = Configuration::from_failed_list("gpu,cpu0");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"["cpu0","gpu"]"#);
        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
