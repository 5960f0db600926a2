use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A bag of OSM key/value attributes. Iteration order is by key, so anything derived from a
/// `Tags` is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn empty() -> Tags {
        Tags(BTreeMap::new())
    }

    pub fn get(&self, k: &str) -> Option<&String> {
        self.0.get(k)
    }

    pub fn get_or<'a>(&'a self, k: &str, default: &'a str) -> &'a str {
        self.0.get(k).map(|v| v.as_str()).unwrap_or(default)
    }

    /// Values that don't parse as an integer are treated as missing.
    pub fn get_int(&self, k: &str, default: i32) -> i32 {
        self.0
            .get(k)
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(default)
    }

    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.contains_key(k))
    }

    pub fn is(&self, k: &str, v: &str) -> bool {
        self.0.get(k).map(|x| x == v).unwrap_or(false)
    }

    pub fn is_any(&self, k: &str, values: &[&str]) -> bool {
        if let Some(v) = self.0.get(k) {
            values.contains(&v.as_str())
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn inner(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Only used while reading a record; once a `Tags` is attached to output, it's not modified.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, k: K, v: V) {
        self.0.insert(k.into(), v.into());
    }

    /// Returns a copy holding only the listed keys.
    pub fn keep_only_keys(&self, keys: &[&str]) -> Tags {
        Tags(
            self.0
                .iter()
                .filter(|(k, _)| keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", pairs.join(", "))
    }
}

/// Some value plus the filtered attributes it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attributed<T> {
    pub value: T,
    tags: Tags,
}

impl<T> Attributed<T> {
    pub fn new(value: T, tags: Tags) -> Attributed<T> {
        Attributed { value, tags }
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn has_attribute(&self, k: &str) -> bool {
        self.tags.contains_key(k)
    }

    pub fn attribute_value(&self, k: &str) -> Option<&String> {
        self.tags.get(k)
    }

    pub fn attribute_value_or<'a>(&'a self, k: &str, default: &'a str) -> &'a str {
        self.tags.get_or(k, default)
    }

    pub fn attribute_int(&self, k: &str, default: i32) -> i32 {
        self.tags.get_int(k, default)
    }
}
