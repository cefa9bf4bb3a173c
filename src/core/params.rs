//! Typed accessors over path and query parameters.
//!
//! Every accessor returns `None` (or skips the entry, for the list forms) when
//! the key is missing or the value does not parse as the requested type.
//! Booleans are strict: only `true` and `false` are accepted.
use std::{collections::HashMap, str::FromStr};

/// Parameters extracted from the request path by a route pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: HashMap<String, String>,
}

impl PathParams {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Parse the value under `key` into any `FromStr` type.
    pub fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        self.params.get(key)?.parse().ok()
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        self.get(key)
    }

    pub fn long(&self, key: &str) -> Option<i64> {
        self.get(key)
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key)
    }

    pub fn double(&self, key: &str) -> Option<f64> {
        self.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.params
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Decoded query string; each name keeps all of its values in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(params: HashMap<String, Vec<String>>) -> Self {
        Self { params }
    }

    /// Decode an `application/x-www-form-urlencoded` query string (without `?`).
    pub fn parse(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes()).collect()
    }

    /// First value under `key`, parsed.
    pub fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        self.string(key)?.parse().ok()
    }

    /// Every value under `key` that parses; the rest are skipped.
    pub fn get_all<T: FromStr>(&self, key: &str) -> Vec<T> {
        self.list(key)
            .iter()
            .filter_map(|value| value.parse().ok())
            .collect()
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.first().map(String::as_str)
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        self.get(key)
    }

    pub fn long(&self, key: &str) -> Option<i64> {
        self.get(key)
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key)
    }

    pub fn double(&self, key: &str) -> Option<f64> {
        self.get(key)
    }

    pub fn list(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn int_list(&self, key: &str) -> Vec<i32> {
        self.get_all(key)
    }

    pub fn long_list(&self, key: &str) -> Vec<i64> {
        self.get_all(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in iter {
            params.entry(name.into()).or_default().push(value.into());
        }
        Self { params }
    }
}
