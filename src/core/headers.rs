//! Header collections for both directions of the pipeline.
//!
//! Inbound headers are case-insensitive: names are lowercased on insert and
//! lookup, and a repeated name replaces the earlier value. Outbound headers
//! keep names as supplied and preserve insertion order; setting a name that is
//! already present (compared case-insensitively) replaces it in place.
use std::collections::{HashMap, hash_map};

/// Case-insensitive inbound header map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: HashMap<String, String>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, lowercasing the name. Returns the replaced value.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RequestHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = RequestHeaders::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Ordered outbound header list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header. An existing entry with the same name keeps its position
    /// but takes the new name spelling and value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl IntoIterator for ResponseHeaders {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ResponseHeaders {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = ResponseHeaders::new();
        headers.extend(iter);
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers_lowercase_keys() {
        let headers: RequestHeaders = [("Content-Type", "application/json")].into_iter().collect();
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(
            headers.iter().next().map(|(k, _)| k.as_str()),
            Some("content-type")
        );
    }

    #[test]
    fn test_request_headers_last_write_wins() {
        let mut headers = RequestHeaders::new();
        headers.insert("X-Tag", "a");
        let replaced = headers.insert("x-tag", "b");
        assert_eq!(replaced.as_deref(), Some("a"));
        assert_eq!(headers.get("x-tag"), Some("b"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_response_headers_preserve_order_and_case() {
        let headers: ResponseHeaders = [("Content-Type", "text/plain"), ("X-Trace", "1")]
            .into_iter()
            .collect();
        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Content-Type", "X-Trace"]);
    }

    #[test]
    fn test_response_headers_overwrite_in_place() {
        let mut headers = ResponseHeaders::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("X-Trace", "1");
        headers.insert("content-type", "application/json");

        let entries: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(
            entries,
            vec![("content-type", "application/json"), ("X-Trace", "1")]
        );
    }

    #[test]
    fn test_response_headers_remove() {
        let mut headers = ResponseHeaders::new();
        headers.insert("X-Trace", "1");
        assert_eq!(headers.remove("x-trace").as_deref(), Some("1"));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("x-trace"), None);
    }
}
