use std::borrow::Cow;

use bytes::Bytes;

/// Request or response payload. Exactly one representation is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Binary(Bytes),
}

impl Body {
    /// Text body, or `Empty` when the string is empty.
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.is_empty() {
            Body::Empty
        } else {
            Body::Text(content)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Binary(bytes) => bytes.is_empty(),
        }
    }

    /// Length of the encoded payload in bytes.
    pub fn len(&self) -> usize {
        match self {
            Body::Empty => 0,
            Body::Text(text) => text.len(),
            Body::Binary(bytes) => bytes.len(),
        }
    }

    /// Body as text; binary payloads are decoded lossily as UTF-8.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Body::Empty => Cow::Borrowed(""),
            Body::Text(text) => Cow::Borrowed(text),
            Body::Binary(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// Consume the body into its wire bytes (UTF-8 for text).
    pub fn into_bytes(self) -> Bytes {
        match self {
            Body::Empty => Bytes::new(),
            Body::Text(text) => Bytes::from(text),
            Body::Binary(bytes) => bytes,
        }
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::text(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::text(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::from(Bytes::from(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        if value.is_empty() {
            Body::Empty
        } else {
            Body::Binary(value)
        }
    }
}
