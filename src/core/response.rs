use bytes::Bytes;
use serde::Serialize;

use crate::core::{body::Body, headers::ResponseHeaders, status::HttpStatus};

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";

/// An outbound response.
///
/// Middleware never mutate a response they received; they build a new one
/// with the `with_*` methods, which consume `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: HttpStatus,
    headers: ResponseHeaders,
    body: Body,
}

impl Response {
    /// A response with the given status, no headers, and an empty body.
    pub fn new(status: HttpStatus) -> Self {
        Self {
            status,
            headers: ResponseHeaders::new(),
            body: Body::Empty,
        }
    }

    /// `text/plain` response; an empty message yields an empty body.
    pub fn text(status: HttpStatus, message: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", TEXT_PLAIN_UTF8)
            .with_body(Body::text(message))
    }

    /// `200 OK` with a plain-text body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::text(HttpStatus::Ok, body)
    }

    /// `200 OK` with `value` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_string(value)?;
        Ok(Self::new(HttpStatus::Ok)
            .with_header("Content-Type", APPLICATION_JSON_UTF8)
            .with_body(Body::Text(encoded)))
    }

    pub fn created(body: impl Into<String>) -> Self {
        Self::text(HttpStatus::Created, body)
    }

    pub fn no_content() -> Self {
        Self::new(HttpStatus::NoContent)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::text(HttpStatus::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::text(HttpStatus::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::text(HttpStatus::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::text(HttpStatus::NotFound, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::text(HttpStatus::InternalServerError, message)
    }

    /// `200 OK` with raw bytes and an explicit content type.
    pub fn binary(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self::new(HttpStatus::Ok)
            .with_header("Content-Type", content_type)
            .with_body(Body::from(bytes.into()))
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn with_status(mut self, status: HttpStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Copy every pair into the header list; later pairs overwrite earlier ones.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn into_parts(self) -> (HttpStatus, ResponseHeaders, Body) {
        (self.status, self.headers, self.body)
    }
}
