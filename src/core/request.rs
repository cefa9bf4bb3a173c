use std::borrow::Cow;

use crate::core::{
    body::Body,
    context::Context,
    headers::RequestHeaders,
    method::HttpMethod,
    params::{PathParams, QueryParams},
};

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Context key under which the dispatcher stores the request id as a `String`.
pub const REQUEST_ID_CONTEXT_KEY: &str = "request_id";

/// An inbound request as seen by middleware and handlers.
///
/// Requests are values: the `with_*` methods consume `self` and return the
/// updated request. Path parameters stay empty until the router matches the
/// request; the dispatcher then replaces them with [`Request::with_path_params`].
#[derive(Debug, Clone)]
pub struct Request {
    method: HttpMethod,
    path: String,
    headers: RequestHeaders,
    query_params: QueryParams,
    path_params: PathParams,
    body: Body,
    context: Context,
}

/// Method and path of a request, kept for error reporting after the request
/// itself has been moved into the handler chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: HttpMethod,
    pub path: String,
}

impl Request {
    /// A request with no headers, query, or body and a fresh context.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: RequestHeaders::new(),
            query_params: QueryParams::empty(),
            path_params: PathParams::empty(),
            body: Body::Empty,
            context: Context::new(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn query(&self) -> &QueryParams {
        &self.query_params
    }

    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Body as text: `Empty` reads as `""`, binary is decoded lossily.
    pub fn text(&self) -> Cow<'_, str> {
        self.body.as_text()
    }

    /// Correlation id assigned by the dispatcher, if any.
    pub fn request_id(&self) -> Option<String> {
        self.context.get(REQUEST_ID_CONTEXT_KEY)
    }

    pub fn head(&self) -> RequestHead {
        RequestHead {
            method: self.method,
            path: self.path.clone(),
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: RequestHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query_params = query;
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_path_params(mut self, params: PathParams) -> Self {
        self.path_params = params;
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}
