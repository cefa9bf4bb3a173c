//! Conversion between transport messages and the framework's request and
//! response model.
use bytes::Bytes;
use http::{
    HeaderMap, HeaderName, HeaderValue,
    header::{CONTENT_LENGTH, CONTENT_TYPE},
};
use tracing::warn;

use crate::{
    core::{
        body::Body,
        error::HttpError,
        headers::RequestHeaders,
        method::HttpMethod,
        params::QueryParams,
        request::Request,
        response::Response,
        status::HttpStatus,
    },
    ports::http_server::{TransportRequest, TransportResponse},
};

/// Content-type fragments whose bodies are decoded as UTF-8 text.
const TEXTUAL_CONTENT_TYPES: [&str; 4] = ["text", "json", "xml", "form"];

pub struct RequestConverter;

impl RequestConverter {
    /// Build a [`Request`] from a buffered transport request.
    ///
    /// Fails only for methods the router cannot represent, with `405`.
    pub fn convert(request: TransportRequest) -> Result<Request, HttpError> {
        let (parts, body) = request.into_parts();

        let method = HttpMethod::try_from(&parts.method)
            .map_err(|e| HttpError::new(HttpStatus::MethodNotAllowed, e.to_string()))?;
        let path = decode_path(parts.uri.path());
        let query = parts
            .uri
            .query()
            .map(QueryParams::parse)
            .unwrap_or_default();
        let headers = convert_headers(&parts.headers);
        let body = classify_body(headers.get(CONTENT_TYPE.as_str()), body);

        Ok(Request::new(method, path)
            .with_headers(headers)
            .with_query(query)
            .with_body(body))
    }
}

pub struct ResponseConverter;

impl ResponseConverter {
    /// Encode a [`Response`] for the transport, setting `Content-Length`.
    ///
    /// Headers whose name or value is not valid on the wire are dropped with a warning.
    pub fn convert(response: Response) -> TransportResponse {
        let (status, headers, body) = response.into_parts();
        let bytes = body.into_bytes();
        let content_length = bytes.len();

        let mut transport = http::Response::new(bytes);
        *transport.status_mut() = status.into();

        let target = transport.headers_mut();
        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    target.insert(name, value);
                }
                _ => warn!(header = %name, "Dropping invalid response header"),
            }
        }
        if status != HttpStatus::NoContent {
            target.insert(CONTENT_LENGTH, HeaderValue::from(content_length));
        }

        transport
    }
}

fn decode_path(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn convert_headers(headers: &HeaderMap) -> RequestHeaders {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Decide the body variant from the (case-insensitive) content type.
pub fn classify_body(content_type: Option<&str>, bytes: Bytes) -> Body {
    if bytes.is_empty() {
        return Body::Empty;
    }

    let textual = content_type.is_some_and(|content_type| {
        let content_type = content_type.to_ascii_lowercase();
        TEXTUAL_CONTENT_TYPES
            .iter()
            .any(|fragment| content_type.contains(fragment))
    });

    if textual {
        Body::Text(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        Body::Binary(bytes)
    }
}
