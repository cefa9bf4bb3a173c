use crate::core::{
    handler::{HandlerFuture, Middleware, Next},
    request::Request,
};

const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("X-XSS-Protection", "1; mode=block"),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
];

/// Add common security hardening headers; values set by the handler are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeaders;

impl Middleware for SecurityHeaders {
    fn handle(&self, request: Request, next: Next) -> HandlerFuture {
        Box::pin(async move {
            let mut response = next.run(request).await?;
            for (name, value) in SECURITY_HEADERS {
                if !response.headers().contains(name) {
                    response = response.with_header(name, value);
                }
            }
            Ok(response)
        })
    }
}
