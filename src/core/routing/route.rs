use std::fmt;

use crate::core::{
    handler::BoxedHandler, method::HttpMethod, params::PathParams, routing::pattern::PathPattern,
};

/// One entry of the route table: method, compiled pattern and handler.
#[derive(Clone)]
pub struct Route {
    method: HttpMethod,
    pattern: PathPattern,
    handler: BoxedHandler,
}

impl Route {
    pub fn new(method: HttpMethod, pattern: PathPattern, handler: BoxedHandler) -> Self {
        Self {
            method,
            pattern,
            handler,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Parameters for `path` if this route accepts `method` and `path`.
    pub fn matches(&self, method: HttpMethod, path: &str) -> Option<PathParams> {
        if self.method != method {
            return None;
        }
        self.pattern.match_path(path)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Result of a successful route lookup.
#[derive(Clone)]
pub struct RouteMatch {
    pub path_params: PathParams,
    pub handler: BoxedHandler,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("path_params", &self.path_params)
            .finish_non_exhaustive()
    }
}
