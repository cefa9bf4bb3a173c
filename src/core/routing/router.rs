//! Ordered route table.
//!
//! Lookup is a linear scan in registration order. For each route the method
//! is compared first and the compiled pattern is only run when the method
//! agrees. The first qualifying route wins, so a specific route registered
//! after a more general one that also matches is never reached.
use tracing::debug;

use crate::core::{
    error::PatternError,
    handler::{BoxedHandler, Handler, boxed},
    method::HttpMethod,
    request::Request,
    routing::{
        pattern::PathPattern,
        route::{Route, RouteMatch},
    },
};

#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// The pattern is compiled immediately; a malformed pattern is rejected
    /// here and leaves the table unchanged.
    pub fn add_route<H: Handler>(
        &mut self,
        method: HttpMethod,
        pattern: &str,
        handler: H,
    ) -> Result<(), PatternError> {
        self.add_boxed_route(method, pattern, boxed(handler))
    }

    /// [`Router::add_route`] for an already type-erased handler.
    pub fn add_boxed_route(
        &mut self,
        method: HttpMethod,
        pattern: &str,
        handler: BoxedHandler,
    ) -> Result<(), PatternError> {
        let pattern = PathPattern::new(pattern)?;
        debug!(method = %method, pattern = %pattern, "Registered route");
        self.routes.push(Route::new(method, pattern, handler));
        Ok(())
    }

    /// First route accepting the request's method and path.
    pub fn match_request(&self, request: &Request) -> Option<RouteMatch> {
        self.match_path(request.method(), request.path())
    }

    pub fn match_path(&self, method: HttpMethod, path: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| {
            route.matches(method, path).map(|path_params| RouteMatch {
                path_params,
                handler: route.handler().clone(),
            })
        })
    }

    /// Registered routes in registration (and precedence) order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{body::Body, error::HandlerError, response::Response};

    async fn reply(route_match: RouteMatch) -> Body {
        let request = Request::new(HttpMethod::Get, "/");
        route_match
            .handler
            .call(request)
            .await
            .unwrap()
            .body()
            .clone()
    }

    fn labelled(label: &'static str) -> impl Handler {
        move |_request: Request| async move { Ok::<_, HandlerError>(Response::ok(label)) }
    }

    #[test]
    fn test_empty_router_matches_nothing() {
        let router = Router::new();
        assert!(router.is_empty());
        assert!(router.match_path(HttpMethod::Get, "/").is_none());
    }

    #[tokio::test]
    async fn test_match_extracts_params() {
        let mut router = Router::new();
        router
            .add_route(HttpMethod::Get, "/users/{id}", labelled("user"))
            .unwrap();

        let route_match = router.match_path(HttpMethod::Get, "/users/42").unwrap();
        assert_eq!(route_match.path_params.string("id"), Some("42"));
        assert_eq!(reply(route_match).await, Body::Text("user".to_string()));
    }

    #[test]
    fn test_method_must_match() {
        let mut router = Router::new();
        router
            .add_route(HttpMethod::Post, "/users", labelled("create"))
            .unwrap();

        assert!(router.match_path(HttpMethod::Get, "/users").is_none());
        assert!(router.match_path(HttpMethod::Post, "/users").is_some());
    }

    #[tokio::test]
    async fn test_same_path_different_methods() {
        let mut router = Router::new();
        router
            .add_route(HttpMethod::Get, "/items", labelled("list"))
            .unwrap();
        router
            .add_route(HttpMethod::Post, "/items", labelled("create"))
            .unwrap();

        let get = router.match_path(HttpMethod::Get, "/items").unwrap();
        let post = router.match_path(HttpMethod::Post, "/items").unwrap();
        assert_eq!(reply(get).await, Body::Text("list".to_string()));
        assert_eq!(reply(post).await, Body::Text("create".to_string()));
    }

    #[tokio::test]
    async fn test_first_registered_wins() {
        let mut router = Router::new();
        router
            .add_route(HttpMethod::Get, "/users/{id}", labelled("by-id"))
            .unwrap();
        router
            .add_route(HttpMethod::Get, "/users/me", labelled("me"))
            .unwrap();

        let route_match = router.match_path(HttpMethod::Get, "/users/me").unwrap();
        assert_eq!(route_match.path_params.string("id"), Some("me"));
        assert_eq!(reply(route_match).await, Body::Text("by-id".to_string()));
    }

    #[tokio::test]
    async fn test_overlapping_patterns_with_different_names() {
        let mut router = Router::new();
        router
            .add_route(HttpMethod::Get, "/a/{x}", labelled("x"))
            .unwrap();
        router
            .add_route(HttpMethod::Get, "/a/{y}", labelled("y"))
            .unwrap();

        let route_match = router.match_path(HttpMethod::Get, "/a/1").unwrap();
        assert!(route_match.path_params.contains("x"));
        assert!(!route_match.path_params.contains("y"));
    }

    #[test]
    fn test_malformed_pattern_leaves_table_unchanged() {
        let mut router = Router::new();
        let result = router.add_route(HttpMethod::Get, "/users/{id", labelled("bad"));
        assert!(matches!(
            result,
            Err(PatternError::UnclosedPlaceholder { .. })
        ));
        assert!(router.is_empty());
    }

    #[test]
    fn test_routes_preserve_registration_order() {
        let mut router = Router::new();
        router.add_route(HttpMethod::Get, "/b", labelled("b")).unwrap();
        router.add_route(HttpMethod::Put, "/a", labelled("a")).unwrap();

        let summary: Vec<(HttpMethod, &str)> = router
            .routes()
            .iter()
            .map(|route| (route.method(), route.pattern().as_str()))
            .collect();
        assert_eq!(summary, vec![(HttpMethod::Get, "/b"), (HttpMethod::Put, "/a")]);
    }

    #[test]
    fn test_match_request_uses_method_and_path() {
        let mut router = Router::new();
        router
            .add_route(HttpMethod::Delete, "/users/{id}", labelled("delete"))
            .unwrap();

        let request = Request::new(HttpMethod::Delete, "/users/9");
        let route_match = router.match_request(&request).unwrap();
        assert_eq!(route_match.path_params.int("id"), Some(9));
    }
}
