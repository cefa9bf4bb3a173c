use std::sync::{Arc, Mutex};

use bytes::Bytes;
use petal::{
    App, Body, Dispatcher, HandlerError, HttpError, HttpMethod, HttpStatus, Next, Request,
    Response, adapters::middleware::RequestId, from_fn,
};
use tower::ServiceExt;

fn transport(method: &str, uri: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
}

fn body_text(response: &http::Response<Bytes>) -> String {
    String::from_utf8(response.body().to_vec()).unwrap()
}

fn users_app() -> Dispatcher {
    App::new()
        .get("/users/{id}", |request: Request| async move {
            let id = request.path_params().string("id").unwrap_or_default().to_string();
            Ok::<_, HandlerError>(Response::ok(format!("user {id}")))
        })
        .unwrap()
        .get("/bad", |_request: Request| async {
            Err::<Response, _>(HttpError::bad_request("bad").into())
        })
        .unwrap()
        .post("/echo", |request: Request| async move {
            let echoed = match request.body() {
                Body::Text(text) => format!("text:{text}"),
                Body::Binary(bytes) => format!("binary:{}", bytes.len()),
                Body::Empty => "empty".to_string(),
            };
            Ok::<_, HandlerError>(Response::ok(echoed))
        })
        .unwrap()
        .into_dispatcher()
}

#[tokio::test]
async fn test_path_parameter_reaches_handler() {
    let response = users_app()
        .oneshot(transport("GET", "/users/42"))
        .await
        .unwrap();

    assert_eq!(response.status(), http::StatusCode::OK);
    assert_eq!(body_text(&response), "user 42");
    assert_eq!(response.headers()["content-length"], "7");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let response = users_app()
        .oneshot(transport("GET", "/missing"))
        .await
        .unwrap();

    assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    assert_eq!(body_text(&response), "Route not found: GET /missing");
}

#[tokio::test]
async fn test_method_mismatch_is_not_found() {
    let response = users_app()
        .oneshot(transport("DELETE", "/users/42"))
        .await
        .unwrap();

    assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_structured_error_maps_to_status_and_message() {
    let response = users_app().oneshot(transport("GET", "/bad")).await.unwrap();

    assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(body_text(&response), "bad");
}

#[tokio::test]
async fn test_json_request_body_is_text() {
    let request = http::Request::builder()
        .method("POST")
        .uri("/echo")
        .header("Content-Type", "application/json")
        .body(Bytes::from_static(br#"{"a":1}"#))
        .unwrap();

    let response = users_app().oneshot(request).await.unwrap();
    assert_eq!(body_text(&response), r#"text:{"a":1}"#);
}

#[tokio::test]
async fn test_octet_stream_request_body_is_binary() {
    let request = http::Request::builder()
        .method("POST")
        .uri("/echo")
        .header("Content-Type", "application/octet-stream")
        .body(Bytes::from_static(&[0, 159, 146, 150]))
        .unwrap();

    let response = users_app().oneshot(request).await.unwrap();
    assert_eq!(body_text(&response), "binary:4");
}

#[tokio::test]
async fn test_empty_request_body_is_empty() {
    let response = users_app().oneshot(transport("POST", "/echo")).await.unwrap();
    assert_eq!(body_text(&response), "empty");
}

#[tokio::test]
async fn test_first_registered_route_wins() {
    let dispatcher = App::new()
        .get("/items/{id}", |_request: Request| async {
            Ok::<_, HandlerError>(Response::ok("by id"))
        })
        .unwrap()
        .get("/items/{name}", |_request: Request| async {
            Ok::<_, HandlerError>(Response::ok("by name"))
        })
        .unwrap()
        .into_dispatcher();

    let response = dispatcher
        .oneshot(transport("GET", "/items/widget"))
        .await
        .unwrap();
    assert_eq!(body_text(&response), "by id");
}

#[tokio::test]
async fn test_middleware_nesting_order() {
    let trace = Arc::new(Mutex::new(Vec::new()));

    let layer = |name: &'static str, trace: Arc<Mutex<Vec<String>>>| {
        from_fn(move |request: Request, next: Next| {
            let trace = trace.clone();
            async move {
                trace.lock().unwrap().push(format!("{name}-pre"));
                let response = next.run(request).await;
                trace.lock().unwrap().push(format!("{name}-post"));
                response
            }
        })
    };

    let handler_trace = trace.clone();
    let dispatcher = App::new()
        .get("/", move |_request: Request| {
            let trace = handler_trace.clone();
            async move {
                trace.lock().unwrap().push("H".to_string());
                Ok::<_, HandlerError>(Response::ok("done"))
            }
        })
        .unwrap()
        .use_middleware(layer("M1", trace.clone()))
        .use_middleware(layer("M2", trace.clone()))
        .use_middleware(layer("M3", trace.clone()))
        .into_dispatcher();

    let response = dispatcher.oneshot(transport("GET", "/")).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);
    assert_eq!(
        *trace.lock().unwrap(),
        ["M1-pre", "M2-pre", "M3-pre", "H", "M3-post", "M2-post", "M1-post"]
    );
}

#[tokio::test]
async fn test_middleware_runs_for_unmatched_requests() {
    let dispatcher = App::new()
        .use_middleware(RequestId)
        .into_dispatcher();

    let response = dispatcher
        .oneshot(transport("GET", "/nowhere"))
        .await
        .unwrap();
    assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_internal_failure_is_generic_500() {
    let dispatcher = App::new()
        .get("/boom", |_request: Request| async {
            Err::<Response, _>(HandlerError::internal("database password is hunter2"))
        })
        .unwrap()
        .into_dispatcher();

    let response = dispatcher.oneshot(transport("GET", "/boom")).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(&response), "Internal Server Error");
}

#[tokio::test]
async fn test_handle_without_transport() {
    let response = users_app()
        .handle(Request::new(HttpMethod::Get, "/users/7"))
        .await;
    assert_eq!(response.status(), HttpStatus::Ok);
    assert_eq!(response.body(), &Body::Text("user 7".to_string()));
}
