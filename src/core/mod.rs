pub mod body;
pub mod context;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod headers;
pub mod method;
pub mod params;
pub mod request;
pub mod response;
pub mod routing;
pub mod status;

pub use body::Body;
pub use context::Context;
pub use convert::{RequestConverter, ResponseConverter};
pub use dispatch::{DefaultErrorHandler, Dispatcher, ErrorHandler};
pub use error::{HandlerError, HttpError, PatternError};
pub use handler::{
    BoxedHandler, BoxedMiddleware, Handler, HandlerFuture, HandlerResult, Middleware, Next,
    compose, from_fn,
};
pub use headers::{RequestHeaders, ResponseHeaders};
pub use method::{HttpMethod, MethodParseError};
pub use params::{PathParams, QueryParams};
pub use request::{Request, RequestHead};
pub use response::Response;
pub use routing::{PathPattern, Route, RouteMatch, Router};
pub use status::HttpStatus;
