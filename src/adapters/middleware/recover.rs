use std::sync::Arc;

use crate::core::{
    dispatch::{DefaultErrorHandler, ErrorHandler},
    handler::{HandlerFuture, Middleware, Next},
    request::Request,
};

/// Turn every error raised further down the chain into a response.
///
/// Registered first, it lets every other middleware observe a response
/// instead of an error.
#[derive(Clone)]
pub struct Recover {
    handler: Arc<dyn ErrorHandler>,
}

impl Recover {
    pub fn new(handler: impl ErrorHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl Default for Recover {
    fn default() -> Self {
        Self::new(DefaultErrorHandler)
    }
}

impl std::fmt::Debug for Recover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recover").finish_non_exhaustive()
    }
}

impl Middleware for Recover {
    fn handle(&self, request: Request, next: Next) -> HandlerFuture {
        let handler = Arc::clone(&self.handler);
        let head = request.head();
        Box::pin(async move {
            match next.run(request).await {
                Ok(response) => Ok(response),
                Err(error) => Ok(handler.handle(&error, Some(&head))),
            }
        })
    }
}
