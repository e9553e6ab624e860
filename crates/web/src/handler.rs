//! Handlers, the continuation running the rest of a chain, and chain flattening.

use crate::request::{Request, Response};
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::StatusCode;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

pub type BoxError = Box<dyn Error + Send + Sync>;
pub type HandlerResult = Result<Response, BoxError>;
pub type BoxHandler = Arc<dyn Handler>;

/// A step of a handler chain.
///
/// A middleware calls `next.run(req)` to hand the request to the rest of the chain, possibly
/// after changing it, and may change the response on the way back. A business handler, last in
/// its chain, ignores `next` and answers.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: Request, next: Next) -> HandlerResult;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn call(&self, req: Request, next: Next) -> HandlerResult {
        (**self).call(req, next).await
    }
}

/// The rest of a handler chain.
///
/// Running past the last handler continues with the enclosing chain, if the chain was entered
/// from one, and answers `404 Not Found` otherwise.
#[derive(Clone)]
pub struct Next {
    chain: Arc<[BoxHandler]>,
    index: usize,
    outer: Option<Box<Next>>,
}

impl Next {
    pub fn new(chain: Arc<[BoxHandler]>) -> Self {
        Self { chain, index: 0, outer: None }
    }

    /// An empty chain: running it answers `404 Not Found`.
    pub fn end() -> Self {
        Self::new(Arc::from(Vec::new()))
    }

    /// Runs `chain`, then `outer` if the chain runs out.
    pub(crate) fn then(chain: Arc<[BoxHandler]>, outer: Next) -> Self {
        Self { chain, index: 0, outer: Some(Box::new(outer)) }
    }

    /// Number of handlers not run yet in the current chain
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.index)
    }

    pub fn run(self, req: Request) -> BoxFuture<'static, HandlerResult> {
        Box::pin(async move {
            match self.chain.get(self.index).cloned() {
                Some(handler) => {
                    let next = Next { chain: self.chain, index: self.index + 1, outer: self.outer };
                    handler.call(req, next).await
                }
                None => match self.outer {
                    Some(outer) => outer.run(req).await,
                    None => Ok(not_found()),
                },
            }
        })
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("remaining", &self.remaining()).field("outer", &self.outer).finish()
    }
}

pub(crate) fn not_found() -> Response {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

/// A business handler made of an async fn taking the request.
#[derive(Debug, Clone, Copy)]
pub struct FnHandler<F> {
    f: F,
}

pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, req: Request, _next: Next) -> HandlerResult {
        (self.f)(req).await
    }
}

/// A middleware made of an async fn taking the request and the rest of the chain.
#[derive(Debug, Clone, Copy)]
pub struct FnMiddleware<F> {
    f: F,
}

pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnMiddleware { f }
}

#[async_trait]
impl<F, Fut> Handler for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, req: Request, next: Next) -> HandlerResult {
        (self.f)(req, next).await
    }
}

pub fn boxed(handler: impl Handler + 'static) -> BoxHandler {
    Arc::new(handler)
}

/// One middleware argument of a route registration: a single handler or an ordered group.
pub enum MiddlewareArg {
    One(BoxHandler),
    Many(Vec<BoxHandler>),
}

impl MiddlewareArg {
    pub fn one(handler: impl Handler + 'static) -> Self {
        Self::One(boxed(handler))
    }

    pub fn many(handlers: impl IntoIterator<Item = BoxHandler>) -> Self {
        Self::Many(handlers.into_iter().collect())
    }
}

impl From<BoxHandler> for MiddlewareArg {
    fn from(handler: BoxHandler) -> Self {
        Self::One(handler)
    }
}

impl From<Vec<BoxHandler>> for MiddlewareArg {
    fn from(handlers: Vec<BoxHandler>) -> Self {
        Self::Many(handlers)
    }
}

impl fmt::Debug for MiddlewareArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(_) => f.write_str("One"),
            Self::Many(handlers) => f.debug_tuple("Many").field(&handlers.len()).finish(),
        }
    }
}

/// Flattens `middlewares` in order and appends `handler`, which always comes last.
pub fn flatten(middlewares: impl IntoIterator<Item = MiddlewareArg>, handler: BoxHandler) -> Vec<BoxHandler> {
    let mut chain = Vec::new();
    for middleware in middlewares {
        match middleware {
            MiddlewareArg::One(handler) => chain.push(handler),
            MiddlewareArg::Many(handlers) => chain.extend(handlers),
        }
    }
    chain.push(handler);
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> BoxHandler {
        let log = Arc::clone(log);
        boxed(middleware_fn(move |req, next: Next| {
            log.lock().unwrap().push(name);
            next.run(req)
        }))
    }

    fn ok(body: &'static str) -> BoxHandler {
        boxed(handler_fn(move |_req| async move { Ok(Response::new(Bytes::from_static(body.as_bytes()))) }))
    }

    #[tokio::test]
    async fn test_flatten_keeps_order_and_handler_last() {
        let log = Arc::new(Mutex::new(vec![]));
        let chain = flatten(
            vec![
                MiddlewareArg::from(recorder(&log, "a")),
                MiddlewareArg::many([recorder(&log, "b"), recorder(&log, "c")]),
                MiddlewareArg::Many(vec![]),
            ],
            ok("done"),
        );
        assert_eq!(chain.len(), 4);

        let response = Next::new(chain.into()).run(Request::new(Bytes::new())).await.unwrap();
        assert_eq!(*log.lock().unwrap(), ["a", "b", "c"]);
        assert_eq!(response.body().as_ref(), b"done");
    }

    #[tokio::test]
    async fn test_chain_runs_in_order() {
        let log = Arc::new(Mutex::new(vec![]));
        let chain = flatten(
            vec![
                MiddlewareArg::from(recorder(&log, "a")),
                MiddlewareArg::many([recorder(&log, "b"), recorder(&log, "c")]),
            ],
            ok("done"),
        );

        let response = Next::new(chain.into()).run(Request::new(Bytes::new())).await.unwrap();
        assert_eq!(response.body().as_ref(), b"done");
        assert_eq!(*log.lock().unwrap(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let deny = boxed(middleware_fn(|_req, _next| async {
            let mut response = Response::new(Bytes::new());
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            Ok(response)
        }));
        let chain = flatten(vec![MiddlewareArg::One(deny)], ok("secret"));

        let response = Next::new(chain.into()).run(Request::new(Bytes::new())).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_can_edit_response() {
        let tag = boxed(middleware_fn(|req, next: Next| async move {
            let mut response = next.run(req).await?;
            response.headers_mut().insert("x-tag", HeaderValue::from_static("tagged"));
            Ok(response)
        }));
        let chain = flatten(vec![MiddlewareArg::One(tag)], ok("body"));

        let response = Next::new(chain.into()).run(Request::new(Bytes::new())).await.unwrap();
        assert_eq!(response.headers()["x-tag"], "tagged");
    }

    #[tokio::test]
    async fn test_running_past_the_end() {
        let pass = boxed(middleware_fn(|req, next: Next| next.run(req)));

        let response = Next::new(Arc::from(vec![Arc::clone(&pass)])).run(Request::new(Bytes::new())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let outer = Next::new(Arc::from(vec![ok("outer")]));
        let response = Next::then(Arc::from(vec![pass]), outer).run(Request::new(Bytes::new())).await.unwrap();
        assert_eq!(response.body().as_ref(), b"outer");
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let fail = boxed(handler_fn(|_req| async { Err::<Response, BoxError>("boom".into()) }));
        let error = Next::new(Arc::from(vec![fail])).run(Request::new(Bytes::new())).await.unwrap_err();
        assert_eq!(error.to_string(), "boom");
    }
}
