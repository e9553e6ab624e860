//! Typed views over requests and replies, and the handlers written against them.

use crate::error::WebError;
use crate::handler::{BoxError, Handler, HandlerResult, Next};
use crate::request::{PathParams, Request, Response};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, IntoHeaderName};
use http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use micro_route::Route;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use tracing::trace;

const APPLICATION_JSON: &str = "application/json";

/// A request received on route `R`.
///
/// Params, query and body are decoded on access into the shapes `R` declares. Path params come
/// from the router, the query from the url and the body is read as json. Missing parts decode as
/// `null` first, so `()` and `Option` shapes accept them. Present params and queries decode into
/// structs or maps.
pub struct TypedRequest<R: Route> {
    request: Request,
    _route: PhantomData<fn() -> R>,
}

impl<R: Route> TypedRequest<R> {
    pub fn new(request: Request) -> Self {
        Self { request, _route: PhantomData }
    }

    pub fn params(&self) -> Result<R::Params, WebError> {
        let encoded = match self.path_params() {
            Some(params) => params
                .iter()
                .map(|(name, value)| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&"),
            None => String::new(),
        };
        match from_null(&encoded) {
            Some(params) => Ok(params),
            None => serde_urlencoded::from_str(&encoded).map_err(WebError::params),
        }
    }

    pub fn query(&self) -> Result<R::Query, WebError> {
        let query = self.request.uri().query().unwrap_or_default();
        match from_null(query) {
            Some(query) => Ok(query),
            None => serde_qs::from_str(query).map_err(WebError::query),
        }
    }

    pub fn body(&self) -> Result<R::Body, WebError> {
        let body = self.request.body();
        match from_null(body) {
            Some(body) => Ok(body),
            None => serde_json::from_slice(body).map_err(WebError::body),
        }
    }

    /// The raw path params, `None` when the request did not go through a router.
    pub fn path_params(&self) -> Option<&PathParams> {
        PathParams::of(&self.request)
    }

    #[inline]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    #[inline]
    pub fn request(&self) -> &Request {
        &self.request
    }

    #[inline]
    pub fn into_inner(self) -> Request {
        self.request
    }
}

impl<R: Route> fmt::Debug for TypedRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRequest").field("path", &R::PATH).field("request", &self.request).finish()
    }
}

// an absent part reads as `null` when the shape accepts it
fn from_null<T: DeserializeOwned>(raw: impl AsRef<[u8]>) -> Option<T> {
    if raw.as_ref().is_empty() { T::deserialize(serde_json::Value::Null).ok() } else { None }
}

/// The answer of a typed handler: a value of the route's response shape, sent as json.
///
/// Handlers may return the bare value, which is answered with `200 OK`.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    status: StatusCode,
    headers: HeaderMap,
    body: T,
}

impl<T: Serialize> Reply<T> {
    pub fn new(body: T) -> Self {
        Self { status: StatusCode::OK, headers: HeaderMap::new(), body }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Encodes the reply. A body serializing to `null` is sent empty.
    pub fn into_response(self) -> Result<Response, WebError> {
        let encoded = serde_json::to_vec(&self.body).map_err(WebError::reply)?;
        let mut headers = self.headers;
        let body = if encoded == b"null" {
            Bytes::new()
        } else {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            }
            Bytes::from(encoded)
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

impl<T: Serialize> From<T> for Reply<T> {
    fn from(body: T) -> Self {
        Reply::new(body)
    }
}

/// The business handler of route `R`.
///
/// Implemented for every `Fn(TypedRequest<R>) -> impl Future<Output = Result<O, BoxError>>` where
/// `O` converts into a [`Reply`].
#[async_trait]
pub trait RouteHandler<R: Route>: Send + Sync + 'static {
    async fn handle(&self, req: TypedRequest<R>) -> Result<Reply<R::Response>, BoxError>;
}

#[async_trait]
impl<R, F, Fut, O> RouteHandler<R> for F
where
    R: Route,
    F: Fn(TypedRequest<R>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, BoxError>> + Send + 'static,
    O: Into<Reply<R::Response>>,
{
    async fn handle(&self, req: TypedRequest<R>) -> Result<Reply<R::Response>, BoxError> {
        Ok((self)(req).await?.into())
    }
}

/// Adapts a [`RouteHandler`] to the last position of a chain. It never calls `next`.
pub(crate) struct TypedEndpoint<R, H> {
    handler: H,
    _route: PhantomData<fn() -> R>,
}

impl<R: Route, H: RouteHandler<R>> TypedEndpoint<R, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self { handler, _route: PhantomData }
    }
}

#[async_trait]
impl<R: Route, H: RouteHandler<R>> Handler for TypedEndpoint<R, H> {
    async fn call(&self, req: Request, _next: Next) -> HandlerResult {
        trace!(path = R::PATH, method = %req.method(), "typed handler");
        let reply = self.handler.handle(TypedRequest::new(req)).await?;
        Ok(reply.into_response()?)
    }
}
