//! [`TypedRouter`]: route registration narrowed by a route schema.

use crate::app::{App, Registrar};
use crate::error::WebError;
use crate::handler::{BoxError, BoxHandler, Handler, HandlerResult, MiddlewareArg, Next, boxed, flatten};
use crate::request::Request;
use crate::typed::{Reply, RouteHandler, TypedEndpoint, TypedRequest};
use async_trait::async_trait;
use http::Method;
use micro_route::{ApiSchema, Route, method};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Registers handlers for the routes of api `A` on the registrar `G`.
///
/// Handlers only accept routes of `A`, and each typed verb only accepts routes declared with
/// that verb. Requests are matched by `G`; the router is a [`Handler`] delegating to it, so it
/// can be mounted in a larger application.
pub struct TypedRouter<A, G = App> {
    inner: G,
    _api: PhantomData<fn() -> A>,
}

/// Wraps `app` into a [`TypedRouter`] for api `A`.
pub fn server<A: ApiSchema, G: Registrar>(app: G) -> TypedRouter<A, G> {
    TypedRouter::new(app)
}

macro_rules! typed_method {
    ($method:ident, $marker:ident) => {
        #[doc = concat!("Registers `handler` for the ", stringify!($marker), " route `R`, after `middlewares`.")]
        pub fn $method<R, F, Fut, O>(
            &mut self,
            handler: F,
            middlewares: Vec<MiddlewareArg>,
        ) -> Result<&mut Self, WebError>
        where
            R: Route<Api = A, Method = method::$marker>,
            F: Fn(TypedRequest<R>) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<O, BoxError>> + Send + 'static,
            O: Into<Reply<R::Response>> + 'static,
        {
            self.route::<R, F>(handler, middlewares)
        }
    };
}

impl<A: ApiSchema, G: Registrar> TypedRouter<A, G> {
    pub fn new(inner: G) -> Self {
        Self { inner, _api: PhantomData }
    }

    /// Flattens `middlewares` into one chain ending with `handler` and registers it on
    /// `(path, method)`.
    pub fn register_route(
        &mut self,
        path: &str,
        method: Method,
        handler: BoxHandler,
        middlewares: Vec<MiddlewareArg>,
    ) -> Result<&mut Self, WebError> {
        let chain = flatten(middlewares, handler);
        debug!(path, %method, chain = chain.len(), "typed route");
        self.inner.register(path, method, chain)?;
        Ok(self)
    }

    /// Registers `handler` for route `R`, whatever its method.
    pub fn route<R, H>(&mut self, handler: H, middlewares: Vec<MiddlewareArg>) -> Result<&mut Self, WebError>
    where
        R: Route<Api = A>,
        H: RouteHandler<R>,
    {
        self.register_route(R::PATH, R::method(), boxed(TypedEndpoint::<R, H>::new(handler)), middlewares)
    }

    typed_method!(get, Get);
    typed_method!(post, Post);
    typed_method!(put, Put);
    typed_method!(patch, Patch);
    typed_method!(delete, Delete);
    typed_method!(head, Head);
    typed_method!(options, Options);

    /// Adds a global handler to the registrar.
    pub fn use_(&mut self, handler: impl Handler + 'static) -> &mut Self {
        self.inner.use_handler(boxed(handler));
        self
    }

    #[inline]
    pub fn inner(&self) -> &G {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut G {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<A: ApiSchema> TypedRouter<A, App> {
    /// Runs `req` through the underlying [`App`].
    pub async fn dispatch(&self, req: Request) -> HandlerResult {
        self.inner.dispatch(req).await
    }
}

#[async_trait]
impl<A: ApiSchema, G: Registrar> Handler for TypedRouter<A, G> {
    async fn call(&self, req: Request, next: Next) -> HandlerResult {
        self.inner.call(req, next).await
    }
}

impl<A, G: fmt::Debug> fmt::Debug for TypedRouter<A, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRouter").field("inner", &self.inner).finish()
    }
}
