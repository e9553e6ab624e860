//! The router collaborator: path matching, path param extraction and per-method dispatch.

use crate::error::WebError;
use crate::handler::{BoxHandler, Handler, HandlerResult, Next, boxed};
use crate::request::{PathParams, Request};
use async_trait::async_trait;
use http::Method;
use micro_route::PathTemplate;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type InnerRouter = matchit::Router<usize>;

/// What a typed router needs from the router underneath it.
///
/// A registrar matches request paths against registered templates, puts the extracted
/// [`PathParams`] into the request and runs the chain registered for the request's method. It is
/// itself a [`Handler`], so it can be mounted inside a larger application.
pub trait Registrar: Handler {
    /// Registers `chain` for `method` requests on the `/:name` style `path`.
    fn register(&mut self, path: &str, method: Method, chain: Vec<BoxHandler>) -> Result<(), WebError>;

    /// Adds a handler run for every request, before route matching.
    fn use_handler(&mut self, handler: BoxHandler);
}

/// A [`Registrar`] backed by `matchit`.
///
/// Requests go through the global handlers added with [`use_`](App::use_) first, in order, then
/// through the chain of the matching route. `HEAD` requests fall back to the `GET` chain. When no
/// route matches, the request continues with the enclosing chain, or gets `404 Not Found`.
pub struct App {
    middlewares: Vec<BoxHandler>,
    routes: Vec<RouteEntry>,
    paths: HashMap<String, usize>,
    chain: Arc<[BoxHandler]>,
}

#[derive(Clone)]
struct RouteEntry {
    path: String,
    methods: Vec<(Method, Arc<[BoxHandler]>)>,
}

struct Dispatch {
    inner_router: InnerRouter,
    routes: Vec<RouteEntry>,
}

macro_rules! method_register {
    ($method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Registers `handlers` for HTTP ", stringify!($upper_case_method), " requests on `path`.")]
        pub fn $method(&mut self, path: &str, handlers: Vec<BoxHandler>) -> Result<&mut Self, WebError> {
            self.register(path, Method::$upper_case_method, handlers)?;
            Ok(self)
        }
    };
}

impl App {
    pub fn new() -> Self {
        let dispatch = Dispatch { inner_router: InnerRouter::new(), routes: vec![] };
        Self { middlewares: vec![], routes: vec![], paths: HashMap::new(), chain: Arc::from(vec![boxed(dispatch)]) }
    }

    /// Adds a global handler.
    pub fn use_(&mut self, handler: impl Handler + 'static) -> &mut Self {
        self.use_handler(boxed(handler));
        self
    }

    method_register!(get, GET);
    method_register!(post, POST);
    method_register!(put, PUT);
    method_register!(patch, PATCH);
    method_register!(delete, DELETE);
    method_register!(head, HEAD);
    method_register!(options, OPTIONS);

    /// Runs `req` through the application, answering `404 Not Found` when nothing handles it.
    pub async fn dispatch(&self, req: Request) -> HandlerResult {
        self.call(req, Next::end()).await
    }

    fn rebuild(&mut self) -> Result<(), WebError> {
        let dispatch = Dispatch::build(self.routes.clone())?;
        let mut chain = self.middlewares.clone();
        chain.push(boxed(dispatch));
        self.chain = chain.into();
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Registrar for App {
    fn register(&mut self, path: &str, method: Method, chain: Vec<BoxHandler>) -> Result<(), WebError> {
        let router_path = PathTemplate::parse(path).to_router_path();
        debug!(path, %router_path, %method, handlers = chain.len(), "register route");

        match self.paths.get(&router_path) {
            Some(&index) => self.routes[index].append(method, chain),
            None => {
                self.routes.push(RouteEntry { path: router_path.clone(), methods: vec![(method, chain.into())] });
                if let Err(e) = self.rebuild() {
                    self.routes.pop();
                    return Err(e);
                }
                self.paths.insert(router_path, self.routes.len() - 1);
                return Ok(());
            }
        }

        self.rebuild()
    }

    fn use_handler(&mut self, handler: BoxHandler) {
        self.middlewares.push(handler);
        let dispatch = Arc::clone(&self.chain[self.chain.len() - 1]);
        let mut chain = self.middlewares.clone();
        chain.push(dispatch);
        self.chain = chain.into();
    }
}

#[async_trait]
impl Handler for App {
    async fn call(&self, req: Request, next: Next) -> HandlerResult {
        Next::then(Arc::clone(&self.chain), next).run(req).await
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("middlewares", &self.middlewares.len())
            .field("routes", &self.routes.iter().map(|route| route.path.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl RouteEntry {
    // a chain registered again for the same method runs once the earlier one calls past its end
    fn append(&mut self, method: Method, chain: Vec<BoxHandler>) {
        match self.methods.iter_mut().find(|(registered, _)| *registered == method) {
            Some((_, existing)) => *existing = existing.iter().cloned().chain(chain).collect(),
            None => self.methods.push((method, chain.into())),
        }
    }

    fn chain_for(&self, method: &Method) -> Option<Arc<[BoxHandler]>> {
        let find = |wanted: &Method| {
            self.methods.iter().find(|(method, _)| method == wanted).map(|(_, chain)| Arc::clone(chain))
        };
        find(method).or_else(|| if *method == Method::HEAD { find(&Method::GET) } else { None })
    }
}

impl Dispatch {
    fn build(routes: Vec<RouteEntry>) -> Result<Self, WebError> {
        let mut inner_router = InnerRouter::new();
        for (index, route) in routes.iter().enumerate() {
            inner_router.insert(route.path.as_str(), index).map_err(|e| WebError::register(&route.path, e))?;
        }
        Ok(Self { inner_router, routes })
    }
}

#[async_trait]
impl Handler for Dispatch {
    async fn call(&self, mut req: Request, next: Next) -> HandlerResult {
        let found = match self.inner_router.at(req.uri().path()) {
            Ok(matched) => {
                let route = &self.routes[*matched.value];
                route.chain_for(req.method()).map(|chain| (chain, PathParams::from(matched.params)))
            }
            Err(e) => {
                trace!(path = req.uri().path(), cause = %e, "no route matched");
                None
            }
        };

        match found {
            Some((chain, params)) => {
                req.extensions_mut().insert(params);
                Next::then(chain, next).run(req).await
            }
            None => {
                debug!(method = %req.method(), path = req.uri().path(), "no route handles request");
                next.run(req).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler_fn, middleware_fn};
    use crate::request::Response;
    use bytes::Bytes;
    use http::StatusCode;

    fn reply(body: &'static str) -> BoxHandler {
        boxed(handler_fn(move |_req| async move { Ok(Response::new(Bytes::from_static(body.as_bytes()))) }))
    }

    fn echo_param(name: &'static str) -> BoxHandler {
        boxed(handler_fn(move |req: Request| async move {
            let value = PathParams::of(&req).and_then(|params| params.get(name)).unwrap_or_default().to_owned();
            Ok(Response::new(Bytes::from(value)))
        }))
    }

    fn request(method: Method, uri: &str) -> Request {
        http::Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_by_method() {
        let mut app = App::new();
        app.get("/hello", vec![reply("get")]).unwrap().post("/hello", vec![reply("post")]).unwrap();

        let response = app.dispatch(request(Method::GET, "/hello")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"get");

        let response = app.dispatch(request(Method::POST, "/hello")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"post");

        let response = app.dispatch(request(Method::PUT, "/hello")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.dispatch(request(Method::GET, "/nothing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_falls_back_to_get() {
        let mut app = App::new();
        app.get("/hello", vec![reply("get")]).unwrap();

        let response = app.dispatch(request(Method::HEAD, "/hello")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"get");
    }

    #[tokio::test]
    async fn test_path_params_are_extracted() {
        let mut app = App::new();
        app.post("/hello/:name", vec![echo_param("name")]).unwrap();

        let response = app.dispatch(request(Method::POST, "/hello/brave%20new%20World")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"brave new World");
    }

    #[tokio::test]
    async fn test_global_middlewares_run_first() {
        let mut app = App::new();
        app.get("/hello", vec![reply("hello")]).unwrap();
        app.use_(middleware_fn(|req, next: Next| async move {
            let mut response = next.run(req).await?;
            response.headers_mut().insert("x-app", http::HeaderValue::from_static("1"));
            Ok(response)
        }));

        let response = app.dispatch(request(Method::GET, "/hello")).await.unwrap();
        assert_eq!(response.headers()["x-app"], "1");

        let response = app.dispatch(request(Method::GET, "/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-app"], "1");
    }

    #[tokio::test]
    async fn test_mounted_app_falls_through() {
        let mut inner = App::new();
        inner.get("/inner", vec![reply("inner")]).unwrap();

        let mut outer = App::new();
        outer.use_(inner);
        outer.get("/outer", vec![reply("outer")]).unwrap();

        let response = outer.dispatch(request(Method::GET, "/inner")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"inner");

        let response = outer.dispatch(request(Method::GET, "/outer")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"outer");
    }

    #[tokio::test]
    async fn test_repeated_registration_continues_chain() {
        let pass = boxed(middleware_fn(|req, next: Next| next.run(req)));

        let mut app = App::new();
        app.get("/a", vec![pass]).unwrap();
        app.get("/a", vec![reply("second")]).unwrap();
        app.get("/a", vec![reply("third")]).unwrap();

        let response = app.dispatch(request(Method::GET, "/a")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"second");
        assert_eq!(app.routes[0].methods.len(), 1);
    }

    #[test]
    fn test_conflicting_route_is_rejected() {
        let mut app = App::new();
        app.get("/users/:id", vec![reply("id")]).unwrap();

        let error = app.get("/users/:name", vec![reply("name")]).unwrap_err();
        assert!(matches!(error, WebError::Register { ref path, .. } if path == "/users/{name}"));

        // the failed registration left the app usable
        app.post("/users/:id", vec![reply("post")]).unwrap();
        assert_eq!(app.routes.len(), 1);
    }
}
