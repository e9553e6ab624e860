//! Typed route registration.
//!
//! [`TypedRouter`] registers business handlers for the routes of a shared schema on top of a
//! [`Registrar`], the router that actually matches paths and extracts path params. [`App`] is the
//! bundled registrar, built on `matchit`.
//!
//! Handlers follow the middleware model: each [`Handler`] receives the request and a [`Next`]
//! continuation running the rest of the chain. A route's chain is its middlewares, flattened in
//! order, followed by the business handler.
//!
//! # Example
//! ```
//! use micro_route::{ApiSchema, route};
//! use micro_route_web::{App, TypedRequest, server};
//! use serde::{Deserialize, Serialize};
//!
//! pub struct HelloApi;
//! impl ApiSchema for HelloApi {}
//!
//! #[derive(Serialize, Deserialize)]
//! pub struct Greeting {
//!     greeting: String,
//! }
//!
//! route! {
//!     pub struct HelloGet => Get "/hello" for HelloApi {
//!         response: Greeting,
//!     }
//! }
//!
//! let mut router = server::<HelloApi, _>(App::new());
//! router
//!     .get(|_req: TypedRequest<HelloGet>| async { Ok(Greeting { greeting: "Hello World!".into() }) }, vec![])
//!     .unwrap();
//! ```

mod app;
mod error;
mod handler;
mod request;
mod router;
mod typed;

pub use app::App;
pub use app::Registrar;
pub use error::WebError;
pub use handler::BoxError;
pub use handler::BoxHandler;
pub use handler::FnHandler;
pub use handler::FnMiddleware;
pub use handler::Handler;
pub use handler::HandlerResult;
pub use handler::MiddlewareArg;
pub use handler::Next;
pub use handler::boxed;
pub use handler::flatten;
pub use handler::handler_fn;
pub use handler::middleware_fn;
pub use request::PathParams;
pub use request::Request;
pub use request::Response;
pub use router::TypedRouter;
pub use router::server;
pub use typed::Reply;
pub use typed::RouteHandler;
pub use typed::TypedRequest;
