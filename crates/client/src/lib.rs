//! Typed http client facade.
//!
//! [`TypedClient`] wraps a [`Transport`] (the component actually sending requests) and runs every
//! call, whatever the entry point, through the same resolution step: path placeholders are
//! substituted from `params`, and `query` is serialized onto the url. The transport's result is
//! returned as is.
//!
//! The typed entry points ([`TypedClient::call`] and the `*_route` verbs) take a route type from
//! the shared schema, so params, query, body and response shapes are checked at compile time.

mod client;
mod config;
mod error;
mod reqwest_transport;
mod transport;
mod typed;

pub use client::TypedClient;
pub use config::ClientOptions;
pub use config::RequestConfig;
pub use error::ClientError;
pub use reqwest_transport::ReqwestTransport;
pub use reqwest_transport::client;
pub use transport::Transport;
pub use transport::TransportError;
pub use typed::TypedRequest;
pub use typed::TypedResponse;
