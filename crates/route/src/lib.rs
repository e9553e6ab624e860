//! Shared route contract for typed HTTP clients and servers.
//!
//! A route is declared once, as a type implementing [`Route`], and carries its path template,
//! its HTTP method and the shapes of its path params, query, body and response. Both the client
//! facade and the server router are generic over that type, so a call or a registration that
//! disagrees with the declared shapes does not compile.
//!
//! This crate also holds the two pure algorithms every client call runs before it is sent:
//! - [`substitute`]: replace `/:name` placeholders of a path template with values from a
//!   parameter map, returning the resolved url and the unconsumed parameters
//! - [`serialize`]: turn a query map into a `k1=v1&k2=v2` fragment
//!
//! # Example
//! ```
//! use micro_route::{ApiSchema, ParamMap, Route, route, substitute};
//! use serde::{Deserialize, Serialize};
//!
//! pub struct HelloApi;
//! impl ApiSchema for HelloApi {}
//!
//! #[derive(Serialize, Deserialize)]
//! pub struct NameParams {
//!     name: String,
//! }
//!
//! #[derive(Serialize, Deserialize)]
//! pub struct Greeting {
//!     greeting: String,
//! }
//!
//! route! {
//!     pub struct HelloName => Post "/hello/:name" for HelloApi {
//!         params: NameParams,
//!         response: Greeting,
//!     }
//! }
//!
//! assert_eq!(HelloName::PATH, "/hello/:name");
//!
//! let mut params = ParamMap::new();
//! params.insert("name".into(), "brave new World".into());
//! let substitution = substitute(HelloName::PATH, &params).unwrap();
//! assert_eq!(substitution.url(), "/hello/brave%20new%20World");
//! ```

mod error;
mod path;
mod query;
mod resolve;
mod schema;
mod value;

pub mod method;

pub use error::RouteError;
pub use method::HttpMethod;
pub use path::PathTemplate;
pub use path::Substitution;
pub use path::substitute;
pub use query::QueryEncoding;
pub use query::append_query;
pub use query::serialize;
pub use query::serialize_with;
pub use resolve::ResolveOptions;
pub use resolve::Resolved;
pub use resolve::resolve;
pub use schema::ApiSchema;
pub use schema::Route;
pub use value::is_truthy;
pub use value::stringify;
pub use value::to_param_map;

/// Ordered mapping from parameter name to value.
///
/// Iteration follows insertion order, which is what keeps query strings deterministic.
pub type ParamMap = serde_json::Map<String, serde_json::Value>;
