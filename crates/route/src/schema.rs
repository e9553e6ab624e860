//! The route schema: one type per api, one type per (path, method) pair.

use crate::method::HttpMethod;
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Marker implemented by the type naming an api.
///
/// Clients and routers are parameterized by an api, and only accept routes declaring it.
pub trait ApiSchema: Send + Sync + 'static {}

/// A route of an api: a path template, a method and the shapes exchanged on it.
///
/// `()` is the conventional shape for "nothing": it serializes to `null`, which is read as no
/// params, no query or no body. Use the [`route!`](crate::route) macro rather than implementing
/// this by hand.
pub trait Route: Send + Sync + 'static {
    type Api: ApiSchema;
    type Method: HttpMethod;

    /// Path template, with `/:name` placeholders
    const PATH: &'static str;

    type Params: Serialize + DeserializeOwned + Send + 'static;
    type Query: Serialize + DeserializeOwned + Send + 'static;
    type Body: Serialize + DeserializeOwned + Send + 'static;
    type Response: Serialize + DeserializeOwned + Send + 'static;

    #[inline]
    fn method() -> Method {
        <Self::Method as HttpMethod>::METHOD
    }
}

/// Declares a route type.
///
/// `params`, `query` and `body` may be omitted and default to `()`; `response` is required.
/// The method is one of the markers in [`method`](crate::method).
///
/// ```
/// use micro_route::{ApiSchema, Route, route};
///
/// pub struct OrdersApi;
/// impl ApiSchema for OrdersApi {}
///
/// route! {
///     /// Lists the orders of a customer
///     pub struct ListOrders => Get "/customers/:id/orders" for OrdersApi {
///         params: std::collections::HashMap<String, String>,
///         response: Vec<String>,
///     }
/// }
///
/// assert_eq!(ListOrders::method(), http::Method::GET);
/// ```
#[macro_export]
macro_rules! route {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $method:ident $path:literal for $api:ty {
            $(params: $params:ty,)?
            $(query: $query:ty,)?
            $(body: $body:ty,)?
            response: $response:ty $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy)]
        $vis struct $name;

        impl $crate::Route for $name {
            type Api = $api;
            type Method = $crate::method::$method;

            const PATH: &'static str = $path;

            type Params = $crate::route!(@shape $($params)?);
            type Query = $crate::route!(@shape $($query)?);
            type Body = $crate::route!(@shape $($body)?);
            type Response = $response;
        }
    };
    (@shape) => { () };
    (@shape $shape:ty) => { $shape };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct TestApi;
    impl ApiSchema for TestApi {}

    #[derive(Serialize, Deserialize)]
    struct Greeting {
        greeting: String,
    }

    #[derive(Serialize, Deserialize)]
    struct NameParams {
        name: String,
    }

    #[derive(Serialize, Deserialize)]
    struct NameBody {
        name: Option<String>,
    }

    route! {
        struct HelloGet => Get "/hello" for TestApi {
            response: Greeting,
        }
    }

    route! {
        struct HelloPost => Post "/hello" for TestApi {
            body: NameBody,
            response: Greeting,
        }
    }

    route! {
        struct HelloNamePost => Post "/hello/:name" for TestApi {
            params: NameParams,
            response: Greeting
        }
    }

    fn assert_unit<T: 'static>() {
        assert_eq!(std::any::TypeId::of::<T>(), std::any::TypeId::of::<()>());
    }

    #[test]
    fn test_route_constants() {
        assert_eq!(HelloGet::PATH, "/hello");
        assert_eq!(HelloGet::method(), Method::GET);
        assert_eq!(HelloPost::method(), Method::POST);
        assert_eq!(HelloNamePost::PATH, "/hello/:name");
    }

    #[test]
    fn test_omitted_shapes_default_to_unit() {
        assert_unit::<<HelloGet as Route>::Params>();
        assert_unit::<<HelloGet as Route>::Query>();
        assert_unit::<<HelloGet as Route>::Body>();
        assert_unit::<<HelloPost as Route>::Params>();
        assert_unit::<<HelloNamePost as Route>::Body>();
    }
}
