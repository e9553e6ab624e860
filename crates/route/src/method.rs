//! Type-level HTTP methods.
//!
//! Each route names its method as one of these marker types, which lets verb specific entry
//! points such as `get` or `post` only accept routes declared with that verb.

use http::Method;

/// A marker type standing for one HTTP method.
pub trait HttpMethod: Send + Sync + 'static {
    const METHOD: Method;
}

macro_rules! method_marker {
    ($name:ident, $upper_case_method:ident) => {
        #[doc = concat!("Marker for HTTP ", stringify!($upper_case_method), " routes.")]
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl HttpMethod for $name {
            const METHOD: Method = Method::$upper_case_method;
        }
    };
}

method_marker!(Get, GET);
method_marker!(Post, POST);
method_marker!(Put, PUT);
method_marker!(Patch, PATCH);
method_marker!(Delete, DELETE);
method_marker!(Head, HEAD);
method_marker!(Options, OPTIONS);
