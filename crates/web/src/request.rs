//! Request and response types exchanged by handlers, and the path params extracted by the router.

use bytes::Bytes;
use std::borrow::Cow;

pub type Request = http::Request<Bytes>;
pub type Response = http::Response<Bytes>;

/// Path parameters extracted from the request url by the router.
///
/// The router inserts them into the request extensions before running a route's chain. Values are
/// percent-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: Vec<(String, String)>,
}

impl PathParams {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The params of `req`, if a router put some there.
    pub fn of(req: &Request) -> Option<&PathParams> {
        req.extensions().get::<PathParams>()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Gets the value of a path parameter by its name
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.params.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl From<matchit::Params<'_, '_>> for PathParams {
    fn from(params: matchit::Params<'_, '_>) -> Self {
        let params = params
            .iter()
            .map(|(name, raw)| {
                let value = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
                (name.to_owned(), value.into_owned())
            })
            .collect();
        Self { params }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { params: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_matchit_params_decodes() {
        let mut router = matchit::Router::new();
        router.insert("/hello/{name}/{id}", ()).unwrap();

        let matched = router.at("/hello/brave%20new%20World/7").unwrap();
        let params = PathParams::from(matched.params);

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("name"), Some("brave new World"));
        assert_eq!(params.get("id"), Some("7"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_of_request() {
        let mut req = Request::new(Bytes::new());
        assert!(PathParams::of(&req).is_none());

        req.extensions_mut().insert([("id", "1")].into_iter().collect::<PathParams>());
        assert_eq!(PathParams::of(&req).and_then(|params| params.get("id")), Some("1"));
    }
}
