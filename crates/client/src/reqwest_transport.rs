use crate::client::TypedClient;
use crate::config::RequestConfig;
use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Response};
use micro_route::{ApiSchema, stringify};
use tracing::trace;

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// Parameters left in `params` after path substitution are sent as standard, percent-encoded
/// query pairs. Non-success statuses are returned as regular responses.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// The default client of an api: a reqwest transport and empty defaults.
pub fn client<A: ApiSchema>() -> TypedClient<A, ReqwestTransport> {
    TypedClient::new(ReqwestTransport::new())
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, config: RequestConfig) -> Result<Response<Bytes>, TransportError> {
        let url = config.full_url().ok_or("request has no url")?;
        let method = config.method.clone().unwrap_or(Method::GET);
        trace!(%method, %url, "reqwest send");

        let mut builder = self.client.request(method, url).headers(config.headers);

        if let Some(params) = config.params.filter(|params| !params.is_empty()) {
            let pairs = params.iter().map(|(key, value)| (key.as_str(), stringify(value))).collect::<Vec<_>>();
            builder = builder.query(&pairs);
        }
        if let Some(body) = config.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let version = resp.version();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.version_mut() = version;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use micro_route::ParamMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_remainder_params_follow_resolved_query() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = 0;
            loop {
                let n = stream.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || buf[..read].windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            stream.write_all(b"HTTP/1.1 204 No Content\r\ncontent-length: 0\r\n\r\n").await.unwrap();
            String::from_utf8_lossy(&buf[..read]).lines().next().unwrap_or_default().to_owned()
        });

        let mut params = ParamMap::new();
        params.insert("lang".into(), "en".into());
        let config =
            RequestConfig::new().with_base_url(format!("http://{addr}")).with_url("/hello/X?a=1").with_params(params);

        let transport = ReqwestTransport::from_client(reqwest::Client::builder().no_proxy().build().unwrap());
        let response = transport.request(config).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(server.await.unwrap(), "GET /hello/X?a=1&lang=en HTTP/1.1");
    }

    #[tokio::test]
    async fn test_missing_url_is_an_error() {
        let transport = ReqwestTransport::new();
        let error = transport.request(RequestConfig::new()).await.unwrap_err();
        assert_eq!(error.to_string(), "request has no url");
    }
}
