use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Response, StatusCode};
use micro_route::{ApiSchema, route};
use micro_route_client::{RequestConfig, Transport, TransportError, TypedClient};
use micro_route_web::{App, TypedRequest, TypedRouter, server};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

struct HelloApi;
impl ApiSchema for HelloApi {}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Greeting {
    greeting: String,
}

#[derive(Serialize, Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Serialize, Deserialize)]
struct NameParams {
    name: String,
}

#[derive(Serialize, Deserialize, Default)]
struct Shout {
    #[serde(skip_serializing_if = "Option::is_none")]
    loud: Option<bool>,
}

route! {
    struct HelloGet => Get "/hello" for HelloApi {
        query: Shout,
        response: Greeting,
    }
}

route! {
    struct HelloPost => Post "/hello" for HelloApi {
        body: Option<NameBody>,
        response: Greeting,
    }
}

route! {
    struct HelloNamePost => Post "/hello/:name" for HelloApi {
        params: NameParams,
        response: Greeting,
    }
}

/// Hands every request to an in-process app instead of the network.
#[derive(Clone)]
struct InProcess {
    app: Arc<App>,
}

#[async_trait]
impl Transport for InProcess {
    async fn request(&self, config: RequestConfig) -> Result<Response<Bytes>, TransportError> {
        let url = config.full_url().ok_or("request has no url")?;
        let mut builder = http::Request::builder().method(config.method.unwrap_or(Method::GET)).uri(url);
        for (name, value) in &config.headers {
            builder = builder.header(name, value);
        }
        let req = builder.body(config.body.unwrap_or_default())?;
        self.app.dispatch(req).await
    }
}

fn greeting(name: &str) -> Greeting {
    Greeting { greeting: format!("Hello {name}!") }
}

fn hello_server() -> TypedRouter<HelloApi> {
    let mut router: TypedRouter<HelloApi> = server(App::new());
    router
        .get(
            |req: TypedRequest<HelloGet>| async move {
                let shout = req.query()?.loud.unwrap_or_default();
                Ok(if shout { greeting("WORLD") } else { greeting("World") })
            },
            vec![],
        )
        .unwrap()
        .post(
            |req: TypedRequest<HelloPost>| async move {
                let body = req.body()?;
                Ok(greeting(body.as_ref().map_or("World", |body| body.name.as_str())))
            },
            vec![],
        )
        .unwrap()
        .post(
            |req: TypedRequest<HelloNamePost>| async move {
                let params = req.params()?;
                Ok(greeting(&params.name))
            },
            vec![],
        )
        .unwrap();
    router
}

fn hello_client() -> TypedClient<HelloApi, InProcess> {
    TypedClient::new(InProcess { app: Arc::new(hello_server().into_inner()) })
}

#[tokio::test]
async fn typed_calls_reach_typed_handlers() {
    let client = hello_client();

    let response =
        client.get_route(micro_route_client::TypedRequest::<HelloGet>::new((), Shout::default(), ())).await.unwrap();
    assert_eq!(response.data().unwrap(), greeting("World"));

    let response = client
        .get_route(micro_route_client::TypedRequest::<HelloGet>::new((), Shout { loud: Some(true) }, ()))
        .await
        .unwrap();
    assert_eq!(response.data().unwrap(), greeting("WORLD"));

    let response = client.post_route(micro_route_client::TypedRequest::<HelloPost>::new((), (), None)).await.unwrap();
    assert_eq!(response.data().unwrap(), greeting("World"));

    let body = Some(NameBody { name: "Jane".into() });
    let response = client.post_route(micro_route_client::TypedRequest::<HelloPost>::new((), (), body)).await.unwrap();
    assert_eq!(response.data().unwrap(), greeting("Jane"));

    let params = NameParams { name: "brave new World".into() };
    let response =
        client.post_route(micro_route_client::TypedRequest::<HelloNamePost>::new(params, (), ())).await.unwrap();
    assert_eq!(response.data().unwrap(), greeting("brave new World"));
}

#[tokio::test]
async fn untyped_verbs_resolve_templates() {
    let client = hello_client();

    let config = RequestConfig::new().with_param("name", "brave new World");
    let response = client.post("/hello/:name", &(), config).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), br#"{"greeting":"Hello brave new World!"}"#);

    let response = client.get("/nowhere", RequestConfig::new()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
