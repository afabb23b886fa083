//! Remote option source against a local HTTP server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use multiselect_lib::error::FetchError;
use multiselect_lib::source::{OptionSource, OriginResolver, RemoteSource};
use multiselect_lib::{EndpointConfig, HttpMethod, OptionId, SelectorConfig, SelectorWidget};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    uri: String,
    content_type: Option<String>,
    api_key: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

async fn respond(req: Request<Incoming>, log: Log) -> Result<Response<Full<Bytes>>, Infallible> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let content_type = header("content-type");
    let api_key = header("x-api-key");
    let path = req.uri().path().to_string();
    let body = req
        .into_body()
        .collect()
        .await
        .map(|collected| String::from_utf8_lossy(&collected.to_bytes()).into_owned())
        .unwrap_or_default();

    log.lock().unwrap().push(Recorded {
        method,
        uri,
        content_type,
        api_key,
        body,
    });

    let (status, body) = match path.as_str() {
        "/users" => (
            StatusCode::OK,
            r#"[{"id": 1, "label": "Ada Lovelace", "email": "ada@example.com"},
                {"id": 2, "label": "Alan Turing"}]"#,
        ),
        "/paged" => (
            StatusCode::OK,
            r#"{"data": [{"id": "t-1", "label": "rust"}], "total": 40, "page": 1, "limit": 1}"#,
        ),
        "/empty" => (StatusCode::OK, "[]"),
        "/garbage" => (StatusCode::OK, "not json"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom"),
    };

    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap())
}

async fn start_server() -> (SocketAddr, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::default();

    let server_log = log.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let io = TokioIo::new(stream);
            let log = server_log.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| respond(req, log.clone()));
                let _ = http1::Builder::new().serve_connection(io, service).await;
            });
        }
    });

    (addr, log)
}

#[tokio::test]
async fn test_bare_array_response() {
    let (addr, log) = start_server().await;
    let source = RemoteSource::new(EndpointConfig::new(format!("http://{}/users", addr)));

    let options = source.fetch(None).await.unwrap();

    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, "Ada Lovelace");
    assert_eq!(
        options[0].field("email").and_then(|v| v.as_str()),
        Some("ada@example.com")
    );

    let recorded = log.lock().unwrap()[0].clone();
    assert_eq!(recorded.method, "GET");
    assert_eq!(recorded.uri, "/users");
    assert_eq!(recorded.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_envelope_response() {
    let (addr, _log) = start_server().await;
    let source = RemoteSource::new(EndpointConfig::new(format!("http://{}/paged", addr)));

    let options = source.fetch(Some("ru")).await.unwrap();

    assert_eq!(options.len(), 1);
    assert_eq!(options[0].id, OptionId::Text("t-1".to_string()));
}

#[tokio::test]
async fn test_search_and_params_in_query() {
    let (addr, log) = start_server().await;
    let endpoint = EndpointConfig::new(format!("http://{}/users", addr))
        .with_param("limit", 10)
        .with_header("X-Api-Key", "secret");
    let source = RemoteSource::new(endpoint).with_min_search_length(2);

    source.fetch(Some("a")).await.unwrap();
    source.fetch(Some("ada lo")).await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[0].uri, "/users?limit=10");
    assert_eq!(log[1].uri, "/users?search=ada+lo&limit=10");
    assert_eq!(log[1].api_key.as_deref(), Some("secret"));
}

#[tokio::test]
async fn test_post_sends_params_as_json() {
    let (addr, log) = start_server().await;
    let endpoint = EndpointConfig::new(format!("http://{}/users", addr))
        .with_method(HttpMethod::Post)
        .with_param("team", "core");
    let source = RemoteSource::new(endpoint);

    source.fetch(Some("al")).await.unwrap();

    let recorded = log.lock().unwrap()[0].clone();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.uri, "/users?search=al&team=core");
    assert_eq!(recorded.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&recorded.body).unwrap();
    assert_eq!(body, serde_json::json!({"team": "core"}));
}

#[tokio::test]
async fn test_configured_content_type_wins() {
    let (addr, log) = start_server().await;
    let endpoint = EndpointConfig::new(format!("http://{}/users", addr))
        .with_header("Content-Type", "application/vnd.api+json");

    RemoteSource::new(endpoint).fetch(None).await.unwrap();

    assert_eq!(
        log.lock().unwrap()[0].content_type.as_deref(),
        Some("application/vnd.api+json")
    );
}

#[tokio::test]
async fn test_server_error() {
    let (addr, _log) = start_server().await;
    let source = RemoteSource::new(EndpointConfig::new(format!("http://{}/broken", addr)));

    let err = source.fetch(None).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert!(matches!(err, FetchError::Http { ref body, .. } if body == "boom"));
}

#[tokio::test]
async fn test_unparseable_body() {
    let (addr, _log) = start_server().await;
    let source = RemoteSource::new(EndpointConfig::new(format!("http://{}/garbage", addr)));

    let err = source.fetch(None).await.unwrap_err();

    assert!(matches!(err, FetchError::Parse { body: Some(ref body), .. } if body == "not json"));
}

#[tokio::test]
async fn test_relative_url_with_origin() {
    let (addr, log) = start_server().await;
    let resolver = OriginResolver::new(&format!("http://{}", addr)).unwrap();
    let source = RemoteSource::new(EndpointConfig::new("/users")).with_resolver(resolver);

    assert_eq!(source.fetch(None).await.unwrap().len(), 2);
    assert_eq!(log.lock().unwrap()[0].uri, "/users");
}

#[tokio::test]
async fn test_widget_empty_response_clears_pool() {
    let (addr, _log) = start_server().await;
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .endpoint(EndpointConfig::new(format!("http://{}/empty", addr)))
        .build();

    widget.mount().await.unwrap();

    assert!(widget.pool().is_empty());
    assert!(!widget.is_loading());
    assert!(widget.view().options.is_empty());
}

#[tokio::test]
async fn test_widget_server_error_yields_empty_pool() {
    let (addr, _log) = start_server().await;
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .endpoint(EndpointConfig::new(format!("http://{}/broken", addr)))
        .build();

    assert!(widget.fetch_options(Some("ada")).await.is_empty());
    assert!(!widget.is_loading());
}
