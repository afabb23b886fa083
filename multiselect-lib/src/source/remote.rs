//! Remote option lookup over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

use super::{AbsoluteOnly, BaseUrlResolver, OptionSource, OptionsPayload};
use crate::config::{EndpointConfig, HttpMethod};
use crate::error::FetchError;
use crate::model::SelectOption;

/// Name of the query parameter carrying the search term.
pub const SEARCH_PARAM: &str = "search";

/// Fetches options from a lookup endpoint.
///
/// Cheap to clone. The query string is the endpoint's static parameters plus
/// `search=<term>` once the term reaches the minimum length; `POST` requests
/// also carry the static parameters as a JSON body.
///
/// # Example
///
/// ```ignore
/// use multiselect_lib::EndpointConfig;
/// use multiselect_lib::source::{OptionSource, OriginResolver, RemoteSource};
///
/// let source = RemoteSource::new(EndpointConfig::new("/api/users"))
///     .with_resolver(OriginResolver::new("https://app.example.com")?)
///     .with_min_search_length(2);
///
/// let users = source.fetch(Some("ad")).await?;
/// ```
#[derive(Clone)]
pub struct RemoteSource {
    inner: Arc<RemoteSourceInner>,
}

#[derive(Clone)]
struct RemoteSourceInner {
    endpoint: EndpointConfig,
    min_search_length: usize,
    resolver: Arc<dyn BaseUrlResolver>,
    http_client: Client,
}

impl RemoteSource {
    /// Creates a source for `endpoint` that accepts absolute URLs only.
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            inner: Arc::new(RemoteSourceInner {
                endpoint,
                min_search_length: 0,
                resolver: Arc::new(AbsoluteOnly),
                http_client: Client::new(),
            }),
        }
    }

    /// Sets the resolver used for relative endpoints.
    pub fn with_resolver(self, resolver: impl BaseUrlResolver + 'static) -> Self {
        self.rebuild(|inner| inner.resolver = Arc::new(resolver))
    }

    /// Sets the minimum length a term needs to be sent as `search`.
    pub fn with_min_search_length(self, length: usize) -> Self {
        self.rebuild(|inner| inner.min_search_length = length)
    }

    /// Uses a preconfigured HTTP client.
    pub fn with_http_client(self, client: Client) -> Self {
        self.rebuild(|inner| inner.http_client = client)
    }

    /// The endpoint this source queries.
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.inner.endpoint
    }

    fn rebuild(self, f: impl FnOnce(&mut RemoteSourceInner)) -> Self {
        let mut inner = Arc::unwrap_or_clone(self.inner);
        f(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Builds the request URL for `search`.
    pub fn request_url(&self, search: Option<&str>) -> Result<Url, FetchError> {
        let inner = &self.inner;
        let mut url = inner.resolver.resolve(&inner.endpoint.url)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(term) = search
                && !term.is_empty()
                && term.chars().count() >= inner.min_search_length
            {
                query.append_pair(SEARCH_PARAM, term);
            }
            for (key, value) in &inner.endpoint.params {
                query.append_pair(key, &param_to_string(value));
            }
        }
        // query_pairs_mut leaves a dangling `?` when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// JSON content type, overridden by any configured header of the same name.
    fn request_headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.inner.endpoint.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl OptionSource for RemoteSource {
    async fn fetch(&self, search: Option<&str>) -> Result<Vec<SelectOption>, FetchError> {
        let inner = &self.inner;
        let url = self.request_url(search)?;

        log::debug!("Fetching options: {} {}", inner.endpoint.method.as_reqwest(), url);

        let mut request = inner
            .http_client
            .request(inner.endpoint.method.as_reqwest(), url)
            .headers(self.request_headers()?);

        if inner.endpoint.method == HttpMethod::Post {
            request = request.json(&inner.endpoint.params);
        }

        if let Some(timeout) = inner.endpoint.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http(status, body));
        }

        let body = response.text().await?;
        Ok(OptionsPayload::parse(&body)?.into_options())
    }
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("endpoint", &self.inner.endpoint)
            .field("min_search_length", &self.inner.min_search_length)
            .finish_non_exhaustive()
    }
}

/// Renders a static parameter the way it appears in a query string.
fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(param_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::OriginResolver;

    fn source(endpoint: EndpointConfig) -> RemoteSource {
        RemoteSource::new(endpoint)
    }

    #[test]
    fn test_url_without_search() {
        let source = source(EndpointConfig::new("https://api.example.com/options"));
        assert_eq!(
            source.request_url(None).unwrap().as_str(),
            "https://api.example.com/options"
        );
    }

    #[test]
    fn test_search_param_then_static_params() {
        let source = source(
            EndpointConfig::new("https://api.example.com/options")
                .with_param("limit", 10)
                .with_param("type", "user"),
        );
        assert_eq!(
            source.request_url(Some("ada lo")).unwrap().as_str(),
            "https://api.example.com/options?search=ada+lo&limit=10&type=user"
        );
    }

    #[test]
    fn test_short_search_is_not_sent() {
        let source =
            source(EndpointConfig::new("https://api.example.com/options")).with_min_search_length(3);
        assert_eq!(source.request_url(Some("ab")).unwrap().query(), None);
        assert_eq!(
            source.request_url(Some("abc")).unwrap().query(),
            Some("search=abc")
        );
    }

    #[test]
    fn test_empty_search_is_not_sent() {
        let source = source(EndpointConfig::new("https://api.example.com/options"));
        assert_eq!(source.request_url(Some("")).unwrap().query(), None);
    }

    #[test]
    fn test_relative_endpoint_needs_resolver() {
        let relative = source(EndpointConfig::new("/api/options"));
        assert!(matches!(
            relative.request_url(None),
            Err(FetchError::InvalidUrl(_))
        ));

        let resolved = relative.with_resolver(OriginResolver::new("https://example.com").unwrap());
        assert_eq!(
            resolved.request_url(None).unwrap().as_str(),
            "https://example.com/api/options"
        );
    }

    #[test]
    fn test_configured_headers_override_content_type() {
        let source = source(
            EndpointConfig::new("https://api.example.com/options")
                .with_header("Content-Type", "application/vnd.api+json")
                .with_header("X-Tenant", "acme"),
        );
        let headers = source.request_headers().unwrap();
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers[CONTENT_TYPE], "application/vnd.api+json");
        assert_eq!(headers["x-tenant"], "acme");
    }

    #[test]
    fn test_invalid_header_is_reported() {
        let source = source(
            EndpointConfig::new("https://api.example.com/options").with_header("bad header", "x"),
        );
        assert!(matches!(
            source.request_headers(),
            Err(FetchError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_param_rendering() {
        assert_eq!(param_to_string(&Value::from("x")), "x");
        assert_eq!(param_to_string(&Value::from(true)), "true");
        assert_eq!(param_to_string(&serde_json::json!([1, "a"])), "1,a");
        assert_eq!(param_to_string(&Value::Null), "null");
    }
}
