//! Base URL resolution for relative endpoints.

use url::Url;

use crate::error::FetchError;

/// Turns a configured endpoint into an absolute URL.
///
/// Hosts embedding the widget in a page resolve relative paths against their
/// own origin; other hosts can refuse them.
pub trait BaseUrlResolver: Send + Sync {
    /// Resolve `endpoint` to an absolute URL.
    fn resolve(&self, endpoint: &str) -> Result<Url, FetchError>;
}

impl<T: BaseUrlResolver + ?Sized> BaseUrlResolver for std::sync::Arc<T> {
    fn resolve(&self, endpoint: &str) -> Result<Url, FetchError> {
        (**self).resolve(endpoint)
    }
}

/// Accepts absolute URLs only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteOnly;

impl BaseUrlResolver for AbsoluteOnly {
    fn resolve(&self, endpoint: &str) -> Result<Url, FetchError> {
        Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", endpoint, e)))
    }
}

/// Resolves relative endpoints against a fixed origin.
///
/// Endpoints that already parse as absolute URLs are used as-is.
///
/// # Example
///
/// ```
/// use multiselect_lib::source::{BaseUrlResolver, OriginResolver};
///
/// let resolver = OriginResolver::new("https://app.example.com").unwrap();
/// let url = resolver.resolve("/api/options").unwrap();
/// assert_eq!(url.as_str(), "https://app.example.com/api/options");
/// ```
#[derive(Debug, Clone)]
pub struct OriginResolver {
    origin: Url,
}

impl OriginResolver {
    /// Creates a resolver for `origin`.
    pub fn new(origin: &str) -> Result<Self, FetchError> {
        let origin =
            Url::parse(origin).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", origin, e)))?;
        Ok(Self { origin })
    }

    /// The origin relative endpoints are joined to.
    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

impl BaseUrlResolver for OriginResolver {
    fn resolve(&self, endpoint: &str) -> Result<Url, FetchError> {
        if let Ok(url) = Url::parse(endpoint) {
            return Ok(url);
        }
        self.origin
            .join(endpoint)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", endpoint, e)))
    }
}
