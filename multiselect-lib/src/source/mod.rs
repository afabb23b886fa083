//! Option sources
//!
//! An [`OptionSource`] resolves the candidate list for a selector, either from
//! a fixed in-memory list ([`StaticSource`]) or from a lookup endpoint
//! ([`RemoteSource`]).

mod payload;
mod remote;
mod resolver;

pub use payload::OptionsPayload;
pub use remote::RemoteSource;
pub use resolver::{AbsoluteOnly, BaseUrlResolver, OriginResolver};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::SelectOption;

/// Resolves the options a selector can offer.
///
/// The widget calls [`fetch`](Self::fetch) once on mount with no search term
/// and again after every debounced search. Errors are logged by the widget
/// and degrade to an empty pool.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use multiselect_lib::source::OptionSource;
///
/// struct Countries;
///
/// #[async_trait]
/// impl OptionSource for Countries {
///     async fn fetch(&self, search: Option<&str>) -> Result<Vec<SelectOption>, FetchError> {
///         let all = load_countries().await;
///         Ok(match search {
///             Some(term) => all.into_iter().filter(|c| c.label.contains(term)).collect(),
///             None => all,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Fetch the options matching `search`, or all options for `None`.
    async fn fetch(&self, search: Option<&str>) -> Result<Vec<SelectOption>, FetchError>;
}

/// A fixed list of options.
///
/// The search term is ignored; local filtering narrows the list for display.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    options: Vec<SelectOption>,
}

impl StaticSource {
    /// Creates a source returning `options` unchanged.
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self { options }
    }

    /// The options this source returns.
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }
}

#[async_trait]
impl OptionSource for StaticSource {
    async fn fetch(&self, _search: Option<&str>) -> Result<Vec<SelectOption>, FetchError> {
        Ok(self.options.clone())
    }
}
