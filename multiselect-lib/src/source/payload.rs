//! Response body shapes accepted from option endpoints.

use serde::Deserialize;

use crate::error::FetchError;
use crate::model::SelectOption;

/// A decoded option response.
///
/// Endpoints answer either with a bare JSON array of options or with an
/// object whose `data` field holds the array. Paging metadata in the envelope
/// is kept for diagnostics only.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionsPayload {
    /// `[{"id": ..., "label": ...}, ...]`
    Bare(Vec<SelectOption>),
    /// `{"data": [...], "total": 42, "page": 1, "limit": 10}`
    Envelope {
        #[serde(default)]
        data: Vec<SelectOption>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u64>,
        #[serde(default)]
        limit: Option<u64>,
    },
}

impl OptionsPayload {
    /// Decodes a response body.
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        serde_json::from_str(body).map_err(|e| FetchError::parse_with_body(e.to_string(), body))
    }

    /// Consumes the payload, returning the options in response order.
    pub fn into_options(self) -> Vec<SelectOption> {
        match self {
            Self::Bare(options) => options,
            Self::Envelope {
                data,
                total,
                page,
                limit,
            } => {
                if total.is_some() || page.is_some() || limit.is_some() {
                    log::debug!(
                        "Option envelope: {} items total={:?} page={:?} limit={:?}",
                        data.len(),
                        total,
                        page,
                        limit
                    );
                }
                data
            }
        }
    }
}
