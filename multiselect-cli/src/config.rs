//! Demo configuration file.

use std::path::Path;

use serde::Deserialize;

use multiselect_lib::{EndpointConfig, SelectOption, SelectorConfig};

use crate::error::DemoError;

/// Origin relative endpoints resolve against when none is configured.
pub const DEFAULT_ORIGIN: &str = "https://example.com";

/// Everything the demo needs to build a widget.
///
/// ```json
/// {
///   "endpoint": { "url": "https://jsonplaceholder.typicode.com/users" },
///   "selector": { "label": "Select Users", "max_selections": 3 }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Remote option source. Takes precedence over `options`.
    pub endpoint: Option<EndpointConfig>,
    /// Static option list used when no endpoint is set.
    pub options: Vec<SelectOption>,
    /// Origin for relative endpoint URLs.
    pub origin: Option<String>,
    /// Widget settings.
    pub selector: SelectorConfig,
}

impl DemoConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DemoError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| DemoError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Built-in fruit list for running without a config file.
    pub fn sample() -> Self {
        let options = ["Apple", "Apricot", "Banana", "Blueberry", "Cherry", "Grape"]
            .iter()
            .enumerate()
            .map(|(i, label)| SelectOption::new(i as i64 + 1, *label))
            .collect();
        Self {
            options,
            selector: SelectorConfig::default().with_label("Fruits"),
            ..Default::default()
        }
    }

    /// Origin for relative URLs.
    pub fn origin(&self) -> &str {
        self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN)
    }
}
