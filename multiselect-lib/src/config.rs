//! Widget and endpoint configuration

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::SelectOption;

/// HTTP method used to query the option endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`, parameters in the query string only.
    #[default]
    Get,
    /// `POST`, parameters in the query string and as a JSON body.
    Post,
}

impl HttpMethod {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
        }
    }
}

/// Where and how to fetch options.
///
/// # Example
///
/// ```
/// use multiselect_lib::{EndpointConfig, HttpMethod};
///
/// let endpoint = EndpointConfig::new("https://api.example.com/users")
///     .with_method(HttpMethod::Post)
///     .with_header("Authorization", "Bearer token")
///     .with_param("active", true);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Absolute URL, or a path resolved through a
    /// [`BaseUrlResolver`](crate::source::BaseUrlResolver).
    pub url: String,
    /// Request method.
    pub method: HttpMethod,
    /// Extra request headers. These override the JSON content-type default.
    pub headers: BTreeMap<String, String>,
    /// Static parameters sent with every request.
    pub params: Map<String, Value>,
    /// Per-request timeout.
    #[serde(with = "optional_millis", rename = "timeout_ms")]
    pub timeout: Option<Duration>,
}

impl EndpointConfig {
    /// Creates an endpoint config for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the request method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a static parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Visual size of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeVariant {
    #[serde(alias = "sm")]
    Small,
    #[default]
    #[serde(alias = "md")]
    Medium,
    #[serde(alias = "lg")]
    Large,
}

impl SizeVariant {
    /// Short name used by renderers (`sm`, `md`, `lg`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "sm",
            Self::Medium => "md",
            Self::Large => "lg",
        }
    }
}

/// Default quiet period before a search is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Behavior and presentation settings for a selector.
///
/// Fixed for the lifetime of a widget. Per-render inputs such as the
/// controlled value and validation state live in [`HostProps`].
///
/// # Example
///
/// ```
/// use multiselect_lib::{SelectorConfig, SizeVariant};
///
/// let config = SelectorConfig::default()
///     .with_label("Select Users")
///     .with_max_selections(3)
///     .with_add_new_prefix("Add new user: ")
///     .with_size(SizeVariant::Small);
/// assert_eq!(config.min_search_length, 0);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Input placeholder.
    ///
    /// Default: `"Select options..."`
    pub placeholder: String,
    /// Field label shown above the input.
    pub label: Option<String>,
    /// Show the required marker next to the label.
    pub required: bool,
    /// Ignore user intents.
    pub disabled: bool,

    /// Send search terms to the option source.
    ///
    /// Default: `true`
    pub search_enabled: bool,
    /// Placeholder while searching, falls back to `placeholder`.
    pub search_placeholder: Option<String>,
    /// Minimum number of characters before a search is sent.
    pub min_search_length: usize,
    /// Quiet period before a search is sent.
    ///
    /// Default: 300 ms
    #[serde(with = "millis", rename = "debounce_ms")]
    pub debounce: Duration,

    /// Offer to create items that are not in the pool.
    ///
    /// Default: `true`
    pub allow_add_new: bool,
    /// Prefix of the "add new" prompt.
    ///
    /// Default: `"Add new: "`
    pub add_new_prefix: String,

    /// Allow more than one selected item.
    ///
    /// Default: `true`
    pub multiple: bool,
    /// Upper bound on the number of selected items. `0` means no limit.
    pub max_selections: Option<usize>,

    /// Show a button clearing the selection.
    ///
    /// Default: `true`
    pub clear_button: bool,
    /// Visual size.
    pub size: SizeVariant,

    /// Initial selection when no controlled value is supplied.
    pub default_value: Vec<SelectOption>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            placeholder: "Select options...".to_string(),
            label: None,
            required: false,
            disabled: false,
            search_enabled: true,
            search_placeholder: None,
            min_search_length: 0,
            debounce: DEFAULT_DEBOUNCE,
            allow_add_new: true,
            add_new_prefix: "Add new: ".to_string(),
            multiple: true,
            max_selections: None,
            clear_button: true,
            size: SizeVariant::Medium,
            default_value: Vec::new(),
        }
    }
}

impl SelectorConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the field label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks the field as required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Disables the widget.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Enables or disables remote search.
    pub fn with_search_enabled(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }

    /// Sets the search placeholder.
    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = Some(placeholder.into());
        self
    }

    /// Sets the minimum search length.
    pub fn with_min_search_length(mut self, length: usize) -> Self {
        self.min_search_length = length;
        self
    }

    /// Sets the debounce quiet period.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Enables or disables the add-new flow.
    pub fn with_allow_add_new(mut self, allow: bool) -> Self {
        self.allow_add_new = allow;
        self
    }

    /// Sets the add-new prompt prefix.
    pub fn with_add_new_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.add_new_prefix = prefix.into();
        self
    }

    /// Switches between multi and single selection.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Sets the maximum number of selected items.
    pub fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = Some(max);
        self
    }

    /// Shows or hides the clear button.
    pub fn with_clear_button(mut self, clear_button: bool) -> Self {
        self.clear_button = clear_button;
        self
    }

    /// Sets the size variant.
    pub fn with_size(mut self, size: SizeVariant) -> Self {
        self.size = size;
        self
    }

    /// Sets the initial selection.
    pub fn with_default_value(mut self, value: Vec<SelectOption>) -> Self {
        self.default_value = value;
        self
    }

    /// Effective upper bound on selected items.
    ///
    /// Single-selection mode caps the selection at one item. A maximum of
    /// zero is treated as unset.
    pub fn selection_limit(&self) -> Option<usize> {
        if self.multiple {
            self.max_selections.filter(|&max| max > 0)
        } else {
            Some(1)
        }
    }
}

/// Inputs the host supplies on every render.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostProps {
    /// Controlled selection. Empty means uncontrolled.
    pub value: Vec<SelectOption>,
    /// Validation message computed by the host.
    pub error: Option<String>,
    /// Whether the user has interacted with the field yet.
    pub touched: bool,
    /// Overrides [`SelectorConfig::disabled`] when set.
    pub disabled: Option<bool>,
}

impl HostProps {
    /// Creates empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the controlled value.
    pub fn with_value(mut self, value: Vec<SelectOption>) -> Self {
        self.value = value;
        self
    }

    /// Sets the validation error and touched flag.
    pub fn with_error(mut self, error: impl Into<String>, touched: bool) -> Self {
        self.error = Some(error.into());
        self.touched = touched;
        self
    }

    /// Sets the touched flag.
    pub fn with_touched(mut self, touched: bool) -> Self {
        self.touched = touched;
        self
    }

    /// Overrides the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|ms| ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget_contract() {
        let config = SelectorConfig::default();
        assert_eq!(config.placeholder, "Select options...");
        assert_eq!(config.add_new_prefix, "Add new: ");
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert!(config.multiple);
        assert!(config.allow_add_new);
        assert!(config.search_enabled);
        assert_eq!(config.selection_limit(), None);
    }

    #[test]
    fn test_single_mode_limits_to_one() {
        let config = SelectorConfig::default().with_multiple(false);
        assert_eq!(config.selection_limit(), Some(1));

        let config = SelectorConfig::default()
            .with_multiple(false)
            .with_max_selections(5);
        assert_eq!(config.selection_limit(), Some(1));
    }

    #[test]
    fn test_zero_max_means_unlimited() {
        let config = SelectorConfig::default().with_max_selections(0);
        assert_eq!(config.selection_limit(), None);

        let config = SelectorConfig::default()
            .with_multiple(false)
            .with_max_selections(0);
        assert_eq!(config.selection_limit(), Some(1));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: SelectorConfig = serde_json::from_str(
            r#"{"label": "Users", "max_selections": 3, "debounce_ms": 50, "size": "sm"}"#,
        )
        .unwrap();
        assert_eq!(config.label.as_deref(), Some("Users"));
        assert_eq!(config.max_selections, Some(3));
        assert_eq!(config.debounce, Duration::from_millis(50));
        assert_eq!(config.size, SizeVariant::Small);
        assert_eq!(config.placeholder, "Select options...");
    }

    #[test]
    fn test_deserialize_endpoint() {
        let endpoint: EndpointConfig = serde_json::from_str(
            r#"{"url": "/api/users", "method": "POST", "params": {"active": true}, "timeout_ms": 2000}"#,
        )
        .unwrap();
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert_eq!(endpoint.params.get("active"), Some(&Value::Bool(true)));
        assert_eq!(endpoint.timeout, Some(Duration::from_secs(2)));
    }
}
