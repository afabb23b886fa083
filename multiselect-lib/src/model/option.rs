//! Selectable option and its identifier.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Identifier of an option.
///
/// Endpoints return either numeric or string ids; both are kept as-is so the
/// value handed back to the host is the one it sent. `1` and `"1"` are
/// different ids. Any JSON number is accepted, including floats and integers
/// beyond the `i64` range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    /// Numeric id.
    Number(Number),
    /// String id.
    Text(String),
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for OptionId {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for OptionId {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Number> for OptionId {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<String> for OptionId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for OptionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A selectable item.
///
/// Identity is by [`id`](Self::id) only: two options are the same entity when
/// their ids match, whatever their labels or extra fields. Fields other than
/// `id` and `label` are preserved in [`extra`](Self::extra) and serialized
/// back out flattened.
///
/// # Example
///
/// ```
/// use multiselect_lib::SelectOption;
///
/// let option = SelectOption::new("user-1", "Ada").with_field("type", "user");
/// assert_eq!(option.field("type").and_then(|v| v.as_str()), Some("user"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Unique identifier within the option pool.
    pub id: OptionId,
    /// Display text.
    pub label: String,
    /// Any other fields sent by the endpoint or the host.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SelectOption {
    /// Creates an option with no extra fields.
    pub fn new(id: impl Into<OptionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            extra: Map::new(),
        }
    }

    /// Adds an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns an extra field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Returns `true` if both options refer to the same entity.
    pub fn same_entity(&self, other: &SelectOption) -> bool {
        self.id == other.id
    }
}
