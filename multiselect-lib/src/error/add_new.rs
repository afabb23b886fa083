//! Add-new error types

/// Errors a creation callback can report.
///
/// Any of these is treated like an empty result: the pending label stays in
/// place so the user can retry or edit it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AddNewError {
    /// The backend refused to create the item.
    #[error("creation rejected: {0}")]
    Rejected(String),

    /// The backend call itself failed.
    #[error("creation failed: {0}")]
    Backend(String),

    /// The callback panicked.
    #[error("creation callback panicked: {0}")]
    Panicked(String),
}

impl AddNewError {
    /// Creates a backend error from any displayable error.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}
