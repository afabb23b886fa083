//! Creation of new options from free text.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AddNewError;
use crate::model::SelectOption;

/// Creates an option for a label the user typed.
///
/// Return `Ok(None)` to decline. Errors and panics are treated the same as a
/// decline: the widget keeps the typed label so the user can retry.
///
/// # Example
///
/// ```ignore
/// struct CreateTag {
///     api: TagApi,
/// }
///
/// #[async_trait]
/// impl AddNewHandler for CreateTag {
///     async fn create(&self, label: &str) -> Result<Option<SelectOption>, AddNewError> {
///         let tag = self.api.create(label).await.map_err(AddNewError::backend)?;
///         Ok(Some(SelectOption::new(tag.id, tag.name)))
///     }
/// }
/// ```
#[async_trait]
pub trait AddNewHandler: Send + Sync {
    /// Create an option for the trimmed, non-empty `label`.
    async fn create(&self, label: &str) -> Result<Option<SelectOption>, AddNewError>;
}

#[async_trait]
impl<T: AddNewHandler + ?Sized> AddNewHandler for Arc<T> {
    async fn create(&self, label: &str) -> Result<Option<SelectOption>, AddNewError> {
        (**self).create(label).await
    }
}

/// Adapts an async closure into an [`AddNewHandler`].
///
/// # Example
///
/// ```
/// use multiselect_lib::error::AddNewError;
/// use multiselect_lib::{AddNewFn, SelectOption};
///
/// let handler = AddNewFn::new(|label: String| async move {
///     let id = format!("new-{}", label.to_lowercase());
///     Ok::<_, AddNewError>(Some(SelectOption::new(id, label)))
/// });
/// ```
pub struct AddNewFn<F>(F);

impl<F> AddNewFn<F> {
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> AddNewHandler for AddNewFn<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<SelectOption>, AddNewError>> + Send + 'static,
{
    async fn create(&self, label: &str) -> Result<Option<SelectOption>, AddNewError> {
        (self.0)(label.to_string()).await
    }
}

/// What an add-new attempt did.
#[derive(Debug, Clone)]
pub enum AddNewOutcome {
    /// Created and appended to the pool and the selection.
    Added(SelectOption),
    /// Created, but an option with the same id was already selected.
    AlreadySelected(SelectOption),
    /// Created, but the selection is full. Pool, selection and search text
    /// are left as they were.
    LimitReached(SelectOption),
    /// The handler declined; the typed label is kept.
    Declined,
    /// The handler failed; the typed label is kept.
    Failed(AddNewError),
    /// A creation for the same label is already running.
    InFlight,
    /// Preconditions not met: add-new disabled, no handler, empty label,
    /// or the widget was unmounted.
    Skipped,
}

impl AddNewOutcome {
    /// Returns `true` if the created option was selected.
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// The created option, if creation succeeded.
    pub fn created(&self) -> Option<&SelectOption> {
        match self {
            Self::Added(option) | Self::AlreadySelected(option) | Self::LimitReached(option) => {
                Some(option)
            }
            _ => None,
        }
    }
}

pub(crate) fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
