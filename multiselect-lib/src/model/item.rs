//! Items forwarded by the presentation layer on a selection gesture.

use super::SelectOption;

/// A single entry of a selection gesture.
///
/// The presentation layer either references an option it was shown, or
/// carries free text the user wants turned into a new option.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionItem {
    /// An option that already exists in the pool.
    ExistingOption(SelectOption),
    /// Free text to be created through the add-new flow.
    NewLabel(String),
}

impl SelectionItem {
    /// Returns the existing option, if this is one.
    pub fn as_existing(&self) -> Option<&SelectOption> {
        match self {
            Self::ExistingOption(option) => Some(option),
            Self::NewLabel(_) => None,
        }
    }

    /// Returns the new label, if this is one.
    pub fn as_new_label(&self) -> Option<&str> {
        match self {
            Self::ExistingOption(_) => None,
            Self::NewLabel(label) => Some(label),
        }
    }
}

impl From<SelectOption> for SelectionItem {
    fn from(option: SelectOption) -> Self {
        Self::ExistingOption(option)
    }
}
