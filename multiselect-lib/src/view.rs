//! Presentation contract.
//!
//! Renderers read a [`SelectorView`] snapshot and report user intents back as
//! [`WidgetEvent`]s through
//! [`SelectorWidget::dispatch`](crate::SelectorWidget::dispatch). Nothing in
//! here knows about a particular UI toolkit.

use crate::config::SizeVariant;
use crate::model::{OptionId, SelectOption, SelectionItem};

/// Keys the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Creates the typed label when add-new is available.
    Enter,
    /// Removes the last chip when the input is empty.
    Backspace,
    /// Closes the dropdown.
    Escape,
}

/// A user intent forwarded by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The input text changed.
    TextChanged(String),
    /// The user picked from the dropdown. Existing options replace the
    /// selection; new labels go through the add-new flow.
    SelectionChanged(Vec<SelectionItem>),
    /// A single option was picked from the dropdown.
    Picked(SelectOption),
    /// The remove button of a chip was clicked.
    Remove(OptionId),
    /// A key was pressed in the input.
    KeyPressed(Key),
    /// The dedicated add button was clicked.
    AddClicked,
    /// The clear button was clicked.
    Clear,
    /// The input gained focus.
    Focus,
    /// The input lost focus.
    Blur,
}

/// Everything a renderer needs to draw the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorView {
    /// Stable widget id for element binding.
    pub id: String,
    /// Field label.
    pub label: Option<String>,
    /// Show the required marker.
    pub required: bool,
    /// Render as disabled.
    pub disabled: bool,
    /// Placeholder for the input.
    pub placeholder: String,
    /// Visual size.
    pub size: SizeVariant,
    /// Current input text.
    pub text: String,
    /// An option fetch is running.
    pub loading: bool,
    /// The dropdown should be visible.
    pub menu_open: bool,
    /// Unselected options matching the input, best match first.
    pub options: Vec<SelectOption>,
    /// "Add new" entry for the dropdown, e.g. `Add new: Widget`.
    pub add_new_prompt: Option<String>,
    /// Show the dedicated add button next to the input.
    pub show_add_button: bool,
    /// A creation is running.
    pub creating: bool,
    /// Selected options, rendered as removable chips.
    pub selected: Vec<SelectOption>,
    /// Show the clear button.
    pub show_clear_button: bool,
    /// Validation message, only once the field was touched.
    pub error: Option<String>,
}

impl SelectorView {
    /// Returns `true` if a validation message should be shown.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Label followed by the required marker, if any.
    pub fn label_text(&self) -> Option<String> {
        self.label.as_ref().map(|label| {
            if self.required {
                format!("{} *", label)
            } else {
                label.clone()
            }
        })
    }
}

/// Draws a [`SelectorView`].
///
/// Implemented by hosts; see
/// [`SelectorWidget::render_to`](crate::SelectorWidget::render_to).
pub trait Presenter {
    /// Draw `view`.
    fn render(&mut self, view: &SelectorView);
}

/// Shows the host's validation message only once the field was touched.
pub fn visible_error(error: Option<&str>, touched: bool) -> Option<String> {
    match error {
        Some(message) if touched && !message.is_empty() => Some(message.to_string()),
        _ => None,
    }
}
