//! Host callbacks.

use std::sync::Arc;

use crate::model::SelectOption;

/// Called with the full selection after every change.
pub type ChangeCallback = Arc<dyn Fn(&[SelectOption]) + Send + Sync>;

/// Called with the raw text on every keystroke.
pub type SearchCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Called on focus or blur.
pub type FocusCallback = Arc<dyn Fn() + Send + Sync>;

/// Registered host observers. Any of them may be absent.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    pub(crate) on_change: Option<ChangeCallback>,
    pub(crate) on_search: Option<SearchCallback>,
    pub(crate) on_blur: Option<FocusCallback>,
    pub(crate) on_focus: Option<FocusCallback>,
}

impl Observers {
    pub(crate) fn change(&self, selection: &[SelectOption]) {
        if let Some(callback) = &self.on_change {
            callback(selection);
        }
    }

    pub(crate) fn search(&self, text: &str) {
        if let Some(callback) = &self.on_search {
            callback(text);
        }
    }

    pub(crate) fn blur(&self) {
        if let Some(callback) = &self.on_blur {
            callback();
        }
    }

    pub(crate) fn focus(&self) {
        if let Some(callback) = &self.on_focus {
            callback();
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("on_change", &self.on_change.is_some())
            .field("on_search", &self.on_search.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .finish()
    }
}
