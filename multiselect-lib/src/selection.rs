//! Ordered, bounded selection of options.

use crate::model::{OptionId, SelectOption};

/// Why a proposed selection was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRejected {
    /// Applying it would exceed the selection limit.
    LimitExceeded {
        /// Configured limit.
        limit: usize,
        /// Size the selection would have had.
        proposed: usize,
    },
    /// The option is already selected.
    AlreadySelected,
}

/// The options a user has chosen, in the order they were chosen.
///
/// Ids are unique within a selection. When a limit is set, the selection never
/// grows past it: proposals that would are rejected whole rather than
/// truncated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    items: Vec<SelectOption>,
    limit: Option<usize>,
    replace_on_add: bool,
}

impl Selection {
    /// Creates an empty selection with an optional limit.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            limit,
            replace_on_add: false,
        }
    }

    /// Creates a single-item selection where adding replaces the current item.
    pub fn single() -> Self {
        Self {
            items: Vec::new(),
            limit: Some(1),
            replace_on_add: true,
        }
    }

    /// The selected options in selection order.
    pub fn items(&self) -> &[SelectOption] {
        &self.items
    }

    /// Number of selected options.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The configured limit.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` if an option with `id` is selected.
    pub fn contains(&self, id: &OptionId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Replaces the selection wholesale.
    ///
    /// Later duplicates of an id are dropped. Rejected when the deduplicated
    /// proposal is larger than the limit.
    pub fn replace(&mut self, items: Vec<SelectOption>) -> Result<(), SelectionRejected> {
        let items = dedup_by_id(items);
        self.check_limit(items.len())?;
        self.items = items;
        Ok(())
    }

    /// Overwrites the selection without checking the limit.
    ///
    /// Used for host-controlled values, which the widget mirrors as given
    /// apart from dropping duplicate ids. A single-item selection keeps only
    /// the last option.
    pub fn overwrite(&mut self, items: Vec<SelectOption>) {
        let mut items = dedup_by_id(items);
        if self.replace_on_add && items.len() > 1 {
            items = items.split_off(items.len() - 1);
        }
        self.items = items;
    }

    /// Appends one option.
    ///
    /// In single mode the current option is replaced instead.
    pub fn add(&mut self, option: SelectOption) -> Result<(), SelectionRejected> {
        if self.contains(&option.id) {
            return Err(SelectionRejected::AlreadySelected);
        }
        if self.replace_on_add {
            self.items.clear();
            self.items.push(option);
            return Ok(());
        }
        self.check_limit(self.items.len() + 1)?;
        self.items.push(option);
        Ok(())
    }

    /// Removes the option with `id`. Returns the removed option, if any.
    pub fn remove(&mut self, id: &OptionId) -> Option<SelectOption> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Removes every option. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    fn check_limit(&self, proposed: usize) -> Result<(), SelectionRejected> {
        match self.limit {
            Some(limit) if proposed > limit => {
                Err(SelectionRejected::LimitExceeded { limit, proposed })
            }
            _ => Ok(()),
        }
    }
}

/// Keeps the first occurrence of every id.
pub(crate) fn dedup_by_id(items: Vec<SelectOption>) -> Vec<SelectOption> {
    let mut out: Vec<SelectOption> = Vec::with_capacity(items.len());
    for item in items {
        if !out.iter().any(|kept| kept.id == item.id) {
            out.push(item);
        }
    }
    out
}
