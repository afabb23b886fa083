//! Data model

mod item;
mod option;

pub use item::SelectionItem;
pub use option::OptionId;
pub use option::SelectOption;
