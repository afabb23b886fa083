//! Error types

mod add_new;
mod fetch;

pub use add_new::*;
pub use fetch::*;
