//! Multi-selection dropdown core.
//!
//! A headless, toolkit-agnostic state machine for a multi-select dropdown with
//! remote-backed search, inline "add new item" support and controlled or
//! uncontrolled value management. Hosts render [`SelectorView`] snapshots and
//! forward user intents as [`WidgetEvent`]s.

pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod model;
pub mod selection;
pub mod source;
pub mod view;

mod widget;

pub use config::{EndpointConfig, HostProps, HttpMethod, SelectorConfig, SizeVariant};
pub use model::{OptionId, SelectOption, SelectionItem};
pub use view::{Key, Presenter, SelectorView, WidgetEvent};
pub use widget::*;
