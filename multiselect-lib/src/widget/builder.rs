//! Builder for [`SelectorWidget`].

use std::future::Future;
use std::sync::Arc;

use crate::config::{EndpointConfig, SelectorConfig};
use crate::error::AddNewError;
use crate::model::SelectOption;
use crate::source::{BaseUrlResolver, OptionSource, RemoteSource, StaticSource};

use super::SelectorWidget;
use super::add_new::{AddNewFn, AddNewHandler};
use super::observers::Observers;

enum SourceKind {
    None,
    Custom(Arc<dyn OptionSource>),
    Endpoint(EndpointConfig),
}

/// Assembles a [`SelectorWidget`] from its configuration, option source,
/// creation handler and host callbacks.
///
/// Only the last source setter wins. Without a source the widget offers
/// nothing but free-text creation.
pub struct SelectorBuilder {
    config: SelectorConfig,
    source: SourceKind,
    resolver: Option<Arc<dyn BaseUrlResolver>>,
    add_new: Option<Arc<dyn AddNewHandler>>,
    observers: Observers,
    value: Vec<SelectOption>,
}

impl SelectorBuilder {
    pub(crate) fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            source: SourceKind::None,
            resolver: None,
            add_new: None,
            observers: Observers::default(),
            value: Vec::new(),
        }
    }

    /// Use a custom option source.
    pub fn source(mut self, source: impl OptionSource + 'static) -> Self {
        self.source = SourceKind::Custom(Arc::new(source));
        self
    }

    /// Offer a fixed list of options.
    pub fn static_options(self, options: Vec<SelectOption>) -> Self {
        self.source(StaticSource::new(options))
    }

    /// Fetch options from a lookup endpoint.
    ///
    /// The search term is only sent once it reaches the configured minimum
    /// search length.
    pub fn endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.source = SourceKind::Endpoint(endpoint);
        self
    }

    /// Resolve relative endpoint URLs against a base, such as the host page
    /// origin.
    pub fn base_url_resolver(mut self, resolver: impl BaseUrlResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Handle creation of new options.
    pub fn add_new(mut self, handler: impl AddNewHandler + 'static) -> Self {
        self.add_new = Some(Arc::new(handler));
        self
    }

    /// Handle creation of new options with an async closure.
    pub fn add_new_fn<F, Fut>(self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<SelectOption>, AddNewError>> + Send + 'static,
    {
        self.add_new(AddNewFn::new(f))
    }

    /// Called with the full selection after every user-driven change.
    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[SelectOption]) + Send + Sync + 'static,
    {
        self.observers.on_change = Some(Arc::new(f));
        self
    }

    /// Called with the raw input text on every keystroke.
    pub fn on_search<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.observers.on_search = Some(Arc::new(f));
        self
    }

    /// Called when the input loses focus.
    pub fn on_blur<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers.on_blur = Some(Arc::new(f));
        self
    }

    /// Called when the input gains focus.
    pub fn on_focus<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers.on_focus = Some(Arc::new(f));
        self
    }

    /// Initial controlled value. Takes precedence over the configured
    /// default value when non-empty.
    pub fn value(mut self, value: Vec<SelectOption>) -> Self {
        self.value = value;
        self
    }

    /// Build the widget. Call [`SelectorWidget::mount`] to load options.
    pub fn build(self) -> SelectorWidget {
        let source: Option<Arc<dyn OptionSource>> = match self.source {
            SourceKind::None => None,
            SourceKind::Custom(source) => Some(source),
            SourceKind::Endpoint(endpoint) => {
                let mut remote = RemoteSource::new(endpoint)
                    .with_min_search_length(self.config.min_search_length);
                if let Some(resolver) = self.resolver {
                    remote = remote.with_resolver(resolver);
                }
                Some(Arc::new(remote))
            }
        };

        SelectorWidget::from_parts(self.config, source, self.add_new, self.observers, self.value)
    }
}

impl std::fmt::Debug for SelectorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            SourceKind::None => "none",
            SourceKind::Custom(_) => "custom",
            SourceKind::Endpoint(_) => "endpoint",
        };
        f.debug_struct("SelectorBuilder")
            .field("config", &self.config)
            .field("source", &source)
            .field("add_new", &self.add_new.is_some())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
