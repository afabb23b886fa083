//! The selector widget.

mod add_new;
mod builder;
mod events;
mod observers;

pub use add_new::{AddNewFn, AddNewHandler, AddNewOutcome};
pub use builder::SelectorBuilder;
pub use observers::{ChangeCallback, FocusCallback, SearchCallback};

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use futures::FutureExt;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{HostProps, SelectorConfig};
use crate::debounce::Debouncer;
use crate::error::AddNewError;
use crate::filter::{candidates, suggestions};
use crate::model::{OptionId, SelectOption, SelectionItem};
use crate::selection::{Selection, SelectionRejected, dedup_by_id};
use crate::source::OptionSource;
use crate::view::{Presenter, SelectorView, visible_error};

use add_new::extract_panic_message;
use observers::Observers;

/// Unique identifier for a selector instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorId(usize);

impl SelectorId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SelectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__selector_{}", self.0)
    }
}

/// Mutable widget state, guarded by one lock.
#[derive(Debug)]
struct SelectorInner {
    /// Options from the last applied fetch
    pool: Vec<SelectOption>,
    /// Chosen options
    selection: Selection,
    /// Raw input text, doubles as the add-new draft
    search_text: String,
    /// Labels with a creation in flight
    creating: HashSet<String>,
    /// Last controlled value applied from the host
    last_controlled: Vec<SelectOption>,

    menu_open: bool,
    focused: bool,
    disabled: bool,
    error: Option<String>,
    touched: bool,
}

struct Shared {
    id: SelectorId,
    config: SelectorConfig,
    source: Option<Arc<dyn OptionSource>>,
    add_new: Option<Arc<dyn AddNewHandler>>,
    observers: Observers,
    inner: RwLock<SelectorInner>,
    debouncer: Debouncer,
    /// Sequence number of the most recent fetch
    request_seq: AtomicU64,
    loading: AtomicBool,
    dirty: AtomicBool,
    changed: Notify,
    teardown: CancellationToken,
}

/// A multi-selection dropdown with remote search and inline creation.
///
/// `SelectorWidget` is a cheap-to-clone handle; clones share state. All
/// asynchronous work (debounced searches, creations) runs on the tokio
/// runtime the widget is used from. Host callbacks fire after the state
/// change they report has been applied, never while internal locks are held.
///
/// # Example
///
/// ```ignore
/// let widget = SelectorWidget::builder(
///     SelectorConfig::default()
///         .with_label("Select Users")
///         .with_max_selections(3),
/// )
/// .endpoint(EndpointConfig::new("https://jsonplaceholder.typicode.com/users"))
/// .add_new(AddNewFn::new(|label: String| async move {
///     Ok(Some(SelectOption::new(format!("user-{}", label), label)))
/// }))
/// .on_change(|selected| println!("{} selected", selected.len()))
/// .build();
///
/// widget.mount();
/// widget.dispatch(WidgetEvent::TextChanged("ada".into()));
/// ```
#[derive(Clone)]
pub struct SelectorWidget {
    shared: Arc<Shared>,
}

impl SelectorWidget {
    /// Starts building a widget.
    pub fn builder(config: SelectorConfig) -> SelectorBuilder {
        SelectorBuilder::new(config)
    }

    fn from_parts(
        config: SelectorConfig,
        source: Option<Arc<dyn OptionSource>>,
        add_new: Option<Arc<dyn AddNewHandler>>,
        observers: Observers,
        value: Vec<SelectOption>,
    ) -> Self {
        let mut selection = match config.selection_limit() {
            Some(_) if !config.multiple => Selection::single(),
            limit => Selection::new(limit),
        };
        let initial = if value.is_empty() {
            config.default_value.clone()
        } else {
            value.clone()
        };
        selection.overwrite(initial);

        let inner = SelectorInner {
            pool: Vec::new(),
            selection,
            search_text: String::new(),
            creating: HashSet::new(),
            last_controlled: value,
            menu_open: false,
            focused: false,
            disabled: config.disabled,
            error: None,
            touched: false,
        };

        Self {
            shared: Arc::new(Shared {
                id: SelectorId::new(),
                debouncer: Debouncer::new(config.debounce),
                config,
                source,
                add_new,
                observers,
                inner: RwLock::new(inner),
                request_seq: AtomicU64::new(0),
                loading: AtomicBool::new(false),
                dirty: AtomicBool::new(true),
                changed: Notify::new(),
                teardown: CancellationToken::new(),
            }),
        }
    }

    fn from_weak(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    /// Get the unique ID for this widget.
    pub fn id(&self) -> SelectorId {
        self.shared.id
    }

    /// The widget configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.shared.config
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Loads the initial option pool in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&self) -> JoinHandle<()> {
        let widget = self.clone();
        tokio::spawn(async move {
            widget.fetch_options(None).await;
        })
    }

    /// Tears the widget down.
    ///
    /// Pending searches are cancelled and in-flight fetches and creations
    /// finish without touching state or calling back into the host.
    pub fn unmount(&self) {
        log::debug!("Unmounting {}", self.shared.id);
        self.shared.teardown.cancel();
        self.shared.debouncer.cancel();
        self.shared.loading.store(false, Ordering::SeqCst);
    }

    /// Returns `true` until [`unmount`](Self::unmount) is called.
    pub fn is_mounted(&self) -> bool {
        !self.shared.teardown.is_cancelled()
    }

    // -------------------------------------------------------------------------
    // Option source
    // -------------------------------------------------------------------------

    /// Fetches options and replaces the pool with the result.
    ///
    /// Failures are logged and yield an empty list. If another fetch was
    /// started in the meantime the result is returned but not applied, so a
    /// slow response never overwrites a newer one. Without a source this
    /// returns an empty list and leaves the pool alone.
    pub async fn fetch_options(&self, search: Option<&str>) -> Vec<SelectOption> {
        let shared = &self.shared;
        let Some(source) = shared.source.clone() else {
            return Vec::new();
        };
        if !self.is_mounted() {
            return Vec::new();
        }

        let seq = shared.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        shared.loading.store(true, Ordering::SeqCst);
        self.mark_changed();
        log::debug!("{} fetch #{} search={:?}", shared.id, seq, search);

        let result = tokio::select! {
            _ = shared.teardown.cancelled() => return Vec::new(),
            result = source.fetch(search) => result,
        };

        let options = match result {
            Ok(options) => options,
            Err(e) => {
                log::warn!("{} fetch #{} failed: {}", shared.id, seq, e);
                Vec::new()
            }
        };

        if !self.is_mounted() {
            return options;
        }
        if shared.request_seq.load(Ordering::SeqCst) != seq {
            log::debug!("{} discarding stale fetch #{}", shared.id, seq);
            return options;
        }

        if let Ok(mut guard) = shared.inner.write() {
            guard.pool = dedup_by_id(options.clone());
        }
        shared.loading.store(false, Ordering::SeqCst);
        self.mark_changed();
        options
    }

    /// Returns `true` while the most recent fetch is running.
    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    /// The current option pool, in response order.
    pub fn pool(&self) -> Vec<SelectOption> {
        self.shared
            .inner
            .read()
            .map(|guard| guard.pool.clone())
            .unwrap_or_default()
    }

    /// Pool entries that are not selected.
    pub fn candidates(&self) -> Vec<SelectOption> {
        self.shared
            .inner
            .read()
            .map(|guard| candidates(&guard.pool, guard.selection.items()))
            .unwrap_or_default()
    }

    /// Candidates matching the current text, best match first.
    pub fn suggestions(&self) -> Vec<SelectOption> {
        self.shared
            .inner
            .read()
            .map(|guard| {
                suggestions(
                    &candidates(&guard.pool, guard.selection.items()),
                    &guard.search_text,
                )
            })
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Search text
    // -------------------------------------------------------------------------

    /// Records typed text and schedules a debounced search.
    ///
    /// The search observer sees every keystroke. A fetch is only scheduled
    /// when search is enabled and the text reaches the minimum length; any
    /// earlier pending fetch is cancelled either way.
    pub fn on_text_changed(&self, text: impl Into<String>) {
        let text = text.into();
        let shared = &self.shared;

        if let Ok(mut guard) = shared.inner.write() {
            guard.search_text = text.clone();
            guard.menu_open = true;
        }
        self.mark_changed();
        shared.observers.search(&text);

        shared.debouncer.cancel();
        if !shared.config.search_enabled || shared.source.is_none() || !self.is_mounted() {
            return;
        }
        if text.chars().count() < shared.config.min_search_length {
            return;
        }

        log::debug!("{} scheduling search for {:?}", shared.id, text);
        let weak = Arc::downgrade(&self.shared);
        shared.debouncer.schedule(move || {
            if let Some(widget) = SelectorWidget::from_weak(&weak) {
                tokio::spawn(async move {
                    widget.fetch_options(Some(&text)).await;
                });
            }
        });
    }

    /// The current input text.
    pub fn search_text(&self) -> String {
        self.shared
            .inner
            .read()
            .map(|guard| guard.search_text.clone())
            .unwrap_or_default()
    }

    /// Returns `true` if a debounced search is waiting to fire.
    pub fn search_pending(&self) -> bool {
        self.shared.debouncer.is_pending()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// The selected options in selection order.
    pub fn selected(&self) -> Vec<SelectOption> {
        self.shared
            .inner
            .read()
            .map(|guard| guard.selection.items().to_vec())
            .unwrap_or_default()
    }

    /// Replaces the selection wholesale.
    ///
    /// Duplicate ids keep their first occurrence. Returns `false`, without
    /// notifying the host, when the proposal exceeds the selection limit.
    pub fn set_selection(&self, items: Vec<SelectOption>) -> bool {
        self.mutate_selection(|guard| match guard.selection.replace(items) {
            Ok(()) => true,
            Err(rejected) => {
                log::debug!("Selection rejected: {:?}", rejected);
                false
            }
        })
    }

    /// Adds one option picked from the dropdown and clears the input.
    ///
    /// In single-selection mode the pick replaces the current option.
    pub fn pick(&self, option: SelectOption) -> bool {
        self.mutate_selection(|guard| match guard.selection.add(option) {
            Ok(()) => {
                guard.search_text.clear();
                guard.menu_open = guard.selection.limit() != Some(1);
                true
            }
            Err(rejected) => {
                log::debug!("Pick rejected: {:?}", rejected);
                false
            }
        })
    }

    /// Removes the option with `id`. Returns `false` if it was not selected.
    pub fn remove(&self, id: &OptionId) -> bool {
        self.mutate_selection(|guard| guard.selection.remove(id).is_some())
    }

    /// Clears the selection and the input.
    pub fn clear(&self) -> bool {
        self.mutate_selection(|guard| {
            guard.search_text.clear();
            guard.selection.clear()
        })
    }

    /// Applies a selection gesture from the presentation layer.
    ///
    /// Existing options replace the selection and clear the input. Each new
    /// label goes through the add-new flow; the returned handle completes
    /// once those creations have settled.
    pub fn select_items(&self, items: Vec<SelectionItem>) -> Option<JoinHandle<()>> {
        let mut existing = Vec::new();
        let mut labels = Vec::new();
        for item in items {
            match item {
                SelectionItem::ExistingOption(option) => existing.push(option),
                SelectionItem::NewLabel(label) => labels.push(label),
            }
        }

        if self.set_selection(existing) {
            if let Ok(mut guard) = self.shared.inner.write() {
                guard.search_text.clear();
            }
            self.mark_changed();
        }

        if labels.is_empty() {
            return None;
        }
        let widget = self.clone();
        Some(tokio::spawn(async move {
            for label in labels {
                if let Ok(mut guard) = widget.shared.inner.write() {
                    guard.search_text = label.clone();
                }
                widget.add_new(&label).await;
            }
        }))
    }

    /// Runs `f` under the state lock; notifies the host if it returns `true`.
    fn mutate_selection(&self, f: impl FnOnce(&mut SelectorInner) -> bool) -> bool {
        let snapshot = match self.shared.inner.write() {
            Ok(mut guard) => {
                if f(&mut guard) {
                    Some(guard.selection.items().to_vec())
                } else {
                    None
                }
            }
            Err(_) => None,
        };

        match snapshot {
            Some(selection) => {
                self.mark_changed();
                self.shared.observers.change(&selection);
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Add new
    // -------------------------------------------------------------------------

    /// Creates an option from the current input text.
    pub async fn submit_new(&self) -> AddNewOutcome {
        let label = self.search_text();
        self.add_new(&label).await
    }

    /// Creates an option for `label` through the add-new handler.
    ///
    /// On success the option is appended to the pool and the selection, the
    /// input is cleared if it still holds the label, and the host is
    /// notified once. Only one creation per trimmed label runs at a time.
    /// Failures keep the input as it is.
    pub async fn add_new(&self, label: &str) -> AddNewOutcome {
        let shared = &self.shared;
        let label = label.trim().to_string();

        if !shared.config.allow_add_new || label.is_empty() || !self.is_mounted() {
            return AddNewOutcome::Skipped;
        }
        let Some(handler) = shared.add_new.clone() else {
            return AddNewOutcome::Skipped;
        };

        match shared.inner.write() {
            Ok(mut guard) => {
                if !guard.creating.insert(label.clone()) {
                    log::debug!("{} creation of {:?} already in flight", shared.id, label);
                    return AddNewOutcome::InFlight;
                }
            }
            Err(_) => return AddNewOutcome::Skipped,
        }
        self.mark_changed();

        let attempt = AssertUnwindSafe(handler.create(&label)).catch_unwind();
        let result = tokio::select! {
            _ = shared.teardown.cancelled() => return AddNewOutcome::Skipped,
            result = attempt => result,
        };

        if let Ok(mut guard) = shared.inner.write() {
            guard.creating.remove(&label);
        }
        if !self.is_mounted() {
            return AddNewOutcome::Skipped;
        }

        let outcome = match result {
            Ok(Ok(Some(option))) => return self.fold_created(&label, option),
            Ok(Ok(None)) => {
                log::warn!("{} creation of {:?} declined", shared.id, label);
                AddNewOutcome::Declined
            }
            Ok(Err(e)) => {
                log::warn!("{} creation of {:?} failed: {}", shared.id, label, e);
                AddNewOutcome::Failed(e)
            }
            Err(panic) => {
                let message = extract_panic_message(&panic);
                log::error!("{} creation callback panicked: {}", shared.id, message);
                AddNewOutcome::Failed(AddNewError::Panicked(message))
            }
        };
        self.mark_changed();
        outcome
    }

    /// Folds a created option into the pool and the selection.
    fn fold_created(&self, label: &str, option: SelectOption) -> AddNewOutcome {
        let mut guard = match self.shared.inner.write() {
            Ok(guard) => guard,
            Err(_) => return AddNewOutcome::Skipped,
        };

        let outcome = match guard.selection.add(option.clone()) {
            Ok(()) => AddNewOutcome::Added(option.clone()),
            Err(SelectionRejected::AlreadySelected) => {
                AddNewOutcome::AlreadySelected(option.clone())
            }
            Err(rejected @ SelectionRejected::LimitExceeded { .. }) => {
                log::debug!("Created option not selected: {:?}", rejected);
                return AddNewOutcome::LimitReached(option);
            }
        };

        if !guard.pool.iter().any(|o| o.id == option.id) {
            guard.pool.push(option);
        }
        if guard.search_text.trim() == label {
            guard.search_text.clear();
        }
        let selection = guard.selection.items().to_vec();
        drop(guard);

        self.mark_changed();
        if outcome.is_added() {
            self.shared.observers.change(&selection);
        }
        outcome
    }

    /// Returns `true` while a creation is running.
    pub fn is_creating(&self) -> bool {
        self.shared
            .inner
            .read()
            .map(|guard| !guard.creating.is_empty())
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Host props
    // -------------------------------------------------------------------------

    /// Applies the per-render inputs from the host.
    ///
    /// A non-empty controlled value overwrites the selection when it differs
    /// from the last one applied; an unchanged value leaves user edits alone.
    /// The host is not notified of its own value.
    pub fn apply_props(&self, props: HostProps) {
        let shared = &self.shared;
        if let Ok(mut guard) = shared.inner.write() {
            if !props.value.is_empty() && props.value != guard.last_controlled {
                guard.selection.overwrite(props.value.clone());
                guard.last_controlled = props.value;
            }
            guard.error = props.error;
            guard.touched = props.touched;
            guard.disabled = props.disabled.unwrap_or(shared.config.disabled);
        }
        self.mark_changed();
    }

    /// Mirrors a controlled value; see [`apply_props`](Self::apply_props).
    pub fn sync_value(&self, value: Vec<SelectOption>) {
        let shared = &self.shared;
        if value.is_empty() {
            return;
        }
        let applied = match shared.inner.write() {
            Ok(mut guard) if value != guard.last_controlled => {
                guard.selection.overwrite(value.clone());
                guard.last_controlled = value;
                true
            }
            _ => false,
        };
        if applied {
            self.mark_changed();
        }
    }

    /// Returns `true` if user intents are currently ignored.
    pub fn is_disabled(&self) -> bool {
        self.shared
            .inner
            .read()
            .map(|guard| guard.disabled)
            .unwrap_or(true)
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Marks the input focused and notifies the host.
    pub fn focus(&self) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.focused = true;
            guard.menu_open = true;
        }
        self.mark_changed();
        self.shared.observers.focus();
    }

    /// Marks the input blurred and notifies the host.
    pub fn blur(&self) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.focused = false;
            guard.menu_open = false;
        }
        self.mark_changed();
        self.shared.observers.blur();
    }

    /// Closes the dropdown without changing focus.
    pub fn close_menu(&self) {
        if let Ok(mut guard) = self.shared.inner.write() {
            guard.menu_open = false;
        }
        self.mark_changed();
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    /// Builds a snapshot for rendering.
    pub fn view(&self) -> SelectorView {
        let shared = &self.shared;
        let config = &shared.config;
        let guard = match shared.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let visible = candidates(&guard.pool, guard.selection.items());
        let options = suggestions(&visible, &guard.search_text);
        let draft = guard.search_text.trim();
        let can_add = config.allow_add_new
            && shared.add_new.is_some()
            && !draft.is_empty()
            && !guard.disabled;
        let exact_match = guard
            .pool
            .iter()
            .any(|o| o.label.eq_ignore_ascii_case(draft));

        let placeholder = match (&config.search_placeholder, guard.focused) {
            (Some(search), true) => search.clone(),
            _ => config.placeholder.clone(),
        };

        SelectorView {
            id: shared.id.to_string(),
            label: config.label.clone(),
            required: config.required,
            disabled: guard.disabled,
            placeholder,
            size: config.size,
            text: guard.search_text.clone(),
            loading: self.is_loading(),
            menu_open: guard.menu_open
                && !guard.disabled
                && guard.search_text.chars().count() >= config.min_search_length,
            options,
            add_new_prompt: (can_add && !exact_match)
                .then(|| format!("{}{}", config.add_new_prefix, draft)),
            show_add_button: can_add,
            creating: !guard.creating.is_empty(),
            selected: guard.selection.items().to_vec(),
            show_clear_button: config.clear_button
                && !guard.disabled
                && !guard.selection.is_empty(),
            error: visible_error(guard.error.as_deref(), guard.touched),
        }
    }

    /// Renders through `presenter` if anything changed since the last render.
    ///
    /// Returns `true` if a render happened.
    pub fn render_to(&self, presenter: &mut impl Presenter) -> bool {
        if !self.shared.dirty.swap(false, Ordering::SeqCst) {
            return false;
        }
        presenter.render(&self.view());
        true
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the widget state has changed.
    pub fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.shared.dirty.store(false, Ordering::SeqCst);
    }

    /// Waits until the widget state changes.
    ///
    /// A change made while nobody was waiting wakes the next call at once.
    pub async fn changed(&self) {
        self.shared.changed.notified().await;
    }

    fn mark_changed(&self) {
        self.shared.dirty.store(true, Ordering::SeqCst);
        self.shared.changed.notify_one();
    }
}

impl std::fmt::Debug for SelectorWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorWidget")
            .field("id", &self.shared.id)
            .field("config", &self.shared.config)
            .field("observers", &self.shared.observers)
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}
