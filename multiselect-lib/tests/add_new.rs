use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use multiselect_lib::error::AddNewError;
use multiselect_lib::{
    AddNewHandler, AddNewOutcome, Key, OptionId, SelectOption, SelectionItem, SelectorConfig,
    SelectorWidget, WidgetEvent,
};

fn ids(options: &[SelectOption]) -> Vec<OptionId> {
    options.iter().map(|o| o.id.clone()).collect()
}

fn text_id(id: &str) -> OptionId {
    OptionId::Text(id.to_string())
}

/// Mints `new-N` ids, optionally waiting on a gate first.
#[derive(Default)]
struct Minting {
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl AddNewHandler for Minting {
    async fn create(&self, label: &str) -> Result<Option<SelectOption>, AddNewError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(Some(SelectOption::new(format!("new-{}", n), label)))
    }
}

struct Panicking;

#[async_trait]
impl AddNewHandler for Panicking {
    async fn create(&self, _label: &str) -> Result<Option<SelectOption>, AddNewError> {
        panic!("backend exploded")
    }
}

fn change_log() -> (Arc<Mutex<Vec<Vec<OptionId>>>>, impl Fn(&[SelectOption]) + Send + Sync) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    (log, move |selected: &[SelectOption]| {
        sink.lock().unwrap().push(ids(selected));
    })
}

#[tokio::test]
async fn test_enter_creates_and_selects() {
    let (changes, on_change) = change_log();
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .static_options(vec![SelectOption::new(1, "Existing")])
        .add_new(Minting::default())
        .on_change(on_change)
        .build();
    widget.mount().await.unwrap();

    widget.dispatch(WidgetEvent::TextChanged("Widget".to_string()));
    let view = widget.view();
    assert_eq!(view.add_new_prompt.as_deref(), Some("Add new: Widget"));
    assert!(view.show_add_button);

    widget
        .dispatch(WidgetEvent::KeyPressed(Key::Enter))
        .expect("enter should start a creation")
        .await
        .unwrap();

    let created = SelectOption::new("new-1", "Widget");
    assert_eq!(widget.selected(), vec![created.clone()]);
    assert!(widget.pool().contains(&created));
    assert_eq!(widget.search_text(), "");
    assert!(!widget.is_creating());
    assert_eq!(*changes.lock().unwrap(), vec![vec![text_id("new-1")]]);
}

#[tokio::test]
async fn test_label_is_trimmed() {
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new(Minting::default())
        .build();

    widget.on_text_changed("  Gadget ");
    let outcome = widget.submit_new().await;

    assert_eq!(outcome.created().map(|o| o.label.as_str()), Some("Gadget"));
    assert_eq!(widget.search_text(), "");
}

#[tokio::test]
async fn test_blank_or_disallowed_is_skipped() {
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new(Minting::default())
        .build();
    assert!(matches!(widget.add_new("   ").await, AddNewOutcome::Skipped));
    assert!(widget.dispatch(WidgetEvent::KeyPressed(Key::Enter)).is_none());

    let no_handler = SelectorWidget::builder(SelectorConfig::default()).build();
    assert!(matches!(no_handler.add_new("Widget").await, AddNewOutcome::Skipped));

    let disallowed =
        SelectorWidget::builder(SelectorConfig::default().with_allow_add_new(false))
            .add_new(Minting::default())
            .build();
    disallowed.on_text_changed("Widget");
    assert_eq!(disallowed.view().add_new_prompt, None);
    assert!(matches!(disallowed.submit_new().await, AddNewOutcome::Skipped));
}

#[tokio::test]
async fn test_decline_keeps_label() {
    let (changes, on_change) = change_log();
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new_fn(|_label: String| async move { Ok::<Option<SelectOption>, AddNewError>(None) })
        .on_change(on_change)
        .build();

    widget.on_text_changed("Widget");
    let outcome = widget.submit_new().await;

    assert!(matches!(outcome, AddNewOutcome::Declined));
    assert_eq!(widget.search_text(), "Widget");
    assert!(widget.selected().is_empty());
    assert!(changes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failure_keeps_label() {
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new_fn(|_label: String| async move {
            Err::<Option<SelectOption>, _>(AddNewError::backend("service unavailable"))
        })
        .build();

    widget.on_text_changed("Widget");
    let outcome = widget.submit_new().await;

    assert!(matches!(outcome, AddNewOutcome::Failed(AddNewError::Backend(_))));
    assert_eq!(widget.search_text(), "Widget");
    assert!(widget.selected().is_empty());
    assert!(!widget.is_creating());
}

#[tokio::test]
async fn test_panic_is_contained() {
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new(Panicking)
        .build();

    widget.on_text_changed("Widget");
    let outcome = widget.submit_new().await;

    match outcome {
        AddNewOutcome::Failed(AddNewError::Panicked(message)) => {
            assert_eq!(message, "backend exploded");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(widget.search_text(), "Widget");

    // A later attempt for the same label is not blocked
    assert!(matches!(
        widget.submit_new().await,
        AddNewOutcome::Failed(AddNewError::Panicked(_))
    ));
}

#[tokio::test]
async fn test_double_enter_creates_once() {
    let gate = Arc::new(Notify::new());
    let handler = Arc::new(Minting {
        calls: AtomicUsize::new(0),
        gate: Some(gate.clone()),
    });
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new(handler.clone())
        .build();

    widget.on_text_changed("Widget");
    let first = widget
        .dispatch(WidgetEvent::KeyPressed(Key::Enter))
        .expect("creation should start");
    tokio::task::yield_now().await;
    assert!(widget.is_creating());
    assert!(widget.view().creating);

    assert!(matches!(widget.submit_new().await, AddNewOutcome::InFlight));

    gate.notify_one();
    first.await.unwrap();

    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    assert_eq!(ids(&widget.selected()), vec![text_id("new-1")]);
}

#[tokio::test]
async fn test_limit_leaves_pool_untouched() {
    let (changes, on_change) = change_log();
    let widget = SelectorWidget::builder(SelectorConfig::default().with_max_selections(1))
        .add_new(Minting::default())
        .on_change(on_change)
        .build();
    widget.set_selection(vec![SelectOption::new(1, "Existing")]);
    widget.on_text_changed("Widget");

    let outcome = widget.submit_new().await;

    assert!(matches!(outcome, AddNewOutcome::LimitReached(_)));
    assert_eq!(ids(&widget.selected()), vec![OptionId::from(1)]);
    assert!(!widget.pool().iter().any(|o| o.label == "Widget"));
    assert_eq!(widget.search_text(), "Widget");
    assert_eq!(changes.lock().unwrap().len(), 1);
    assert!(!widget.is_creating());
}

#[tokio::test]
async fn test_exact_match_hides_prompt() {
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .static_options(vec![SelectOption::new(1, "Widget")])
        .add_new(Minting::default())
        .build();
    widget.mount().await.unwrap();

    widget.on_text_changed("widget");
    let view = widget.view();
    assert_eq!(view.add_new_prompt, None);
    assert!(view.show_add_button);
}

#[tokio::test]
async fn test_new_label_in_selection_event() {
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new(Minting::default())
        .build();

    widget
        .dispatch(WidgetEvent::SelectionChanged(vec![
            SelectionItem::ExistingOption(SelectOption::new(1, "Existing")),
            SelectionItem::NewLabel("Widget".to_string()),
        ]))
        .expect("new label should start a creation")
        .await
        .unwrap();

    assert_eq!(
        ids(&widget.selected()),
        vec![OptionId::from(1), text_id("new-1")]
    );
    assert_eq!(widget.search_text(), "");
}

#[tokio::test]
async fn test_unmount_during_creation() {
    let gate = Arc::new(Notify::new());
    let (changes, on_change) = change_log();
    let widget = SelectorWidget::builder(SelectorConfig::default())
        .add_new(Minting {
            calls: AtomicUsize::new(0),
            gate: Some(gate.clone()),
        })
        .on_change(on_change)
        .build();

    let pending = widget.clone();
    let creation = tokio::spawn(async move { pending.add_new("Widget").await });
    tokio::task::yield_now().await;

    widget.unmount();
    gate.notify_one();

    assert!(matches!(creation.await.unwrap(), AddNewOutcome::Skipped));
    assert!(widget.selected().is_empty());
    assert!(changes.lock().unwrap().is_empty());
}
