//! Event dispatch from the presentation layer.

use tokio::task::JoinHandle;

use crate::view::{Key, WidgetEvent};

use super::SelectorWidget;

impl SelectorWidget {
    /// Applies a user intent reported by the renderer.
    ///
    /// While disabled only focus changes get through. Intents that start
    /// asynchronous work return the task handle; callers may await it or
    /// drop it.
    pub fn dispatch(&self, event: WidgetEvent) -> Option<JoinHandle<()>> {
        log::trace!("{} event: {:?}", self.id(), event);

        match event {
            WidgetEvent::Focus => {
                self.focus();
                return None;
            }
            WidgetEvent::Blur => {
                self.blur();
                return None;
            }
            _ if self.is_disabled() => {
                log::debug!("{} is disabled, ignoring {:?}", self.id(), event);
                return None;
            }
            _ => {}
        }

        match event {
            WidgetEvent::TextChanged(text) => {
                self.on_text_changed(text);
                None
            }
            WidgetEvent::SelectionChanged(items) => self.select_items(items),
            WidgetEvent::Picked(option) => {
                self.pick(option);
                None
            }
            WidgetEvent::Remove(id) => {
                self.remove(&id);
                None
            }
            WidgetEvent::KeyPressed(key) => self.handle_key(key),
            WidgetEvent::AddClicked => self.spawn_submit(),
            WidgetEvent::Clear => {
                self.clear();
                None
            }
            WidgetEvent::Focus | WidgetEvent::Blur => None,
        }
    }

    fn handle_key(&self, key: Key) -> Option<JoinHandle<()>> {
        match key {
            Key::Enter => self.spawn_submit(),
            Key::Backspace => {
                if self.search_text().is_empty()
                    && let Some(last) = self.selected().pop()
                {
                    self.remove(&last.id);
                }
                None
            }
            Key::Escape => {
                self.close_menu();
                None
            }
        }
    }

    fn spawn_submit(&self) -> Option<JoinHandle<()>> {
        if !self.config().allow_add_new || self.search_text().trim().is_empty() {
            return None;
        }
        let widget = self.clone();
        Some(tokio::spawn(async move {
            widget.submit_new().await;
        }))
    }
}
