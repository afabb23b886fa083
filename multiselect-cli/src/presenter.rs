//! Plain-text rendering of the widget.

use std::io::Write;

use multiselect_lib::{Presenter, SelectorView};

/// Renders a [`SelectorView`] as a block of text.
pub fn render_text(view: &SelectorView) -> String {
    let mut out = String::new();

    if let Some(label) = view.label_text() {
        out.push_str(&format!("{} [{}]\n", label, view.size.as_str()));
    }

    let chips: Vec<String> = view
        .selected
        .iter()
        .enumerate()
        .map(|(i, o)| format!("[{}: {} x]", i + 1, o.label))
        .collect();
    let mut line = chips.join(" ");
    if !line.is_empty() {
        line.push(' ');
    }
    if view.text.is_empty() {
        line.push_str(&format!("({})", view.placeholder));
    } else {
        line.push_str(&format!("> {}", view.text));
    }
    if view.show_add_button {
        line.push_str("  [+]");
    }
    if view.show_clear_button {
        line.push_str("  [clear]");
    }
    if view.disabled {
        line.push_str("  (disabled)");
    }
    out.push_str(&line);
    out.push('\n');

    if view.loading {
        out.push_str("  loading...\n");
    }
    if view.creating {
        out.push_str("  creating...\n");
    }
    if view.menu_open {
        for (i, option) in view.options.iter().enumerate() {
            out.push_str(&format!("  {}. {} ({})\n", i + 1, option.label, option.id));
        }
        if let Some(prompt) = &view.add_new_prompt {
            out.push_str(&format!("  + {}\n", prompt));
        }
        if view.options.is_empty() && view.add_new_prompt.is_none() && !view.loading {
            out.push_str("  no options\n");
        }
    }
    if let Some(error) = &view.error {
        out.push_str(&format!("  ! {}\n", error));
    }

    out
}

/// Writes rendered views to a terminal stream.
pub struct TerminalPresenter<W> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, view: &SelectorView) {
        if let Err(e) = write!(self.out, "{}", render_text(view)).and_then(|_| self.out.flush()) {
            log::warn!("Failed to render: {}", e);
        }
    }
}
