//! Text-field state driven by host input events.

use quay_types::input::Key;

use crate::console::Console;

/// The console's input field: current text and the hint shown under it.
///
/// Hosts forward text changes and key releases; the session queries the
/// console for hints and completions and submits lines on [`Key::Submit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSession {
    text: String,
    hint: Option<String>,
}

impl InputSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Syntax hint for the current text, if any.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// The field's text changed; refresh the hint.
    pub fn on_text_changed(&mut self, console: &Console, text: &str) {
        self.text = text.to_string();
        self.hint = console.syntax_hint(&self.text);
    }

    /// A key was released.
    ///
    /// Submit clears the field before the line runs, whatever the outcome.
    /// Complete replaces the text with its completion when there is one.
    pub fn on_key(&mut self, console: &mut Console, key: Key) {
        match key {
            Key::Submit => {
                let line = std::mem::take(&mut self.text);
                self.hint = None;
                console.submit(&line);
            },
            Key::Complete => {
                if let Some(completed) = console.auto_completed(&self.text) {
                    self.on_text_changed(console, &completed);
                }
            },
            Key::Other => {},
        }
    }
}
