//! Routable responders to console input.

use quay_command::{DispatchReport, Dispatcher, TaskQueue};
use quay_types::sink::MessageSink;

/// A responder selected by the router for a line of input.
///
/// The router strips the handler's prefix before forwarding unless
/// [`pass_prefix`](Self::pass_prefix) is true. The query methods are called
/// on every keystroke and must not change state.
pub trait Handler {
    /// Whether the line is forwarded with its prefix character intact.
    fn pass_prefix(&self) -> bool;

    /// Handle a submitted line.
    fn execute(&mut self, line: &str, sink: &mut dyn MessageSink, tasks: &mut TaskQueue);

    /// Usage hint for a partially typed line.
    fn syntax_hint(&self, _line: &str) -> Option<String> {
        None
    }

    /// Completed form of a partially typed line, if anything can be added.
    fn auto_completed(&self, _line: &str) -> Option<String> {
        None
    }
}

/// Posts submitted text to the sink as a plain message.
#[derive(Debug, Clone, Copy)]
pub struct MessageHandler {
    pass_prefix: bool,
}

impl MessageHandler {
    pub fn new(pass_prefix: bool) -> Self {
        Self { pass_prefix }
    }
}

impl Default for MessageHandler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Handler for MessageHandler {
    fn pass_prefix(&self) -> bool {
        self.pass_prefix
    }

    fn execute(&mut self, line: &str, sink: &mut dyn MessageSink, _tasks: &mut TaskQueue) {
        if !line.trim().is_empty() {
            sink.add_message(line);
        }
    }
}

/// Runs submitted lines as commands.
pub struct CommandHandler {
    dispatcher: Dispatcher,
    suffix_space: bool,
    last_report: Option<DispatchReport>,
}

impl CommandHandler {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            suffix_space: true,
            last_report: None,
        }
    }

    /// Whether a unique completion gets a trailing space.
    pub fn with_suffix_space(mut self, suffix_space: bool) -> Self {
        self.suffix_space = suffix_space;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Report of the most recently executed line.
    pub fn last_report(&self) -> Option<&DispatchReport> {
        self.last_report.as_ref()
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new(Dispatcher::new())
    }
}

impl Handler for CommandHandler {
    fn pass_prefix(&self) -> bool {
        false
    }

    fn execute(&mut self, line: &str, sink: &mut dyn MessageSink, tasks: &mut TaskQueue) {
        self.last_report = Some(self.dispatcher.execute(line, sink, tasks));
    }

    fn syntax_hint(&self, line: &str) -> Option<String> {
        self.dispatcher.syntax_hint(line)
    }

    fn auto_completed(&self, line: &str) -> Option<String> {
        self.dispatcher.auto_completed(line, self.suffix_space)
    }
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("commands", &self.dispatcher.count())
            .field("suffix_space", &self.suffix_space)
            .finish()
    }
}
