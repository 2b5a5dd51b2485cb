//! Message sink consumed by the dispatcher and handlers.
//!
//! The sink owns formatting and display; the core only reports text with a
//! level. [`MessageLog`] is a bounded in-memory sink suitable for hosts that
//! render the log themselves, and for tests.

use std::collections::VecDeque;
use std::fmt;

/// Severity attached to a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageLevel {
    Message,
    Warning,
    Error,
    Exception,
}

/// Receiver of console output.
pub trait MessageSink {
    fn add_message(&mut self, text: &str);
    fn add_warning(&mut self, text: &str);
    fn add_error(&mut self, text: &str);
    fn add_exception(&mut self, text: &str);

    /// Report a line at the given level.
    fn add(&mut self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Message => self.add_message(text),
            MessageLevel::Warning => self.add_warning(text),
            MessageLevel::Error => self.add_error(text),
            MessageLevel::Exception => self.add_exception(text),
        }
    }
}

/// One line in a [`MessageLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            MessageLevel::Message => write!(f, "{}", self.text),
            MessageLevel::Warning => write!(f, "warning: {}", self.text),
            MessageLevel::Error => write!(f, "error: {}", self.text),
            MessageLevel::Exception => write!(f, "exception: {}", self.text),
        }
    }
}

/// Bounded in-memory message log.
#[derive(Debug, Clone)]
pub struct MessageLog {
    lines: VecDeque<Message>,
    capacity: usize,
}

impl MessageLog {
    /// Create a log keeping at most `capacity` lines (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.lines.back()
    }

    /// Lines at or above `level`.
    pub fn at_least(&self, level: MessageLevel) -> impl Iterator<Item = &Message> {
        self.lines.iter().filter(move |m| m.level >= level)
    }

    /// Render the whole log, one line per message.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, level: MessageLevel, text: &str) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(Message {
            level,
            text: text.to_string(),
        });
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl MessageSink for MessageLog {
    fn add_message(&mut self, text: &str) {
        self.push(MessageLevel::Message, text);
    }
    fn add_warning(&mut self, text: &str) {
        self.push(MessageLevel::Warning, text);
    }
    fn add_error(&mut self, text: &str) {
        self.push(MessageLevel::Error, text);
    }
    fn add_exception(&mut self, text: &str) {
        self.push(MessageLevel::Exception, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_levels_in_order() {
        let mut log = MessageLog::new(8);
        log.add_message("hi");
        log.add_warning("careful");
        log.add_error("bad");
        log.add_exception("boom");
        let levels: Vec<_> = log.iter().map(|m| m.level).collect();
        assert_eq!(
            levels,
            vec![
                MessageLevel::Message,
                MessageLevel::Warning,
                MessageLevel::Error,
                MessageLevel::Exception
            ]
        );
    }

    #[test]
    fn drops_oldest_past_capacity() {
        let mut log = MessageLog::new(2);
        log.add_message("a");
        log.add_message("b");
        log.add_message("c");
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().next().unwrap().text, "b");
        assert_eq!(log.last().unwrap().text, "c");
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut log = MessageLog::new(0);
        log.add_message("a");
        log.add_message("b");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn add_dispatches_by_level() {
        let mut log = MessageLog::default();
        log.add(MessageLevel::Error, "x");
        assert_eq!(log.last().unwrap().level, MessageLevel::Error);
    }

    #[test]
    fn at_least_filters() {
        let mut log = MessageLog::default();
        log.add_message("a");
        log.add_warning("b");
        log.add_error("c");
        assert_eq!(log.at_least(MessageLevel::Warning).count(), 2);
    }

    #[test]
    fn render_prefixes_levels() {
        let mut log = MessageLog::default();
        log.add_message("2 + 3 is 5");
        log.add_error("command not found: frob");
        assert_eq!(log.render(), "2 + 3 is 5\nerror: command not found: frob");
    }

    #[test]
    fn clear_empties() {
        let mut log = MessageLog::default();
        log.add_message("a");
        log.clear();
        assert!(log.is_empty());
    }
}
