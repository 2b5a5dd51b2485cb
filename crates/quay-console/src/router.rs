//! Prefix routing between handlers.
//!
//! Each handler is keyed by one leading character. A line that starts with no
//! registered prefix, or is empty, goes to the default handler, which is
//! never stripped. The last prefix match is cached in a single slot; the
//! cache only shortcuts the scan and never changes which handler is chosen.

use std::cell::Cell;

use quay_command::TaskQueue;
use quay_types::sink::MessageSink;
use quay_types::status::{Failure, Outcome, ResultStatus};

use crate::handler::{Handler, MessageHandler};

/// Routes lines to handlers by prefix character.
pub struct ConsoleRouter {
    handlers: Vec<(char, Box<dyn Handler>)>,
    default: Box<dyn Handler>,
    cache: Cell<Option<usize>>,
}

impl ConsoleRouter {
    /// A router with no prefixed handlers and `default` as fallback.
    pub fn new<H: Handler + 'static>(default: H) -> Self {
        Self {
            handlers: Vec::new(),
            default: Box::new(default),
            cache: Cell::new(None),
        }
    }

    /// Register `handler` under `prefix`. Fails with `AlreadyExists` if the
    /// prefix is taken.
    pub fn try_register_handler<H: Handler + 'static>(
        &mut self,
        prefix: char,
        handler: H,
    ) -> Outcome<()> {
        if self.handlers.iter().any(|(p, _)| *p == prefix) {
            return Err(Failure::new(ResultStatus::AlreadyExists));
        }
        log::debug!("Registered console handler for prefix '{prefix}'");
        self.handlers.push((prefix, Box::new(handler)));
        Ok(())
    }

    /// Register `handler` under `prefix`.
    ///
    /// # Panics
    ///
    /// Panics if a handler is already registered for `prefix`. Prefix
    /// collisions are a startup configuration error.
    pub fn register_handler<H: Handler + 'static>(&mut self, prefix: char, handler: H) {
        if self.try_register_handler(prefix, handler).is_err() {
            panic!("console handler prefix '{prefix}' already exists");
        }
    }

    /// Register a default-constructed `H` under `prefix`.
    ///
    /// # Panics
    ///
    /// Panics if a handler is already registered for `prefix`.
    pub fn register_handler_default<H: Handler + Default + 'static>(&mut self, prefix: char) {
        self.register_handler(prefix, H::default());
    }

    /// Replace the fallback handler.
    pub fn override_default_handler<H: Handler + 'static>(&mut self, handler: H) {
        self.default = Box::new(handler);
    }

    /// Registered prefixes, in registration order.
    pub fn prefixes(&self) -> Vec<char> {
        self.handlers.iter().map(|(p, _)| *p).collect()
    }

    /// Prefix whose handler serves `line`, or `None` for the default handler.
    pub fn resolve(&self, line: &str) -> Option<char> {
        self.route(line).map(|i| self.handlers[i].0)
    }

    /// The handler that serves `line`.
    pub fn get_handler(&self, line: &str) -> &dyn Handler {
        match self.route(line) {
            Some(i) => self.handlers[i].1.as_ref(),
            None => self.default.as_ref(),
        }
    }

    fn route(&self, line: &str) -> Option<usize> {
        let first = line.chars().next()?;
        if let Some(i) = self.cache.get()
            && self.handlers.get(i).is_some_and(|(p, _)| *p == first)
        {
            return Some(i);
        }
        let found = self.handlers.iter().position(|(p, _)| *p == first);
        self.cache.set(found);
        found
    }

    /// Line as forwarded to the handler at `route`, plus the stripped
    /// prefix if any.
    fn forward<'l>(&self, route: Option<usize>, line: &'l str) -> (&'l str, Option<char>) {
        match route {
            Some(i) if !self.handlers[i].1.pass_prefix() => {
                let prefix = self.handlers[i].0;
                (&line[prefix.len_utf8()..], Some(prefix))
            },
            _ => (line, None),
        }
    }

    // -- Input session contract --

    pub fn syntax_hint(&self, line: &str) -> Option<String> {
        let route = self.route(line);
        let (forwarded, _) = self.forward(route, line);
        self.handler_at(route).syntax_hint(forwarded)
    }

    /// Completed line, with any stripped prefix put back.
    pub fn auto_completed(&self, line: &str) -> Option<String> {
        let route = self.route(line);
        let (forwarded, stripped) = self.forward(route, line);
        let completed = self.handler_at(route).auto_completed(forwarded)?;
        Some(match stripped {
            Some(prefix) => format!("{prefix}{completed}"),
            None => completed,
        })
    }

    pub fn execute(&mut self, line: &str, sink: &mut dyn MessageSink, tasks: &mut TaskQueue) {
        let route = self.route(line);
        let (forwarded, _) = self.forward(route, line);
        log::debug!("Routing {line:?} to {}", match route {
            Some(i) => format!("'{}' handler", self.handlers[i].0),
            None => "default handler".to_string(),
        });
        let handler = match route {
            Some(i) => self.handlers[i].1.as_mut(),
            None => self.default.as_mut(),
        };
        handler.execute(forwarded, sink, tasks);
    }

    fn handler_at(&self, route: Option<usize>) -> &dyn Handler {
        match route {
            Some(i) => self.handlers[i].1.as_ref(),
            None => self.default.as_ref(),
        }
    }
}

impl Default for ConsoleRouter {
    fn default() -> Self {
        Self::new(MessageHandler::default())
    }
}

impl std::fmt::Debug for ConsoleRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleRouter")
            .field("prefixes", &self.prefixes())
            .field("cache", &self.cache.get())
            .finish_non_exhaustive()
    }
}
