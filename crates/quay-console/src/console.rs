//! The composition root: router, command table, message log and task queue.

use std::time::Instant;

use quay_command::{Dispatcher, TaskQueue};
use quay_types::config::ConsoleConfig;
use quay_types::error::Result;
use quay_types::sink::MessageLog;

use crate::handler::{CommandHandler, MessageHandler};
use crate::router::ConsoleRouter;

/// One console instance.
///
/// Lines that start with the configured command prefix run as commands; all
/// other lines are posted to the log as messages.
pub struct Console {
    config: ConsoleConfig,
    router: ConsoleRouter,
    log: MessageLog,
    tasks: TaskQueue,
}

impl Console {
    /// Build a console around `dispatcher`. The dispatcher should be fully
    /// registered; it is read-only from here on.
    pub fn new(config: ConsoleConfig, dispatcher: Dispatcher) -> Result<Self> {
        config.validate()?;
        let mut router = ConsoleRouter::new(MessageHandler::default());
        router.register_handler(
            config.command_prefix,
            CommandHandler::new(dispatcher).with_suffix_space(config.complete_suffix_space),
        );
        if let Some(prefix) = config.message_prefix {
            router.register_handler(prefix, MessageHandler::new(false));
        }
        log::info!(
            "Console ready: command prefix '{}', {} handlers",
            config.command_prefix,
            router.prefixes().len()
        );
        Ok(Self {
            log: MessageLog::new(config.max_messages),
            config,
            router,
            tasks: TaskQueue::new(),
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn router(&self) -> &ConsoleRouter {
        &self.router
    }

    /// Mutable router access, for registering extra handlers.
    pub fn router_mut(&mut self) -> &mut ConsoleRouter {
        &mut self.router
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskQueue {
        &mut self.tasks
    }

    /// Run a submitted line.
    pub fn submit(&mut self, line: &str) {
        self.router.execute(line, &mut self.log, &mut self.tasks);
    }

    /// Syntax hint for the text being typed, if hints are enabled.
    pub fn syntax_hint(&self, line: &str) -> Option<String> {
        if !self.config.show_hints {
            return None;
        }
        self.router.syntax_hint(line)
    }

    pub fn auto_completed(&self, line: &str) -> Option<String> {
        self.router.auto_completed(line)
    }

    /// Run deferred tasks due at `now`. Returns how many ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.tasks.run_due(now, &mut self.log)
    }

    /// Deferred tasks still waiting.
    pub fn pending(&self) -> usize {
        self.tasks.pending()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("config", &self.config)
            .field("router", &self.router)
            .field("messages", &self.log.len())
            .field("pending", &self.tasks.pending())
            .finish()
    }
}
