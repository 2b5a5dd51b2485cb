//! Arguments and context handed to a running command.

use std::any::Any;
use std::time::Duration;

use quay_registry::Value;
use quay_types::error::{QuayError, Result};
use quay_types::sink::MessageSink;

use crate::schedule::{TaskId, TaskQueue};

/// Bound argument values of one call, in declared parameter order.
#[derive(Default)]
pub struct Args {
    slots: Vec<Option<Value>>,
}

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            slots: values.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrow argument `index` as `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Move argument `index` out as `T`. Each argument can be taken once.
    pub fn take<T: Any>(&mut self, index: usize) -> Result<T> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| QuayError::Command(format!("no argument at position {index}")))?;
        let value = slot
            .take()
            .ok_or_else(|| QuayError::Command(format!("argument {index} already taken")))?;
        match value.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(original) => {
                *slot = Some(original);
                Err(QuayError::Command(format!(
                    "argument {index} is not a {}",
                    std::any::type_name::<T>()
                )))
            },
        }
    }

    /// Move out the first argument not yet taken.
    pub fn take_next<T: Any>(&mut self) -> Result<T> {
        let index = self
            .slots
            .iter()
            .position(Option::is_some)
            .ok_or_else(|| QuayError::Command("no arguments left".to_string()))?;
        self.take(index)
    }
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args").field("len", &self.len()).finish()
    }
}

/// Context for one command call: its arguments, the message sink and the
/// task queue for deferred output.
pub struct Invocation<'a> {
    command: &'a str,
    args: Args,
    sink: &'a mut dyn MessageSink,
    tasks: &'a mut TaskQueue,
}

impl<'a> Invocation<'a> {
    pub fn new(
        command: &'a str,
        args: Args,
        sink: &'a mut dyn MessageSink,
        tasks: &'a mut TaskQueue,
    ) -> Self {
        Self {
            command,
            args,
            sink,
            tasks,
        }
    }

    /// Name of the command being run.
    pub fn command(&self) -> &str {
        self.command
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Move argument `index` out as `T`.
    pub fn arg<T: Any>(&mut self, index: usize) -> Result<T> {
        self.args.take(index)
    }

    /// Move out the next argument in declared order.
    pub fn next_arg<T: Any>(&mut self) -> Result<T> {
        self.args.take_next()
    }

    pub fn sink(&mut self) -> &mut dyn MessageSink {
        &mut *self.sink
    }

    pub fn message(&mut self, text: &str) {
        self.sink.add_message(text);
    }

    pub fn warning(&mut self, text: &str) {
        self.sink.add_warning(text);
    }

    pub fn error(&mut self, text: &str) {
        self.sink.add_error(text);
    }

    /// Schedule output to be produced after `delay`. The command returns
    /// immediately; the host runs the task from its loop.
    pub fn defer<F>(&mut self, delay: Duration, task: F) -> TaskId
    where
        F: FnOnce(&mut dyn MessageSink) + 'static,
    {
        self.tasks.defer(self.command, delay, task)
    }

    pub fn tasks(&mut self) -> &mut TaskQueue {
        &mut *self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quay_types::sink::MessageLog;

    fn args() -> Args {
        Args::new(vec![Box::new(2i32) as Value, Box::new(String::from("x"))])
    }

    #[test]
    fn get_by_type() {
        let a = args();
        assert_eq!(a.get::<i32>(0), Some(&2));
        assert_eq!(a.get::<i32>(1), None);
        assert_eq!(a.get::<i32>(5), None);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn take_moves_once() {
        let mut a = args();
        assert_eq!(a.take::<String>(1).unwrap(), "x");
        assert!(a.take::<String>(1).is_err());
    }

    #[test]
    fn take_wrong_type_keeps_value() {
        let mut a = args();
        let err = a.take::<f32>(0).unwrap_err();
        assert!(format!("{err}").contains("argument 0"));
        assert_eq!(a.take::<i32>(0).unwrap(), 2);
    }

    #[test]
    fn take_next_walks_in_order() {
        let mut a = args();
        assert_eq!(a.take_next::<i32>().unwrap(), 2);
        assert_eq!(a.take_next::<String>().unwrap(), "x");
        assert!(a.take_next::<i32>().is_err());
    }

    #[test]
    fn take_out_of_range() {
        let mut a = Args::default();
        assert!(a.take::<i32>(0).is_err());
        assert!(a.is_empty());
    }

    #[test]
    fn invocation_writes_and_defers() {
        let mut log = MessageLog::default();
        let mut tasks = TaskQueue::new();
        let mut inv = Invocation::new("wait", args(), &mut log, &mut tasks);
        assert_eq!(inv.arg::<i32>(0).unwrap(), 2);
        inv.message("started");
        inv.defer(Duration::from_secs(1), |s| s.add_message("done"));
        assert_eq!(inv.command(), "wait");
        drop(inv);
        assert_eq!(log.render(), "started");
        assert_eq!(tasks.labels(), vec!["wait"]);
    }
}
