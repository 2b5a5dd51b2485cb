//! Line dispatch: tokenize, resolve, bind, invoke.
//!
//! Every per-line failure is reported to the message sink and summarized in
//! the returned [`DispatchReport`]; nothing is propagated to the caller, so
//! the console stays usable after a bad command.

use std::panic::{AssertUnwindSafe, catch_unwind};

use quay_registry::{ParserTable, Registry, RegistryRead, Value};
use quay_types::error::{QuayError, Result};
use quay_types::sink::{MessageLevel, MessageSink};
use quay_types::status::{Failure, Outcome, ResultStatus};

use crate::descriptor::{CommandDescriptor, CommandSet};
use crate::invocation::{Args, Invocation};
use crate::record::{ActionTable, CommandRecord};
use crate::schedule::TaskQueue;

/// A failure observed while dispatching one line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("command not found: {0}")]
    NotFound(String),

    #[error("missing or invalid argument: {0}")]
    InvalidArgument(String),

    #[error("too many arguments: expected {expected} got {got}")]
    TooManyArguments { expected: usize, got: usize },

    #[error("{command}: {reason}")]
    Invocation { command: String, reason: String },

    #[error("{command} panicked: {reason}")]
    Panicked { command: String, reason: String },
}

impl DispatchError {
    /// Level used when reporting to the sink. Excess arguments are only a
    /// warning; dispatch still proceeds.
    pub fn level(&self) -> MessageLevel {
        match self {
            DispatchError::TooManyArguments { .. } => MessageLevel::Warning,
            DispatchError::Panicked { .. } => MessageLevel::Exception,
            _ => MessageLevel::Error,
        }
    }

    pub fn status(&self) -> ResultStatus {
        match self {
            DispatchError::NotFound(_) => ResultStatus::ValueDoesNotExist,
            DispatchError::InvalidArgument(_) => ResultStatus::InvalidArgument,
            DispatchError::TooManyArguments { .. } => ResultStatus::OutOfRange,
            DispatchError::Invocation { .. } | DispatchError::Panicked { .. } => {
                ResultStatus::Failed
            },
        }
    }

    /// Whether dispatch continued past this diagnostic.
    pub fn is_warning(&self) -> bool {
        self.level() == MessageLevel::Warning
    }
}

/// What happened to one dispatched line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Resolved command name, if the lookup succeeded.
    pub command: Option<String>,
    /// Whether the command body ran.
    pub invoked: bool,
    /// Diagnostics in the order they were reported.
    pub diagnostics: Vec<DispatchError>,
}

impl DispatchReport {
    /// Invoked with no diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.invoked && self.diagnostics.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &DispatchError> {
        self.diagnostics.iter().filter(|d| !d.is_warning())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DispatchError> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    fn report(&mut self, sink: &mut dyn MessageSink, err: DispatchError) {
        log::warn!("Dispatch: {err}");
        sink.add(err.level(), &err.to_string());
        self.diagnostics.push(err);
    }
}

/// Command table plus the parser table used to bind arguments.
pub struct Dispatcher {
    commands: Registry<String, CommandDescriptor>,
    parsers: ParserTable,
}

impl Dispatcher {
    /// A dispatcher with no commands and the built-in parsers.
    pub fn new() -> Self {
        Self::with_parsers(ParserTable::new())
    }

    pub fn with_parsers(parsers: ParserTable) -> Self {
        Self {
            commands: Registry::new(),
            parsers,
        }
    }

    pub fn parsers(&self) -> &ParserTable {
        &self.parsers
    }

    /// Mutable parser access, for the registration phase.
    pub fn parsers_mut(&mut self) -> &mut ParserTable {
        &mut self.parsers
    }

    // -- Registration --

    /// Register a command.
    ///
    /// Fails if the name is taken, if a parameter type has no parser, or if
    /// a default does not parse as its parameter's type.
    pub fn register(&mut self, desc: CommandDescriptor) -> Result<()> {
        for p in desc.params() {
            if !self.parsers.supports(p.ty()) {
                return Err(QuayError::Registration(format!(
                    "{}: no parser for parameter '{}' of type {}",
                    desc.name(),
                    p.name(),
                    p.ty()
                )));
            }
            if let Some(default) = p.default()
                && self.parsers.try_parse(p.ty(), default).is_err()
            {
                return Err(QuayError::Registration(format!(
                    "{}: default '{default}' for '{}' is not a valid {}",
                    desc.name(),
                    p.name(),
                    p.ty()
                )));
            }
        }

        let name = desc.name().to_string();
        log::debug!("Registering command: {}", desc.syntax());
        self.commands
            .try_register(name.clone(), desc)
            .map_err(|_| QuayError::Registration(format!("duplicate command '{name}'")))
    }

    /// Register several commands, stopping at the first failure.
    pub fn register_all<I>(&mut self, descs: I) -> Result<usize>
    where
        I: IntoIterator<Item = CommandDescriptor>,
    {
        let mut n = 0;
        for desc in descs {
            self.register(desc)?;
            n += 1;
        }
        Ok(n)
    }

    /// Register every command of a [`CommandSet`].
    pub fn register_set<S: CommandSet>(&mut self) -> Result<usize> {
        let n = self.register_all(S::commands()?)?;
        log::info!(
            "Registered {n} commands from {}",
            std::any::type_name::<S>()
        );
        Ok(n)
    }

    /// Register declarative records, resolving their types and actions.
    pub fn register_records<'r, I>(&mut self, records: I, actions: &ActionTable) -> Result<usize>
    where
        I: IntoIterator<Item = &'r CommandRecord>,
    {
        let mut descs = Vec::new();
        for record in records {
            descs.push(record.to_descriptor(&self.parsers, actions)?);
        }
        self.register_all(descs)
    }

    // -- Lookup --

    /// Look up a command by exact (lowercased) name.
    pub fn command(&self, name: &str) -> Outcome<&CommandDescriptor> {
        self.commands.try_get(name.to_ascii_lowercase().as_str())
    }

    pub fn count(&self) -> usize {
        self.commands.count()
    }

    /// All command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().into_iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The command named `token`, or else the first (by name) whose name
    /// starts with it.
    fn find_by_prefix(&self, token: &str) -> Option<&CommandDescriptor> {
        let token = token.to_ascii_lowercase();
        if let Ok(desc) = self.commands.try_get(token.as_str()) {
            return Some(desc);
        }
        self.names()
            .into_iter()
            .find(|name| name.starts_with(&token))
            .and_then(|name| self.commands.try_get(name).ok())
    }

    // -- Execution --

    /// Dispatch one line.
    ///
    /// Empty lines are a no-op. Unknown commands and arguments that neither
    /// parse nor have a default abort before invocation. Excess tokens are
    /// reported as a warning and ignored.
    pub fn execute(
        &self,
        line: &str,
        sink: &mut dyn MessageSink,
        tasks: &mut TaskQueue,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, rest)) = tokens.split_first() else {
            return report;
        };

        let desc = match self.command(name) {
            Ok(desc) => desc,
            Err(_) if name.eq_ignore_ascii_case("help") => {
                self.execute_help(rest.first().copied(), sink, &mut report);
                return report;
            },
            Err(_) => {
                report.report(sink, DispatchError::NotFound(name.to_string()));
                return report;
            },
        };
        report.command = Some(desc.name().to_string());

        if rest.len() > desc.arity() {
            report.report(
                sink,
                DispatchError::TooManyArguments {
                    expected: desc.arity(),
                    got: rest.len(),
                },
            );
        }

        let values = match self.bind(desc, rest) {
            Ok(values) => values,
            Err(err) => {
                report.report(sink, err);
                return report;
            },
        };

        log::debug!("Invoking {} with {} arguments", desc.name(), values.len());
        let outcome = {
            let mut inv = Invocation::new(desc.name(), Args::new(values), &mut *sink, tasks);
            catch_unwind(AssertUnwindSafe(|| desc.invoke(&mut inv)))
        };
        report.invoked = true;

        match outcome {
            Ok(Ok(())) => {},
            Ok(Err(e)) => report.report(
                sink,
                DispatchError::Invocation {
                    command: desc.name().to_string(),
                    reason: e.to_string(),
                },
            ),
            Err(payload) => report.report(
                sink,
                DispatchError::Panicked {
                    command: desc.name().to_string(),
                    reason: panic_message(&*payload),
                },
            ),
        }
        report
    }

    /// Bind tokens to parameters in declared order. A token that fails to
    /// parse falls back to the parameter's default; with no default the
    /// whole binding fails.
    fn bind(&self, desc: &CommandDescriptor, tokens: &[&str]) -> std::result::Result<Vec<Value>, DispatchError> {
        let mut values = Vec::with_capacity(desc.arity());
        for (i, p) in desc.params().iter().enumerate() {
            let parsed = tokens
                .get(i)
                .and_then(|token| self.parsers.try_parse(p.ty(), token).ok());
            let value = match (parsed, p.default()) {
                (Some(v), _) => v,
                (None, Some(default)) => self
                    .parsers
                    .try_parse(p.ty(), default)
                    .map_err(|_| DispatchError::InvalidArgument(p.name().to_string()))?,
                (None, None) => return Err(DispatchError::InvalidArgument(p.name().to_string())),
            };
            values.push(value);
        }
        Ok(values)
    }

    fn execute_help(&self, topic: Option<&str>, sink: &mut dyn MessageSink, report: &mut DispatchReport) {
        report.command = Some("help".to_string());
        match topic {
            Some(name) => match self.command(name) {
                Ok(desc) => {
                    let mut out = desc.syntax().to_string();
                    if !desc.description().is_empty() {
                        out.push_str(&format!("\n  {}", desc.description()));
                    }
                    sink.add_message(&out);
                },
                Err(_) => report.report(sink, DispatchError::NotFound(name.to_string())),
            },
            None => {
                let mut out = format!("Commands ({}):", self.count());
                for name in self.names() {
                    if let Ok(desc) = self.commands.try_get(name) {
                        if desc.description().is_empty() {
                            out.push_str(&format!("\n  {}", desc.syntax()));
                        } else {
                            out.push_str(&format!("\n  {:20} {}", desc.syntax(), desc.description()));
                        }
                    }
                }
                sink.add_message(&out);
            },
        }
        report.invoked = true;
    }

    // -- Interactive queries --

    /// Syntax of the command being typed, matched by the first token.
    pub fn syntax_hint(&self, line: &str) -> Option<String> {
        let first = line.split_whitespace().next()?;
        self.find_by_prefix(first).map(|d| d.syntax().to_string())
    }

    /// Complete the last token of `line`.
    ///
    /// The first token completes against command names; later tokens against
    /// the suggestions of the matching parameter's parser. Multiple
    /// candidates complete to their longest common prefix. Returns the whole
    /// completed line, or `None` when nothing can be added.
    pub fn auto_completed(&self, line: &str, suffix_space: bool) -> Option<String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }
        let trailing_space = line.ends_with(char::is_whitespace);

        let (partial, candidates): (&str, Vec<String>) = if tokens.len() == 1 && !trailing_space {
            let partial = tokens[0];
            let lower = partial.to_ascii_lowercase();
            let names = self
                .names()
                .into_iter()
                .filter(|n| n.starts_with(&lower))
                .map(str::to_string)
                .collect();
            (partial, names)
        } else {
            let desc = self.command(tokens[0]).ok()?;
            let (index, partial) = if trailing_space {
                (tokens.len() - 1, "")
            } else {
                (tokens.len() - 2, tokens[tokens.len() - 1])
            };
            let param = desc.params().get(index)?;
            (partial, self.parsers.suggestions(param.ty(), partial))
        };

        let completed = complete(partial, &candidates, suffix_space)?;
        let head = &line[..line.len() - partial.len()];
        Some(format!("{head}{completed}"))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete `partial` against `candidates`.
fn complete(partial: &str, candidates: &[String], suffix_space: bool) -> Option<String> {
    match candidates {
        [] => None,
        [only] => {
            let mut out = only.clone();
            if suffix_space {
                out.push(' ');
            }
            (out != partial).then_some(out)
        },
        [first, rest @ ..] => {
            let mut prefix_len = first.len();
            for c in rest {
                prefix_len = first
                    .char_indices()
                    .zip(c.chars())
                    .take_while(|((_, a), b)| a == b)
                    .last()
                    .map_or(0, |((i, a), _)| i + a.len_utf8())
                    .min(prefix_len);
            }
            let prefix = &first[..prefix_len];
            if prefix.len() > partial.len() {
                Some(prefix.to_string())
            } else if candidates.iter().any(|c| c == prefix) {
                // An exact name that also prefixes others completes as itself.
                complete(partial, &[prefix.to_string()], suffix_space)
            } else {
                None
            }
        },
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl From<DispatchError> for Failure {
    fn from(err: DispatchError) -> Self {
        Failure::new(err.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    use quay_types::sink::MessageLog;

    type Calls = Rc<RefCell<Vec<(i32, i32)>>>;

    fn add_command(calls: &Calls, default_b: bool) -> CommandDescriptor {
        let calls = Rc::clone(calls);
        let builder = CommandDescriptor::builder("add").param::<i32>("a");
        let builder = if default_b {
            builder.optional::<i32>("b", 0)
        } else {
            builder.param::<i32>("b")
        };
        builder
            .describe("Add two integers")
            .build(move |inv| {
                let a: i32 = inv.arg(0)?;
                let b: i32 = inv.arg(1)?;
                calls.borrow_mut().push((a, b));
                inv.message(&format!("{a} + {b} is {}", a + b));
                Ok(())
            })
            .unwrap()
    }

    fn setup(default_b: bool) -> (Dispatcher, Calls) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let mut d = Dispatcher::new();
        d.register(add_command(&calls, default_b)).unwrap();
        (d, calls)
    }

    fn run(d: &Dispatcher, line: &str) -> (DispatchReport, MessageLog) {
        let mut log = MessageLog::default();
        let mut tasks = TaskQueue::new();
        let report = d.execute(line, &mut log, &mut tasks);
        (report, log)
    }

    #[test]
    fn add_two_ints() {
        let (d, calls) = setup(false);
        let (report, log) = run(&d, "add 2 3");
        assert!(report.is_clean());
        assert_eq!(*calls.borrow(), vec![(2, 3)]);
        assert_eq!(log.render(), "2 + 3 is 5");
    }

    #[test]
    fn missing_arg_uses_default() {
        let (d, calls) = setup(true);
        let (report, _) = run(&d, "add 2");
        assert!(report.is_clean());
        assert_eq!(*calls.borrow(), vec![(2, 0)]);
    }

    #[test]
    fn unparsable_arg_uses_default() {
        let (d, calls) = setup(true);
        run(&d, "add 2 x");
        assert_eq!(*calls.borrow(), vec![(2, 0)]);
    }

    #[test]
    fn unparsable_without_default_does_not_invoke() {
        let (d, calls) = setup(false);
        let (report, log) = run(&d, "add x 3");
        assert!(!report.invoked);
        assert_eq!(
            report.diagnostics,
            vec![DispatchError::InvalidArgument("a".into())]
        );
        assert!(calls.borrow().is_empty());
        assert_eq!(log.last().unwrap().level, MessageLevel::Error);
        assert_eq!(log.last().unwrap().text, "missing or invalid argument: a");
    }

    #[test]
    fn missing_required_arg_does_not_invoke() {
        let (d, calls) = setup(false);
        let (report, _) = run(&d, "add 2");
        assert!(!report.invoked);
        assert_eq!(
            report.diagnostics,
            vec![DispatchError::InvalidArgument("b".into())]
        );
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn unknown_command_is_not_found() {
        let (d, calls) = setup(false);
        let (report, log) = run(&d, "frobnicate 1");
        assert!(!report.invoked);
        assert_eq!(report.command, None);
        assert_eq!(
            report.diagnostics,
            vec![DispatchError::NotFound("frobnicate".into())]
        );
        assert_eq!(report.diagnostics[0].status(), ResultStatus::ValueDoesNotExist);
        assert!(calls.borrow().is_empty());
        assert_eq!(log.render(), "error: command not found: frobnicate");
    }

    #[test]
    fn excess_tokens_warn_but_invoke() {
        let (d, calls) = setup(false);
        let (report, log) = run(&d, "add 2 3 4");
        assert!(report.invoked);
        assert_eq!(*calls.borrow(), vec![(2, 3)]);
        assert_eq!(
            report.diagnostics,
            vec![DispatchError::TooManyArguments {
                expected: 2,
                got: 3
            }]
        );
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.errors().count(), 0);
        let first = log.iter().next().unwrap();
        assert_eq!(first.level, MessageLevel::Warning);
        assert_eq!(first.text, "too many arguments: expected 2 got 3");
    }

    #[test]
    fn empty_line_is_noop() {
        let (d, calls) = setup(false);
        let (report, log) = run(&d, "   ");
        assert_eq!(report, DispatchReport::default());
        assert!(log.is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn command_names_are_case_insensitive() {
        let (d, calls) = setup(false);
        run(&d, "ADD 1 1");
        assert_eq!(*calls.borrow(), vec![(1, 1)]);
    }

    #[test]
    fn body_error_is_reported_after_invocation() {
        let mut d = Dispatcher::new();
        d.register(
            CommandDescriptor::builder("fail")
                .build(|_| Err(QuayError::Command("nope".into())))
                .unwrap(),
        )
        .unwrap();
        let (report, log) = run(&d, "fail");
        assert!(report.invoked);
        assert!(matches!(
            report.diagnostics.as_slice(),
            [DispatchError::Invocation { .. }]
        ));
        assert_eq!(log.render(), "error: fail: command error: nope");
    }

    #[test]
    fn body_panic_is_caught() {
        let mut d = Dispatcher::new();
        d.register(
            CommandDescriptor::builder("crash")
                .build(|_| panic!("kaboom"))
                .unwrap(),
        )
        .unwrap();
        let (report, log) = run(&d, "crash");
        assert_eq!(
            report.diagnostics,
            vec![DispatchError::Panicked {
                command: "crash".into(),
                reason: "kaboom".into()
            }]
        );
        assert_eq!(log.last().unwrap().level, MessageLevel::Exception);
    }

    #[test]
    fn duplicate_registration_fails() {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let mut d = Dispatcher::new();
        d.register(add_command(&calls, false)).unwrap();
        let err = d.register(add_command(&calls, true)).unwrap_err();
        assert!(format!("{err}").contains("duplicate command 'add'"));
        // First registration intact: no default for b.
        assert_eq!(d.command("add").unwrap().syntax(), "add <a> <b>");
    }

    #[test]
    fn unsupported_type_rejected_at_registration() {
        struct Opaque;
        let mut d = Dispatcher::new();
        let desc = CommandDescriptor::builder("use")
            .param::<Opaque>("thing")
            .build(|_| Ok(()))
            .unwrap();
        let err = d.register(desc).unwrap_err();
        assert!(format!("{err}").contains("no parser"));
    }

    #[test]
    fn invalid_default_rejected_at_registration() {
        let mut d = Dispatcher::new();
        let desc = CommandDescriptor::builder("wait")
            .optional::<f32>("seconds", "soon")
            .build(|_| Ok(()))
            .unwrap();
        assert!(d.register(desc).is_err());
        assert_eq!(d.count(), 0);
    }

    #[test]
    fn deferred_output_arrives_on_run_due() {
        let mut d = Dispatcher::new();
        d.register(
            CommandDescriptor::builder("wait")
                .param::<f32>("seconds")
                .build(|inv| {
                    let seconds: f32 = inv.arg(0)?;
                    inv.defer(Duration::from_secs_f32(seconds), move |sink| {
                        sink.add_message(&format!("Waited for {seconds:.2}s"));
                    });
                    Ok(())
                })
                .unwrap(),
        )
        .unwrap();
        let mut log = MessageLog::default();
        let mut tasks = TaskQueue::new();
        let report = d.execute("wait 0.5", &mut log, &mut tasks);
        assert!(report.is_clean());
        assert!(log.is_empty());
        assert_eq!(tasks.pending(), 1);
        tasks.run_due(Instant::now() + Duration::from_secs(1), &mut log);
        assert_eq!(log.render(), "Waited for 0.50s");
    }

    #[test]
    fn help_lists_commands() {
        let (d, _) = setup(true);
        let (report, log) = run(&d, "help");
        assert!(report.is_clean());
        let text = log.render();
        assert!(text.starts_with("Commands (1):"));
        assert!(text.contains("add <a> [<b>]"));
        assert!(text.contains("Add two integers"));
    }

    #[test]
    fn help_for_one_command() {
        let (d, _) = setup(false);
        let (_, log) = run(&d, "help add");
        assert_eq!(log.render(), "add <a> <b>\n  Add two integers");
        let (report, _) = run(&d, "help nope");
        assert_eq!(report.diagnostics, vec![DispatchError::NotFound("nope".into())]);
    }

    #[test]
    fn syntax_hint_by_prefix() {
        let (d, _) = setup(true);
        assert_eq!(d.syntax_hint("ad"), Some("add <a> [<b>]".to_string()));
        assert_eq!(d.syntax_hint("add 1"), Some("add <a> [<b>]".to_string()));
        assert_eq!(d.syntax_hint("x"), None);
        assert_eq!(d.syntax_hint(""), None);
    }

    #[test]
    fn syntax_hint_prefers_exact_match() {
        let mut d = Dispatcher::new();
        d.register(CommandDescriptor::builder("tp").build(|_| Ok(())).unwrap())
            .unwrap();
        d.register(
            CommandDescriptor::builder("t")
                .param::<i32>("n")
                .build(|_| Ok(()))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(d.syntax_hint("t"), Some("t <n>".to_string()));
        assert_eq!(d.syntax_hint("tp"), Some("tp".to_string()));
    }

    fn completion_dispatcher() -> Dispatcher {
        let mut d = Dispatcher::new();
        for name in ["give", "god", "goto"] {
            d.register(
                CommandDescriptor::builder(name)
                    .param::<bool>("flag")
                    .build(|_| Ok(()))
                    .unwrap(),
            )
            .unwrap();
        }
        d
    }

    #[test]
    fn completes_unique_command_name() {
        let d = completion_dispatcher();
        assert_eq!(d.auto_completed("gi", true), Some("give ".to_string()));
        assert_eq!(d.auto_completed("gi", false), Some("give".to_string()));
    }

    #[test]
    fn completes_common_prefix() {
        let d = completion_dispatcher();
        assert_eq!(d.auto_completed("go", true), None);
        assert_eq!(d.auto_completed("g", true), None);
        assert_eq!(d.auto_completed("got", true), Some("goto ".to_string()));
    }

    #[test]
    fn completes_argument_suggestions() {
        let d = completion_dispatcher();
        assert_eq!(d.auto_completed("god t", true), Some("god true ".to_string()));
        assert_eq!(d.auto_completed("god ", true), None);
        assert_eq!(d.auto_completed("nope t", true), None);
        assert_eq!(d.auto_completed("god true t", true), None);
    }

    #[test]
    fn exact_name_completes_despite_longer_match() {
        let mut d = Dispatcher::new();
        for name in ["t", "tp"] {
            d.register(CommandDescriptor::builder(name).build(|_| Ok(())).unwrap())
                .unwrap();
        }
        assert_eq!(d.auto_completed("t", true), Some("t ".to_string()));
        assert_eq!(d.auto_completed("t", false), None);
        assert_eq!(d.auto_completed("T", true), Some("t ".to_string()));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn binds_any_int_pair(a in any::<i32>(), b in any::<i32>(), extra in 0usize..4) {
                let (d, calls) = setup(false);
                let mut line = format!("add {a} {b}");
                for i in 0..extra {
                    line.push_str(&format!(" {i}"));
                }
                let (report, _) = run(&d, &line);
                prop_assert!(report.invoked);
                prop_assert_eq!(calls.borrow().clone(), vec![(a, b)]);
                prop_assert_eq!(report.warnings().count(), usize::from(extra > 0));
            }

            #[test]
            fn unknown_names_never_invoke(name in "[a-z]{1,8}") {
                prop_assume!(name != "add" && name != "help");
                let (d, calls) = setup(false);
                let (report, _) = run(&d, &format!("{name} 1 2"));
                prop_assert!(!report.invoked);
                prop_assert!(calls.borrow().is_empty());
            }
        }
    }

    #[test]
    fn common_prefix_of_shared_stem() {
        let out = complete("s", &["shield".to_string(), "shovel".to_string()], true);
        assert_eq!(out, Some("sh".to_string()));
    }
}
