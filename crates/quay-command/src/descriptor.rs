//! Command descriptors.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use quay_registry::ValueType;
use quay_types::error::{QuayError, Result};

use crate::invocation::Invocation;

/// Callable behind a command.
pub type CommandFn = Rc<dyn Fn(&mut Invocation<'_>) -> Result<()>>;

/// One declared parameter: name, value type and optional default (as text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    name: String,
    ty: ValueType,
    default: Option<String>,
}

impl ParamSpec {
    pub fn required<T: Any>(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::of::<T>(), None)
    }

    /// An optional parameter; `default` is parsed like a typed token.
    pub fn optional<T: Any>(name: impl Into<String>, default: impl ToString) -> Self {
        Self::new(name, ValueType::of::<T>(), Some(default.to_string()))
    }

    pub fn new(name: impl Into<String>, ty: ValueType, default: Option<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ValueType {
        &self.ty
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_optional() {
            write!(f, "[<{}>]", self.name)
        } else {
            write!(f, "<{}>", self.name)
        }
    }
}

/// A registered command. Immutable once built.
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    syntax: String,
    run: CommandFn,
}

impl CommandDescriptor {
    /// Start declaring a command. The name is normalized to ASCII lowercase.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into().to_ascii_lowercase(),
            description: String::new(),
            params: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Number of leading parameters without a default.
    pub fn required_arity(&self) -> usize {
        self.params.iter().filter(|p| !p.is_optional()).count()
    }

    /// Usage line, e.g. `add <a> [<b>]`.
    pub fn syntax(&self) -> &str {
        &self.syntax
    }

    pub(crate) fn invoke(&self, inv: &mut Invocation<'_>) -> Result<()> {
        (self.run)(inv)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn generate_syntax(name: &str, params: &[ParamSpec]) -> String {
    let mut out = name.to_string();
    for p in params {
        out.push(' ');
        out.push_str(&p.to_string());
    }
    out
}

/// Builder returned by [`CommandDescriptor::builder`].
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
}

impl CommandBuilder {
    /// One-line description for `help`.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn param<T: Any>(self, name: &str) -> Self {
        self.param_spec(ParamSpec::required::<T>(name))
    }

    pub fn optional<T: Any>(self, name: &str, default: impl ToString) -> Self {
        self.param_spec(ParamSpec::optional::<T>(name, default))
    }

    pub fn param_spec(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Finish the descriptor.
    ///
    /// Fails if the name is empty or contains whitespace, if two parameters
    /// share a name, or if a required parameter follows an optional one.
    pub fn build<F>(self, run: F) -> Result<CommandDescriptor>
    where
        F: Fn(&mut Invocation<'_>) -> Result<()> + 'static,
    {
        self.build_shared(Rc::new(run))
    }

    /// Like [`build`](Self::build) with an already shared callable.
    pub fn build_shared(self, run: CommandFn) -> Result<CommandDescriptor> {
        if self.name.is_empty() || self.name.chars().any(char::is_whitespace) {
            return Err(QuayError::Registration(format!(
                "invalid command name '{}'",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        let mut saw_optional = false;
        for p in &self.params {
            if !seen.insert(p.name()) {
                return Err(QuayError::Registration(format!(
                    "{}: duplicate parameter '{}'",
                    self.name,
                    p.name()
                )));
            }
            if p.is_optional() {
                saw_optional = true;
            } else if saw_optional {
                return Err(QuayError::Registration(format!(
                    "{}: required parameter '{}' follows an optional one",
                    self.name,
                    p.name()
                )));
            }
        }

        let syntax = generate_syntax(&self.name, &self.params);
        Ok(CommandDescriptor {
            name: self.name,
            description: self.description,
            params: self.params,
            syntax,
            run,
        })
    }
}

/// A group of commands declared together, usually with [`command_set!`](crate::command_set).
pub trait CommandSet {
    fn commands() -> Result<Vec<CommandDescriptor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Invocation<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn syntax_wraps_optional_params() {
        let desc = CommandDescriptor::builder("add")
            .param::<i32>("a")
            .optional::<i32>("b", 0)
            .build(noop)
            .unwrap();
        assert_eq!(desc.syntax(), "add <a> [<b>]");
        assert_eq!(desc.arity(), 2);
        assert_eq!(desc.required_arity(), 1);
    }

    #[test]
    fn no_params_syntax_is_name() {
        let desc = CommandDescriptor::builder("clear").build(noop).unwrap();
        assert_eq!(desc.syntax(), "clear");
    }

    #[test]
    fn name_is_lowercased() {
        let desc = CommandDescriptor::builder("Teleport").build(noop).unwrap();
        assert_eq!(desc.name(), "teleport");
    }

    #[test]
    fn default_is_kept_as_text() {
        let spec = ParamSpec::optional::<f32>("seconds", 1.5);
        assert_eq!(spec.default(), Some("1.5"));
        assert!(spec.ty().is::<f32>());
        assert_eq!(spec.to_string(), "[<seconds>]");
    }

    #[test]
    fn required_after_optional_rejected() {
        let err = CommandDescriptor::builder("bad")
            .optional::<i32>("a", 1)
            .param::<i32>("b")
            .build(noop)
            .unwrap_err();
        assert!(format!("{err}").contains("follows an optional"));
    }

    #[test]
    fn duplicate_param_rejected() {
        let err = CommandDescriptor::builder("bad")
            .param::<i32>("a")
            .param::<f32>("a")
            .build(noop)
            .unwrap_err();
        assert!(matches!(err, QuayError::Registration(_)));
    }

    #[test]
    fn whitespace_name_rejected() {
        assert!(CommandDescriptor::builder("two words").build(noop).is_err());
        assert!(CommandDescriptor::builder("").build(noop).is_err());
    }

    #[test]
    fn describe_sets_description() {
        let desc = CommandDescriptor::builder("x")
            .describe("does x")
            .build(noop)
            .unwrap();
        assert_eq!(desc.description(), "does x");
    }
}
