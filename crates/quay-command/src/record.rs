//! Declarative command records.
//!
//! A record names its arguments by type name and its body by action name, so
//! commands can live in content files:
//!
//! ```toml
//! name = "greet"
//! description = "Say hello"
//! action = "echo"
//!
//! [[arguments]]
//! name = "who"
//! type = "string"
//! default = "world"
//! ```

use std::rc::Rc;

use serde::Deserialize;

use quay_registry::{ContentSource, ParserTable, Registry, RegistryRead};
use quay_types::error::{QuayError, Result};

use crate::descriptor::{CommandDescriptor, CommandFn, ParamSpec};
use crate::invocation::Invocation;

fn default_type_name() -> String {
    "int".to_string()
}

/// One argument of a record command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentRecord {
    pub name: String,
    /// Type name resolved through [`ParserTable::resolve`].
    #[serde(rename = "type", default = "default_type_name")]
    pub type_name: String,
    #[serde(default)]
    pub default: Option<String>,
}

/// A command as stored in content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentRecord>,
    /// Key into the [`ActionTable`].
    pub action: String,
}

impl CommandRecord {
    /// Resolve argument types and the action, producing a descriptor.
    pub fn to_descriptor(
        &self,
        parsers: &ParserTable,
        actions: &ActionTable,
    ) -> Result<CommandDescriptor> {
        let mut builder = CommandDescriptor::builder(&self.name).describe(&self.description);
        for arg in &self.arguments {
            let ty = parsers.resolve(&arg.type_name).map_err(|_| {
                QuayError::Registration(format!(
                    "{}: unknown type '{}' for argument '{}'",
                    self.name, arg.type_name, arg.name
                ))
            })?;
            builder = builder.param_spec(ParamSpec::new(&arg.name, ty, arg.default.clone()));
        }
        let run = actions.get(&self.action).map_err(|_| {
            QuayError::Registration(format!("{}: unknown action '{}'", self.name, self.action))
        })?;
        builder.build_shared(run)
    }
}

/// Named callables that record commands bind to.
#[derive(Default)]
pub struct ActionTable {
    actions: Registry<String, CommandFn>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action. Fails if the name is taken.
    pub fn insert<F>(&mut self, name: &str, action: F) -> Result<()>
    where
        F: Fn(&mut Invocation<'_>) -> Result<()> + 'static,
    {
        self.actions
            .try_register(name.to_string(), Rc::new(action))
            .map_err(|_| QuayError::Registration(format!("duplicate action '{name}'")))
    }

    pub fn get(&self, name: &str) -> quay_types::Outcome<CommandFn> {
        self.actions.try_get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.actions.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.actions.keys();
        names.sort();
        f.debug_struct("ActionTable").field("actions", &names).finish()
    }
}

/// Load every record of `category`, rejecting duplicate names.
///
/// Returned records are sorted by name. Nothing is returned unless the
/// whole category loads.
pub fn load_records<S>(source: &S, category: &str) -> Result<Vec<CommandRecord>>
where
    S: ContentSource<CommandRecord> + ?Sized,
{
    let mut registry: Registry<String, CommandRecord> = Registry::new();
    registry.init(source, category, |r| r.name.to_ascii_lowercase())?;
    let mut records: Vec<CommandRecord> = registry.iter().map(|(_, r)| r.clone()).collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(records)
}
