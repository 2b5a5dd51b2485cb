//! Command declaration and dispatch.
//!
//! A command is a [`CommandDescriptor`]: a name, ordered parameter specs and
//! a callable. Descriptors are declared with [`command_set!`], built by hand
//! with [`CommandDescriptor::builder`], or loaded as [`CommandRecord`]s. The
//! [`Dispatcher`] turns a line of text into a call: it tokenizes, resolves the
//! command, binds each token through the parser table, and invokes it,
//! reporting every failure to a message sink instead of returning it.

pub mod descriptor;
pub mod dispatcher;
pub mod invocation;
mod macros;
pub mod record;
pub mod schedule;

/// Declared command: name, parameters, callable.
pub use descriptor::CommandDescriptor;
/// Builder for descriptors.
pub use descriptor::CommandBuilder;
/// A group of commands declared together.
pub use descriptor::CommandSet;
/// One declared parameter.
pub use descriptor::ParamSpec;
/// Per-line failure reported by the dispatcher.
pub use dispatcher::DispatchError;
/// Summary of one dispatched line.
pub use dispatcher::DispatchReport;
/// Command table plus parser table.
pub use dispatcher::Dispatcher;
/// Bound arguments of one call.
pub use invocation::Args;
/// Context handed to a running command.
pub use invocation::Invocation;
/// Named callables for record commands.
pub use record::ActionTable;
/// Declarative command record.
pub use record::CommandRecord;
/// Deferred work scheduled by commands.
pub use schedule::{TaskId, TaskQueue};

#[doc(hidden)]
pub mod __private {
    pub use quay_types::error::Result;
}
