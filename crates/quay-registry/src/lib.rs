//! Keyed registries and argument parsing.
//!
//! A [`Registry`] is a unique-key store populated incrementally or in bulk
//! from a [`ContentSource`]. The [`ParserTable`] maps value types to
//! text-to-value conversions and is what the dispatcher uses to bind command
//! arguments.

pub mod parser;
pub mod registry;
pub mod source;

/// Text-to-value conversion for one argument type.
pub use parser::ArgParser;
/// Map from value type to parser, with built-ins for primitives.
pub use parser::ParserTable;
/// Parser that resolves tokens as keys of a shared registry.
pub use parser::RegistryParser;
/// Type-erased parsed argument.
pub use parser::Value;
/// Identifier of an argument value type.
pub use parser::ValueType;
/// Unique-key store.
pub use registry::Registry;
/// Read access shared by `Registry` and `SharedRegistry`.
pub use registry::RegistryRead;
/// Read-only, cheaply clonable registry facade.
pub use registry::SharedRegistry;
/// External enumerable content used for bulk registry loads.
pub use source::ContentSource;
/// Content source backed by TOML/JSON files on disk.
pub use source::DirectorySource;
/// Content source backed by in-memory entries.
pub use source::MemorySource;
