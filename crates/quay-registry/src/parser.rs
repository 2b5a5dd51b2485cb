//! Argument parser table.
//!
//! Maps a value type to a text-to-value conversion. At most one parser exists
//! per type: registering again for the same type replaces the earlier parser
//! (last writer wins, not an error). Parsers may also offer completion
//! candidates for a partially typed token.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use quay_types::status::{Failure, Outcome, ResultStatus};

use crate::registry::{RegistryRead, SharedRegistry};

/// A parsed, type-erased argument value.
pub type Value = Box<dyn Any>;

/// Identifier of an argument value type.
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    /// Short type name, e.g. `i32` or `String`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueType({})", self.name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path from a type name, keeping generics out of the way:
/// `alloc::string::String` becomes `String`.
fn short_type_name(full: &'static str) -> &'static str {
    let base = match full.find('<') {
        Some(i) => &full[..i],
        None => full,
    };
    base.rsplit("::").next().unwrap_or(base)
}

/// Text-to-value conversion for one argument type.
pub trait ArgParser {
    type Value: Any;

    fn parse(&self, text: &str) -> Outcome<Self::Value>;

    /// Completion candidates for a partially typed token.
    fn suggestions(&self, _partial: &str) -> Vec<String> {
        Vec::new()
    }
}

trait ErasedParser {
    fn parse_value(&self, text: &str) -> Outcome<Value>;
    fn suggestions(&self, partial: &str) -> Vec<String>;
}

impl<P: ArgParser> ErasedParser for P {
    fn parse_value(&self, text: &str) -> Outcome<Value> {
        self.parse(text).map(|v| Box::new(v) as Value)
    }

    fn suggestions(&self, partial: &str) -> Vec<String> {
        ArgParser::suggestions(self, partial)
    }
}

/// Adapter turning a closure into an [`ArgParser`].
struct FnParser<T, F> {
    parse: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any, F: Fn(&str) -> Outcome<T>> ArgParser for FnParser<T, F> {
    type Value = T;

    fn parse(&self, text: &str) -> Outcome<T> {
        (self.parse)(text)
    }
}

struct Entry {
    ty: ValueType,
    parser: Box<dyn ErasedParser>,
}

/// Map from value type to parser.
pub struct ParserTable {
    parsers: HashMap<TypeId, Entry>,
    names: HashMap<String, ValueType>,
}

impl ParserTable {
    /// An empty table with no parsers at all.
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// A table with parsers for the primitive types: `i32`, `i64`, `u32`,
    /// `u64`, `f32`, `f64`, `bool`, `char` and `String`. Records may also
    /// refer to `int`, `long`, `float`, `double` and `string`.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register::<i32, _>(parse_int::<i32>);
        table.register::<i64, _>(parse_int::<i64>);
        table.register::<u32, _>(parse_int::<u32>);
        table.register::<u64, _>(parse_int::<u64>);
        table.register::<f32, _>(parse_float::<f32>);
        table.register::<f64, _>(parse_float::<f64>);
        table.register::<char, _>(parse_char);
        table.register::<String, _>(|text: &str| Ok(text.to_string()));
        table.register_parser(BoolParser);
        table.alias::<i32>("int");
        table.alias::<i64>("long");
        table.alias::<f32>("float");
        table.alias::<f64>("double");
        table.alias::<String>("string");
        table
    }

    /// Register a closure parser for `T`, replacing any earlier one.
    pub fn register<T, F>(&mut self, parse: F)
    where
        T: Any,
        F: Fn(&str) -> Outcome<T> + 'static,
    {
        self.register_parser(FnParser {
            parse,
            _marker: PhantomData,
        });
    }

    /// Register a parser for its value type, replacing any earlier one.
    pub fn register_parser<P>(&mut self, parser: P)
    where
        P: ArgParser + 'static,
    {
        let ty = ValueType::of::<P::Value>();
        let entry = Entry {
            ty,
            parser: Box::new(parser),
        };
        if self.parsers.insert(ty.id(), entry).is_some() {
            log::debug!("Replaced argument parser for {ty}");
        } else {
            log::debug!("Registered argument parser for {ty}");
        }
        self.bind_name(ty.name(), ty);
    }

    /// Make `name` resolve to `T` in [`resolve`](Self::resolve).
    pub fn alias<T: Any>(&mut self, name: &str) {
        self.bind_name(name, ValueType::of::<T>());
    }

    /// Point `name` at `ty`. Short names are not unique across modules, so a
    /// name taken by another type is rebound with a warning.
    fn bind_name(&mut self, name: &str, ty: ValueType) {
        if let Some(old) = self.names.insert(name.to_string(), ty) {
            if old != ty {
                log::warn!(
                    "Type name '{name}' rebound from one {old} type to another; alias one of them"
                );
            }
        }
    }

    /// Resolve a type by name. Fails with `ValueDoesNotExist` if the name is
    /// unknown or has no parser.
    pub fn resolve(&self, name: &str) -> Outcome<ValueType> {
        self.names
            .get(name)
            .copied()
            .filter(|ty| self.supports(ty))
            .ok_or(Failure::new(ResultStatus::ValueDoesNotExist))
    }

    pub fn supports(&self, ty: &ValueType) -> bool {
        self.parsers.contains_key(&ty.id())
    }

    /// All types with a parser, sorted by name.
    pub fn supported_types(&self) -> Vec<ValueType> {
        let mut types: Vec<ValueType> = self.parsers.values().map(|e| e.ty).collect();
        types.sort_by_key(|t| t.name());
        types
    }

    /// Parse `text` as `ty`. Fails with `ValueDoesNotExist` when no parser is
    /// registered, otherwise returns the parser's own outcome.
    pub fn try_parse(&self, ty: &ValueType, text: &str) -> Outcome<Value> {
        match self.parsers.get(&ty.id()) {
            Some(entry) => entry.parser.parse_value(text),
            None => Err(Failure::new(ResultStatus::ValueDoesNotExist)),
        }
    }

    /// Typed convenience over [`try_parse`](Self::try_parse).
    pub fn parse<T: Any>(&self, text: &str) -> Outcome<T> {
        let value = self.try_parse(&ValueType::of::<T>(), text)?;
        value
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| Failure::new(ResultStatus::Failed))
    }

    /// Completion candidates for a partial token of type `ty`.
    pub fn suggestions(&self, ty: &ValueType, partial: &str) -> Vec<String> {
        self.parsers
            .get(&ty.id())
            .map(|e| e.parser.suggestions(partial))
            .unwrap_or_default()
    }
}

impl Default for ParserTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.supported_types()).finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in parsers
// ---------------------------------------------------------------------------

fn parse_int<T: FromStr<Err = ParseIntError>>(text: &str) -> Outcome<T> {
    text.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            Failure::new(ResultStatus::OutOfRange)
        },
        _ => Failure::new(ResultStatus::Failed),
    })
}

fn parse_float<T: FromStr>(text: &str) -> Outcome<T> {
    text.parse::<T>()
        .map_err(|_| Failure::new(ResultStatus::Failed))
}

fn parse_char(text: &str) -> Outcome<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Failure::new(ResultStatus::Failed)),
    }
}

struct BoolParser;

impl ArgParser for BoolParser {
    type Value = bool;

    fn parse(&self, text: &str) -> Outcome<bool> {
        match text.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Failure::new(ResultStatus::Failed)),
        }
    }

    fn suggestions(&self, partial: &str) -> Vec<String> {
        let lower = partial.to_ascii_lowercase();
        ["false", "true"]
            .into_iter()
            .filter(|s| s.starts_with(&lower))
            .map(str::to_string)
            .collect()
    }
}

/// Parses a token as a key of a shared registry, yielding a clone of the
/// stored value. Suggests matching keys.
pub struct RegistryParser<V> {
    registry: SharedRegistry<String, V>,
}

impl<V> RegistryParser<V> {
    pub fn new(registry: SharedRegistry<String, V>) -> Self {
        Self { registry }
    }
}

impl<V: Clone + Any> ArgParser for RegistryParser<V> {
    type Value = V;

    fn parse(&self, text: &str) -> Outcome<V> {
        self.registry.try_get(text).cloned()
    }

    fn suggestions(&self, partial: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .registry
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(partial))
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}
