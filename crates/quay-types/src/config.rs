//! Console configuration loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{QuayError, Result};

/// Tunables for a console instance. Every field has a default, so an empty
/// TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Maximum number of lines kept in the message log; oldest are dropped.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    /// Whether the input session computes syntax hints while typing.
    #[serde(default = "yes")]
    pub show_hints: bool,
    /// Optional prefix that routes a line to the message handler with the
    /// prefix stripped, so text that starts with the command prefix can
    /// still be posted as a plain message.
    #[serde(default)]
    pub message_prefix: Option<char>,
    /// Prefix character routed to the command handler.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,
    /// Append a space after a unique completion.
    #[serde(default = "yes")]
    pub complete_suffix_space: bool,
}

fn default_max_messages() -> usize {
    256
}
fn default_command_prefix() -> char {
    '/'
}
fn yes() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            show_hints: true,
            message_prefix: None,
            command_prefix: default_command_prefix(),
            complete_suffix_space: true,
        }
    }
}

impl ConsoleConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ConsoleConfig =
            toml::from_str(text).map_err(|e| QuayError::Config(format!("console.toml: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loading console config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Check field invariants. Called by the loaders; hosts that build a
    /// config by hand can call it directly.
    pub fn validate(&self) -> Result<()> {
        if self.max_messages == 0 {
            return Err(QuayError::Config("max_messages must be at least 1".into()));
        }
        if self.command_prefix.is_whitespace() {
            return Err(QuayError::Config(
                "command_prefix must not be whitespace".into(),
            ));
        }
        if let Some(prefix) = self.message_prefix {
            if prefix.is_whitespace() {
                return Err(QuayError::Config(
                    "message_prefix must not be whitespace".into(),
                ));
            }
            if prefix == self.command_prefix {
                return Err(QuayError::Config(format!(
                    "message_prefix '{prefix}' clashes with command_prefix"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = ConsoleConfig::from_toml("").unwrap();
        assert_eq!(cfg, ConsoleConfig::default());
    }

    #[test]
    fn overrides_single_field() {
        let cfg = ConsoleConfig::from_toml("max_messages = 8\ncommand_prefix = \"!\"").unwrap();
        assert_eq!(cfg.max_messages, 8);
        assert_eq!(cfg.command_prefix, '!');
        assert!(cfg.show_hints);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = ConsoleConfig::from_toml("max_messages = 0").unwrap_err();
        assert!(matches!(err, QuayError::Config(_)));
    }

    #[test]
    fn whitespace_prefix_rejected() {
        let err = ConsoleConfig::from_toml("command_prefix = \" \"").unwrap_err();
        assert!(matches!(err, QuayError::Config(_)));
    }

    #[test]
    fn message_prefix_must_differ() {
        let cfg = ConsoleConfig::from_toml("message_prefix = \"'\"").unwrap();
        assert_eq!(cfg.message_prefix, Some('\''));
        let err = ConsoleConfig::from_toml("message_prefix = \"/\"").unwrap_err();
        assert!(format!("{err}").contains("clashes"));
    }

    #[test]
    fn unknown_field_rejected() {
        let err = ConsoleConfig::from_toml("colour = \"red\"").unwrap_err();
        assert!(format!("{err}").contains("console.toml"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.toml");
        std::fs::write(&path, "show_hints = false").unwrap();
        let cfg = ConsoleConfig::load(&path).unwrap();
        assert!(!cfg.show_hints);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConsoleConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, QuayError::Io(_)));
    }
}
