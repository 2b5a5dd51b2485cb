//! Demo content: items and record commands.
//!
//! Content is read from a directory when one exists; otherwise the copies
//! embedded at build time are used.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use quay_command::CommandRecord;
use quay_command::record::load_records;
use quay_registry::{ContentSource, DirectorySource, MemorySource, Registry};
use quay_types::QuayError;
use quay_types::error::Result;

/// An inventory item, looked up by name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub description: String,
}

const EMBEDDED_ITEMS: &[(&str, &str)] = &[
    ("items/shield.toml", include_str!("../../../content/items/shield.toml")),
    ("items/sword.toml", include_str!("../../../content/items/sword.toml")),
];

const EMBEDDED_COMMANDS: &[(&str, &str)] = &[
    ("commands/greet.toml", include_str!("../../../content/commands/greet.toml")),
    ("commands/shout.toml", include_str!("../../../content/commands/shout.toml")),
];

fn embedded<V: DeserializeOwned>(
    category: &str,
    files: &[(&str, &str)],
) -> Result<MemorySource<V>> {
    let mut source = MemorySource::new();
    for (id, text) in files {
        let value = toml::from_str(text).map_err(|e| QuayError::Content(format!("{id}: {e}")))?;
        source.insert(category, id, value);
    }
    Ok(source)
}

/// Where content comes from.
pub enum Content {
    Directory(DirectorySource),
    Embedded,
}

impl Content {
    /// Use `root` if it is a directory, else the embedded copies.
    pub fn locate(root: &Path) -> Self {
        if root.is_dir() {
            log::info!("Loading content from {}", root.display());
            Content::Directory(DirectorySource::new(root))
        } else {
            log::info!("No content at {}, using embedded defaults", root.display());
            Content::Embedded
        }
    }

    /// Load every item, keyed by name.
    pub fn items(&self) -> Result<Registry<String, Item>> {
        let mut registry = Registry::new();
        let key = |item: &Item| item.name.to_ascii_lowercase();
        match self {
            Content::Directory(source) => registry.init(source, "items", key)?,
            Content::Embedded => {
                let source: MemorySource<Item> = embedded("items", EMBEDDED_ITEMS)?;
                registry.init(&source, "items", key)?
            },
        };
        Ok(registry)
    }

    /// Load every record command.
    pub fn commands(&self) -> Result<Vec<CommandRecord>> {
        match self {
            Content::Directory(source) => load_records(source, "commands"),
            Content::Embedded => {
                let source: MemorySource<CommandRecord> =
                    embedded("commands", EMBEDDED_COMMANDS)?;
                load_records(&source, "commands")
            },
        }
    }

    /// Whether `category` has any entries; used to skip optional content.
    pub fn has(&self, category: &str) -> bool {
        match self {
            Content::Directory(source) => {
                ContentSource::<Item>::find(source, category).is_ok_and(|ids| !ids.is_empty())
            },
            Content::Embedded => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quay_registry::RegistryRead;

    #[test]
    fn embedded_content_loads() {
        let content = Content::Embedded;
        let items = content.items().unwrap();
        assert_eq!(items.count(), 2);
        assert_eq!(items.try_get("sword").unwrap().value, 20);

        let names: Vec<String> = content
            .commands()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["greet", "shout"]);
    }

    #[test]
    fn directory_content_loads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("items")).unwrap();
        std::fs::write(
            dir.path().join("items/lamp.json"),
            r#"{"name":"Lamp","value":7}"#,
        )
        .unwrap();
        let content = Content::locate(dir.path());
        assert!(content.has("items"));
        assert!(!content.has("commands"));
        let items = content.items().unwrap();
        assert_eq!(items.try_get("lamp").unwrap().name, "Lamp");
    }

    #[test]
    fn missing_directory_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let content = Content::locate(&dir.path().join("absent"));
        assert!(matches!(content, Content::Embedded));
    }
}
