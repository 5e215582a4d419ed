//! Language file loading.
//!
//! A language file lists the locales it applies to and a tree of messages:
//!
//! ```yaml
//! config:
//!   locales: [en_us, en_gb]
//! messages:
//!   command:
//!     locale:
//!       usage: "Usage: /locale [player]"
//! ```
//!
//! Every string leaf becomes a message keyed by its dotted path
//! (`command.locale.usage`) under the loader's namespace.

use crate::error::{LocaleError, Result};
use crate::i18n::{LanguageRegistry, MessageKey};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct LanguageFile {
    #[serde(default)]
    config: LanguageFileHeader,
    messages: Option<Mapping>,
}

#[derive(Debug, Default, Deserialize)]
struct LanguageFileHeader {
    #[serde(default, alias = "aliases")]
    locales: Vec<String>,

    #[serde(default)]
    suppress_section_warnings: bool,
}

/// Loads language files from one directory into a registry.
#[derive(Debug, Clone)]
pub struct LanguageLoader {
    /// Namespace given to every key this loader creates
    namespace: String,
    directory: PathBuf,
    suppress_section_warnings: bool,
}

impl LanguageLoader {
    pub fn new(
        namespace: impl Into<String>,
        directory: impl Into<PathBuf>,
        suppress_section_warnings: bool,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            directory: directory.into(),
            suppress_section_warnings,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load `<name>.yml` from the language directory.
    ///
    /// # Returns
    /// The keys of every message registered from the file.
    pub fn load_language_file(&self, registry: &mut LanguageRegistry, name: &str) -> Result<Vec<MessageKey>> {
        if name.is_empty() {
            return Err(LocaleError::InvalidArgument(
                "File Name cannot be empty.".to_string(),
            ));
        }

        let file_name = if name.ends_with(".yml") || name.ends_with(".yaml") {
            name.to_string()
        } else {
            format!("{}.yml", name)
        };
        let path = self.directory.join(file_name);

        let contents = std::fs::read_to_string(&path).map_err(|source| LocaleError::Io {
            path: path.display().to_string(),
            source,
        })?;

        self.load_language_str(registry, &path.display().to_string(), &contents)
    }

    /// Load a language document already read into memory.
    ///
    /// `source` names the document in errors and log lines.
    pub fn load_language_str(
        &self,
        registry: &mut LanguageRegistry,
        source: &str,
        contents: &str,
    ) -> Result<Vec<MessageKey>> {
        let file: LanguageFile = serde_yaml::from_str(contents).map_err(|e| LocaleError::Yaml {
            path: source.to_string(),
            source: e,
        })?;

        let messages = file.messages.ok_or_else(|| {
            LocaleError::Config(format!(
                "messages section could not be found in language file {}",
                source
            ))
        })?;

        let suppress = self.suppress_section_warnings || file.config.suppress_section_warnings;
        let locales: Vec<&str> = file.config.locales.iter().map(String::as_str).collect();

        let keys = self.load_language(registry, source, &messages, &locales, suppress)?;
        info!(
            "Loaded {} messages for {:?} from {}",
            keys.len(),
            locales,
            source
        );
        Ok(keys)
    }

    /// Register every string leaf of `messages` for `locales`.
    fn load_language(
        &self,
        registry: &mut LanguageRegistry,
        source: &str,
        messages: &Mapping,
        locales: &[&str],
        suppress: bool,
    ) -> Result<Vec<MessageKey>> {
        if locales.is_empty() {
            return Err(LocaleError::InvalidArgument(format!(
                "Language file {} does not list any locales.",
                source
            )));
        }

        let mut entries = Vec::new();
        flatten(messages, "", &mut entries, &mut |path: &str, value: &Value| {
            if !suppress {
                warn!(
                    "Non-message tag in language file {}: {} ({}). Ignoring.",
                    source,
                    path,
                    value_kind(value)
                );
            }
        });

        let mut keys = Vec::with_capacity(entries.len());
        for (path, message) in entries {
            if message.is_empty() {
                warn!("Empty Message in language file {}: {}. Ignoring.", source, path);
                continue;
            }

            let key = registry.lookup_or_create_key(&self.namespace, &path)?;
            registry.register(&key, message, locales)?;
            keys.push(key);
        }

        Ok(keys)
    }
}

/// Collect `(dotted.path, text)` for every string leaf, reporting other
/// leaves through `skipped`.
fn flatten<'a>(
    mapping: &'a Mapping,
    prefix: &str,
    out: &mut Vec<(String, &'a str)>,
    skipped: &mut dyn FnMut(&str, &Value),
) {
    for (key, value) in mapping {
        let Some(segment) = key_segment(key) else {
            skipped(prefix, key);
            continue;
        };
        let path = if prefix.is_empty() {
            segment
        } else {
            format!("{}.{}", prefix, segment)
        };

        match value {
            Value::String(text) => out.push((path, text.as_str())),
            Value::Mapping(child) => flatten(child, &path, out, skipped),
            other => skipped(&path, other),
        }
    }
}

fn key_segment(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "section",
        Value::Tagged(_) => "tagged value",
    }
}
