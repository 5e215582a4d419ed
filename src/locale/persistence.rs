//! On-disk storage of locale overrides.
//!
//! The file is a flat YAML mapping of hyphenated UUID to locale, preceded by
//! a comment header.

use crate::error::{LocaleError, Result};
use chrono::Utc;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const LOCALE_OVERRIDE_FILE_NAME: &str = "locale_overrides.yml";

const HEADER: &str = "A Map of UUIDs and their Locale Cache Overrides.";

#[derive(Debug, Clone)]
pub struct OverrideFile {
    path: PathBuf,
}

impl OverrideFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `locale_overrides.yml` inside `directory`.
    pub fn in_directory(directory: &Path) -> Self {
        Self::new(directory.join(LOCALE_OVERRIDE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry in the file.
    ///
    /// A missing or empty file yields an empty map. Entries whose key or
    /// value is not a scalar string are skipped with a warning.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            info!("No locale override file at {}", self.path.display());
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| LocaleError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        let document: Value = serde_yaml::from_str(&contents).map_err(|source| LocaleError::Yaml {
            path: self.path.display().to_string(),
            source,
        })?;

        let mapping = match document {
            Value::Null => return Ok(BTreeMap::new()),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(LocaleError::Config(format!(
                    "locale override file {} is not a mapping",
                    self.path.display()
                )))
            }
        };

        let mut entries = BTreeMap::new();
        for (key, value) in mapping {
            match (key, value) {
                (Value::String(id), Value::String(locale)) => {
                    entries.insert(id, locale);
                }
                (key, _) => warn!(
                    "Skipping non-string locale override entry {:?} in {}",
                    key,
                    self.path.display()
                ),
            }
        }

        Ok(entries)
    }

    /// Replace the file with `entries`, creating parent directories.
    pub fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let io_error = |source| LocaleError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let body = if entries.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(entries).map_err(|source| LocaleError::Yaml {
                path: self.path.display().to_string(),
                source,
            })?
        };

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M UTC");
        let contents = format!("# {}\n# Saved {}\n{}", HEADER, timestamp, body);
        std::fs::write(&self.path, contents).map_err(io_error)?;

        info!("Saved {} locale overrides to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let file = OverrideFile::in_directory(temp_dir.path());
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = OverrideFile::in_directory(&temp_dir.path().join("nested"));

        let mut entries = BTreeMap::new();
        entries.insert("8667ba71-b85a-4004-af54-457a9734eed7".to_string(), "fr_fr".to_string());
        entries.insert("3f0c2a47-36a4-4c4f-9d8e-0ef8a1f3a0b2".to_string(), "haw".to_string());
        file.save(&entries).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("# A Map of UUIDs and their Locale Cache Overrides."));

        assert_eq!(file.load().unwrap(), entries);
    }

    #[test]
    fn test_save_empty_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = OverrideFile::in_directory(temp_dir.path());

        file.save(&BTreeMap::new()).unwrap();
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_non_string_entries_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let file = OverrideFile::in_directory(temp_dir.path());
        std::fs::write(
            file.path(),
            "8667ba71-b85a-4004-af54-457a9734eed7: fr_fr\n12: de_de\nabc: [x]\n",
        )
        .unwrap();

        let entries = file.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["8667ba71-b85a-4004-af54-457a9734eed7"], "fr_fr");
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = OverrideFile::in_directory(temp_dir.path());
        std::fs::write(file.path(), "key: [unclosed").unwrap();

        assert!(matches!(file.load(), Err(LocaleError::Yaml { .. })));
    }

    #[test]
    fn test_non_mapping_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = OverrideFile::in_directory(temp_dir.path());
        std::fs::write(file.path(), "- a\n- b\n").unwrap();

        assert!(matches!(file.load(), Err(LocaleError::Config(_))));
    }
}
