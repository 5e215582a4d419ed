//! Language table: every message known for a single locale.
//!
//! A `Language` is a plain dictionary. Fallback between locales is the
//! registry's job, so every accessor here is strict about missing keys.

use crate::error::{LocaleError, Result};
use crate::i18n::{LocaleValidator, MessageKey};
use std::collections::HashMap;

/// All messages associated with one locale.
#[derive(Debug, Clone)]
pub struct Language {
    /// Locale this table serves (e.g., "en_us", "haw")
    locale: String,

    messages: HashMap<MessageKey, String>,
}

impl Language {
    /// Create an empty table for `locale`.
    ///
    /// # Returns
    /// * `Ok(Language)` if the locale passes validation
    /// * `Err(LocaleError::Format)` otherwise
    pub fn new(locale: &str) -> Result<Self> {
        LocaleValidator::validate(locale)?;
        Ok(Self {
            locale: locale.to_string(),
            messages: HashMap::new(),
        })
    }

    /// Add a message.
    ///
    /// Fails with `DuplicateMessage` if the key is already present; the
    /// stored message is left untouched.
    pub fn add_message(&mut self, key: MessageKey, message: impl Into<String>) -> Result<()> {
        if self.messages.contains_key(&key) {
            return Err(LocaleError::DuplicateMessage {
                locale: self.locale.clone(),
                key: key.to_string(),
            });
        }

        self.messages.insert(key, message.into());
        Ok(())
    }

    /// Remove a message, failing with `MessageNotFound` if it is absent.
    pub fn remove_message(&mut self, key: &MessageKey) -> Result<String> {
        self.messages
            .remove(key)
            .ok_or_else(|| self.not_found(key))
    }

    /// Fetch a message, failing with `MessageNotFound` if it is absent.
    ///
    /// Check [`contains_message`](Self::contains_message) first on paths
    /// that fall back; building the error is the slow path.
    pub fn get_message(&self, key: &MessageKey) -> Result<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| self.not_found(key))
    }

    pub fn contains_message(&self, key: &MessageKey) -> bool {
        self.messages.contains_key(key)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &MessageKey> {
        self.messages.keys()
    }

    fn not_found(&self, key: &MessageKey) -> LocaleError {
        LocaleError::MessageNotFound {
            locale: self.locale.clone(),
            key: key.to_string(),
        }
    }
}
