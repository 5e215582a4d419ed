//! Language registry: every language table plus the fallback chain.
//!
//! The registry owns one [`Language`] per locale, including the default
//! locale whose table exists from construction onwards. Lookups go
//! requested locale -> default locale -> configured failsafe message.

use crate::error::{LocaleError, Result};
use crate::i18n::{Language, LocaleValidator, LookupMetrics, MessageKey};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Locale reported for failsafe results. Never a real language.
pub const FAILSAFE_LOCALE: &str = "failsafe_lc";

/// How a message was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Present in the requested locale
    Found,
    /// Missing from the requested locale, present in the default locale
    Fallback,
    /// Missing everywhere; the failsafe message was used
    Failsafe,
}

/// A resolved message and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageResult {
    message: String,
    locale: String,
    kind: MessageKind,
}

impl MessageResult {
    /// Build a result.
    ///
    /// # Arguments
    /// * `message` - The resolved text
    /// * `locale` - Locale the text actually came from; must not be empty
    /// * `kind` - How the text was found
    /// * `validate` - Also run the locale through the validator
    pub fn new(
        message: impl Into<String>,
        locale: impl Into<String>,
        kind: MessageKind,
        validate: bool,
    ) -> Result<Self> {
        let locale = locale.into();
        if locale.is_empty() {
            return Err(LocaleError::InvalidArgument(
                "Locale cannot be empty.".to_string(),
            ));
        }
        if validate {
            LocaleValidator::validate_with(&locale, "Invalid Locale in MessageResult: %s.")?;
        }

        Ok(Self {
            message: message.into(),
            locale,
            kind,
        })
    }

    /// The message text. Not necessarily in the requested locale.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

impl std::fmt::Display for MessageResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Settings the registry needs from the configuration.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Locale whose table is the terminal fallback
    pub default_locale: String,

    pub console_locale: String,
    pub remote_console_locale: String,

    /// Text returned when no table has the requested key
    pub failsafe_message: String,

    /// Validate locales passed in through the public API
    pub api_validation: bool,

    /// Validate locales on internal paths (construction)
    pub internal_validation: bool,
}

impl RegistrySettings {
    /// Settings with every locale set to `default_locale` and validation off.
    pub fn new(default_locale: impl Into<String>, failsafe_message: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        Self {
            console_locale: default_locale.clone(),
            remote_console_locale: default_locale.clone(),
            default_locale,
            failsafe_message: failsafe_message.into(),
            api_validation: false,
            internal_validation: false,
        }
    }
}

/// Owner of every language table.
#[derive(Debug)]
pub struct LanguageRegistry {
    settings: RegistrySettings,
    languages: HashMap<String, Language>,
    keys: HashSet<MessageKey>,
    metrics: LookupMetrics,
}

impl LanguageRegistry {
    /// Create a registry holding an empty table for the default locale.
    ///
    /// The default locale always passes through [`Language::new`], so an
    /// invalid default locale is rejected regardless of the validation flags.
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        if settings.internal_validation {
            LocaleValidator::validate_with(
                &settings.default_locale,
                "Default Locale has an invalid format. Yours: %s",
            )?;
        }

        let default_language = Language::new(&settings.default_locale)?;
        let mut languages = HashMap::new();
        languages.insert(settings.default_locale.clone(), default_language);

        Ok(Self {
            settings,
            languages,
            keys: HashSet::new(),
            metrics: LookupMetrics::new(),
        })
    }

    /// Resolve `key` for `locale`, falling back to the default locale and
    /// then to the failsafe message.
    ///
    /// # Returns
    /// * `Ok(MessageResult)` tagged `Found`, `Fallback` or `Failsafe`
    /// * `Err(LocaleError::Format)` if API validation is on and `locale` is malformed
    pub fn resolve(&self, locale: &str, key: &MessageKey) -> Result<MessageResult> {
        if self.settings.api_validation {
            LocaleValidator::validate_with(
                locale,
                "The given Locale does not match the ISO-639 test Pattern. This can usually be \
                 disabled for production use. Yours: %s",
            )?;
        }

        let result = match self.languages.get(locale) {
            Some(language) if language.contains_message(key) => self.result_from(language, key, MessageKind::Found)?,
            _ => {
                let default_language = self.default_language();
                if default_language.contains_message(key) {
                    self.result_from(default_language, key, MessageKind::Fallback)?
                } else {
                    self.failsafe()?
                }
            }
        };

        debug!(
            "Resolved {} for {} from {} ({:?})",
            key,
            locale,
            result.locale(),
            result.kind()
        );
        self.metrics.record(result.kind());
        Ok(result)
    }

    /// Resolve `key` straight from the default locale, skipping any
    /// per-requester locale. A hit is tagged `Found`.
    pub fn resolve_default(&self, key: &MessageKey) -> Result<MessageResult> {
        let default_language = self.default_language();
        let result = if default_language.contains_message(key) {
            self.result_from(default_language, key, MessageKind::Found)?
        } else {
            self.failsafe()?
        };

        self.metrics.record(result.kind());
        Ok(result)
    }

    /// Equivalent to `resolve(console_locale, key)`.
    pub fn resolve_console(&self, key: &MessageKey) -> Result<MessageResult> {
        self.resolve(&self.settings.console_locale, key)
    }

    /// Equivalent to `resolve(remote_console_locale, key)`.
    pub fn resolve_remote_console(&self, key: &MessageKey) -> Result<MessageResult> {
        self.resolve(&self.settings.remote_console_locale, key)
    }

    /// Register `message` under `key` for every locale in `locales`.
    ///
    /// Tables are created on first use. A locale that already holds the key
    /// keeps its original message and a warning is logged; this never fails
    /// the call.
    ///
    /// # Returns
    /// The number of locales the message was actually added to.
    pub fn register(&mut self, key: &MessageKey, message: &str, locales: &[&str]) -> Result<usize> {
        if locales.is_empty() {
            return Err(LocaleError::InvalidArgument(
                "Must provide at least one Locale.".to_string(),
            ));
        }

        // Validate every locale before touching any table
        for locale in locales {
            LocaleValidator::validate(locale)?;
        }

        let mut added = 0;
        for locale in locales {
            if !self.languages.contains_key(*locale) {
                self.languages
                    .insert(locale.to_string(), Language::new(locale)?);
            }
            let Some(language) = self.languages.get_mut(*locale) else {
                continue;
            };

            match language.add_message(key.clone(), message) {
                Ok(()) => added += 1,
                Err(LocaleError::DuplicateMessage { .. }) => {
                    warn!(
                        "Language {} already contains message {}. The original message will be kept.",
                        locale, key
                    );
                }
                Err(e) => return Err(e),
            }
        }

        self.keys.insert(key.clone());
        Ok(added)
    }

    /// Return the registered key for `(namespace, raw_key)`, or mint a new one.
    ///
    /// Both parts are lowercased. Uppercase input is accepted with a
    /// warning, since the host lowercases keys itself and mixed-case keys
    /// look like duplicates later on.
    pub fn lookup_or_create_key(&self, namespace: &str, raw_key: &str) -> Result<MessageKey> {
        if raw_key.is_empty() {
            return Err(LocaleError::InvalidArgument(
                "Key cannot be empty.".to_string(),
            ));
        }

        let namespace = namespace.to_lowercase();
        let key = raw_key.to_lowercase();

        if key != raw_key {
            warn!(
                "Uppercase keys are automatically converted to lowercase. Yours: {}",
                raw_key
            );
        }

        let candidate = MessageKey::new(namespace, key);
        Ok(self.keys.get(&candidate).cloned().unwrap_or(candidate))
    }

    /// Whether `key` was ever registered.
    pub fn is_registered(&self, key: &MessageKey) -> bool {
        self.keys.contains(key)
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.languages.contains_key(locale)
    }

    /// Every locale with a table, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    pub fn language(&self, locale: &str) -> Option<&Language> {
        self.languages.get(locale)
    }

    pub fn default_locale(&self) -> &str {
        &self.settings.default_locale
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    fn default_language(&self) -> &Language {
        // Inserted in `new` and never removed
        &self.languages[&self.settings.default_locale]
    }

    fn result_from(&self, language: &Language, key: &MessageKey, kind: MessageKind) -> Result<MessageResult> {
        MessageResult::new(
            language.get_message(key)?,
            language.locale(),
            kind,
            self.settings.api_validation,
        )
    }

    fn failsafe(&self) -> Result<MessageResult> {
        MessageResult::new(
            self.settings.failsafe_message.as_str(),
            FAILSAFE_LOCALE,
            MessageKind::Failsafe,
            self.settings.api_validation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILSAFE: &str = "The requested message could not be loaded.";

    fn registry() -> LanguageRegistry {
        LanguageRegistry::new(RegistrySettings::new("en_us", FAILSAFE)).unwrap()
    }

    fn key(k: &str) -> MessageKey {
        MessageKey::new("test", k)
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_default_table_exists() {
        let registry = registry();
        assert!(registry.has_locale("en_us"));
        assert_eq!(registry.default_locale(), "en_us");
        assert_eq!(registry.locales(), vec!["en_us"]);
    }

    #[test]
    fn test_invalid_default_locale_rejected() {
        let mut settings = RegistrySettings::new("English", FAILSAFE);
        settings.internal_validation = true;
        let err = LanguageRegistry::new(settings).unwrap_err();
        assert!(err.to_string().contains("Default Locale"));
    }

    // ==================== Resolve Tests ====================

    #[test]
    fn test_resolve_found() {
        let mut registry = registry();
        registry.register(&key("greeting"), "Bonjour", &["fr_fr"]).unwrap();

        let result = registry.resolve("fr_fr", &key("greeting")).unwrap();
        assert_eq!(result.message(), "Bonjour");
        assert_eq!(result.locale(), "fr_fr");
        assert_eq!(result.kind(), MessageKind::Found);
    }

    #[test]
    fn test_resolve_fallback_to_default() {
        let mut registry = registry();
        registry.register(&key("greeting"), "Hi", &["en_us"]).unwrap();
        registry.register(&key("other"), "Autre", &["fr_fr"]).unwrap();

        let result = registry.resolve("fr_fr", &key("greeting")).unwrap();
        assert_eq!(result.message(), "Hi");
        assert_eq!(result.locale(), "en_us");
        assert_eq!(result.kind(), MessageKind::Fallback);
    }

    #[test]
    fn test_resolve_unknown_locale_falls_back() {
        let mut registry = registry();
        registry.register(&key("greeting"), "Hi", &["en_us"]).unwrap();

        let result = registry.resolve("ja_jp", &key("greeting")).unwrap();
        assert_eq!(result.kind(), MessageKind::Fallback);
    }

    #[test]
    fn test_resolve_failsafe() {
        let registry = registry();

        let result = registry.resolve("es_es", &key("missing.key")).unwrap();
        assert_eq!(result.message(), FAILSAFE);
        assert_eq!(result.locale(), FAILSAFE_LOCALE);
        assert_eq!(result.kind(), MessageKind::Failsafe);
    }

    #[test]
    fn test_resolve_default_locale_is_found() {
        let mut registry = registry();
        registry.register(&key("greeting"), "Hi", &["en_us"]).unwrap();

        let result = registry.resolve("en_us", &key("greeting")).unwrap();
        assert_eq!(result.kind(), MessageKind::Found);
    }

    #[test]
    fn test_resolve_validates_when_enabled() {
        let mut settings = RegistrySettings::new("en_us", FAILSAFE);
        settings.api_validation = true;
        let registry = LanguageRegistry::new(settings).unwrap();

        let result = registry.resolve("EN_US", &key("greeting"));
        assert!(matches!(result, Err(LocaleError::Format(_))));
        assert!(registry.resolve("en_us", &key("greeting")).is_ok());
    }

    #[test]
    fn test_resolve_skips_validation_when_disabled() {
        let registry = registry();
        let result = registry.resolve("Not A Locale", &key("greeting")).unwrap();
        assert_eq!(result.kind(), MessageKind::Failsafe);
    }

    #[test]
    fn test_resolve_default_skips_requested_locale() {
        let mut registry = registry();
        registry.register(&key("greeting"), "Hi", &["en_us"]).unwrap();

        let result = registry.resolve_default(&key("greeting")).unwrap();
        assert_eq!(result.kind(), MessageKind::Found);
        assert_eq!(result.locale(), "en_us");

        let missing = registry.resolve_default(&key("nope")).unwrap();
        assert_eq!(missing.kind(), MessageKind::Failsafe);
    }

    #[test]
    fn test_resolve_console_uses_console_locale() {
        let mut settings = RegistrySettings::new("en_us", FAILSAFE);
        settings.console_locale = "de_de".to_string();
        settings.remote_console_locale = "fr_fr".to_string();
        let mut registry = LanguageRegistry::new(settings).unwrap();
        registry.register(&key("greeting"), "Hallo", &["de_de"]).unwrap();
        registry.register(&key("greeting"), "Salut", &["fr_fr"]).unwrap();

        assert_eq!(registry.resolve_console(&key("greeting")).unwrap().message(), "Hallo");
        assert_eq!(
            registry.resolve_remote_console(&key("greeting")).unwrap().message(),
            "Salut"
        );
    }

    #[test]
    fn test_resolve_records_metrics() {
        let mut registry = registry();
        registry.register(&key("greeting"), "Hi", &["en_us"]).unwrap();

        registry.resolve("en_us", &key("greeting")).unwrap();
        registry.resolve("fr_fr", &key("greeting")).unwrap();
        registry.resolve("fr_fr", &key("missing")).unwrap();

        let report = registry.metrics().report();
        assert_eq!(report.found, 1);
        assert_eq!(report.fallbacks, 1);
        assert_eq!(report.failsafes, 1);
    }

    // ==================== Register Tests ====================

    #[test]
    fn test_register_multiple_locales() {
        let mut registry = registry();
        let added = registry
            .register(&key("greeting"), "Hi", &["en_us", "en_gb", "en_au"])
            .unwrap();

        assert_eq!(added, 3);
        assert_eq!(registry.locales(), vec!["en_au", "en_gb", "en_us"]);
        assert!(registry.is_registered(&key("greeting")));
    }

    #[test]
    fn test_register_duplicate_keeps_original() {
        let mut registry = registry();
        registry.register(&key("greeting"), "Hi", &["en_us"]).unwrap();

        let added = registry.register(&key("greeting"), "Hello", &["en_us"]).unwrap();
        assert_eq!(added, 0);
        assert_eq!(registry.resolve("en_us", &key("greeting")).unwrap().message(), "Hi");
    }

    #[test]
    fn test_register_requires_a_locale() {
        let mut registry = registry();
        let result = registry.register(&key("greeting"), "Hi", &[]);
        assert!(matches!(result, Err(LocaleError::InvalidArgument(_))));
    }

    #[test]
    fn test_register_invalid_locale_leaves_tables_untouched() {
        let mut registry = registry();
        let result = registry.register(&key("greeting"), "Hi", &["fr_fr", "BAD"]);

        assert!(matches!(result, Err(LocaleError::Format(_))));
        assert!(!registry.has_locale("fr_fr"));
    }

    // ==================== Key Tests ====================

    #[test]
    fn test_lookup_or_create_key_lowercases() {
        let registry = registry();
        let key = registry.lookup_or_create_key("MyPlugin", "Command.Usage").unwrap();
        assert_eq!(key.namespace(), "myplugin");
        assert_eq!(key.key(), "command.usage");
    }

    #[test]
    fn test_lookup_or_create_key_returns_registered() {
        let mut registry = registry();
        let first = registry.lookup_or_create_key("myplugin", "greeting").unwrap();
        registry.register(&first, "Hi", &["en_us"]).unwrap();

        let second = registry.lookup_or_create_key("myplugin", "GREETING").unwrap();
        assert_eq!(first, second);
        assert!(registry.is_registered(&second));
    }

    #[test]
    fn test_lookup_or_create_key_empty() {
        let registry = registry();
        assert!(registry.lookup_or_create_key("myplugin", "").is_err());
    }

    // ==================== Result Tests ====================

    #[test]
    fn test_message_result_rejects_empty_locale() {
        let result = MessageResult::new("text", "", MessageKind::Found, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_message_result_validates_when_asked() {
        assert!(MessageResult::new("text", "EN", MessageKind::Found, true).is_err());
        assert!(MessageResult::new("text", "EN", MessageKind::Found, false).is_ok());
        assert!(MessageResult::new("text", FAILSAFE_LOCALE, MessageKind::Failsafe, true).is_ok());
    }

    #[test]
    fn test_message_result_display() {
        let result = MessageResult::new("Hi", "en_us", MessageKind::Found, false).unwrap();
        assert_eq!(result.to_string(), "Hi");
    }
}
