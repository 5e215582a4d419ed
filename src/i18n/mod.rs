//! Message catalogs and lookup.
//!
//! # Architecture
//!
//! - `validator`: structural check for locale strings
//! - `key`: namespaced message identifiers
//! - `language`: one locale's key -> message table
//! - `registry`: every table, the default-locale fallback and the failsafe
//! - `loader`: YAML language files into the registry
//! - `format`: positional substitution into resolved templates
//! - `metrics`: counts of found / fallback / failsafe resolutions
//!
//! # Example
//!
//! ```rust,ignore
//! use player_locale::i18n::{LanguageRegistry, RegistrySettings};
//!
//! let mut registry = LanguageRegistry::new(RegistrySettings::new("en_us", "Missing message"))?;
//! let key = registry.lookup_or_create_key("myplugin", "greeting")?;
//! registry.register(&key, "Hi", &["en_us"])?;
//!
//! // fr_fr has no table, so the default locale answers
//! let result = registry.resolve("fr_fr", &key)?;
//! assert_eq!(result.message(), "Hi");
//! ```

mod format;
mod key;
mod language;
mod loader;
mod metrics;
mod registry;
mod validator;

pub use format::format_message;
pub use key::MessageKey;
pub use language::Language;
pub use loader::LanguageLoader;
pub use metrics::{LookupMetrics, LookupReport};
pub use registry::{LanguageRegistry, MessageKind, MessageResult, RegistrySettings, FAILSAFE_LOCALE};
pub use validator::{LocaleValidator, DEFAULT_ERROR_TEMPLATE, LOCALE_PATTERN};
