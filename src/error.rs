//! Error type shared by the registry, the locale cache and the loaders.

use uuid::Uuid;

/// Errors raised by the localization core.
///
/// Format and not-found errors are meant to be caught at the command layer
/// and turned into user-facing messages. Bulk loading never surfaces
/// `DuplicateMessage`; it logs a warning instead.
#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    /// A locale string failed structural validation.
    #[error("{0}")]
    Format(String),

    /// No tracked locale exists for the id.
    #[error("Locale for UUID {0} could not be found.")]
    LocaleNotFound(Uuid),

    /// No override exists for the id.
    #[error("Locale Override for UUID {0} could not be found.")]
    OverrideNotFound(Uuid),

    /// A table was asked for a key it does not hold.
    #[error("[{locale}] The requested message {key} could not be found.")]
    MessageNotFound { locale: String, key: String },

    /// A table already holds the key being added.
    #[error("[{locale}] Message Map already contains given key {key}.")]
    DuplicateMessage { locale: String, key: String },

    /// The override feature is administratively disabled.
    #[error("Player Locale Overrides are disabled.")]
    OverridesDisabled,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T, E = LocaleError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_not_found_mentions_uuid() {
        let id = Uuid::nil();
        let err = LocaleError::OverrideNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_duplicate_message_display() {
        let err = LocaleError::DuplicateMessage {
            locale: "en_us".to_string(),
            key: "plugin:greeting".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "[en_us] Message Map already contains given key plugin:greeting."
        );
    }

    #[test]
    fn test_format_error_passes_message_through() {
        let err = LocaleError::Format("bad locale: EN".to_string());
        assert_eq!(err.to_string(), "bad locale: EN");
    }
}
