//! Locale validation.
//!
//! A locale is either a bare language (`haw`) or a language and a region
//! joined by an underscore (`en_us`, `fil_ph`). Everything is lowercase.

use crate::error::{LocaleError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Pattern every stored locale must match.
pub const LOCALE_PATTERN: &str = r"(^[a-z\-]{2,8}_[a-z0-9]{2,3}$)|(^[a-z]{2,8}$)";

/// Error template used when the caller does not supply one.
pub const DEFAULT_ERROR_TEMPLATE: &str = "Locale does not match ISO-639 Locale Pattern. Yours: %s";

static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

fn locale_regex() -> &'static Regex {
    LOCALE_REGEX.get_or_init(|| Regex::new(LOCALE_PATTERN).unwrap())
}

/// Validator for locale strings.
pub struct LocaleValidator;

impl LocaleValidator {
    /// Validate a locale with the default error template.
    ///
    /// # Returns
    /// The input unchanged if it matches [`LOCALE_PATTERN`], otherwise a
    /// `LocaleError::Format`.
    pub fn validate(locale: &str) -> Result<&str> {
        Self::validate_with(locale, DEFAULT_ERROR_TEMPLATE)
    }

    /// Validate a locale, reporting failures with `template`.
    ///
    /// The first `%s` in the template is replaced by the offending value.
    pub fn validate_with<'a>(locale: &'a str, template: &str) -> Result<&'a str> {
        if Self::is_valid(locale) {
            Ok(locale)
        } else {
            Err(LocaleError::Format(template.replacen("%s", locale, 1)))
        }
    }

    /// Check a locale without building an error.
    pub fn is_valid(locale: &str) -> bool {
        locale_regex().is_match(locale)
    }
}
