use crate::error::{LocaleError, Result};
use crate::i18n::LocaleValidator;
use uuid::Uuid;

/// Emitted when the effective locale of an id changes.
///
/// Only built when the old and new locales differ, so receiving one always
/// means something visible changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChangeEvent {
    id: Uuid,
    old_locale: String,
    new_locale: String,
}

impl LocaleChangeEvent {
    /// Build an event, rejecting identical locales.
    ///
    /// With `validate` set both locales must also pass the validator.
    pub fn new(
        id: Uuid,
        old_locale: impl Into<String>,
        new_locale: impl Into<String>,
        validate: bool,
    ) -> Result<Self> {
        let old_locale = old_locale.into();
        let new_locale = new_locale.into();

        if old_locale == new_locale {
            return Err(LocaleError::InvalidArgument(
                "Old and New Locales cannot be equal.".to_string(),
            ));
        }
        if validate {
            LocaleValidator::validate(&old_locale)?;
            LocaleValidator::validate(&new_locale)?;
        }

        Ok(Self {
            id,
            old_locale,
            new_locale,
        })
    }

    // The cache has already compared the locales
    pub(crate) fn unchecked(id: Uuid, old_locale: String, new_locale: String) -> Self {
        Self {
            id,
            old_locale,
            new_locale,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn old_locale(&self) -> &str {
        &self.old_locale
    }

    pub fn new_locale(&self) -> &str {
        &self.new_locale
    }
}
