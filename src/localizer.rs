//! Requester-aware message lookup.
//!
//! Turns "who is asking" into a locale, then into a resolved and formatted
//! message. Holds no state of its own.

use crate::error::Result;
use crate::i18n::{format_message, LanguageRegistry, MessageKey};
use crate::locale::LocaleCache;
use std::collections::HashMap;
use std::fmt::Display;
use tracing::info;
use uuid::Uuid;

/// Whoever a message is being produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    Player(Uuid),
    Console,
    RemoteConsole,
    /// A sender acting on behalf of another, such as a command block proxy
    Proxied { caller: Box<Requester> },
    Other,
}

impl Requester {
    pub fn proxied(caller: Requester) -> Self {
        Requester::Proxied {
            caller: Box::new(caller),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalizerSettings {
    pub console_locale: String,
    pub remote_console_locale: String,

    /// Echo every broadcast to the log in the console locale
    pub send_broadcasts_to_console: bool,
}

impl LocalizerSettings {
    /// Both consoles use `locale`; broadcasts are echoed.
    pub fn new(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        Self {
            console_locale: locale.clone(),
            remote_console_locale: locale,
            send_broadcasts_to_console: true,
        }
    }
}

pub struct Localizer<'a> {
    registry: &'a LanguageRegistry,
    cache: &'a LocaleCache,
    settings: &'a LocalizerSettings,
}

impl<'a> Localizer<'a> {
    pub fn new(registry: &'a LanguageRegistry, cache: &'a LocaleCache, settings: &'a LocalizerSettings) -> Self {
        Self {
            registry,
            cache,
            settings,
        }
    }

    /// Effective locale of `requester`, overrides included.
    pub fn locale_of(&self, requester: &Requester) -> &'a str {
        match requester {
            Requester::Player(id) => self.cache.get_locale(id),
            Requester::Proxied { caller } => self.locale_of(caller),
            other => self.fixed_locale(other),
        }
    }

    /// Like [`Localizer::locale_of`] but ignores player overrides.
    pub fn locale_of_no_override(&self, requester: &Requester) -> &'a str {
        match requester {
            Requester::Player(id) => self.cache.get_locale_no_override(id),
            Requester::Proxied { caller } => self.locale_of_no_override(caller),
            other => self.fixed_locale(other),
        }
    }

    fn fixed_locale(&self, requester: &Requester) -> &'a str {
        match requester {
            Requester::Console => &self.settings.console_locale,
            Requester::RemoteConsole => &self.settings.remote_console_locale,
            _ => self.registry.default_locale(),
        }
    }

    pub fn localize(&self, key: &MessageKey, requester: &Requester) -> Result<String> {
        self.localize_with(key, requester, &[])
    }

    /// Resolve `key` for `requester` and substitute `args`.
    pub fn localize_with(&self, key: &MessageKey, requester: &Requester, args: &[&dyn Display]) -> Result<String> {
        self.localize_locale(key, self.locale_of(requester), args)
    }

    /// Resolve `key` for an explicit locale and substitute `args`.
    pub fn localize_locale(&self, key: &MessageKey, locale: &str, args: &[&dyn Display]) -> Result<String> {
        let result = self.registry.resolve(locale, key)?;
        Ok(format_message(result.message(), args))
    }

    /// Produce the message for every recipient, in order.
    ///
    /// Each distinct locale is resolved and formatted once.
    pub fn broadcast(&self, key: &MessageKey, recipients: &[Requester], args: &[&dyn Display]) -> Result<Vec<String>> {
        let mut by_locale: HashMap<&str, String> = HashMap::new();
        let mut messages = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let locale = self.locale_of(recipient);
            if !by_locale.contains_key(locale) {
                let message = self.localize_locale(key, locale, args)?;
                by_locale.insert(locale, message);
            }
            messages.push(by_locale[locale].clone());
        }

        if self.settings.send_broadcasts_to_console {
            let locale = self.settings.console_locale.as_str();
            let message = match by_locale.get(locale) {
                Some(message) => message.clone(),
                None => self.localize_locale(key, locale, args)?,
            };
            info!("[Broadcast] {}", message);
        }

        Ok(messages)
    }
}
