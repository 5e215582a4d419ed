//! Locale cache: which locale each player sees.
//!
//! Two maps are kept per id. The tracked map mirrors what the game client
//! reports; the override map holds administrator-set locales and wins when
//! present. Anything unknown resolves to the default locale.

use crate::error::{LocaleError, Result};
use crate::i18n::LocaleValidator;
use crate::locale::LocaleChangeEvent;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Receiver of effective-locale changes.
///
/// Implemented for every `Fn(&LocaleChangeEvent)`.
pub trait LocaleChangeListener {
    fn on_locale_change(&self, event: &LocaleChangeEvent);
}

impl<F> LocaleChangeListener for F
where
    F: Fn(&LocaleChangeEvent),
{
    fn on_locale_change(&self, event: &LocaleChangeEvent) {
        self(event)
    }
}

/// Handle returned by [`LocaleCache::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Settings the cache needs from the configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Locale for ids with neither an override nor a tracked locale
    pub default_locale: String,

    /// Whether administrators may override locales at all
    pub overrides_enabled: bool,

    /// Validate locales passed to the override API
    pub api_validation: bool,

    /// Validate locales reported by the game client
    pub internal_validation: bool,
}

impl CacheSettings {
    /// Overrides enabled, validation off.
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            overrides_enabled: true,
            api_validation: false,
            internal_validation: false,
        }
    }
}

#[derive(Debug)]
enum OverrideStore {
    Active(HashMap<Uuid, String>),
    Disabled,
}

impl OverrideStore {
    fn get(&self, id: &Uuid) -> Option<&str> {
        match self {
            OverrideStore::Active(map) => map.get(id).map(String::as_str),
            OverrideStore::Disabled => None,
        }
    }

    fn active_mut(&mut self) -> Result<&mut HashMap<Uuid, String>> {
        match self {
            OverrideStore::Active(map) => Ok(map),
            OverrideStore::Disabled => Err(LocaleError::OverridesDisabled),
        }
    }

    fn active(&self) -> Result<&HashMap<Uuid, String>> {
        match self {
            OverrideStore::Active(map) => Ok(map),
            OverrideStore::Disabled => Err(LocaleError::OverridesDisabled),
        }
    }
}

/// Per-player locale state.
pub struct LocaleCache {
    settings: CacheSettings,
    tracked: HashMap<Uuid, String>,
    overrides: OverrideStore,
    listeners: Vec<(ListenerId, Box<dyn LocaleChangeListener>)>,
    next_listener: u64,
}

impl fmt::Debug for LocaleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCache")
            .field("settings", &self.settings)
            .field("tracked", &self.tracked)
            .field("overrides", &self.overrides)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LocaleCache {
    pub fn new(settings: CacheSettings) -> Self {
        let overrides = if settings.overrides_enabled {
            OverrideStore::Active(HashMap::new())
        } else {
            OverrideStore::Disabled
        };

        Self {
            settings,
            tracked: HashMap::new(),
            overrides,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Create a cache seeded with the players already connected.
    pub fn with_players<I, S>(settings: CacheSettings, players: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Uuid, S)>,
        S: Into<String>,
    {
        let mut cache = Self::new(settings);
        for (id, locale) in players {
            cache.set_locale(id, locale)?;
        }
        Ok(cache)
    }

    // ==================== Queries ====================

    /// Effective locale: the override, else the tracked locale, else the
    /// default locale. Never fails.
    pub fn get_locale(&self, id: &Uuid) -> &str {
        self.overrides
            .get(id)
            .unwrap_or_else(|| self.get_locale_no_override(id))
    }

    /// Tracked locale, else the default locale, ignoring any override.
    pub fn get_locale_no_override(&self, id: &Uuid) -> &str {
        self.tracked
            .get(id)
            .map(String::as_str)
            .unwrap_or(&self.settings.default_locale)
    }

    /// The override for `id`.
    ///
    /// # Returns
    /// * `Err(LocaleError::OverridesDisabled)` if overrides are disabled
    /// * `Err(LocaleError::OverrideNotFound)` if `id` has no override
    pub fn get_locale_override(&self, id: &Uuid) -> Result<&str> {
        self.overrides
            .active()?
            .get(id)
            .map(String::as_str)
            .ok_or(LocaleError::OverrideNotFound(*id))
    }

    /// Whether a tracked locale exists for `id`.
    pub fn has_locale(&self, id: &Uuid) -> bool {
        self.tracked.contains_key(id)
    }

    pub fn has_locale_override(&self, id: &Uuid) -> bool {
        self.overrides.get(id).is_some()
    }

    pub fn overrides_enabled(&self) -> bool {
        matches!(self.overrides, OverrideStore::Active(_))
    }

    pub fn default_locale(&self) -> &str {
        &self.settings.default_locale
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn override_count(&self) -> usize {
        self.overrides.active().map(HashMap::len).unwrap_or(0)
    }

    // ==================== Overrides ====================

    /// Set the override for `id`, replacing any existing one.
    ///
    /// Notifies listeners if the effective locale changed.
    pub fn set_locale_override(&mut self, id: Uuid, locale: impl Into<String>) -> Result<()> {
        let locale = locale.into();
        if self.settings.api_validation {
            LocaleValidator::validate(&locale)?;
        }

        let old = self.get_locale(&id).to_string();
        self.overrides.active_mut()?.insert(id, locale);
        self.notify_if_changed(id, old);
        Ok(())
    }

    /// Remove the override for `id`.
    ///
    /// # Returns
    /// * `Ok(String)` with the removed override
    /// * `Err(LocaleError::OverridesDisabled)` if overrides are disabled
    /// * `Err(LocaleError::OverrideNotFound)` if `id` has no override
    pub fn remove_locale_override(&mut self, id: &Uuid) -> Result<String> {
        let old = self.get_locale(id).to_string();
        let removed = self
            .overrides
            .active_mut()?
            .remove(id)
            .ok_or(LocaleError::OverrideNotFound(*id))?;

        self.notify_if_changed(*id, old);
        Ok(removed)
    }

    // ==================== Tracked Locales ====================

    /// Record the locale the client reported for `id`.
    ///
    /// Listeners are only notified when no override masks the change.
    pub(crate) fn set_locale(&mut self, id: Uuid, locale: impl Into<String>) -> Result<()> {
        let locale = locale.into();
        if self.settings.internal_validation {
            LocaleValidator::validate(&locale)?;
        }

        let old = self.get_locale(&id).to_string();
        self.tracked.insert(id, locale);
        self.notify_if_changed(id, old);
        Ok(())
    }

    /// Forget the tracked locale for `id`. Overrides are kept.
    pub(crate) fn remove_locale(&mut self, id: &Uuid) -> Result<String> {
        let old = self.get_locale(id).to_string();
        let removed = self
            .tracked
            .remove(id)
            .ok_or(LocaleError::LocaleNotFound(*id))?;

        self.notify_if_changed(*id, old);
        Ok(removed)
    }

    // ==================== Persistence ====================

    /// Replace every override with the entries of `source`.
    ///
    /// Keys are hyphenated UUIDs, values locales. Malformed entries are
    /// logged and skipped. Listeners hear about every id whose effective
    /// locale changed.
    ///
    /// # Returns
    /// The number of overrides loaded.
    pub fn load_overrides(&mut self, source: &BTreeMap<String, String>) -> Result<usize> {
        let previous: BTreeSet<Uuid> = self.overrides.active()?.keys().copied().collect();
        let before: Vec<(Uuid, String)> = previous
            .iter()
            .map(|id| (*id, self.get_locale(id).to_string()))
            .collect();

        let mut loaded = HashMap::with_capacity(source.len());
        for (raw_id, locale) in source {
            let id = match Uuid::parse_str(raw_id) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping locale override with invalid UUID {}: {}", raw_id, e);
                    continue;
                }
            };
            if let Err(e) = LocaleValidator::validate(locale) {
                warn!("Skipping locale override for {}: {}", id, e);
                continue;
            }
            loaded.insert(id, locale.clone());
        }

        let count = loaded.len();
        let mut changes: Vec<(Uuid, String)> = before;
        changes.extend(
            loaded
                .keys()
                .filter(|id| !previous.contains(*id))
                .map(|id| (*id, self.get_locale(id).to_string())),
        );

        *self.overrides.active_mut()? = loaded;
        for (id, old) in changes {
            self.notify_if_changed(id, old);
        }

        debug!("Loaded {} locale overrides", count);
        Ok(count)
    }

    /// Write every override into `sink`, keyed by hyphenated UUID.
    ///
    /// # Returns
    /// The number of overrides written.
    pub fn write_overrides(&self, sink: &mut BTreeMap<String, String>) -> Result<usize> {
        let overrides = self.overrides.active()?;
        for (id, locale) in overrides {
            sink.insert(id.hyphenated().to_string(), locale.clone());
        }
        Ok(overrides.len())
    }

    // ==================== Listeners ====================

    /// Register a listener for effective-locale changes.
    pub fn subscribe(&mut self, listener: impl LocaleChangeListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify_if_changed(&self, id: Uuid, old: String) {
        let new = self.get_locale(&id);
        if old == new {
            return;
        }

        let event = LocaleChangeEvent::unchecked(id, old, new.to_string());
        debug!(
            "Effective locale of {} changed from {} to {}",
            id,
            event.old_locale(),
            event.new_locale()
        );
        for (_, listener) in &self.listeners {
            listener.on_locale_change(&event);
        }
    }
}
