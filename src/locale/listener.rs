use crate::error::Result;
use crate::locale::LocaleCache;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ListenerSettings {
    /// Forget a player's tracked locale when they disconnect
    pub remove_disconnected_player_locales: bool,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            remove_disconnected_player_locales: true,
        }
    }
}

/// Feeds game events into the locale cache.
#[derive(Debug, Clone, Default)]
pub struct PlayerEventListener {
    settings: ListenerSettings,
}

impl PlayerEventListener {
    pub fn new(settings: ListenerSettings) -> Self {
        Self { settings }
    }

    /// A player connected with the locale their client reports.
    pub fn on_player_join(&self, cache: &mut LocaleCache, id: Uuid, name: &str, locale: &str) -> Result<()> {
        cache.set_locale(id, locale)?;
        info!("Player {} joined with Locale {}.", name, locale);
        Ok(())
    }

    /// The client reported a new locale.
    pub fn on_player_locale_change(
        &self,
        cache: &mut LocaleCache,
        id: Uuid,
        name: &str,
        locale: &str,
    ) -> Result<()> {
        cache.set_locale(id, locale)?;
        info!("Player {} changed Locale to {}.", name, locale);
        Ok(())
    }

    /// A player disconnected. Overrides are never touched here.
    pub fn on_player_quit(&self, cache: &mut LocaleCache, id: &Uuid, name: &str) -> Result<()> {
        if !self.settings.remove_disconnected_player_locales {
            return Ok(());
        }
        if !cache.has_locale(id) {
            debug!("Player {} disconnected without a tracked Locale", name);
            return Ok(());
        }

        cache.remove_locale(id)?;
        info!("Player {} disconnected and their Locale was removed.", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::CacheSettings;

    fn cache() -> LocaleCache {
        LocaleCache::new(CacheSettings::new("en_us"))
    }

    #[test]
    fn test_join_and_change() {
        let mut cache = cache();
        let listener = PlayerEventListener::default();
        let id = Uuid::new_v4();

        listener.on_player_join(&mut cache, id, "Steve", "de_de").unwrap();
        assert_eq!(cache.get_locale(&id), "de_de");

        listener.on_player_locale_change(&mut cache, id, "Steve", "nl_nl").unwrap();
        assert_eq!(cache.get_locale(&id), "nl_nl");
    }

    #[test]
    fn test_quit_removes_tracked_locale() {
        let mut cache = cache();
        let listener = PlayerEventListener::default();
        let id = Uuid::new_v4();

        listener.on_player_join(&mut cache, id, "Alex", "pt_br").unwrap();
        listener.on_player_quit(&mut cache, &id, "Alex").unwrap();

        assert!(!cache.has_locale(&id));
        assert_eq!(cache.get_locale(&id), "en_us");
    }

    #[test]
    fn test_quit_keeps_override() {
        let mut cache = cache();
        let listener = PlayerEventListener::default();
        let id = Uuid::new_v4();

        listener.on_player_join(&mut cache, id, "Alex", "pt_br").unwrap();
        cache.set_locale_override(id, "fr_fr").unwrap();
        listener.on_player_quit(&mut cache, &id, "Alex").unwrap();

        assert_eq!(cache.get_locale(&id), "fr_fr");
    }

    #[test]
    fn test_quit_keeps_locale_when_configured() {
        let mut cache = cache();
        let listener = PlayerEventListener::new(ListenerSettings {
            remove_disconnected_player_locales: false,
        });
        let id = Uuid::new_v4();

        listener.on_player_join(&mut cache, id, "Alex", "pt_br").unwrap();
        listener.on_player_quit(&mut cache, &id, "Alex").unwrap();

        assert_eq!(cache.get_locale(&id), "pt_br");
    }

    #[test]
    fn test_quit_unknown_player_is_noop() {
        let mut cache = cache();
        let listener = PlayerEventListener::default();
        assert!(listener.on_player_quit(&mut cache, &Uuid::new_v4(), "Ghost").is_ok());
    }

    #[test]
    fn test_join_with_invalid_locale_when_validating() {
        let mut settings = CacheSettings::new("en_us");
        settings.internal_validation = true;
        let mut cache = LocaleCache::new(settings);
        let listener = PlayerEventListener::default();

        let result = listener.on_player_join(&mut cache, Uuid::new_v4(), "Steve", "English");
        assert!(result.is_err());
    }
}
