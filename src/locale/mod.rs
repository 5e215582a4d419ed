//! Per-player locale tracking.
//!
//! # Architecture
//!
//! - `cache`: tracked and overridden locales, change notification
//! - `event`: the change notification payload
//! - `listener`: game events into the cache
//! - `persistence`: the override file

mod cache;
mod event;
mod listener;
mod persistence;

pub use cache::{CacheSettings, ListenerId, LocaleCache, LocaleChangeListener};
pub use event::LocaleChangeEvent;
pub use listener::{ListenerSettings, PlayerEventListener};
pub use persistence::{OverrideFile, LOCALE_OVERRIDE_FILE_NAME};
