//! Lookup metrics for the language registry.
//!
//! Counts how message resolutions were satisfied: straight from the
//! requested locale, from the default locale, or from the failsafe string.

use crate::i18n::MessageKind;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolution counters owned by a `LanguageRegistry`.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Resolutions answered by the requested locale
    found: AtomicUsize,

    /// Resolutions answered by the default locale
    fallbacks: AtomicUsize,

    /// Resolutions answered by the failsafe message
    failsafes: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one resolution of the given kind.
    pub fn record(&self, kind: MessageKind) {
        let counter = match kind {
            MessageKind::Found => &self.found,
            MessageKind::Fallback => &self.fallbacks,
            MessageKind::Failsafe => &self.failsafes,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn found(&self) -> usize {
        self.found.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn failsafes(&self) -> usize {
        self.failsafes.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> LookupReport {
        let found = self.found();
        let fallbacks = self.fallbacks();
        let failsafes = self.failsafes();
        let total = found + fallbacks + failsafes;

        let rate = |count: usize| {
            if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            }
        };

        LookupReport {
            total,
            found,
            fallbacks,
            failsafes,
            found_rate: rate(found),
            fallback_rate: rate(fallbacks),
            failsafe_rate: rate(failsafes),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.found.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.failsafes.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the lookup counters.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    /// Number of resolutions recorded
    pub total: usize,

    pub found: usize,
    pub fallbacks: usize,
    pub failsafes: usize,

    /// Share of resolutions served by the requested locale (0-100)
    pub found_rate: f64,

    /// Share of resolutions served by the default locale (0-100)
    pub fallback_rate: f64,

    /// Share of resolutions served by the failsafe message (0-100)
    pub failsafe_rate: f64,
}
