//! Resolve one message the way a server would at startup.
//!
//! Usage:
//!   player-locale <key>                    # Resolve for the console
//!   player-locale <key> <locale> [args..]  # Resolve for a locale
//!
//! Configuration comes from the YAML file named by LOCALE_CONFIG_FILE, or
//! from the environment when it is unset (see `Config::from_env`).

use anyhow::{Context, Result};
use player_locale::config::Config;
use player_locale::i18n::{LanguageLoader, LanguageRegistry};
use player_locale::locale::LocaleCache;
use player_locale::localizer::{Localizer, Requester};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{info, warn};

/// Namespace for keys loaded from the configured language files
const NAMESPACE: &str = "player_locale";

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("player_locale=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let raw_key = args
        .first()
        .context("Usage: player-locale <key> [locale] [args..]")?;
    let locale = args.get(1);
    let format_args: Vec<&dyn Display> = args.iter().skip(2).map(|a| a as &dyn Display).collect();

    let config = match std::env::var("LOCALE_CONFIG_FILE") {
        Ok(path) => Config::from_yaml_file(&PathBuf::from(path))?,
        Err(_) => Config::from_env()?,
    };

    // Step 1: Load language files
    let mut registry = LanguageRegistry::new(config.registry_settings())?;
    let loader = LanguageLoader::new(NAMESPACE, config.language_directory(), config.suppress_section_warnings);
    for name in &config.language_files {
        // One broken file must not stop the rest from loading
        if let Err(e) = loader.load_language_file(&mut registry, name) {
            warn!("Language file {} could not be loaded: {}", name, e);
        }
    }
    info!("Loaded locales: {:?}", registry.locales());

    // Step 2: Load overrides
    let mut cache = LocaleCache::new(config.cache_settings());
    let override_file = config.override_file();
    if config.save_and_load_locale_overrides {
        let entries = override_file.load()?;
        let loaded = cache.load_overrides(&entries)?;
        info!("Loaded {} locale overrides", loaded);
    }

    // Step 3: Resolve
    let key = registry.lookup_or_create_key(NAMESPACE, raw_key)?;
    let settings = config.localizer_settings();
    let localizer = Localizer::new(&registry, &cache, &settings);
    let message = match locale {
        Some(locale) => localizer.localize_locale(&key, locale, &format_args)?,
        None => localizer.localize_with(&key, &Requester::Console, &format_args)?,
    };
    println!("{}", message);

    let report = registry.metrics().report();
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize lookup report")?
    );

    // Step 4: Save overrides
    if config.save_and_load_locale_overrides {
        let mut entries = BTreeMap::new();
        cache.write_overrides(&mut entries)?;
        override_file.save(&entries)?;
    }

    Ok(())
}
