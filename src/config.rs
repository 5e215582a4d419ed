use crate::i18n::{LocaleValidator, RegistrySettings};
use crate::locale::{CacheSettings, ListenerSettings, OverrideFile};
use crate::localizer::LocalizerSettings;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

pub const CONFIG_VERSION: &str = "1.0.0";

pub const DEFAULT_FAILSAFE_MESSAGE: &str = "The requested message could not be loaded.";

/// Subdirectory of the data directory holding language files
pub const LANGUAGE_DIRECTORY: &str = "languages";

static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Config {
    pub config_version: String,

    /// Root for language files and the override file
    pub data_directory: PathBuf,

    // Languages
    pub language_files: Vec<String>,
    pub suppress_section_warnings: bool,

    // Defaults
    pub default_locale: String,
    pub console_locale: String,
    pub remote_console_locale: String,
    pub failsafe_message: String,

    // Behaviour
    pub send_broadcasts_to_console: bool,
    pub enable_locale_overrides: bool,
    pub save_and_load_locale_overrides: bool,

    // Debug
    pub api_regex_locale_tests: bool,
    pub internal_regex_locale_tests: bool,
    pub remove_disconnected_player_locales: bool,
}

// config.yml layout
#[derive(Debug, Deserialize)]
struct ConfigFile {
    config_version: Option<String>,
    #[serde(default)]
    language_files: Vec<String>,
    #[serde(default = "default_true")]
    send_broadcasts_to_console: bool,
    #[serde(default)]
    enable_locale_overrides: bool,
    #[serde(default)]
    save_and_load_locale_overrides_to_file: bool,
    #[serde(default)]
    defaults: DefaultsSection,
    #[serde(default)]
    loading: LoadingSection,
    #[serde(default)]
    debug: DebugSection,
}

#[derive(Debug, Default, Deserialize)]
struct DefaultsSection {
    default_locale: Option<String>,
    console_locale: Option<String>,
    remote_console_locale: Option<String>,
    failsafe_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoadingSection {
    #[serde(default)]
    suppress_section_warnings: bool,
}

#[derive(Debug, Deserialize)]
struct DebugSection {
    #[serde(default)]
    api_regex_locale_tests: bool,
    #[serde(default)]
    internal_regex_locale_tests: bool,
    #[serde(default = "default_true")]
    remove_disconnected_player_locales: bool,
}

impl Default for DebugSection {
    fn default() -> Self {
        Self {
            api_regex_locale_tests: false,
            internal_regex_locale_tests: false,
            remove_disconnected_player_locales: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale = std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en_us".to_string());

        let config = Self {
            config_version: std::env::var("CONFIG_VERSION").unwrap_or_else(|_| CONFIG_VERSION.to_string()),
            data_directory: std::env::var("LOCALE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),

            // Languages
            language_files: std::env::var("LANGUAGE_FILES")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| vec!["en".to_string()]),
            suppress_section_warnings: env_bool("SUPPRESS_SECTION_WARNINGS", false),

            // Defaults
            console_locale: std::env::var("CONSOLE_LOCALE").unwrap_or_else(|_| default_locale.clone()),
            remote_console_locale: std::env::var("REMOTE_CONSOLE_LOCALE")
                .unwrap_or_else(|_| default_locale.clone()),
            default_locale,
            failsafe_message: std::env::var("FAILSAFE_MESSAGE")
                .unwrap_or_else(|_| DEFAULT_FAILSAFE_MESSAGE.to_string()),

            // Behaviour
            send_broadcasts_to_console: env_bool("SEND_BROADCASTS_TO_CONSOLE", true),
            enable_locale_overrides: env_bool("ENABLE_LOCALE_OVERRIDES", true),
            save_and_load_locale_overrides: env_bool("SAVE_AND_LOAD_LOCALE_OVERRIDES", false),

            // Debug
            api_regex_locale_tests: env_bool("API_REGEX_LOCALE_TESTS", false),
            internal_regex_locale_tests: env_bool("INTERNAL_REGEX_LOCALE_TESTS", false),
            remove_disconnected_player_locales: env_bool("REMOVE_DISCONNECTED_PLAYER_LOCALES", true),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a `config.yml`. The data directory is the file's parent.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let data_directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_yaml_str(&contents, data_directory)
    }

    pub fn from_yaml_str(contents: &str, data_directory: PathBuf) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(contents).context("config.yml is not valid YAML")?;

        let failsafe_message = match file.defaults.failsafe_message {
            Some(message) => message,
            None => {
                warn!("failsafe_message could not be found. A default message will be used instead.");
                DEFAULT_FAILSAFE_MESSAGE.to_string()
            }
        };

        let config = Self {
            config_version: file
                .config_version
                .context("config_version not found in config.yml")?,
            data_directory,
            language_files: file.language_files,
            suppress_section_warnings: file.loading.suppress_section_warnings,
            default_locale: file
                .defaults
                .default_locale
                .context("Locale default_locale could not be found")?,
            console_locale: file
                .defaults
                .console_locale
                .context("Locale console_locale could not be found")?,
            remote_console_locale: file
                .defaults
                .remote_console_locale
                .context("Locale remote_console_locale could not be found")?,
            failsafe_message,
            send_broadcasts_to_console: file.send_broadcasts_to_console,
            enable_locale_overrides: file.enable_locale_overrides,
            save_and_load_locale_overrides: file.save_and_load_locale_overrides_to_file,
            api_regex_locale_tests: file.debug.api_regex_locale_tests,
            internal_regex_locale_tests: file.debug.internal_regex_locale_tests,
            remove_disconnected_player_locales: file.debug.remove_disconnected_player_locales,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let version_regex =
            VERSION_REGEX.get_or_init(|| Regex::new(r"^[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{1,3}$").unwrap());
        if !version_regex.is_match(&self.config_version) {
            bail!("config_version has an invalid format: {}", self.config_version);
        }

        for (name, locale) in [
            ("default_locale", &self.default_locale),
            ("console_locale", &self.console_locale),
            ("remote_console_locale", &self.remote_console_locale),
        ] {
            let template = format!("Locale {} has an invalid format. Yours: %s", name);
            LocaleValidator::validate_with(locale, &template)?;
        }

        if self.save_and_load_locale_overrides && !self.enable_locale_overrides {
            bail!("Cannot have Locale Override saving enabled while Locale Overrides are disabled.");
        }

        Ok(())
    }

    pub fn language_directory(&self) -> PathBuf {
        self.data_directory.join(LANGUAGE_DIRECTORY)
    }

    pub fn override_file(&self) -> OverrideFile {
        OverrideFile::in_directory(&self.data_directory)
    }

    // ==================== Component Settings ====================

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            default_locale: self.default_locale.clone(),
            console_locale: self.console_locale.clone(),
            remote_console_locale: self.remote_console_locale.clone(),
            failsafe_message: self.failsafe_message.clone(),
            api_validation: self.api_regex_locale_tests,
            internal_validation: self.internal_regex_locale_tests,
        }
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            default_locale: self.default_locale.clone(),
            overrides_enabled: self.enable_locale_overrides,
            api_validation: self.api_regex_locale_tests,
            internal_validation: self.internal_regex_locale_tests,
        }
    }

    pub fn localizer_settings(&self) -> LocalizerSettings {
        LocalizerSettings {
            console_locale: self.console_locale.clone(),
            remote_console_locale: self.remote_console_locale.clone(),
            send_broadcasts_to_console: self.send_broadcasts_to_console,
        }
    }

    pub fn listener_settings(&self) -> ListenerSettings {
        ListenerSettings {
            remove_disconnected_player_locales: self.remove_disconnected_player_locales,
        }
    }
}
