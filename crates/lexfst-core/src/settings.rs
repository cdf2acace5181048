//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

use crate::lexicon::UnknownPolicy;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub decoder: DecoderSettings,
    pub lexicon: LexiconSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecoderSettings {
    pub beam_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconSettings {
    unknown_policy: String,
    pub unknown_factor: f64,
    /// Parsed `unknown_policy`.
    #[serde(skip)]
    policy: UnknownPolicy,
}

impl LexiconSettings {
    pub fn unknown_policy(&self) -> UnknownPolicy {
        self.policy
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    s.lexicon.policy =
        s.lexicon
            .unknown_policy
            .parse()
            .map_err(|_| SettingsError::InvalidValue {
                field: "lexicon.unknown_policy".to_string(),
                reason: format!(
                    "expected \"output\", \"ignore\" or \"fail\", got \"{}\"",
                    s.lexicon.unknown_policy
                ),
            })?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(decoder.beam_size);

    let factor = s.lexicon.unknown_factor;
    if factor.is_nan() || factor <= 0.0 || factor > 1.0 {
        return Err(SettingsError::InvalidValue {
            field: "lexicon.unknown_factor".to_string(),
            reason: "must be in (0, 1]".to_string(),
        });
    }

    Ok(())
}
