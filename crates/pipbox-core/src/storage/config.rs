//! TOML-based application configuration.
//!
//! Stores user preferences for the countdown widget:
//! - Default session length
//! - Completion tone (backend and shape)
//!
//! Configuration is stored at `~/.config/pipbox/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::audio::{BackendKind, ToneSpec};
use crate::error::{ConfigError, Result};
use crate::timer::DEFAULT_DURATION_SECS;

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,
}

/// Completion tone configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,
    #[serde(default = "default_peak_gain")]
    pub peak_gain: f64,
    #[serde(default = "default_floor_gain")]
    pub floor_gain: f64,
    #[serde(default = "default_attack_ms")]
    pub attack_ms: u32,
    #[serde(default = "default_tone_duration_ms")]
    pub duration_ms: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pipbox/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub tone: ToneConfig,
}

// Default functions
fn default_duration_secs() -> u64 {
    DEFAULT_DURATION_SECS
}
fn default_true() -> bool {
    true
}
fn default_frequency_hz() -> f64 {
    880.0
}
fn default_peak_gain() -> f64 {
    0.1
}
fn default_floor_gain() -> f64 {
    0.01
}
fn default_attack_ms() -> u32 {
    100
}
fn default_tone_duration_ms() -> u32 {
    1000
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
        }
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: BackendKind::default(),
            frequency_hz: default_frequency_hz(),
            peak_gain: default_peak_gain(),
            floor_gain: default_floor_gain(),
            attack_ms: default_attack_ms(),
            duration_ms: default_tone_duration_ms(),
        }
    }
}

impl ToneConfig {
    pub fn spec(&self) -> ToneSpec {
        ToneSpec {
            frequency_hz: self.frequency_hz as f32,
            peak_gain: self.peak_gain as f32,
            floor_gain: self.floor_gain as f32,
            attack_ms: self.attack_ms,
            duration_ms: self.duration_ms,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(ConfigError::UnknownKey(key.to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Reject values the engine cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.default_duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.default_duration_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !(self.tone.frequency_hz > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "tone.frequency_hz".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !(self.tone.peak_gain > 0.0 && self.tone.peak_gain <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "tone.peak_gain".into(),
                message: "must be in (0, 1]".into(),
            });
        }
        if !(self.tone.floor_gain > 0.0 && self.tone.floor_gain <= self.tone.peak_gain) {
            return Err(ConfigError::InvalidValue {
                key: "tone.floor_gain".into(),
                message: "must be in (0, tone.peak_gain]".into(),
            });
        }
        if self.tone.attack_ms >= self.tone.duration_ms {
            return Err(ConfigError::InvalidValue {
                key: "tone.attack_ms".into(),
                message: "must be shorter than tone.duration_ms".into(),
            });
        }
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing the defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// into the field's type, or the result fails validation. On error
    /// `self` is left unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.default_duration_secs, 1500);
        assert_eq!(parsed.tone.backend, BackendKind::Bell);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[timer]\ndefault_duration_secs = 600\n").unwrap();
        assert_eq!(parsed.timer.default_duration_secs, 600);
        assert!(parsed.tone.enabled);
        assert_eq!(parsed.tone.attack_ms, 100);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.default_duration_secs").as_deref(), Some("1500"));
        assert_eq!(cfg.get("tone.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("tone.backend").as_deref(), Some("bell"));
        assert_eq!(cfg.get("tone.peak_gain").as_deref(), Some("0.1"));
        assert!(cfg.get("tone.missing_key").is_none());
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("timer.default_duration_secs", "900").unwrap();
        cfg.apply("tone.enabled", "false").unwrap();
        cfg.apply("tone.backend", "silent").unwrap();
        cfg.apply("tone.frequency_hz", "440").unwrap();
        assert_eq!(cfg.timer.default_duration_secs, 900);
        assert!(!cfg.tone.enabled);
        assert_eq!(cfg.tone.backend, BackendKind::Silent);
        assert_eq!(cfg.tone.frequency_hz, 440.0);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("tone.volume", "3"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.apply("tone", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.apply("", "x"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_type_and_leaves_config_unchanged() {
        let mut cfg = Config::default();
        assert!(cfg.apply("tone.enabled", "loud").is_err());
        assert!(cfg.apply("tone.backend", "trumpet").is_err());
        assert!(cfg.apply("timer.default_duration_secs", "0").is_err());
        assert!(cfg.apply("timer.default_duration_secs", "1.5").is_err());
        assert_eq!(cfg.timer.default_duration_secs, 1500);
        assert_eq!(cfg.tone.backend, BackendKind::Bell);
    }

    #[test]
    fn floor_gain_must_not_exceed_peak() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("tone.floor_gain", "0.5"),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "tone.floor_gain"
        ));
        assert!(cfg.apply("tone.floor_gain", "0").is_err());
        assert!(cfg.apply("tone.peak_gain", "0.005").is_err());
        assert_eq!(cfg.tone.floor_gain, 0.01);

        cfg.apply("tone.floor_gain", "0.1").unwrap();
        assert_eq!(cfg.tone.floor_gain, 0.1);
    }

    #[test]
    fn attack_must_be_shorter_than_tone() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("tone.attack_ms", "1000"),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "tone.attack_ms"
        ));
        assert!(cfg.apply("tone.duration_ms", "50").is_err());
        assert_eq!(cfg.tone.attack_ms, 100);

        cfg.apply("tone.attack_ms", "999").unwrap();
        assert_eq!(cfg.tone.attack_ms, 999);
    }

    #[test]
    fn load_from_rejects_inverted_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tone]\npeak_gain = 0.1\nfloor_gain = 0.2\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn tone_spec_follows_config() {
        let mut cfg = Config::default();
        cfg.apply("tone.duration_ms", "250").unwrap();
        let spec = cfg.tone.spec();
        assert_eq!(spec.duration_ms, 250);
        assert_eq!(spec.frequency_hz, 880.0);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.default_duration_secs, 1500);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\ndefault_duration_secs = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("timer.default_duration_secs", "1205").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.default_duration_secs, 1205);
    }
}
