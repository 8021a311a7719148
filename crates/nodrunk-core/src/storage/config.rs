//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Whether repeat days restrict active ranges
//! - Hard-warning cooldown length and the caution dialog text
//! - Mini-game timings
//!
//! Configuration is stored at `~/.config/nodrunk/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::game::GameConfig;
use crate::gate::GateConfig;
use crate::window::WindowConfig;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/nodrunk/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub game: GameConfig,
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

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
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
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
        Self::load_from(Self::path()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::path()?)
    }

    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
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

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.game.validate()?;
        *self = updated;
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
        assert!(parsed.window.honor_repeat_days);
        assert_eq!(parsed.gate.cooldown_secs, 10);
        assert_eq!(parsed.game.balance_window_secs, 3.0);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[gate]\ncooldown_secs = 30\n").unwrap();
        assert_eq!(parsed.gate.cooldown_secs, 30);
        assert!(parsed.gate.caution_message.contains("cautionary hours"));
        assert!(parsed.window.honor_repeat_days);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("window.honor_repeat_days").as_deref(), Some("true"));
        assert_eq!(cfg.get("gate.cooldown_secs").as_deref(), Some("10"));
        assert!(cfg.get("gate.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("gate.cooldown_secs", "30").unwrap();
        cfg.set("window.honor_repeat_days", "false").unwrap();
        cfg.set("game.reaction_max_delay_secs", "2.5").unwrap();
        cfg.set("gate.caution_message", "Really?").unwrap();
        assert_eq!(cfg.gate.cooldown_secs, 30);
        assert!(!cfg.window.honor_repeat_days);
        assert_eq!(cfg.game.reaction_max_delay_secs, 2.5);
        assert_eq!(cfg.gate.caution_message, "Really?");
    }

    #[test]
    fn set_rejects_unknown_and_mistyped() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("gate.nope", "1"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(matches!(
            cfg.set("window.honor_repeat_days", "maybe"),
            Err(crate::CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(cfg.set("gate.cooldown_secs", "-3").is_err());
        assert_eq!(cfg.gate.cooldown_secs, 10);
    }

    #[test]
    fn set_rejects_unusable_game_timings() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("game.balance_window_secs", "1e20"),
            Err(crate::CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(cfg.set("game.reaction_min_delay_secs", "4").is_err());
        assert_eq!(cfg.game.balance_window_secs, 3.0);
        assert_eq!(cfg.game.reaction_min_delay_secs, 1.0);
    }

    #[test]
    fn load_writes_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(path.clone()).unwrap();
        assert_eq!(cfg.gate.cooldown_secs, 10);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.set("gate.cooldown_secs", "15").unwrap();
        cfg.save_to(path.clone()).unwrap();
        assert_eq!(Config::load_from(path).unwrap().gate.cooldown_secs, 15);
    }
}
