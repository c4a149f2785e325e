//! Configuration for meme-finder.
//!
//! One TOML file aggregates the ranking policy, the lexicon and every
//! endpoint. Missing sections and fields fall back to defaults. API keys
//! may be left out of the file and supplied through the environment.

use meme_rank::providers::{GiphyConfig, ImgflipConfig, TenorConfig};
use meme_rank::{Lexicon, RankConfig, TogetherConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FinderError, Result};

/// Environment variable holding the Giphy API key.
pub const GIPHY_KEY_VAR: &str = "GIPHY_API_KEY";
/// Environment variable holding the Tenor API key.
pub const TENOR_KEY_VAR: &str = "TENOR_API_KEY";
/// Environment variable holding the Together API key.
pub const TOGETHER_KEY_VAR: &str = "TOGETHER_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Tier caps, budgets and timeouts.
    pub rank: RankConfig,
    /// Stop words and emotion triggers.
    pub lexicon: Lexicon,
    pub imgflip: ImgflipConfig,
    pub giphy: GiphyConfig,
    pub tenor: TenorConfig,
    /// Phrase suggestion service used by the premium tier.
    pub together: TogetherConfig,
}

impl FinderConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FinderError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FinderError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/meme-finder/config.toml`.
    ///
    /// Without any platform config directory, falls back to
    /// `.meme-finder/config.toml` under the current directory.
    pub fn default_config_path() -> PathBuf {
        config_path_in(
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::config_dir(),
        )
    }

    /// Fill API keys missing from the file from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Fill API keys missing from the file using `lookup`.
    ///
    /// Keys already set to a non-empty value are left alone.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fill_key(&mut self.giphy.api_key, lookup(GIPHY_KEY_VAR));
        fill_key(&mut self.tenor.api_key, lookup(TENOR_KEY_VAR));
        fill_key(&mut self.together.api_key, lookup(TOGETHER_KEY_VAR));
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Rank`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.rank.validate()?;
        Ok(())
    }
}

fn config_path_in(xdg_config_home: Option<PathBuf>, platform_dir: Option<PathBuf>) -> PathBuf {
    match xdg_config_home.or(platform_dir) {
        Some(dir) => dir.join("meme-finder").join("config.toml"),
        None => PathBuf::from(".meme-finder").join("config.toml"),
    }
}

fn fill_key(slot: &mut Option<String>, value: Option<String>) {
    let missing = slot.as_deref().is_none_or(|k| k.trim().is_empty());
    if missing {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            *slot = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use meme_rank::EmotionLabel;

    #[test]
    fn default_config_is_valid() {
        let config = FinderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rank.free_cap, 5);
        assert_eq!(config.rank.premium_cap, 15);
        assert!(config.giphy.api_key.is_none());
        assert!(config.lexicon.is_stop_word("the"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = FinderConfig::default();
        config.rank.premium_cap = 20;
        config.rank.fallback_to_keywords = true;
        config.giphy.api_key = Some("giphy-key".into());
        config.together.model = "some/model".into();

        config.save_to_file(&path).unwrap();
        assert!(path.exists());

        let loaded = FinderConfig::from_file(&path).unwrap();
        assert_eq!(loaded.rank.premium_cap, 20);
        assert!(loaded.rank.fallback_to_keywords);
        assert_eq!(loaded.giphy.api_key.as_deref(), Some("giphy-key"));
        assert_eq!(loaded.together.model, "some/model");
        assert_eq!(loaded.lexicon, Lexicon::default());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[rank]
free_cap = 3

[tenor]
api_key = "t-key"
"#,
        )
        .unwrap();

        let config = FinderConfig::from_file(&path).unwrap();
        assert_eq!(config.rank.free_cap, 3);
        assert_eq!(config.rank.premium_cap, 15);
        assert_eq!(config.tenor.api_key.as_deref(), Some("t-key"));
        assert_eq!(config.imgflip, ImgflipConfig::default());
    }

    #[test]
    fn lexicon_is_overridable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[lexicon]
stop_words = ["cat"]

[[lexicon.emotions]]
label = "happy"
triggers = ["purr"]
"#,
        )
        .unwrap();

        let config = FinderConfig::from_file(&path).unwrap();
        assert!(config.lexicon.is_stop_word("cat"));
        assert!(!config.lexicon.is_stop_word("the"));
        assert_eq!(config.lexicon.triggers(EmotionLabel::Happy), ["purr"]);
        assert!(config.lexicon.triggers(EmotionLabel::Sad).is_empty());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = FinderConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(FinderError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        let result = FinderConfig::from_file(&path);
        assert!(matches!(result, Err(FinderError::Config(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = FinderConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("meme-finder"));
    }

    #[test]
    fn config_path_prefers_xdg_then_platform_dir() {
        let path = config_path_in(Some("/xdg".into()), Some("/platform".into()));
        assert_eq!(path, Path::new("/xdg/meme-finder/config.toml"));
        let path = config_path_in(None, Some("/platform".into()));
        assert_eq!(path, Path::new("/platform/meme-finder/config.toml"));
    }

    #[test]
    fn config_path_without_dirs_is_relative() {
        let path = config_path_in(None, None);
        assert!(path.is_relative());
        assert_eq!(path, Path::new(".meme-finder/config.toml"));
    }

    #[test]
    fn mixed_case_lexicon_words_match_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[lexicon]
stop_words = ["Meme", "LORD"]

[[lexicon.emotions]]
label = "excited"
triggers = ["Hype"]
"#,
        )
        .unwrap();

        let config = FinderConfig::from_file(&path).unwrap();
        let tokens = meme_rank::analysis::tokenize("Meme lord hype train", &config.lexicon);
        let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, ["hype", "train"]);
        let labels = meme_rank::analysis::classify_emotions(&tokens, &config.lexicon);
        assert!(labels.contains(&EmotionLabel::Excited));
    }

    #[test]
    fn env_fills_missing_keys_only() {
        let mut config = FinderConfig::default();
        config.tenor.api_key = Some("from-file".into());
        config.together.api_key = Some("  ".into());

        config.apply_env_from(|name| match name {
            GIPHY_KEY_VAR => Some("g-env".into()),
            TENOR_KEY_VAR => Some("t-env".into()),
            TOGETHER_KEY_VAR => Some("x-env".into()),
            _ => None,
        });

        assert_eq!(config.giphy.api_key.as_deref(), Some("g-env"));
        assert_eq!(config.tenor.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.together.api_key.as_deref(), Some("x-env"));
    }

    #[test]
    fn env_ignores_blank_values() {
        let mut config = FinderConfig::default();
        config.apply_env_from(|_| Some(String::new()));
        assert!(config.giphy.api_key.is_none());
    }

    #[test]
    fn validate_reports_rank_field() {
        let mut config = FinderConfig::default();
        config.rank.provider_timeout_ms = 10_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("provider_timeout_ms"));
    }
}
