//! Configuration for markdown layout.
//!
//! Parses `mdlayout.toml` files with serde and discovers them in parent
//! directories. Every section is optional:
//!
//! ```toml
//! [list]
//! bullets = ["•", "◦", "▫"]
//!
//! [headings.tiers]
//! "1" = "title"
//! "2" = "title2"
//! "3" = "title3"
//!
//! [parser]
//! gfm = true
//! doxygen = true
//! directives = true
//! ```
//!
//! A `[headings.tiers]` table replaces the default table as a whole; levels
//! it leaves out use the ambient font.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use md_layout::{BulletGlyphs, FontTier, HeadingTiers};
use md_parse::ParseOptions;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdlayout.toml";

/// Layout and parser configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// List bullet configuration.
    pub list: ListConfig,
    /// Heading font configuration.
    pub headings: HeadingsConfig,
    /// Markdown extensions.
    pub parser: ParserConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[list]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Bullet glyph per nesting depth; deeper lists reuse the last one.
    pub bullets: Vec<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            bullets: vec!["•".to_owned(), "◦".to_owned(), "▫".to_owned()],
        }
    }
}

/// `[headings]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HeadingsConfig {
    /// Font tier per heading level. Keys are levels as strings (`"1"`).
    pub tiers: BTreeMap<String, FontTier>,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            tiers: BTreeMap::from([
                ("1".to_owned(), FontTier::Title),
                ("2".to_owned(), FontTier::Title2),
                ("3".to_owned(), FontTier::Title3),
            ]),
        }
    }
}

/// `[parser]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Tables, strikethrough, task lists and alerts.
    pub gfm: bool,
    /// `\param` and `\returns` sections.
    pub doxygen: bool,
    /// `:::name` container directives.
    pub directives: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            doxygen: true,
            directives: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `mdlayout.toml` in the current directory and its parents
    /// and falls back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Search for a config file in `start` and its parents.
    #[must_use]
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Validation` for invalid values.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_list()?;
        self.validate_headings()?;
        Ok(())
    }

    fn validate_list(&self) -> Result<(), ConfigError> {
        if let Some(index) = self
            .list
            .bullets
            .iter()
            .position(|glyph| glyph.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "list.bullets[{index}] cannot be empty"
            )));
        }
        Ok(())
    }

    fn validate_headings(&self) -> Result<(), ConfigError> {
        for key in self.headings.tiers.keys() {
            if parse_level(key).is_none() {
                return Err(ConfigError::Validation(format!(
                    "headings.tiers key \"{key}\" must be a heading level from 1 to 255"
                )));
            }
        }
        Ok(())
    }

    /// Bullet glyph table for [`md_layout::LayoutContext`].
    #[must_use]
    pub fn bullet_glyphs(&self) -> BulletGlyphs {
        BulletGlyphs::from_sequence(self.list.bullets.iter().map(String::as_str))
    }

    /// Heading font table for [`md_layout::LayoutContext`].
    ///
    /// Keys that are not valid levels are skipped; [`Config::validate`]
    /// reports them.
    #[must_use]
    pub fn heading_tiers(&self) -> HeadingTiers {
        HeadingTiers::new(
            self.headings
                .tiers
                .iter()
                .filter_map(|(key, tier)| Some((parse_level(key)?, *tier))),
        )
    }

    /// Parser settings for [`md_parse::Parser`].
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            gfm: self.parser.gfm,
            doxygen: self.parser.doxygen,
            directives: self.parser.directives,
        }
    }
}

fn parse_level(key: &str) -> Option<u8> {
    key.trim().parse::<u8>().ok().filter(|&level| level >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.list.bullets, vec!["•", "◦", "▫"]);
        assert_eq!(config.heading_tiers(), HeadingTiers::default());
        assert_eq!(config.bullet_glyphs(), BulletGlyphs::default());
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.list.bullets.len(), 3);
        assert!(config.parser.gfm);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[list]
bullets = ["-", "*"]

[headings.tiers]
"1" = "large_title"
"4" = "headline"

[parser]
doxygen = false
"#;
        let config = Config::parse(toml).unwrap();

        let bullets = config.bullet_glyphs();
        assert_eq!(bullets.glyph_for(0), "-");
        assert_eq!(bullets.glyph_for(5), "*");

        let tiers = config.heading_tiers();
        assert_eq!(tiers.tier_for(1), Some(FontTier::LargeTitle));
        assert_eq!(tiers.tier_for(2), None);
        assert_eq!(tiers.tier_for(4), Some(FontTier::Headline));

        let options = config.parse_options();
        assert!(options.gfm);
        assert!(!options.doxygen);
        assert!(options.directives);
    }

    #[test]
    fn test_empty_bullet_rejected() {
        let err = Config::parse("[list]\nbullets = [\"•\", \" \"]\n").unwrap_err();
        assert!(
            matches!(&err, ConfigError::Validation(msg) if msg.contains("list.bullets[1]")),
            "Expected ConfigError::Validation, got {err:?}"
        );
    }

    #[test]
    fn test_invalid_heading_levels_rejected() {
        for key in ["0", "h1", "300"] {
            let toml = format!("[headings.tiers]\n\"{key}\" = \"title\"\n");
            let err = Config::parse(&toml).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation(_)),
                "Expected ConfigError::Validation for {key}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_tier_is_parse_error() {
        let err = Config::parse("[headings.tiers]\n\"1\" = \"gigantic\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_bullet_list_uses_fallback() {
        let config = Config::parse("[list]\nbullets = []\n").unwrap();
        assert_eq!(config.bullet_glyphs().glyph_for(0), md_layout::FALLBACK_BULLET);
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[parser]\ngfm = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert!(!config.parser.gfm);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_ignores_directories_named_like_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_FILENAME)).unwrap();
        let found = Config::discover(dir.path());
        assert_ne!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }
}
