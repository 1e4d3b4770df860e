use crate::action::ActionTimings;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_FILE: &str = ".env";
const API_BASE_VAR: &str = "CURATOR_API_BASE";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub articles: ArticlesConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout_ms() -> u64 { 60_000 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default = "default_toast_ms")]
    pub toast_duration_ms: u64,
    #[serde(default = "default_reload_ms")]
    pub reload_delay_ms: u64,
    #[serde(default = "default_confirm_ms")]
    pub confirm_delay_ms: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Lines of scroll before the header condenses.
    #[serde(default = "default_scrolled_threshold")]
    pub scrolled_threshold: usize,
    #[serde(default = "default_reveal_threshold")]
    pub reveal_threshold: f32,
}

fn default_toast_ms() -> u64 { 3000 }
fn default_reload_ms() -> u64 { 1000 }
fn default_confirm_ms() -> u64 { 2000 }
fn default_tick_ms() -> u64 { 50 }
fn default_scrolled_threshold() -> usize { 3 }
fn default_reveal_threshold() -> f32 { 0.1 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_ms(),
            reload_delay_ms: default_reload_ms(),
            confirm_delay_ms: default_confirm_ms(),
            tick_ms: default_tick_ms(),
            scrolled_threshold: default_scrolled_threshold(),
            reveal_threshold: default_reveal_threshold(),
        }
    }
}

impl UiConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    pub fn timings(&self) -> ActionTimings {
        ActionTimings {
            reload_delay: Duration::from_millis(self.reload_delay_ms),
            confirm_delay: Duration::from_millis(self.confirm_delay_ms),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArticlesConfig {
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Fetch once at startup so the list is not empty.
    #[serde(default = "default_true")]
    pub fetch_on_start: bool,
}

fn default_limit() -> u32 { 30 }
fn default_true() -> bool { true }

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self { limit: default_limit(), fetch_on_start: true }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FeedsConfig {
    /// Feeds configured on the backend, shown on the settings page and as
    /// fetch sources.
    #[serde(default)]
    pub rss: Vec<String>,
    #[serde(default)]
    pub suggested: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Explicit path, else `<config dir>/curator-console/storage.json`,
    /// else the working directory.
    pub fn resolve(&self) -> PathBuf {
        if let Some(p) = &self.path {
            return p.clone();
        }
        dirs::config_dir()
            .map(|d| d.join("curator-console").join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("storage.json"))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("curator-console.log")
}
fn default_log_filter() -> String {
    "curator_console=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { file: default_log_file(), filter: default_log_filter() }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.apply_env();
        Ok(config)
    }

    /// Missing file means defaults; a present but broken file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let mut config = Config::default();
            config.apply_env();
            Ok(config)
        }
    }

    fn apply_env(&mut self) {
        if let Ok(base) = std::env::var(API_BASE_VAR) {
            let base = base.trim();
            if !base.is_empty() {
                self.api.base_url = base.to_string();
            }
        }
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for (key, value) in parse_env(content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn parse_env(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(|l| l.trim().trim_matches('\r'))
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once('='))
        .map(|(k, v)| {
            let v = v.trim().trim_matches('"').trim_matches('\'');
            (k.trim().to_string(), v.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert_eq!(config.ui.toast_duration_ms, 3000);
        assert_eq!(config.articles.limit, 30);
        assert!(!config.feeds.rss.is_empty());
        assert!(!config.feeds.topics.is_empty());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ui.reload_delay_ms, 1000);
        assert_eq!(config.ui.confirm_delay_ms, 2000);
        assert_eq!(config.log.filter, "curator_console=info");
        assert!(config.articles.fetch_on_start);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[ui]\ntoast_duration_ms = 5000\n").unwrap();
        assert_eq!(config.ui.toast_duration(), Duration::from_millis(5000));
        assert_eq!(config.ui.tick_ms, 50);
    }

    #[test]
    fn env_lines_are_parsed() {
        let parsed = parse_env("# comment\nCURATOR_API_BASE=\"http://x:1\"\r\n\nBAD LINE\n");
        assert_eq!(parsed, [("CURATOR_API_BASE".to_string(), "http://x:1".to_string())]);
    }
}
