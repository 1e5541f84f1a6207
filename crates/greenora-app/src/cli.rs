//! CLI argument definitions for the Greenora application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use greenora_core::config::GreenoraConfig;

/// Greenora - herbal marketplace assistant (VrikshaVed AI).
#[derive(Parser, Debug, Default)]
#[command(name = "greenora", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// External plant knowledge asset (.toml or .json).
    #[arg(short = 'k', long = "knowledge")]
    pub knowledge: Option<PathBuf>,

    /// Marketplace backend base URL.
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// Chat in the terminal instead of serving HTTP.
    #[arg(long = "chat")]
    pub chat: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > GREENORA_CONFIG env var > ~/.greenora/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("GREENORA_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Fold CLI overrides into an already env-adjusted config.
    pub fn apply(&self, config: &mut GreenoraConfig) {
        if let Some(port) = self.port {
            config.general.port = port;
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(ref path) = self.knowledge {
            config.assistant.knowledge_path = Some(path.to_string_lossy().to_string());
        }
        if let Some(ref url) = self.api_url {
            config.backend.api_url = url.clone();
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

fn default_config_path() -> PathBuf {
    home_dir()
        .map(|h| h.join(".greenora").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "greenora",
            "--port",
            "8080",
            "--chat",
            "-k",
            "plants.json",
            "--api-url",
            "http://backend:5000",
        ]);
        assert_eq!(args.port, Some(8080));
        assert!(args.chat);
        assert_eq!(args.knowledge, Some(PathBuf::from("plants.json")));
        assert_eq!(args.api_url.as_deref(), Some("http://backend:5000"));
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = CliArgs::parse_from(["greenora", "--config", "/tmp/g.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/g.toml"));
    }

    #[test]
    fn test_apply_overrides() {
        let args = CliArgs {
            port: Some(9000),
            log_level: Some("debug".to_string()),
            knowledge: Some(PathBuf::from("herbs.toml")),
            api_url: Some("http://example.test".to_string()),
            ..CliArgs::default()
        };
        let mut config = GreenoraConfig::default();
        args.apply(&mut config);
        assert_eq!(config.general.port, 9000);
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.assistant.knowledge_path.as_deref(), Some("herbs.toml"));
        assert_eq!(config.backend.api_url, "http://example.test");
    }

    #[test]
    fn test_apply_without_flags_keeps_config() {
        let mut config = GreenoraConfig::default();
        CliArgs::default().apply(&mut config);
        assert_eq!(config.general.port, GreenoraConfig::default().general.port);
        assert!(config.assistant.knowledge_path.is_none());
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("data/plants.toml"), PathBuf::from("data/plants.toml"));
    }
}
