// WHOIS Bot - Configuration
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

// WHOIS client constants
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";
pub const DEFAULT_WHOIS_PORT: u16 = 43;
pub const TIMEOUT_SECONDS: u64 = 10;
pub const MAX_RESPONSE_BYTES: usize = 1_000_000;

// Chat adapter defaults
pub const DEFAULT_BOT_NAME: &str = "whois-bot";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:6543";
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;
pub const MAX_LINE_BYTES: usize = 4096;

/// Servers that expect a decorated query string instead of the bare target.
/// `{}` is replaced with the target.
pub const QUERY_TEMPLATES: &[(&str, &str)] = &[
    ("whois.arin.net", "n + {}"),
    ("whois.verisign-grs.com", "={}"),
];

#[derive(Parser, Debug)]
#[command(author, version, about = "A chat bot that answers WHOIS queries")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serve the line-based chat protocol instead of reading the console
    #[arg(short, long)]
    pub serve: bool,

    /// Listen address for the chat protocol (implies --serve)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Handle a single message, print the reply and exit
    #[arg(short, long)]
    pub execute: Option<String>,

    /// Name the bot answers to when mentioned
    #[arg(short, long)]
    pub name: Option<String>,

    /// WHOIS connection timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Emit journald structured log fields
    #[arg(long)]
    pub journald: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting {field}: must be greater than zero")]
    Invalid { field: &'static str },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bot: BotConfig,
    pub whois: WhoisConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BOT_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhoisConfig {
    pub iana_server: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub max_response_bytes: usize,
    /// Per-TLD server overrides, keyed by the TLD without its leading dot
    pub servers: HashMap<String, String>,
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            iana_server: IANA_WHOIS_SERVER.to_string(),
            port: DEFAULT_WHOIS_PORT,
            timeout_secs: TIMEOUT_SECONDS,
            max_response_bytes: MAX_RESPONSE_BYTES,
            servers: HashMap::new(),
        }
    }
}

impl WhoisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn server_for_tld(&self, tld: &str) -> Option<&str> {
        self.servers
            .get(&tld.trim_start_matches('.').to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    pub max_connections: usize,
    /// Seconds a connection may wait between complete lines before it is closed
    pub idle_timeout_secs: u64,
    pub max_line_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Config {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.whois.servers = config
            .whois
            .servers
            .into_iter()
            .map(|(tld, server)| (tld.trim_start_matches('.').to_ascii_lowercase(), server))
            .collect();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load the file named on the command line (if any) and apply CLI overrides
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(name) = &cli.name {
            config.bot.name = name.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.whois.timeout_secs = timeout;
        }
        if let Some(listen) = &cli.listen {
            config.server.listen = listen.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every lookup or connection fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero = [
            ("whois.timeout_secs", self.whois.timeout_secs == 0),
            ("server.max_connections", self.server.max_connections == 0),
            ("server.idle_timeout_secs", self.server.idle_timeout_secs == 0),
            ("server.max_line_bytes", self.server.max_line_bytes == 0),
        ];
        match zero.into_iter().find(|(_, is_zero)| *is_zero) {
            Some((field, _)) => Err(ConfigError::Invalid { field }),
            None => Ok(()),
        }
    }
}

/// Render the query line for a given server
pub fn format_query(server: &str, target: &str) -> String {
    QUERY_TEMPLATES
        .iter()
        .find(|(host, _)| server.eq_ignore_ascii_case(host))
        .map(|(_, template)| template.replace("{}", target))
        .unwrap_or_else(|| target.to_string())
}
