use tracing::level_filters::LevelFilter;

use crate::catalog::ClaimPolicy;
use crate::error::{BotError, Result};

const DEFAULT_CATALOG_PATH: &str = "instances.json";
const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Access to the repository holding the launcher catalog
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// Branch to read and commit to; the repository default when unset
    pub branch: Option<String>,
    pub api_url: String,
}

/// What the whitelist updater edits and how strictly
#[derive(Debug, Clone)]
pub struct WhitelistSettings {
    /// Exact name of the instance whose whitelist is updated
    pub target_instance: String,
    /// Path of the catalog file inside the repository
    pub catalog_path: String,
    pub claim_policy: ClaimPolicy,
}

/// Process-wide configuration, read once at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub github: GitHubConfig,
    pub whitelist: WhitelistSettings,
    pub health_port: u16,
    pub log_level: LevelFilter,
}

impl BotConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |name: &str| {
            get(name).ok_or_else(|| BotError::ConfigMissing {
                name: name.to_string(),
            })
        };

        let (owner, repo) = parse_repo(&require("GITHUB_REPO")?)?;

        let claim_policy = match get("TRACK_CLAIMS") {
            Some(value) => {
                if parse_flag("TRACK_CLAIMS", &value)? {
                    ClaimPolicy::OnePerRequester
                } else {
                    ClaimPolicy::Unrestricted
                }
            }
            None => ClaimPolicy::OnePerRequester,
        };

        let health_port = match get("HEALTH_PORT") {
            Some(value) => value.parse().map_err(|_| BotError::ConfigInvalid {
                name: "HEALTH_PORT".to_string(),
                message: format!("'{}' is not a port number", value),
            })?,
            None => DEFAULT_HEALTH_PORT,
        };

        let log_level = match get("LOG_LEVEL") {
            Some(value) => value.parse().map_err(|_| BotError::ConfigInvalid {
                name: "LOG_LEVEL".to_string(),
                message: format!("'{}' is not a log level", value),
            })?,
            None => LevelFilter::INFO,
        };

        Ok(Self {
            discord_token: require("DISCORD_TOKEN")?,
            github: GitHubConfig {
                token: require("GITHUB_TOKEN")?,
                owner,
                repo,
                branch: get("GITHUB_BRANCH"),
                api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            },
            whitelist: WhitelistSettings {
                target_instance: require("TARGET_INSTANCE")?,
                catalog_path: get("CATALOG_PATH").unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()),
                claim_policy,
            },
            health_port,
            log_level,
        })
    }
}

/// Split `owner/name`
fn parse_repo(value: &str) -> Result<(String, String)> {
    match value.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(BotError::ConfigInvalid {
            name: "GITHUB_REPO".to_string(),
            message: format!("expected 'owner/name', got '{}'", value),
        }),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BotError::ConfigInvalid {
            name: name.to_string(),
            message: format!("'{}' is not a boolean", value),
        }),
    }
}
