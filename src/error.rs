use poise::serenity_prelude as serenity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Missing environment variable: {name}")]
    ConfigMissing { name: String },

    #[error("Invalid value for {name}: {message}")]
    ConfigInvalid { name: String, message: String },

    // Remote store errors
    #[error("Failed to fetch '{path}': {message}")]
    FetchFailed { path: String, message: String },

    #[error("Remote store rejected credentials: {message}")]
    AuthFailed { message: String },

    #[error("'{path}' was changed by someone else since it was read")]
    WriteConflict { path: String },

    // Catalog errors
    #[error("Failed to parse catalog '{path}': {source}")]
    CatalogParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Instance not found: '{name}'")]
    InstanceNotFound { name: String },

    // Request errors
    #[error("Invalid nickname: {message}")]
    InvalidNickname { message: String },

    // Discord errors
    #[error("Discord API error: {message}")]
    Discord { message: String },

    // Generic errors
    #[error("{message}")]
    Unknown { message: String },
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        BotError::Discord {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Unknown {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::Unknown {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
