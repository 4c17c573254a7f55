// src/messages.rs

use crate::catalog::{ClaimPolicy, UpdateOutcome};
use crate::error::BotError;

pub fn panel_description(policy: ClaimPolicy) -> String {
    let mut description = "To join the server you need to register your Minecraft nickname.\n\n\
    **Instructions:**\n\
    1. Press the button below.\n\
    2. Type your **exact** username in the form.\n\
    3. Wait for the confirmation."
        .to_string();
    if policy == ClaimPolicy::OnePerRequester {
        description.push_str("\n\n⚠️ **Note:** Only one account can be registered per Discord user.");
    }
    description
}

pub fn processing_message(nickname: &str) -> String {
    format!("🔄 **Processing request for:** `{}`...", nickname)
}

/// Reply for the result of a whitelist request
pub fn outcome_message(result: &Result<UpdateOutcome, BotError>) -> String {
    match result {
        Ok(UpdateOutcome::Applied { nickname }) => format!(
            "✅ **Done!** Added to the whitelist: **{}**\n\
            ℹ️ *Restart the launcher to join.*",
            nickname
        ),
        Ok(UpdateOutcome::AlreadyClaimed) => "❌ **Error:** You already registered a user. \
            Only one account per person is allowed."
            .to_string(),
        Ok(UpdateOutcome::AlreadyListed { nickname }) => {
            format!("⚠️ The user **{}** is already on the list.", nickname)
        }
        Err(e) => error_message(e),
    }
}

pub fn error_message(error: &BotError) -> String {
    match error {
        BotError::InstanceNotFound { name } => {
            format!("❌ Internal error: could not find the instance '{}'.", name)
        }
        BotError::AuthFailed { .. } => "❌ The bot could not sign in to the instance repository. \
            Please tell an administrator that the access token is invalid."
            .to_string(),
        BotError::FetchFailed { path, .. } => format!(
            "❌ Could not read `{}` from the instance repository. Please try again later.",
            path
        ),
        BotError::WriteConflict { .. } => "❌ Someone else updated the whitelist at the same time. \
            Please send your request again."
            .to_string(),
        BotError::InvalidNickname { message } => format!("❌ Invalid nickname: {}", message),
        other => format!("❌ An error occurred: {}", other),
    }
}
