use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::catalog::ClaimPolicy;
use crate::managers::Requester;
use crate::messages;
use crate::{Context, Error};

/// Custom ID of the panel button. Kept stable so panels posted before a restart keep working.
pub const WHITELIST_BUTTON_ID: &str = "whitelist_btn_v1";
pub const WHITELIST_MODAL_ID: &str = "whitelist_modal";
pub const NICKNAME_INPUT_ID: &str = "nickname";

/// Length bounds of the form's nickname field
pub const NICKNAME_MIN_LEN: u16 = 3;
pub const NICKNAME_MAX_LEN: u16 = 16;

/// Post the whitelist request panel in this channel
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn setup(ctx: Context<'_>) -> Result<(), Error> {
    // Remove the `!setup` message to keep the channel clean
    if let poise::Context::Prefix(prefix_ctx) = ctx {
        if let Err(e) = prefix_ctx.msg.delete(ctx.http()).await {
            warn!("Failed to delete setup command message: {}", e);
        }
    }

    let settings = ctx.data().whitelist_manager.settings();
    let target_instance = &settings.target_instance;

    ctx.channel_id()
        .send_message(
            ctx.http(),
            serenity::CreateMessage::new()
                .embed(panel_embed(target_instance, settings.claim_policy))
                .components(vec![panel_components()]),
        )
        .await?;

    if let poise::Context::Application(_) = ctx {
        ctx.send(
            poise::CreateReply::default()
                .content("Whitelist panel posted.")
                .ephemeral(true),
        )
        .await?;
    }

    info!(
        "Whitelist panel for '{}' posted in channel {} by {}",
        target_instance,
        ctx.channel_id(),
        ctx.author().name
    );
    Ok(())
}

/// Add your Minecraft nickname to the server whitelist
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn whitelist(
    ctx: Context<'_>,
    #[description = "Your exact Minecraft nickname"] nickname: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let requester = Requester::new(ctx.author().id.to_string(), ctx.author().name.clone());
    let result = ctx
        .data()
        .whitelist_manager
        .apply_whitelist_request(&nickname, &requester)
        .await;

    ctx.send(
        poise::CreateReply::default()
            .content(messages::outcome_message(&result))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Embed shown above the request button
pub fn panel_embed(target_instance: &str, policy: ClaimPolicy) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("🛡️ Server access: {}", target_instance))
        .description(messages::panel_description(policy))
        .color(0x00ff00)
}

pub fn panel_components() -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![serenity::CreateButton::new(WHITELIST_BUTTON_ID)
        .label("🔓 Request whitelist")
        .style(serenity::ButtonStyle::Success)])
}

/// Form asking for the nickname, opened by the panel button
pub fn whitelist_modal() -> serenity::CreateModal {
    let input = serenity::CreateInputText::new(
        serenity::InputTextStyle::Short,
        "Your Minecraft nickname",
        NICKNAME_INPUT_ID,
    )
    .placeholder("Type your exact name here...")
    .min_length(NICKNAME_MIN_LEN)
    .max_length(NICKNAME_MAX_LEN)
    .required(true);

    serenity::CreateModal::new(WHITELIST_MODAL_ID, "Access request")
        .components(vec![serenity::CreateActionRow::InputText(input)])
}

/// Server-side check of the form bounds
pub fn validate_form_nickname(nickname: &str) -> Result<(), String> {
    let len = nickname.chars().count();
    if len < NICKNAME_MIN_LEN as usize || len > NICKNAME_MAX_LEN as usize {
        return Err(format!(
            "nickname must be {} to {} characters long",
            NICKNAME_MIN_LEN, NICKNAME_MAX_LEN
        ));
    }
    Ok(())
}
