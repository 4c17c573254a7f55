use poise::serenity_prelude as serenity;
use tracing::info;

use crate::{Context, Error};

/// Check if the bot is running
#[poise::command(prefix_command, slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    info!("Ping command called by {}", ctx.author().name);
    ctx.send(poise::CreateReply::default()
        .content("Pong! Bot is working!")
        .ephemeral(true))
        .await?;
    Ok(())
}

/// Show help information
#[poise::command(prefix_command, slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let target_instance = &ctx.data().whitelist_manager.settings().target_instance;

    let embed = serenity::CreateEmbed::new()
        .title("Bot Commands")
        .description(format!("Whitelist requests go to **{}**.", target_instance))
        .field("/ping", "Check if the bot is running", false)
        .field("/whitelist <nickname>", "Add your Minecraft nickname to the whitelist", false)
        .field("/setup", "Post the whitelist request panel in this channel (Admin)", false)
        .color(0x3498db);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;
    Ok(())
}
