use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use crate::commands::whitelist::{
    validate_form_nickname, whitelist_modal, NICKNAME_INPUT_ID, WHITELIST_BUTTON_ID,
    WHITELIST_MODAL_ID,
};
use crate::error::{BotError, Result};
use crate::managers::Requester;
use crate::messages;
use crate::{Data, Error};

/// Handle button presses and form submissions from the whitelist panel
pub async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::Interaction,
    data: &Data,
) -> std::result::Result<(), Error> {
    match interaction {
        serenity::Interaction::Component(component)
            if component.data.custom_id == WHITELIST_BUTTON_ID =>
        {
            handle_panel_button(ctx, component).await?;
        }
        serenity::Interaction::Modal(modal) if modal.data.custom_id == WHITELIST_MODAL_ID => {
            handle_modal_submit(ctx, modal, data).await?;
        }
        _ => {}
    }
    Ok(())
}

async fn handle_panel_button(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
) -> Result<()> {
    debug!("Opening whitelist form for {}", component.user.name);
    component
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Modal(whitelist_modal()),
        )
        .await?;
    Ok(())
}

async fn handle_modal_submit(
    ctx: &serenity::Context,
    modal: &serenity::ModalInteraction,
    data: &Data,
) -> Result<()> {
    let nickname = match submitted_nickname(&modal.data) {
        Some(nickname) => nickname,
        None => {
            warn!(
                "Whitelist form from {} has no '{}' field",
                modal.user.name, NICKNAME_INPUT_ID
            );
            String::new()
        }
    };
    info!(
        "Whitelist form submitted by {} ({}) for '{}'",
        modal.user.name, modal.user.id, nickname
    );

    modal
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(messages::processing_message(&nickname))
                    .ephemeral(true),
            ),
        )
        .await?;

    let reply = match validate_form_nickname(nickname.trim()) {
        Ok(()) => {
            let requester = Requester::new(modal.user.id.to_string(), modal.user.name.clone());
            let result = data
                .whitelist_manager
                .apply_whitelist_request(&nickname, &requester)
                .await;
            messages::outcome_message(&result)
        }
        Err(message) => messages::error_message(&BotError::InvalidNickname { message }),
    };

    if let Err(e) = modal
        .edit_response(
            &ctx.http,
            serenity::EditInteractionResponse::new().content(reply),
        )
        .await
    {
        error!("Failed to deliver whitelist result to {}: {}", modal.user.name, e);
    }
    Ok(())
}

/// Value of the nickname field in a submitted form
fn submitted_nickname(data: &serenity::ModalInteractionData) -> Option<String> {
    data.components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            serenity::ActionRowComponent::InputText(input) if input.custom_id == NICKNAME_INPUT_ID => {
                input.value.clone()
            }
            _ => None,
        })
}
