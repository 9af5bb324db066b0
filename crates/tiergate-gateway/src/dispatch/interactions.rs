//! Slash commands and button presses.

use serde_json::Value;

use tiergate_core::DenialCode;

use crate::app_state::AppState;
use crate::context::{InteractionEvent, InteractionKind};

use super::outcome::{Outcome, PlatformAction, Reply};

/// Custom id prefix of the button attached to `setup list`; the suffix is the owner id.
pub const DELETE_SETUP_PREFIX: &str = "delete_setup_";

pub fn delete_button_id(owner_id: &str) -> String {
    format!("{DELETE_SETUP_PREFIX}{owner_id}")
}

pub async fn handle_interaction(app: &AppState, event: &InteractionEvent) -> Outcome {
    match &event.kind {
        InteractionKind::Command { name, options } => match name.as_str() {
            "help" => help(app),
            "prefix" => change_prefix(app, event, options.get("value")).await,
            _ => Outcome::default(),
        },
        InteractionKind::Button {
            custom_id,
            channel_id,
            message_id,
        } => match custom_id.strip_prefix(DELETE_SETUP_PREFIX) {
            Some(owner) if owner == event.user.id => Outcome::default().with_action(PlatformAction::DeleteMessage {
                channel_id: channel_id.clone(),
                message_id: message_id.clone(),
            }),
            Some(_) => denied(app, "Only the command author can use this button.", DenialCode::Forbidden),
            None => Outcome::default(),
        },
    }
}

fn help(app: &AppState) -> Outcome {
    let link = app.cfg().bot.help_link.trim();
    let text = if link.is_empty() {
        "No help link is configured."
    } else {
        link
    };
    Outcome::reply(Reply::ephemeral(text))
}

async fn change_prefix(app: &AppState, event: &InteractionEvent, value: Option<&Value>) -> Outcome {
    if !app.cfg().features.enable_prefix_command {
        return denied(app, "This command is disabled in this environment.", DenialCode::Forbidden);
    }
    if event.space_id.is_none() {
        return denied(app, "This command can only be used in a server.", DenialCode::BadRequest);
    }
    if !event.user.administrator {
        return denied(app, "Only administrators can change the prefix.", DenialCode::Forbidden);
    }

    let requested = value.and_then(Value::as_str).unwrap_or_default();
    match app.prefix().set(requested).await {
        Ok(prefix) => {
            tracing::info!(actor = %event.user.id, %prefix, "prefix changed");
            Outcome::reply(Reply::ephemeral(format!("Prefix updated to `{prefix}`.")))
        }
        Err(err) => denied(app, &format!("Failed to update prefix: {err}"), err.code()),
    }
}

fn denied(app: &AppState, text: &str, code: DenialCode) -> Outcome {
    app.metrics().denials.inc(&[("code", code.as_str())]);
    tracing::warn!(code = code.as_str(), "interaction denied");
    Outcome::reply(Reply::ephemeral(text).with_code(code))
}
