#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use serde_json::json;

use common::{app, default_app, interaction, Msg};
use tiergate_gateway::app_state::AppState;
use tiergate_gateway::config;
use tiergate_gateway::dispatch::{handle_interaction, handle_message, PlatformAction, Visibility};

fn prefix_cmd(user: &str, admin: bool, space: Option<&str>, value: &str) -> tiergate_gateway::context::InteractionEvent {
    interaction(json!({
        "space_id": space,
        "user": { "id": user, "administrator": admin },
        "type": "command",
        "name": "prefix",
        "options": { "value": value },
    }))
}

#[tokio::test]
async fn help_replies_ephemerally_with_link() {
    let (app, _) = default_app();
    let ev = interaction(json!({
        "user": { "id": "u1" },
        "type": "command",
        "name": "help",
    }));
    let out = handle_interaction(&app, &ev).await;
    assert_eq!(out.replies[0].text, "https://example.org/help");
    assert_eq!(out.replies[0].visibility, Visibility::Ephemeral);
}

#[tokio::test]
async fn prefix_is_disabled_by_default() {
    let (app, _) = default_app();
    let out = handle_interaction(&app, &prefix_cmd("u1", true, Some("g1"), "?")).await;
    assert_eq!(out.denial(), Some("FORBIDDEN"));
    assert_eq!(app.prefix().get(), "!");
}

#[tokio::test]
async fn prefix_change_applies_to_later_messages() {
    let (app, _) = app("version: 1\nfeatures:\n  enable_prefix_command: true\n");

    let out = handle_interaction(&app, &prefix_cmd("u1", false, Some("g1"), "?")).await;
    assert_eq!(out.replies[0].text, "Only administrators can change the prefix.");

    let out = handle_interaction(&app, &prefix_cmd("u1", true, None, "?")).await;
    assert_eq!(out.replies[0].text, "This command can only be used in a server.");

    let out = handle_interaction(&app, &prefix_cmd("u1", true, Some("g1"), "way too long")).await;
    assert!(out.replies[0].text.starts_with("Failed to update prefix"));
    assert_eq!(app.prefix().get(), "!");

    let out = handle_interaction(&app, &prefix_cmd("u1", true, Some("g1"), " ?? ")).await;
    assert_eq!(out.replies[0].text, "Prefix updated to `??`.");

    let out = handle_message(&app, &Msg::admin("u1").say("??setup list")).await.unwrap();
    assert!(out.listing.is_some());
    let out = handle_message(&app, &Msg::admin("u1").say("!setup list")).await.unwrap();
    assert!(out.listing.is_none());
}

#[tokio::test]
async fn saved_prefix_is_picked_up_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!(
        "version: 1\nbot:\n  config_dir: '{}'\n  prefix_file: '{}'\nfeatures:\n  enable_prefix_command: true\n",
        dir.path().join("configs").display(),
        dir.path().join("prefix.json").display(),
    );

    let first = AppState::from_config(config::load_from_str(&yaml).unwrap()).await.unwrap();
    assert_eq!(first.prefix().get(), "!");
    let out = handle_interaction(&first, &prefix_cmd("u1", true, Some("g1"), "tg>")).await;
    assert_eq!(out.replies[0].text, "Prefix updated to `tg>`.");
    drop(first);

    let second = AppState::from_config(config::load_from_str(&yaml).unwrap()).await.unwrap();
    assert_eq!(second.prefix().get(), "tg>");
    let out = handle_message(&second, &Msg::admin("u1").say("tg>setup list")).await.unwrap();
    assert!(out.listing.is_some());
}

#[tokio::test]
async fn delete_button_only_works_for_its_owner() {
    let (app, _) = default_app();
    let press = |user: &str| {
        interaction(json!({
            "space_id": "g1",
            "user": { "id": user },
            "type": "button",
            "custom_id": "delete_setup_owner",
            "channel_id": "c1",
            "message_id": "listing1",
        }))
    };

    let out = handle_interaction(&app, &press("someone")).await;
    assert!(out.actions.is_empty());
    assert_eq!(out.replies[0].text, "Only the command author can use this button.");

    let out = handle_interaction(&app, &press("owner")).await;
    assert_eq!(
        out.actions,
        vec![PlatformAction::DeleteMessage { channel_id: "c1".into(), message_id: "listing1".into() }]
    );
}

#[tokio::test]
async fn unrelated_interactions_are_ignored() {
    let (app, _) = default_app();
    let ev = interaction(json!({
        "user": { "id": "u1" },
        "type": "button",
        "custom_id": "something_else",
        "channel_id": "c1",
        "message_id": "m1",
    }));
    assert!(handle_interaction(&app, &ev).await.replies.is_empty());
}
