//! Shared fixtures for host integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};

use tiergate_core::ConfigRecord;
use tiergate_gateway::app_state::AppState;
use tiergate_gateway::config;
use tiergate_gateway::context::{InteractionEvent, MessageEvent};
use tiergate_gateway::store::MemoryConfigStore;

pub const SPACE: &str = "g1";

pub fn app(yaml: &str) -> (AppState, Arc<MemoryConfigStore>) {
    let cfg = config::load_from_str(yaml).unwrap();
    let store = Arc::new(MemoryConfigStore::new());
    (AppState::new(cfg, store.clone()), store)
}

pub fn default_app() -> (AppState, Arc<MemoryConfigStore>) {
    app("version: 1\nbot:\n  help_link: \"https://example.org/help\"\n")
}

pub fn record(v: Value) -> ConfigRecord {
    serde_json::from_value(v).unwrap()
}

pub struct Msg {
    pub author: String,
    pub roles: Vec<String>,
    pub admin: bool,
    pub mentions: Value,
}

impl Msg {
    pub fn by(author: &str, roles: &[&str]) -> Self {
        Self {
            author: author.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            admin: false,
            mentions: json!({}),
        }
    }

    pub fn admin(author: &str) -> Self {
        Self {
            admin: true,
            ..Self::by(author, &[])
        }
    }

    pub fn mentions(mut self, mentions: Value) -> Self {
        self.mentions = mentions;
        self
    }

    pub fn say(&self, content: &str) -> MessageEvent {
        serde_json::from_value(json!({
            "space_id": SPACE,
            "channel_id": "c1",
            "message_id": "m1",
            "author": {
                "id": self.author,
                "role_ids": self.roles,
                "administrator": self.admin,
            },
            "content": content,
            "mentions": self.mentions,
        }))
        .unwrap()
    }
}

pub fn interaction(v: Value) -> InteractionEvent {
    serde_json::from_value(v).unwrap()
}
