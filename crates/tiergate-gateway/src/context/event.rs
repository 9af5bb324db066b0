use serde::Deserialize;
use serde_json::{Map, Value};

/// A chat message seen by the bot.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    /// `None` for direct messages.
    #[serde(default)]
    pub space_id: Option<String>,
    pub channel_id: String,
    pub message_id: String,
    pub author: Author,
    pub content: String,
    #[serde(default)]
    pub mentions: Mentions,
}

/// Message author or interaction user.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub bot: bool,
    /// Role ids held in the space.
    #[serde(default)]
    pub role_ids: Vec<String>,
    /// Platform-level administrator permission in the space.
    #[serde(default)]
    pub administrator: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mentions {
    #[serde(default)]
    pub roles: Vec<RoleMention>,
    #[serde(default)]
    pub members: Vec<MemberMention>,
    #[serde(default)]
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleMention {
    pub id: String,
    /// Owned by an integration; the bot may never assign it.
    #[serde(default)]
    pub managed: bool,
    /// Below the bot's highest role and the bot holds Manage Roles.
    #[serde(default = "default_true")]
    pub editable: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberMention {
    pub id: String,
    #[serde(default)]
    pub role_ids: Vec<String>,
}

impl MemberMention {
    pub fn has_role(&self, role_id: &str) -> bool {
        self.role_ids.iter().any(|r| r == role_id)
    }
}

fn default_true() -> bool {
    true
}

/// Slash command or button press.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionEvent {
    #[serde(default)]
    pub space_id: Option<String>,
    pub user: Author,
    #[serde(flatten)]
    pub kind: InteractionKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionKind {
    Command {
        name: String,
        #[serde(default)]
        options: Map<String, Value>,
    },
    Button {
        custom_id: String,
        channel_id: String,
        message_id: String,
    },
}
