//! What handling one event produces.
//!
//! The platform adapter applies `actions`, shows `replies`, and forwards
//! `audit` to the space's log channel. Rendering is the adapter's job.

use serde::Serialize;

use tiergate_core::{DenialCode, TierError};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outcome {
    pub replies: Vec<Reply>,
    pub actions: Vec<PlatformAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<TierListing>,
}

impl Outcome {
    pub fn reply(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: PlatformAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Code of the first denial reply, if any.
    pub fn denial(&self) -> Option<&'static str> {
        self.replies.iter().find_map(|r| r.code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub visibility: Visibility,
    /// Set on denials so adapters and tests can tell them apart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl Reply {
    /// Channel message deleted after `ttl_ms`.
    pub fn temporary(text: impl Into<String>, ttl_ms: u64) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Temporary { ttl_ms },
            code: None,
        }
    }

    /// Only visible to the invoking user.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Ephemeral,
            code: None,
        }
    }

    pub fn persistent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Persistent,
            code: None,
        }
    }

    pub fn denied(err: &TierError, ttl_ms: u64) -> Self {
        Self::temporary(err.to_string(), ttl_ms).with_code(err.code())
    }

    pub fn with_code(mut self, code: DenialCode) -> Self {
        self.code = Some(code.as_str());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Visibility {
    Temporary { ttl_ms: u64 },
    Ephemeral,
    Persistent,
}

/// Platform side effects for the adapter to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformAction {
    DeleteMessage {
        channel_id: String,
        message_id: String,
    },
    AssignRole {
        member_id: String,
        role_id: String,
        reason: String,
    },
    RemoveRole {
        member_id: String,
        role_id: String,
        reason: String,
    },
    Ban {
        member_id: String,
        reason: String,
    },
    Kick {
        member_id: String,
        reason: String,
    },
    Timeout {
        member_id: String,
        duration_ms: u64,
        reason: String,
    },
}

/// Audit record addressed to the space's log channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub log_channel_id: String,
    #[serde(flatten)]
    pub entry: AuditEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEntry {
    Setup {
        actor_id: String,
        channel_id: String,
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tier: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        role_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_channel_id: Option<String>,
    },
    RoleChanged {
        actor_id: String,
        member_id: String,
        role_id: String,
        added: bool,
        tiers: Vec<String>,
        channel_id: String,
    },
    Moderation {
        actor_id: String,
        member_id: String,
        action: &'static str,
        tiers: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        channel_id: String,
    },
}

/// Snapshot of a space's tiers for `setup list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierListing {
    pub requested_by: String,
    /// Only this user may dismiss the listing.
    pub delete_button_id: String,
    pub tiers: Vec<TierSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_channel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierSummary {
    pub name: String,
    pub priority: i64,
    pub roles: Vec<String>,
    pub allowed_roles: Vec<String>,
}
