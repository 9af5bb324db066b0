use std::collections::HashSet;

use tiergate_core::{RoleId, TierError, TierRegistry};

use crate::dispatch::outcome::{AuditEntry, Reply};

use super::event::{MemberMention, MessageEvent, RoleMention};

/// Everything a command service sees for one prefixed message.
///
/// The registry is a snapshot loaded for this message only; services mark the
/// context dirty after mutating it and the pipeline persists it afterwards.
pub struct CommandCtx<'a> {
    pub space_id: &'a str,
    pub event: &'a MessageEvent,
    pub prefix: &'a str,
    pub registry: &'a mut TierRegistry,
    reply_ttl_ms: u64,
    dirty: bool,
    audit: Option<AuditEntry>,
}

impl<'a> CommandCtx<'a> {
    pub fn new(
        space_id: &'a str,
        event: &'a MessageEvent,
        prefix: &'a str,
        registry: &'a mut TierRegistry,
        reply_ttl_ms: u64,
    ) -> Self {
        Self {
            space_id,
            event,
            prefix,
            registry,
            reply_ttl_ms,
            dirty: false,
            audit: None,
        }
    }

    pub fn actor_id(&self) -> &str {
        &self.event.author.id
    }

    pub fn actor_roles(&self) -> HashSet<RoleId> {
        self.event.author.role_ids.iter().cloned().collect()
    }

    pub fn is_administrator(&self) -> bool {
        self.event.author.administrator
    }

    pub fn channel_id(&self) -> &str {
        &self.event.channel_id
    }

    pub fn first_role(&self) -> Option<&'a RoleMention> {
        let event: &'a MessageEvent = self.event;
        event.mentions.roles.first()
    }

    pub fn first_channel(&self) -> Option<&'a str> {
        let event: &'a MessageEvent = self.event;
        event.mentions.channels.first().map(String::as_str)
    }

    /// First mentioned member other than the author, else the first mentioned member.
    pub fn target_member(&self) -> Option<&'a MemberMention> {
        let event: &'a MessageEvent = self.event;
        let members = &event.mentions.members;
        members
            .iter()
            .find(|m| m.id != event.author.id)
            .or_else(|| members.first())
    }

    pub fn temp(&self, text: impl Into<String>) -> Reply {
        Reply::temporary(text, self.reply_ttl_ms)
    }

    pub fn deny(&self, err: &TierError) -> Reply {
        Reply::denied(err, self.reply_ttl_ms)
    }

    pub fn usage(&self, syntax: &str) -> TierError {
        TierError::BadRequest(format!("usage: {}{syntax}", self.prefix))
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn record_audit(&mut self, entry: AuditEntry) {
        self.audit = Some(entry);
    }

    pub fn take_audit(&mut self) -> Option<AuditEntry> {
        self.audit.take()
    }
}
