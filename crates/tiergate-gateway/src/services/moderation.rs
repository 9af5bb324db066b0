//! `ban`, `kick`, `mute` / `timeout`: priority-gated moderation.

use tiergate_core::moderation::timeout_duration;
use tiergate_core::{Result, TierError};

use crate::context::CommandCtx;
use crate::dispatch::outcome::{AuditEntry, Outcome, PlatformAction};
use crate::dispatch::CommandService;
use crate::transport::codec::ParsedCommand;

const NO_REASON: &str = "No reason provided";

#[derive(Default)]
pub struct ModerationService;

impl ModerationService {
    pub fn new() -> Self {
        Self
    }
}

impl CommandService for ModerationService {
    fn commands(&self) -> &'static [&'static str] {
        &["ban", "kick", "mute", "timeout"]
    }

    fn handle(&self, ctx: &mut CommandCtx<'_>, cmd: &ParsedCommand) -> Result<Outcome> {
        let timed = matches!(cmd.name.as_str(), "mute" | "timeout");
        let syntax = if timed {
            format!("{} @User <duration> [reason]", cmd.name)
        } else {
            format!("{} @User [reason]", cmd.name)
        };

        let access = ctx.registry.access(&ctx.actor_roles());
        let requirement = ctx.registry.authorize_moderation(access.as_ref())?;
        let tiers = access.map(|a| a.tier_names).unwrap_or_default();

        let Some(target) = ctx.target_member() else {
            return Err(ctx.usage(&syntax));
        };
        if target.id == ctx.actor_id() {
            return Err(TierError::BadRequest("you cannot moderate yourself".into()));
        }

        let mut plain = cmd.plain_args().into_iter();
        let duration = if timed {
            let Some(text) = plain.next() else {
                return Err(ctx.usage(&syntax));
            };
            let ms = u64::try_from(timeout_duration(text)?.as_millis()).unwrap_or(u64::MAX);
            Some((text, ms))
        } else {
            None
        };
        let duration_ms = duration.map(|(_, ms)| ms);
        let reason = plain.collect::<Vec<_>>().join(" ");
        let reason = if reason.is_empty() { NO_REASON.to_string() } else { reason };

        let member_id = target.id.clone();
        let (action, verb, text) = match (cmd.name.as_str(), duration) {
            ("ban", _) => (
                PlatformAction::Ban { member_id: member_id.clone(), reason: reason.clone() },
                "ban",
                format!("Banned <@{member_id}>."),
            ),
            ("kick", _) => (
                PlatformAction::Kick { member_id: member_id.clone(), reason: reason.clone() },
                "kick",
                format!("Kicked <@{member_id}>."),
            ),
            (_, Some((text, ms))) => (
                PlatformAction::Timeout { member_id: member_id.clone(), duration_ms: ms, reason: reason.clone() },
                "timeout",
                format!("Timed out <@{member_id}> for {text}."),
            ),
            (other, None) => {
                return Err(TierError::Internal(format!("unhandled moderation command: {other}")));
            }
        };

        tracing::info!(
            member = %member_id,
            action = verb,
            required_tier = %requirement.tier,
            "moderation action"
        );
        ctx.record_audit(AuditEntry::Moderation {
            actor_id: ctx.actor_id().to_string(),
            member_id,
            action: verb,
            tiers,
            duration_ms,
            reason: Some(reason),
            channel_id: ctx.channel_id().to_string(),
        });

        Ok(Outcome::reply(ctx.temp(text)).with_action(action))
    }
}
