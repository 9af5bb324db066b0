//! `addcargo` / `remcargo`: tier-gated role assignment.

use tiergate_core::{Result, TierError};

use crate::context::CommandCtx;
use crate::dispatch::outcome::{AuditEntry, Outcome, PlatformAction};
use crate::dispatch::CommandService;
use crate::transport::codec::ParsedCommand;

#[derive(Default)]
pub struct CargoService;

impl CargoService {
    pub fn new() -> Self {
        Self
    }
}

impl CommandService for CargoService {
    fn commands(&self) -> &'static [&'static str] {
        &["addcargo", "remcargo"]
    }

    fn handle(&self, ctx: &mut CommandCtx<'_>, cmd: &ParsedCommand) -> Result<Outcome> {
        let adding = cmd.name == "addcargo";
        let (Some(role), Some(target)) = (ctx.first_role(), ctx.target_member()) else {
            return Err(ctx.usage(&format!("{} @Role @User", cmd.name)));
        };

        let access = ctx.registry.access(&ctx.actor_roles()).ok_or(TierError::NoAccess)?;
        access.require_role(&role.id)?;

        // The everyone role shares the space id.
        if role.managed || role.id == ctx.space_id {
            return Err(TierError::Forbidden("that role cannot be managed by this bot".into()));
        }
        if !role.editable {
            return Err(TierError::Forbidden(
                "I cannot manage that role; check role hierarchy and Manage Roles permission".into(),
            ));
        }

        let holds = target.has_role(&role.id);
        if adding && holds {
            return Err(TierError::BadRequest(format!("<@{}> already has <@&{}>", target.id, role.id)));
        }
        if !adding && !holds {
            return Err(TierError::BadRequest(format!("<@{}> does not have <@&{}>", target.id, role.id)));
        }

        let (action, text) = if adding {
            (
                PlatformAction::AssignRole {
                    member_id: target.id.clone(),
                    role_id: role.id.clone(),
                    reason: format!("Cargo add by {}", ctx.actor_id()),
                },
                format!("Added <@&{}> to <@{}>.", role.id, target.id),
            )
        } else {
            (
                PlatformAction::RemoveRole {
                    member_id: target.id.clone(),
                    role_id: role.id.clone(),
                    reason: format!("Cargo remove by {}", ctx.actor_id()),
                },
                format!("Removed <@&{}> from <@{}>.", role.id, target.id),
            )
        };

        tracing::info!(
            member = %target.id,
            role = %role.id,
            added = adding,
            tiers = %access.tier_label(),
            "cargo role changed"
        );
        ctx.record_audit(AuditEntry::RoleChanged {
            actor_id: ctx.actor_id().to_string(),
            member_id: target.id.clone(),
            role_id: role.id.clone(),
            added: adding,
            tiers: access.tier_names,
            channel_id: ctx.channel_id().to_string(),
        });

        Ok(Outcome::reply(ctx.temp(text)).with_action(action))
    }
}
