//! `setup <sub> ...`: tier administration, platform administrators only.

use tiergate_core::{Result, RoleList, TierError};

use crate::context::CommandCtx;
use crate::dispatch::interactions::delete_button_id;
use crate::dispatch::outcome::{AuditEntry, Outcome, TierListing, TierSummary};
use crate::dispatch::CommandService;
use crate::transport::codec::{is_mention, ParsedCommand};

#[derive(Default)]
pub struct SetupService;

impl SetupService {
    pub fn new() -> Self {
        Self
    }
}

impl CommandService for SetupService {
    fn commands(&self) -> &'static [&'static str] {
        &["setup"]
    }

    fn handle(&self, ctx: &mut CommandCtx<'_>, cmd: &ParsedCommand) -> Result<Outcome> {
        // Non-administrators get no reply at all.
        if !ctx.is_administrator() {
            return Ok(Outcome::default());
        }

        let sub = cmd.arg(0).map(str::to_lowercase).unwrap_or_default();
        let tier = cmd.arg(1).filter(|a| !is_mention(a)).map(str::to_lowercase);

        // Audited before running so failed attempts are logged too.
        ctx.record_audit(AuditEntry::Setup {
            actor_id: ctx.actor_id().to_string(),
            channel_id: ctx.channel_id().to_string(),
            command: format!("{}setup {sub}", ctx.prefix).trim_end().to_string(),
            tier: tier.clone(),
            role_id: ctx.first_role().map(|r| r.id.clone()),
            target_channel_id: ctx.first_channel().map(str::to_string),
        });

        match sub.as_str() {
            "createtier" => create_tier(ctx, tier.as_deref(), cmd.arg(2)),
            "settierpriority" => set_priority(ctx, tier.as_deref(), cmd.arg(2)),
            "deletetier" => delete_tier(ctx, tier.as_deref()),
            "tierrole" => edit_role(ctx, cmd, "tierrole", RoleList::Members, true),
            "remtierrole" => edit_role(ctx, cmd, "remtierrole", RoleList::Members, false),
            "allow" => edit_role(ctx, cmd, "allow", RoleList::Allowed, true),
            "remallow" => edit_role(ctx, cmd, "remallow", RoleList::Allowed, false),
            "logs" => logs(ctx, cmd.arg(1)),
            "modtier" => mod_tier(ctx, cmd.arg(1)),
            "reset" => {
                ctx.registry.reset();
                ctx.mark_dirty();
                Ok(Outcome::reply(ctx.temp("Setup reset complete.")))
            }
            "list" => Ok(list(ctx)),
            _ => Ok(Outcome::default()),
        }
    }
}

fn parse_priority(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|p| p.parse::<i64>().ok())
}

fn create_tier(ctx: &mut CommandCtx<'_>, name: Option<&str>, priority: Option<&str>) -> Result<Outcome> {
    let (Some(name), Some(priority)) = (name, parse_priority(priority)) else {
        return Err(ctx.usage("setup createtier <name> <priority>"));
    };
    ctx.registry.create_tier(name, priority)?;
    ctx.mark_dirty();
    tracing::info!(tier = name, priority, "tier created");
    Ok(Outcome::reply(ctx.temp(format!("Tier **{name}** created (priority {priority})."))))
}

fn set_priority(ctx: &mut CommandCtx<'_>, name: Option<&str>, priority: Option<&str>) -> Result<Outcome> {
    let (Some(name), Some(priority)) = (name, parse_priority(priority)) else {
        return Err(ctx.usage("setup settierpriority <name> <priority>"));
    };
    ctx.registry.set_priority(name, priority)?;
    ctx.mark_dirty();
    Ok(Outcome::reply(ctx.temp("Priority updated.")))
}

fn delete_tier(ctx: &mut CommandCtx<'_>, name: Option<&str>) -> Result<Outcome> {
    let Some(name) = name else {
        return Err(ctx.usage("setup deletetier <name>"));
    };
    ctx.registry.delete_tier(name)?;
    ctx.mark_dirty();
    tracing::info!(tier = name, "tier deleted");
    Ok(Outcome::reply(ctx.temp("Tier deleted.")))
}

fn edit_role(
    ctx: &mut CommandCtx<'_>,
    cmd: &ParsedCommand,
    sub: &str,
    list: RoleList,
    add: bool,
) -> Result<Outcome> {
    let plain = cmd.plain_args();
    let explicit = plain.get(1).copied();
    let (Some(explicit), Some(role)) = (explicit, ctx.first_role()) else {
        return Err(ctx.usage(&format!("setup {sub} <tier> @Role")));
    };
    // The tier may follow the role mention (`tierrole @Role mod`).
    let tier = ctx
        .registry
        .find_tier_name(Some(explicit), plain.get(2..).unwrap_or_default())
        .ok_or_else(|| TierError::NotFound(explicit.to_lowercase()))?;

    let changed = if add {
        ctx.registry.add_role(&tier, list, &role.id)?
    } else {
        ctx.registry.remove_role(&tier, list, &role.id)?
    };
    if changed {
        ctx.mark_dirty();
    }
    Ok(Outcome::reply(ctx.temp("Updated.")))
}

fn logs(ctx: &mut CommandCtx<'_>, arg: Option<&str>) -> Result<Outcome> {
    if arg.is_some_and(|a| a.eq_ignore_ascii_case("off")) {
        ctx.registry.set_log_channel(None);
        ctx.mark_dirty();
        return Ok(Outcome::reply(ctx.temp("Logs disabled.")));
    }
    let Some(channel) = ctx.first_channel() else {
        return Err(ctx.usage("setup logs #channel|off"));
    };
    ctx.registry.set_log_channel(Some(channel.to_string()));
    ctx.mark_dirty();
    Ok(Outcome::reply(ctx.temp("Log channel set.")))
}

fn mod_tier(ctx: &mut CommandCtx<'_>, arg: Option<&str>) -> Result<Outcome> {
    let Some(arg) = arg.filter(|a| !is_mention(a)) else {
        return Err(ctx.usage("setup modtier <tier>|off"));
    };
    if arg.eq_ignore_ascii_case("off") {
        ctx.registry.set_moderation_tier(None)?;
        ctx.mark_dirty();
        return Ok(Outcome::reply(
            ctx.temp("Moderation tier cleared; the lowest tier now gates moderation."),
        ));
    }
    ctx.registry.set_moderation_tier(Some(arg))?;
    ctx.mark_dirty();
    Ok(Outcome::reply(ctx.temp(format!(
        "Moderation tier set to **{}**.",
        arg.to_lowercase()
    ))))
}

fn list(ctx: &CommandCtx<'_>) -> Outcome {
    let tiers = ctx
        .registry
        .by_priority()
        .into_iter()
        .map(|(name, tier)| TierSummary {
            name: name.to_string(),
            priority: tier.priority,
            roles: tier.roles.clone(),
            allowed_roles: tier.allowed_roles.clone(),
        })
        .collect();

    Outcome {
        listing: Some(TierListing {
            requested_by: ctx.actor_id().to_string(),
            delete_button_id: delete_button_id(ctx.actor_id()),
            tiers,
            moderation_tier: ctx.registry.moderation_tier().map(str::to_string),
            log_channel_id: ctx.registry.log_channel().map(str::to_string),
        }),
        ..Outcome::default()
    }
}
