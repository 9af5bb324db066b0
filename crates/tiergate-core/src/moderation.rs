//! Moderation gating (ban / kick / timeout).
//!
//! Moderation is priority-gated: the actor's highest matched priority must
//! reach the requirement's priority. Effective allowed roles play no part.

use std::time::Duration;

use crate::access::TierAccess;
use crate::duration::parse_duration_ms;
use crate::error::{Result, TierError};
use crate::model::Tiers;

/// Longest timeout the platform accepts: 28 days.
pub const MAX_TIMEOUT_MS: u64 = 28 * 24 * 60 * 60 * 1000;

/// Minimum tier needed for moderation commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationRequirement {
    pub tier: String,
    pub priority: i64,
}

/// Resolve the moderation requirement.
///
/// A configured moderation tier wins while it still exists. Otherwise the
/// lowest-priority tier is used, ties broken by ascending name. `None` when
/// no tiers exist.
pub fn resolve_requirement(tiers: &Tiers, moderation_tier: Option<&str>) -> Option<ModerationRequirement> {
    if let Some((name, tier)) = moderation_tier.and_then(|n| tiers.get_key_value(n)) {
        return Some(ModerationRequirement {
            tier: name.clone(),
            priority: tier.priority,
        });
    }

    // BTreeMap iterates names ascending; min_by_key keeps the first minimum.
    tiers
        .iter()
        .min_by_key(|(_, tier)| tier.priority)
        .map(|(name, tier)| ModerationRequirement {
            tier: name.clone(),
            priority: tier.priority,
        })
}

/// Decide whether an actor may run a moderation command.
pub fn authorize_moderation(
    access: Option<&TierAccess>,
    tiers: &Tiers,
    moderation_tier: Option<&str>,
) -> Result<ModerationRequirement> {
    let requirement =
        resolve_requirement(tiers, moderation_tier).ok_or(TierError::NoTiersConfigured)?;
    let access = access.ok_or(TierError::NoAccess)?;

    if access.highest_priority < requirement.priority {
        return Err(TierError::InsufficientPriority {
            required_tier: requirement.tier,
            required: requirement.priority,
            actual: access.highest_priority,
        });
    }
    Ok(requirement)
}

/// Parse a timeout duration and enforce the platform ceiling.
pub fn timeout_duration(text: &str) -> Result<Duration> {
    let ms = parse_duration_ms(text).ok_or_else(|| TierError::InvalidDuration(text.to_string()))?;
    if ms > MAX_TIMEOUT_MS {
        return Err(TierError::DurationTooLong {
            requested_ms: ms,
            max_ms: MAX_TIMEOUT_MS,
        });
    }
    Ok(Duration::from_millis(ms))
}
