//! Tier access resolution.
//!
//! An actor matches a tier when they hold any of its membership roles. Their
//! privilege is the highest matched priority, and their capabilities are the
//! allowed roles of *every* tier at or below that priority, matched or not.
//! A higher tier therefore inherits everything granted to the tiers beneath it.

use std::collections::{BTreeSet, HashSet};

use crate::error::{Result, TierError};
use crate::model::{RoleId, Tiers};

/// What an actor may do, derived from their role memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAccess {
    pub highest_priority: i64,
    /// Matched tiers at `highest_priority` (more than one on ties), sorted.
    pub tier_names: Vec<String>,
    pub effective_allowed_roles: BTreeSet<RoleId>,
}

impl TierAccess {
    pub fn can_manage(&self, role: &str) -> bool {
        self.effective_allowed_roles.contains(role)
    }

    /// Capability check for role assign/remove commands.
    pub fn require_role(&self, role: &str) -> Result<()> {
        if self.can_manage(role) {
            return Ok(());
        }
        Err(TierError::RoleNotAllowed {
            role: role.to_string(),
            tiers: self.tier_label(),
        })
    }

    /// Tier names joined for logs and audit records.
    pub fn tier_label(&self) -> String {
        self.tier_names.join(", ")
    }
}

/// Resolve the actor's access. `None` means the actor matches no tier.
pub fn resolve_access(actor_roles: &HashSet<RoleId>, tiers: &Tiers) -> Option<TierAccess> {
    let matched: Vec<(&String, i64)> = tiers
        .iter()
        .filter(|(_, tier)| tier.is_held_by(actor_roles))
        .map(|(name, tier)| (name, tier.priority))
        .collect();

    let highest_priority = matched.iter().map(|(_, p)| *p).max()?;

    let tier_names = matched
        .iter()
        .filter(|(_, p)| *p == highest_priority)
        .map(|(name, _)| (*name).clone())
        .collect();

    let effective_allowed_roles = tiers
        .values()
        .filter(|tier| tier.priority <= highest_priority)
        .flat_map(|tier| tier.allowed_roles.iter().cloned())
        .collect();

    Some(TierAccess {
        highest_priority,
        tier_names,
        effective_allowed_roles,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Tier;

    fn roles(ids: &[&str]) -> HashSet<RoleId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn tier(priority: i64, members: &[&str], allowed: &[&str]) -> Tier {
        Tier::with_roles(
            priority,
            members.iter().map(|s| s.to_string()).collect(),
            allowed.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn set(ids: &[&str]) -> BTreeSet<RoleId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_tiers_yield_none() {
        assert!(resolve_access(&roles(&["r1"]), &Tiers::new()).is_none());
    }

    #[test]
    fn no_intersection_yields_none() {
        let mut tiers = Tiers::new();
        tiers.insert("mod".into(), tier(1, &["m"], &["A"]));
        assert!(resolve_access(&roles(&["x", "y"]), &tiers).is_none());
        assert!(resolve_access(&HashSet::new(), &tiers).is_none());
    }

    #[test]
    fn higher_tier_inherits_lower_capabilities() {
        let mut tiers = Tiers::new();
        tiers.insert("mod".into(), tier(1, &["m"], &["A"]));
        tiers.insert("admin".into(), tier(2, &["a"], &["B"]));

        let access = resolve_access(&roles(&["a"]), &tiers).unwrap();
        assert_eq!(access.highest_priority, 2);
        assert_eq!(access.tier_names, vec!["admin".to_string()]);
        assert_eq!(access.effective_allowed_roles, set(&["A", "B"]));
    }

    #[test]
    fn lower_tier_does_not_see_higher_capabilities() {
        let mut tiers = Tiers::new();
        tiers.insert("mod".into(), tier(1, &["m"], &["A"]));
        tiers.insert("admin".into(), tier(2, &["a"], &["B"]));

        let access = resolve_access(&roles(&["m"]), &tiers).unwrap();
        assert_eq!(access.effective_allowed_roles, set(&["A"]));
        assert!(access.require_role("B").is_err());
        assert!(access.require_role("A").is_ok());
    }

    #[test]
    fn ties_report_every_top_tier() {
        let mut tiers = Tiers::new();
        tiers.insert("events".into(), tier(3, &["e"], &["E"]));
        tiers.insert("support".into(), tier(3, &["s"], &["S"]));
        tiers.insert("helper".into(), tier(1, &["h"], &[]));

        let access = resolve_access(&roles(&["e", "s", "h"]), &tiers).unwrap();
        assert_eq!(access.highest_priority, 3);
        let names: BTreeSet<_> = access.tier_names.iter().cloned().collect();
        assert_eq!(names, set(&["events", "support"]));
        assert_eq!(access.effective_allowed_roles, set(&["E", "S"]));
    }

    #[test]
    fn unmatched_tier_at_same_priority_contributes() {
        let mut tiers = Tiers::new();
        tiers.insert("a".into(), tier(2, &["ra"], &["X"]));
        tiers.insert("b".into(), tier(2, &["rb"], &["Y"]));

        let access = resolve_access(&roles(&["ra"]), &tiers).unwrap();
        assert_eq!(access.tier_names, vec!["a".to_string()]);
        assert_eq!(access.effective_allowed_roles, set(&["X", "Y"]));
    }

    #[test]
    fn negative_priorities_compare_normally() {
        let mut tiers = Tiers::new();
        tiers.insert("low".into(), tier(-5, &["l"], &["L"]));
        tiers.insert("lower".into(), tier(-9, &[], &["M"]));
        tiers.insert("zero".into(), tier(0, &[], &["Z"]));

        let access = resolve_access(&roles(&["l"]), &tiers).unwrap();
        assert_eq!(access.highest_priority, -5);
        assert_eq!(access.effective_allowed_roles, set(&["L", "M"]));
    }

    #[test]
    fn denial_names_actor_tiers() {
        let mut tiers = Tiers::new();
        tiers.insert("mod".into(), tier(1, &["m"], &[]));
        let access = resolve_access(&roles(&["m"]), &tiers).unwrap();
        let err = access.require_role("R").unwrap_err();
        assert_eq!(err.code().as_str(), "ROLE_NOT_ALLOWED");
        assert!(err.to_string().contains("mod"));
    }
}
