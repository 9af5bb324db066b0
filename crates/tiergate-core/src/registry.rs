//! Tier registry: a normalized `ConfigRecord` plus the mutations administrators
//! may apply to it.
//!
//! The only way to build a registry is through [`TierRegistry::load`], which
//! normalizes the record first, so resolvers never see a legacy-only record.
//! Tier names are case-insensitive; they are folded to lower case on entry.

use std::collections::HashSet;

use crate::access::{resolve_access, TierAccess};
use crate::error::{Result, TierError};
use crate::model::{ConfigRecord, RoleId, Tier, Tiers};
use crate::moderation::{authorize_moderation, resolve_requirement, ModerationRequirement};
use crate::normalize::normalize;

/// Which role list of a tier a mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleList {
    /// Membership roles (`roles`).
    Members,
    /// Capability roles (`allowedRoles`).
    Allowed,
}

#[derive(Debug, Clone)]
pub struct TierRegistry {
    record: ConfigRecord,
}

impl TierRegistry {
    /// Normalize `record` and wrap it. The flag reports whether the caller
    /// must persist the upgraded record.
    pub fn load(record: ConfigRecord) -> (Self, bool) {
        let (record, changed) = normalize(record);
        (Self { record }, changed)
    }

    pub fn record(&self) -> &ConfigRecord {
        &self.record
    }

    pub fn into_record(self) -> ConfigRecord {
        self.record
    }

    pub fn tiers(&self) -> &Tiers {
        &self.record.tiers
    }

    pub fn get(&self, name: &str) -> Option<&Tier> {
        self.record.tiers.get(&fold(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn log_channel(&self) -> Option<&str> {
        self.record.log_channel_id.as_deref()
    }

    pub fn moderation_tier(&self) -> Option<&str> {
        self.record.moderation_tier.as_deref()
    }

    // --------------------
    // Resolvers
    // --------------------

    pub fn access(&self, actor_roles: &HashSet<RoleId>) -> Option<TierAccess> {
        resolve_access(actor_roles, &self.record.tiers)
    }

    pub fn moderation_requirement(&self) -> Option<ModerationRequirement> {
        resolve_requirement(&self.record.tiers, self.moderation_tier())
    }

    pub fn authorize_moderation(&self, access: Option<&TierAccess>) -> Result<ModerationRequirement> {
        authorize_moderation(access, &self.record.tiers, self.moderation_tier())
    }

    /// Tiers ordered by priority (highest first), then name.
    pub fn by_priority(&self) -> Vec<(&str, &Tier)> {
        let mut out: Vec<(&str, &Tier)> = self
            .record
            .tiers
            .iter()
            .map(|(name, tier)| (name.as_str(), tier))
            .collect();
        out.sort_by(|a, b| b.1.priority.cmp(&a.1.priority).then_with(|| a.0.cmp(b.0)));
        out
    }

    /// Resolve the tier a command refers to.
    ///
    /// An explicit name wins when it names an existing tier. Otherwise the
    /// first of `rest` that matches an existing tier (case-insensitive) is used.
    pub fn find_tier_name(&self, explicit: Option<&str>, rest: &[&str]) -> Option<String> {
        explicit
            .into_iter()
            .chain(rest.iter().copied())
            .map(fold)
            .find(|name| self.record.tiers.contains_key(name))
    }

    // --------------------
    // Mutations
    // --------------------

    pub fn create_tier(&mut self, name: &str, priority: i64) -> Result<()> {
        let name = fold(name);
        if name.is_empty() {
            return Err(TierError::BadRequest("tier name must not be empty".into()));
        }
        if self.record.tiers.contains_key(&name) {
            return Err(TierError::AlreadyExists(name));
        }
        self.record.tiers.insert(name, Tier::new(priority));
        Ok(())
    }

    pub fn set_priority(&mut self, name: &str, priority: i64) -> Result<()> {
        self.tier_mut(name)?.priority = priority;
        Ok(())
    }

    pub fn delete_tier(&mut self, name: &str) -> Result<Tier> {
        let name = fold(name);
        self.record.tiers.remove(&name).ok_or(TierError::NotFound(name))
    }

    /// Add a role to a tier list. Returns false when it was already there.
    pub fn add_role(&mut self, name: &str, list: RoleList, role: &str) -> Result<bool> {
        let roles = self.role_list_mut(name, list)?;
        if roles.iter().any(|r| r == role) {
            return Ok(false);
        }
        roles.push(role.to_string());
        Ok(true)
    }

    /// Remove a role from a tier list. Returns false when it was not there.
    pub fn remove_role(&mut self, name: &str, list: RoleList, role: &str) -> Result<bool> {
        let roles = self.role_list_mut(name, list)?;
        let before = roles.len();
        roles.retain(|r| r != role);
        Ok(roles.len() != before)
    }

    pub fn add_membership_role(&mut self, name: &str, role: &str) -> Result<bool> {
        self.add_role(name, RoleList::Members, role)
    }

    pub fn remove_membership_role(&mut self, name: &str, role: &str) -> Result<bool> {
        self.remove_role(name, RoleList::Members, role)
    }

    pub fn add_allowed_role(&mut self, name: &str, role: &str) -> Result<bool> {
        self.add_role(name, RoleList::Allowed, role)
    }

    pub fn remove_allowed_role(&mut self, name: &str, role: &str) -> Result<bool> {
        self.remove_role(name, RoleList::Allowed, role)
    }

    /// Pin moderation to a tier, or `None` to fall back to the lowest tier.
    pub fn set_moderation_tier(&mut self, name: Option<&str>) -> Result<()> {
        self.record.moderation_tier = match name {
            Some(n) => {
                let n = fold(n);
                if !self.record.tiers.contains_key(&n) {
                    return Err(TierError::NotFound(n));
                }
                Some(n)
            }
            None => None,
        };
        Ok(())
    }

    pub fn set_log_channel(&mut self, channel: Option<String>) {
        self.record.log_channel_id = channel.filter(|c| !c.is_empty());
    }

    /// Clear tiers, log channel, moderation tier, and legacy fields.
    ///
    /// Legacy fields are removed rather than emptied: an empty legacy array
    /// next to an empty tier map would migrate again on the next load.
    pub fn reset(&mut self) {
        self.record.reset();
    }

    fn tier_mut(&mut self, name: &str) -> Result<&mut Tier> {
        let name = fold(name);
        match self.record.tiers.get_mut(&name) {
            Some(t) => Ok(t),
            None => Err(TierError::NotFound(name)),
        }
    }

    fn role_list_mut(&mut self, name: &str, list: RoleList) -> Result<&mut Vec<RoleId>> {
        let tier = self.tier_mut(name)?;
        Ok(match list {
            RoleList::Members => &mut tier.roles,
            RoleList::Allowed => &mut tier.allowed_roles,
        })
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registry() -> TierRegistry {
        TierRegistry::load(ConfigRecord::default()).0
    }

    #[test]
    fn create_is_case_insensitive() {
        let mut reg = registry();
        reg.create_tier("Helpers", 1).unwrap();
        assert!(reg.contains("helpers"));
        assert_eq!(
            reg.create_tier("HELPERS", 4).unwrap_err(),
            TierError::AlreadyExists("helpers".into())
        );
        assert_eq!(reg.get("helpers").unwrap().priority, 1);
    }

    #[test]
    fn missing_tier_is_not_found() {
        let mut reg = registry();
        assert_eq!(reg.set_priority("x", 1).unwrap_err(), TierError::NotFound("x".into()));
        assert_eq!(reg.delete_tier("x").unwrap_err(), TierError::NotFound("x".into()));
        assert!(reg.add_membership_role("x", "r").is_err());
        assert!(reg.remove_allowed_role("x", "r").is_err());
        assert!(reg.set_moderation_tier(Some("x")).is_err());
    }

    #[test]
    fn role_adds_are_idempotent() {
        let mut reg = registry();
        reg.create_tier("mod", 1).unwrap();
        assert!(reg.add_membership_role("mod", "r1").unwrap());
        assert!(!reg.add_membership_role("MOD", "r1").unwrap());
        assert_eq!(reg.get("mod").unwrap().roles, vec!["r1".to_string()]);

        assert!(reg.add_allowed_role("mod", "c1").unwrap());
        assert!(!reg.add_allowed_role("mod", "c1").unwrap());
        assert_eq!(reg.get("mod").unwrap().allowed_roles, vec!["c1".to_string()]);
    }

    #[test]
    fn role_removes_are_safe() {
        let mut reg = registry();
        reg.create_tier("mod", 1).unwrap();
        assert!(!reg.remove_membership_role("mod", "nope").unwrap());
        reg.add_membership_role("mod", "r1").unwrap();
        assert!(reg.remove_membership_role("mod", "r1").unwrap());
        assert!(reg.get("mod").unwrap().roles.is_empty());
    }

    #[test]
    fn lists_are_independent() {
        let mut reg = registry();
        reg.create_tier("mod", 1).unwrap();
        reg.add_allowed_role("mod", "r1").unwrap();
        assert!(reg.get("mod").unwrap().roles.is_empty());
    }

    #[test]
    fn reset_prevents_legacy_resurrection() {
        let rec = ConfigRecord {
            mod_roles: Some(vec!["m".into()]),
            log_channel_id: Some("c".into()),
            ..ConfigRecord::default()
        };
        let (mut reg, changed) = TierRegistry::load(rec);
        assert!(changed);
        reg.set_moderation_tier(Some("admin")).unwrap();

        reg.reset();
        let (reg, changed) = TierRegistry::load(reg.into_record());
        assert!(!changed);
        assert!(reg.tiers().is_empty());
        assert!(reg.log_channel().is_none());
        assert!(reg.moderation_tier().is_none());
        assert!(!reg.record().has_legacy_fields());
    }

    #[test]
    fn find_tier_prefers_explicit_then_scans() {
        let mut reg = registry();
        reg.create_tier("mod", 1).unwrap();
        reg.create_tier("admin", 2).unwrap();

        assert_eq!(reg.find_tier_name(Some("Admin"), &["mod"]), Some("admin".into()));
        assert_eq!(reg.find_tier_name(Some("ghost"), &["<@&1>", "MOD", "admin"]), Some("mod".into()));
        assert_eq!(reg.find_tier_name(None, &["x", "y"]), None);
    }

    #[test]
    fn by_priority_orders_desc_then_name() {
        let mut reg = registry();
        reg.create_tier("b", 1).unwrap();
        reg.create_tier("a", 1).unwrap();
        reg.create_tier("top", 9).unwrap();
        reg.create_tier("neg", -1).unwrap();
        let names: Vec<&str> = reg.by_priority().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["top", "a", "b", "neg"]);
    }

    #[test]
    fn moderation_tier_can_be_cleared() {
        let mut reg = registry();
        reg.create_tier("mod", 1).unwrap();
        reg.create_tier("admin", 2).unwrap();
        reg.set_moderation_tier(Some("ADMIN")).unwrap();
        assert_eq!(reg.moderation_requirement().unwrap().tier, "admin");
        reg.set_moderation_tier(None).unwrap();
        assert_eq!(reg.moderation_requirement().unwrap().tier, "mod");
    }

    #[test]
    fn empty_log_channel_disables_logging() {
        let mut reg = registry();
        reg.set_log_channel(Some("123".into()));
        assert_eq!(reg.log_channel(), Some("123"));
        reg.set_log_channel(Some(String::new()));
        assert!(reg.log_channel().is_none());
    }
}
