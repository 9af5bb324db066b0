//! Schema upgrade for stored records.
//!
//! Two things happen here:
//! - tier names are folded to lower case (first lower-case key wins on collision)
//! - a legacy moderator/administrator record is migrated into `mod`/`admin` tiers
//!
//! Migration runs only while `tiers` is empty and at least one legacy array
//! is present. Once a tier exists, legacy fields are inert.

use crate::model::{ConfigRecord, Tier};

/// Name of the tier synthesized from `modRoles` / `modAllowedRoles`.
pub const LEGACY_MOD_TIER: &str = "mod";
/// Name of the tier synthesized from `adminRoles` / `adminAllowedRoles`.
pub const LEGACY_ADMIN_TIER: &str = "admin";

/// Upgrade `record` to the current schema.
///
/// Returns the record and whether it changed; callers must persist it when
/// `changed` is true. A second call on the result is always a no-op.
pub fn normalize(mut record: ConfigRecord) -> (ConfigRecord, bool) {
    let mut changed = fold_tier_names(&mut record);

    if let Some(m) = record.moderation_tier.as_mut() {
        if m.chars().any(char::is_uppercase) {
            *m = m.to_lowercase();
            changed = true;
        }
    }

    if record.tiers.is_empty() && record.has_legacy_fields() {
        migrate_legacy(&mut record);
        changed = true;
    }

    (record, changed)
}

fn migrate_legacy(record: &mut ConfigRecord) {
    let copy = |v: &Option<Vec<String>>| v.clone().unwrap_or_default();

    record.tiers.insert(
        LEGACY_MOD_TIER.to_string(),
        Tier::with_roles(1, copy(&record.mod_roles), copy(&record.mod_allowed_roles)),
    );
    record.tiers.insert(
        LEGACY_ADMIN_TIER.to_string(),
        Tier::with_roles(2, copy(&record.admin_roles), copy(&record.admin_allowed_roles)),
    );
}

fn fold_tier_names(record: &mut ConfigRecord) -> bool {
    let mixed: Vec<String> = record
        .tiers
        .keys()
        .filter(|name| name.chars().any(char::is_uppercase))
        .cloned()
        .collect();
    if mixed.is_empty() {
        return false;
    }

    for name in mixed {
        let Some(tier) = record.tiers.remove(&name) else { continue };
        let folded = name.to_lowercase();
        if record.tiers.contains_key(&folded) {
            tracing::warn!(tier = %name, kept = %folded, "dropping tier whose name collides case-insensitively");
            continue;
        }
        record.tiers.insert(folded, tier);
    }
    true
}
