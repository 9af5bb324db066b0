//! Stored configuration record and tier definitions.
//!
//! Deserialization is lenient the same way the on-disk JSON has always been
//! read: missing or mistyped fields fall back to their defaults instead of
//! failing the whole record. Leniency is read-side only. A stored value that
//! did not read back exactly is remembered and written out unchanged for as
//! long as the typed field still holds what it was read as, so saving a record
//! never rewrites data nobody edited. Keys this crate does not know about are
//! kept in `extra` and written back untouched.

use std::collections::{BTreeMap, HashSet};

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Platform role identifier (opaque string, e.g. a snowflake).
pub type RoleId = String;

/// Tier name (lower-case) -> tier.
pub type Tiers = BTreeMap<String, Tier>;

const TIERS: &str = "tiers";
const LOG_CHANNEL_ID: &str = "logChannelId";
const MODERATION_TIER: &str = "moderationTier";
const MOD_ROLES: &str = "modRoles";
const ADMIN_ROLES: &str = "adminRoles";
const MOD_ALLOWED_ROLES: &str = "modAllowedRoles";
const ADMIN_ALLOWED_ROLES: &str = "adminAllowedRoles";
const LEGACY_KEYS: [&str; 4] = [MOD_ROLES, ADMIN_ROLES, MOD_ALLOWED_ROLES, ADMIN_ALLOWED_ROLES];

const PRIORITY: &str = "priority";
const ROLES: &str = "roles";
const ALLOWED_ROLES: &str = "allowedRoles";

/// Per-space configuration record, as persisted by a config store.
///
/// Serialized with camelCase keys: `tiers`, `logChannelId`, `moderationTier`
/// and the legacy `modRoles`, `adminRoles`, `modAllowedRoles`,
/// `adminAllowedRoles` arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigRecord {
    pub tiers: Tiers,

    /// `None` disables audit logging.
    pub log_channel_id: Option<String>,

    /// `None` means "lowest-priority tier".
    pub moderation_tier: Option<String>,

    // Pre-tier schema. `Some` only for stored arrays; only read by the
    // normalizer while `tiers` is empty.
    pub mod_roles: Option<Vec<RoleId>>,
    pub admin_roles: Option<Vec<RoleId>>,
    pub mod_allowed_roles: Option<Vec<RoleId>>,
    pub admin_allowed_roles: Option<Vec<RoleId>>,

    /// Unknown keys, preserved for forward compatibility.
    pub extra: Map<String, Value>,

    /// Stored values of known keys that did not read back exactly.
    pub(crate) verbatim: Map<String, Value>,
}

impl ConfigRecord {
    /// True when any legacy array field is present (even an empty one).
    pub fn has_legacy_fields(&self) -> bool {
        self.mod_roles.is_some()
            || self.admin_roles.is_some()
            || self.mod_allowed_roles.is_some()
            || self.admin_allowed_roles.is_some()
    }

    /// Drop all legacy fields, including ones stored with the wrong type.
    pub fn clear_legacy_fields(&mut self) {
        self.mod_roles = None;
        self.admin_roles = None;
        self.mod_allowed_roles = None;
        self.admin_allowed_roles = None;
        for key in LEGACY_KEYS {
            self.verbatim.remove(key);
        }
    }

    /// Clear tiers, log channel, moderation tier, and legacy fields.
    /// Unknown keys survive.
    pub fn reset(&mut self) {
        self.tiers.clear();
        self.log_channel_id = None;
        self.moderation_tier = None;
        self.clear_legacy_fields();
        self.verbatim.clear();
    }

    fn legacy(&self, key: &str) -> &Option<Vec<RoleId>> {
        match key {
            MOD_ROLES => &self.mod_roles,
            ADMIN_ROLES => &self.admin_roles,
            MOD_ALLOWED_ROLES => &self.mod_allowed_roles,
            _ => &self.admin_allowed_roles,
        }
    }

    fn legacy_mut(&mut self, key: &str) -> &mut Option<Vec<RoleId>> {
        match key {
            MOD_ROLES => &mut self.mod_roles,
            ADMIN_ROLES => &mut self.admin_roles,
            MOD_ALLOWED_ROLES => &mut self.mod_allowed_roles,
            _ => &mut self.admin_allowed_roles,
        }
    }

    /// The stored value for `key`, if it still reads as the current field.
    fn kept(&self, key: &str, reads_as_current: impl FnOnce(&Value) -> bool) -> Option<&Value> {
        self.verbatim.get(key).filter(|raw| reads_as_current(raw))
    }
}

impl<'de> Deserialize<'de> for ConfigRecord {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let Value::Object(mut map) = Value::deserialize(d)? else {
            return Err(D::Error::custom("config record must be a JSON object"));
        };
        let mut rec = ConfigRecord::default();

        if let Some(raw) = map.remove(TIERS) {
            rec.tiers = tiers_from_value(&raw);
            if serde_json::to_value(&rec.tiers).map_err(D::Error::custom)? != raw {
                rec.verbatim.insert(TIERS.into(), raw);
            }
        }

        for (key, slot) in [
            (LOG_CHANNEL_ID, &mut rec.log_channel_id),
            (MODERATION_TIER, &mut rec.moderation_tier),
        ] {
            if let Some(raw) = map.remove(key) {
                *slot = id_from_value(&raw);
                if Value::from(slot.clone()) != raw {
                    rec.verbatim.insert(key.into(), raw);
                }
            }
        }

        for key in LEGACY_KEYS {
            if let Some(raw) = map.remove(key) {
                let roles = role_list(&raw);
                // A non-array legacy value reads as absent but is still stored.
                let exact = roles.as_ref().is_some_and(|r| Value::from(r.clone()) == raw);
                *rec.legacy_mut(key) = roles;
                if !exact {
                    rec.verbatim.insert(key.into(), raw);
                }
            }
        }

        rec.extra = map;
        Ok(rec)
    }
}

impl Serialize for ConfigRecord {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut out = s.serialize_map(None)?;

        match self.kept(TIERS, |raw| tiers_from_value(raw) == self.tiers) {
            Some(raw) => out.serialize_entry(TIERS, raw)?,
            None => out.serialize_entry(TIERS, &self.tiers)?,
        }

        for (key, current) in [
            (LOG_CHANNEL_ID, &self.log_channel_id),
            (MODERATION_TIER, &self.moderation_tier),
        ] {
            match self.kept(key, |raw| id_from_value(raw) == *current) {
                Some(raw) => out.serialize_entry(key, raw)?,
                None => out.serialize_entry(key, current)?,
            }
        }

        for key in LEGACY_KEYS {
            let current = self.legacy(key);
            match self.kept(key, |raw| role_list(raw) == *current) {
                Some(raw) => out.serialize_entry(key, raw)?,
                None => {
                    if let Some(roles) = current {
                        out.serialize_entry(key, roles)?;
                    }
                }
            }
        }

        for (key, value) in &self.extra {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

/// A named privilege level.
///
/// Serialized as `{ "priority", "roles", "allowedRoles", ..extra }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tier {
    /// Higher is more privileged. Ties are allowed.
    pub priority: i64,

    /// Membership roles: holders of any of these belong to the tier.
    pub roles: Vec<RoleId>,

    /// Capability roles: members may assign/remove these on others.
    pub allowed_roles: Vec<RoleId>,

    pub extra: Map<String, Value>,

    /// Stored `priority` / `roles` / `allowedRoles` values that did not read
    /// back exactly, or the whole stored value when it was not an object.
    verbatim: Map<String, Value>,
    malformed: Option<Value>,
}

impl Tier {
    pub fn new(priority: i64) -> Self {
        Self {
            priority,
            ..Self::default()
        }
    }

    pub fn with_roles(priority: i64, roles: Vec<RoleId>, allowed_roles: Vec<RoleId>) -> Self {
        Self {
            priority,
            roles,
            allowed_roles,
            ..Self::default()
        }
    }

    /// Whether the actor holds at least one of this tier's membership roles.
    pub fn is_held_by(&self, actor_roles: &HashSet<RoleId>) -> bool {
        self.roles.iter().any(|r| actor_roles.contains(r))
    }

    fn from_value(raw: &Value) -> Self {
        let Value::Object(map) = raw else {
            return Self {
                malformed: Some(raw.clone()),
                ..Self::default()
            };
        };
        let mut map = map.clone();
        let mut tier = Self::default();

        if let Some(v) = map.remove(PRIORITY) {
            tier.priority = priority_from_value(&v);
            if Value::from(tier.priority) != v {
                tier.verbatim.insert(PRIORITY.into(), v);
            }
        }
        for key in [ROLES, ALLOWED_ROLES] {
            if let Some(v) = map.remove(key) {
                let roles = role_list(&v).unwrap_or_default();
                if Value::from(roles.clone()) != v {
                    tier.verbatim.insert(key.into(), v);
                }
                *tier.list_mut(key) = roles;
            }
        }

        tier.extra = map;
        tier
    }

    fn list(&self, key: &str) -> &Vec<RoleId> {
        if key == ROLES {
            &self.roles
        } else {
            &self.allowed_roles
        }
    }

    fn list_mut(&mut self, key: &str) -> &mut Vec<RoleId> {
        if key == ROLES {
            &mut self.roles
        } else {
            &mut self.allowed_roles
        }
    }

    /// True while the tier still holds exactly what a non-object value reads as.
    fn untouched_malformed(&self) -> bool {
        self.priority == 0
            && self.roles.is_empty()
            && self.allowed_roles.is_empty()
            && self.extra.is_empty()
            && self.verbatim.is_empty()
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Tier::from_value(&Value::deserialize(d)?))
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if let Some(raw) = self.malformed.as_ref().filter(|_| self.untouched_malformed()) {
            return raw.serialize(s);
        }

        let mut out = s.serialize_map(None)?;
        match self
            .verbatim
            .get(PRIORITY)
            .filter(|raw| priority_from_value(raw) == self.priority)
        {
            Some(raw) => out.serialize_entry(PRIORITY, raw)?,
            None => out.serialize_entry(PRIORITY, &self.priority)?,
        }
        for key in [ROLES, ALLOWED_ROLES] {
            let current = self.list(key);
            match self
                .verbatim
                .get(key)
                .filter(|raw| role_list(raw).unwrap_or_default() == *current)
            {
                Some(raw) => out.serialize_entry(key, raw)?,
                None => out.serialize_entry(key, current)?,
            }
        }
        for (key, value) in &self.extra {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

// --------------------
// Lenient field readers
// --------------------

/// Non-object `tiers` reads as empty; each entry reads through `Tier::from_value`.
fn tiers_from_value(v: &Value) -> Tiers {
    let Value::Object(map) = v else {
        return Tiers::new();
    };
    map.iter()
        .map(|(name, raw)| (name.clone(), Tier::from_value(raw)))
        .collect()
}

/// Numeric priorities are kept (floats truncate); anything else counts as 0.
fn priority_from_value(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// `Some` only for JSON arrays. Numeric ids are stringified, other entries skipped.
fn role_list(v: &Value) -> Option<Vec<RoleId>> {
    let Value::Array(items) = v else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
    )
}

/// Empty strings and non-scalar values read as `None`.
fn id_from_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
