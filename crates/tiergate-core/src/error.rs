//! Shared error type across tiergate crates.

use thiserror::Error;

/// Denial codes surfaced to the command dispatcher (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialCode {
    /// Referenced tier does not exist.
    NotFound,
    /// Tier with that name already exists.
    AlreadyExists,
    /// Actor matches no tier.
    NoAccess,
    /// Actor's tier priority is below the moderation requirement.
    InsufficientPriority,
    /// Moderation requested on a space with no tiers.
    NoTiersConfigured,
    /// Role is outside the actor's effective allowed roles.
    RoleNotAllowed,
    /// Duration text did not parse.
    InvalidDuration,
    /// Duration exceeds the timeout ceiling.
    DurationTooLong,
    /// Malformed command or config.
    BadRequest,
    /// Caller lacks the platform permission for this command.
    Forbidden,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Storage or other internal failure.
    Internal,
}

impl DenialCode {
    /// String representation used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            DenialCode::NotFound => "NOT_FOUND",
            DenialCode::AlreadyExists => "ALREADY_EXISTS",
            DenialCode::NoAccess => "NO_ACCESS",
            DenialCode::InsufficientPriority => "INSUFFICIENT_PRIORITY",
            DenialCode::NoTiersConfigured => "NO_TIERS_CONFIGURED",
            DenialCode::RoleNotAllowed => "ROLE_NOT_ALLOWED",
            DenialCode::InvalidDuration => "INVALID_DURATION",
            DenialCode::DurationTooLong => "DURATION_TOO_LONG",
            DenialCode::BadRequest => "BAD_REQUEST",
            DenialCode::Forbidden => "FORBIDDEN",
            DenialCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            DenialCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TierError>;

/// Unified error type used by the engine and the bot host.
///
/// Every variant is an ordinary decision outcome; the messages are shown to
/// administrators as-is, so they name the tiers and priorities involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierError {
    #[error("tier `{0}` not found")]
    NotFound(String),
    #[error("tier `{0}` already exists")]
    AlreadyExists(String),
    #[error("you are not allowed to use tier commands")]
    NoAccess,
    #[error("requires tier `{required_tier}` (priority {required}); your highest priority is {actual}")]
    InsufficientPriority {
        required_tier: String,
        required: i64,
        actual: i64,
    },
    #[error("no tiers configured; create one with `setup createtier`")]
    NoTiersConfigured,
    #[error("role {role} is not allowed for your tier ({tiers})")]
    RoleNotAllowed { role: String, tiers: String },
    #[error("invalid duration `{0}`; use <number><s|m|h|d|w>")]
    InvalidDuration(String),
    #[error("duration of {requested_ms}ms exceeds the {max_ms}ms limit")]
    DurationTooLong { requested_ms: u64, max_ms: u64 },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TierError {
    /// Map the error to its stable denial code.
    pub fn code(&self) -> DenialCode {
        match self {
            TierError::NotFound(_) => DenialCode::NotFound,
            TierError::AlreadyExists(_) => DenialCode::AlreadyExists,
            TierError::NoAccess => DenialCode::NoAccess,
            TierError::InsufficientPriority { .. } => DenialCode::InsufficientPriority,
            TierError::NoTiersConfigured => DenialCode::NoTiersConfigured,
            TierError::RoleNotAllowed { .. } => DenialCode::RoleNotAllowed,
            TierError::InvalidDuration(_) => DenialCode::InvalidDuration,
            TierError::DurationTooLong { .. } => DenialCode::DurationTooLong,
            TierError::BadRequest(_) => DenialCode::BadRequest,
            TierError::Forbidden(_) => DenialCode::Forbidden,
            TierError::UnsupportedVersion => DenialCode::UnsupportedVersion,
            TierError::Internal(_) => DenialCode::Internal,
        }
    }
}
