//! Error codes surfaced in problem-details responses.
//!
//! Every code maps 1:1 to a SCREAMING_SNAKE_CASE string. Add new codes
//! here; never pass ad-hoc strings as error codes.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    Unauthorized,
    /// No `Authorization` header on a protected route
    AuthHeaderMissing,
    /// Header present but not `Bearer <token>`
    AuthHeaderMalformed,
    /// Token failed verification (signature, expiry, shape)
    InvalidToken,
    /// Verified token without a usable subject claim
    TokenSubjectMissing,
    /// Verified token without a usable role claim
    TokenRoleMissing,
    InvalidCredentials,

    // Authorization
    Forbidden,
    SupervisorRequired,
    AdminRequired,

    // Admission control
    RateLimited,
    RequestTimeout,

    // Request validation
    BadRequest,
    ValidationError,
    InvalidRole,
    InvalidChecklistKind,
    InvalidPathParam,

    // Not found
    NotFound,
    UserNotFound,
    MinerNotFound,
    SupervisorNotFound,
    ModuleNotFound,
    StarVideoNotSet,
    EmergencyNotFound,
    ChecklistItemNotFound,

    // Conflicts
    Conflict,
    EmailAlreadyRegistered,
    MinerNotAssigned,

    // System
    DbError,
    DbUnavailable,
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::AuthHeaderMissing => "AUTH_HEADER_MISSING",
            Self::AuthHeaderMalformed => "AUTH_HEADER_MALFORMED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenSubjectMissing => "TOKEN_SUBJECT_MISSING",
            Self::TokenRoleMissing => "TOKEN_ROLE_MISSING",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            Self::Forbidden => "FORBIDDEN",
            Self::SupervisorRequired => "SUPERVISOR_REQUIRED",
            Self::AdminRequired => "ADMIN_REQUIRED",

            Self::RateLimited => "RATE_LIMITED",
            Self::RequestTimeout => "REQUEST_TIMEOUT",

            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidChecklistKind => "INVALID_CHECKLIST_KIND",
            Self::InvalidPathParam => "INVALID_PATH_PARAM",

            Self::NotFound => "NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MinerNotFound => "MINER_NOT_FOUND",
            Self::SupervisorNotFound => "SUPERVISOR_NOT_FOUND",
            Self::ModuleNotFound => "MODULE_NOT_FOUND",
            Self::StarVideoNotSet => "STAR_VIDEO_NOT_SET",
            Self::EmergencyNotFound => "EMERGENCY_NOT_FOUND",
            Self::ChecklistItemNotFound => "CHECKLIST_ITEM_NOT_FOUND",

            Self::Conflict => "CONFLICT",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::MinerNotAssigned => "MINER_NOT_ASSIGNED",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Every code, for uniqueness checks.
    pub const ALL: &'static [ErrorCode] = &[
        Self::Unauthorized,
        Self::AuthHeaderMissing,
        Self::AuthHeaderMalformed,
        Self::InvalidToken,
        Self::TokenSubjectMissing,
        Self::TokenRoleMissing,
        Self::InvalidCredentials,
        Self::Forbidden,
        Self::SupervisorRequired,
        Self::AdminRequired,
        Self::RateLimited,
        Self::RequestTimeout,
        Self::BadRequest,
        Self::ValidationError,
        Self::InvalidRole,
        Self::InvalidChecklistKind,
        Self::InvalidPathParam,
        Self::NotFound,
        Self::UserNotFound,
        Self::MinerNotFound,
        Self::SupervisorNotFound,
        Self::ModuleNotFound,
        Self::StarVideoNotSet,
        Self::EmergencyNotFound,
        Self::ChecklistItemNotFound,
        Self::Conflict,
        Self::EmailAlreadyRegistered,
        Self::MinerNotAssigned,
        Self::DbError,
        Self::DbUnavailable,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
