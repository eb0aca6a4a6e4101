//! Error codes for the calories backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the calories backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required or presented credential rejected
    Unauthorized,
    /// Authenticated but not allowed
    Forbidden,
    /// The credential store could not complete a read or write
    AuthStoreUnavailable,

    // Request Validation
    /// Invalid meal log id in the path
    InvalidMealLogId,
    /// Date parameter could not be parsed
    InvalidDate,
    /// Start of a range is not before its end
    InvalidDateRange,
    /// Food referenced by a meal log item does not exist
    UnknownFood,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Meal log not found
    MealLogNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Email already registered
    UniqueEmail,
    /// Other uniqueness conflict
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::AuthStoreUnavailable => "AUTH_STORE_UNAVAILABLE",
            Self::InvalidMealLogId => "INVALID_MEAL_LOG_ID",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::UnknownFood => "UNKNOWN_FOOD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::MealLogNotFound => "MEAL_LOG_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::Conflict => "CONFLICT",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
