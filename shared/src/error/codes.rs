//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Cart errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they can be handed to
/// the notification layer and logged without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Cart ====================
    /// Cart item not found
    CartItemNotFound = 4001,
    /// Quantity below 1
    CartInvalidQuantity = 4002,
    /// Quantity above the per-line maximum
    CartQuantityLimitExceeded = 4003,
    /// Malformed or unknown cart action
    CartMalformedAction = 4004,
    /// Price negative, not a number or above the maximum
    CartInvalidPrice = 4005,

    // ==================== 6xxx: Catalog ====================
    /// Ordering requested while no category is selected
    CategoryRequired = 6001,
    /// Page size outside the allowed set
    LimitNotAllowed = 6002,
    /// Page outside the known page range
    PageOutOfRange = 6003,
    /// Catalog response could not be understood
    CatalogResponseInvalid = 6004,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Request timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Cart
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::CartInvalidQuantity => "Quantity must be at least 1",
            ErrorCode::CartQuantityLimitExceeded => "Quantity exceeds the maximum allowed",
            ErrorCode::CartMalformedAction => "Malformed cart action",
            ErrorCode::CartInvalidPrice => "Price is outside the allowed range",

            // Catalog
            ErrorCode::CategoryRequired => "Please select category first",
            ErrorCode::LimitNotAllowed => "Items per page is not an allowed value",
            ErrorCode::PageOutOfRange => "Page is out of range",
            ErrorCode::CatalogResponseInvalid => "Catalog response is invalid",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Cart
            4001 => Ok(ErrorCode::CartItemNotFound),
            4002 => Ok(ErrorCode::CartInvalidQuantity),
            4003 => Ok(ErrorCode::CartQuantityLimitExceeded),
            4004 => Ok(ErrorCode::CartMalformedAction),
            4005 => Ok(ErrorCode::CartInvalidPrice),

            // Catalog
            6001 => Ok(ErrorCode::CategoryRequired),
            6002 => Ok(ErrorCode::LimitNotAllowed),
            6003 => Ok(ErrorCode::PageOutOfRange),
            6004 => Ok(ErrorCode::CatalogResponseInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::CartInvalidQuantity.code(), 4002);
        assert_eq!(ErrorCode::CategoryRequired.code(), 6001);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
    }

    #[test]
    fn test_error_code_try_from() {
        assert_eq!(ErrorCode::try_from(6003), Ok(ErrorCode::PageOutOfRange));
        assert_eq!(ErrorCode::try_from(4004), Ok(ErrorCode::CartMalformedAction));
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::Success.to_string(), "E0000");
        assert_eq!(ErrorCode::LimitNotAllowed.to_string(), "E6002");
    }

    #[test]
    fn test_error_code_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::CategoryRequired).unwrap();
        assert_eq!(json, "6001");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::CartInvalidQuantity);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NetworkError.is_success());
    }
}
