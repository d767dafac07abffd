//! Catalog query validation errors

use crate::error::{AppError, ErrorCode};
use thiserror::Error;

/// A query transition that was rejected; the query is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("category required before ordering")]
    CategoryRequired,

    #[error("limit {0} is not an allowed page size")]
    LimitNotAllowed(u32),

    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: u32, total_pages: u32 },

    #[error("invalid value {value:?} for query parameter {key}")]
    InvalidParam { key: String, value: String },
}

impl QueryError {
    pub fn invalid_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParam {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::CategoryRequired => ErrorCode::CategoryRequired,
            Self::LimitNotAllowed(_) => ErrorCode::LimitNotAllowed,
            Self::PageOutOfRange { .. } => ErrorCode::PageOutOfRange,
            Self::InvalidParam { .. } => ErrorCode::InvalidFormat,
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match &err {
            QueryError::CategoryRequired => AppError::new(err.code()),
            QueryError::LimitNotAllowed(limit) => {
                AppError::with_message(err.code(), err.to_string()).with_detail("limit", *limit)
            }
            QueryError::PageOutOfRange { page, total_pages } => {
                AppError::with_message(err.code(), err.to_string())
                    .with_detail("page", *page)
                    .with_detail("total_pages", *total_pages)
            }
            QueryError::InvalidParam { key, .. } => {
                AppError::with_message(err.code(), err.to_string()).with_detail("param", key.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_required_uses_notification_text() {
        let err: AppError = QueryError::CategoryRequired.into();
        assert_eq!(err.code, ErrorCode::CategoryRequired);
        assert_eq!(err.message, "Please select category first");
    }

    #[test]
    fn test_page_out_of_range_details() {
        let err: AppError = QueryError::PageOutOfRange {
            page: 5,
            total_pages: 3,
        }
        .into();
        assert_eq!(err.code, ErrorCode::PageOutOfRange);
        let details = err.details.unwrap();
        assert_eq!(details.get("page").unwrap(), 5);
        assert_eq!(details.get("total_pages").unwrap(), 3);
    }

    #[test]
    fn test_invalid_param_maps_to_format_error() {
        let err = QueryError::invalid_param("page", "two");
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
        assert_eq!(
            err.to_string(),
            "invalid value \"two\" for query parameter page"
        );
    }
}
