//! Shared helpers for Diesel repository implementations.
//!
//! Every repository maps failures into its own port error. The helpers here
//! reduce a Diesel or pool failure to a [`DbFailure`] so each adapter only
//! decides how a unique violation reads in its domain.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to what the ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The database could not be reached.
    Connection(String),
    /// The statement failed for another reason.
    Query(String),
    /// A unique or primary key constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A CHECK constraint rejected the write.
    CheckViolation { constraint: Option<String> },
}

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DbFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => debug!(
            ?kind,
            message = info.message(),
            constraint = info.constraint_name(),
            %operation,
            "diesel operation failed"
        ),
        other => debug!(error_message = %other, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            DbFailure::CheckViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        _ => DbFailure::Query("database error".to_owned()),
    }
}

/// Convert a bounded domain quantity into an `INTEGER` column value.
pub(crate) fn to_db_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Convert an `INTEGER` column guarded by `CHECK (value >= 1)`.
pub(crate) fn from_db_int(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Convert a `COUNT(*)` result.
pub(crate) fn from_db_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Convert a page window into `LIMIT`/`OFFSET` values.
pub(crate) fn page_window(page: pagination::PageRequest) -> (i64, i64) {
    (
        i64::from(page.limit()),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}
