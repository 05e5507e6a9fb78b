//! Diesel and pool error mapping for the booking store adapter.

use tracing::debug;

use crate::domain::ports::BookingStoreError;

use super::pool::PoolError;

/// Map pool failures to store connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> BookingStoreError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    BookingStoreError::connection(message)
}

/// Map Diesel failures to store errors.
///
/// Full driver detail goes to the log; clients only ever see the redacted
/// category.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> BookingStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            BookingStoreError::connection("database connection error")
        }
        DieselError::NotFound => BookingStoreError::query("record not found"),
        _ => BookingStoreError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, BookingStoreError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[test]
    fn diesel_not_found_maps_to_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(mapped, BookingStoreError::Query { .. }));
        assert!(mapped.to_string().contains("record not found"));
    }

    #[test]
    fn rollback_errors_map_to_query_errors() {
        let mapped = map_diesel_error(diesel::result::Error::RollbackTransaction);
        assert!(matches!(mapped, BookingStoreError::Query { .. }));
    }
}
