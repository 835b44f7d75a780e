//! Shared mapping from pool and Diesel failures into repository port errors.

use tracing::debug;

use crate::domain::ports::{ListingPersistenceError, UserPersistenceError};

use super::pool::PoolError;

/// Port error types with the two failure classes the adapters report.
pub(crate) trait RepositoryError: Sized {
    fn connection_failed(message: String) -> Self;
    fn query_failed(message: String) -> Self;
}

impl RepositoryError for ListingPersistenceError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }
}

impl RepositoryError for UserPersistenceError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }
}

/// Pool checkout and build failures are connection failures.
pub(crate) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection_failed(message)
}

/// Map Diesel failures, keeping database detail out of the message.
pub(crate) fn map_diesel_error<E: RepositoryError>(error: diesel::result::Error) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query_failed("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failed("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failed("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            E::query_failed("duplicate record".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            E::query_failed("referenced record missing".to_owned())
        }
        _ => E::query_failed("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("secret detail")))
    }

    #[rstest]
    fn closed_connection_is_a_connection_failure() {
        let mapped: ListingPersistenceError =
            map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(mapped, ListingPersistenceError::Connection { .. }));
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, "duplicate record")]
    #[case(DatabaseErrorKind::ForeignKeyViolation, "referenced record missing")]
    #[case(DatabaseErrorKind::SerializationFailure, "database error")]
    fn database_detail_is_not_leaked(#[case] kind: DatabaseErrorKind, #[case] expected: &str) {
        let mapped: UserPersistenceError = map_diesel_error(database_error(kind));
        let UserPersistenceError::Query { message } = mapped else {
            panic!("expected query failure");
        };
        assert_eq!(message, expected);
    }

    #[rstest]
    fn pool_failures_keep_their_message() {
        let mapped: UserPersistenceError = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(
            mapped,
            UserPersistenceError::Connection {
                message: "timed out".to_owned()
            }
        );
    }
}
