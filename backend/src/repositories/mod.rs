//! Database repositories
//!
//! Provides data access layer for database operations. Enum columns hold
//! the snake_case token of the domain enum; nested documents are JSONB.

pub mod alert;
pub mod plan;
pub mod profile;
pub mod progress;
pub mod user;

pub use alert::AlertRepository;
pub use plan::PlanRepository;
pub use profile::ProfileRepository;
pub use progress::ProgressRepository;
pub use user::UserRepository;

use std::str::FromStr;

/// Parse a stored enum token back into its domain type
pub(crate) fn parse_column<T>(value: &str, column: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {} in database: {}", column, e))
}

/// Whether a repository error came from a unique-constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}
