/// Database layer for Pawsit
///
/// - `pool`: PostgreSQL pool creation with health check and startup retry
/// - `migrations`: Embedded migration runner
///
/// Queries live in [`crate::repository::postgres`].

pub mod migrations;
pub mod pool;
