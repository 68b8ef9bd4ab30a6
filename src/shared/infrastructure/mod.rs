/// Shared infrastructure concerns
///
/// Infrastructure implementations shared across modules.
pub mod database;

// Re-exports for convenience
pub use database::{Database, DbConnection, DbPool};
