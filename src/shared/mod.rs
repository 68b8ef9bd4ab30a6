// Shared kernel used by every module

pub mod application; // Shared application layer patterns
pub mod auth; // Bearer token verification
pub mod config; // Environment configuration
pub mod errors; // Shared error types
pub mod infrastructure; // Database pool and migrations
pub mod utils; // Logging and validation helpers

// Re-exports for convenience
pub use auth::{Actor, JwtVerifier};
pub use config::Config;
pub use infrastructure::database::Database;
