// Common module - shared types and utilities across all modules

pub mod error;
pub mod state;

// Re-export commonly used types for convenience
pub use error::BackendError;
pub use state::AppContext;
