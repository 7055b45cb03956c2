//! Data loading modules

pub mod request_loader;

// Re-export commonly used types
pub use request_loader::{list_matches, load_match, load_request, save_report};
