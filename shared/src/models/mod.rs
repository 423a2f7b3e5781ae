//! Data models
//!
//! Shared between dhaba-server and the POS client (via API).
//! All timestamps are Unix millis (`i64`), all money is `f64` at the
//! serialization edge; precise arithmetic happens server-side.

pub mod daily_summary;
pub mod order;
pub mod restaurant;

// Re-exports
pub use daily_summary::*;
pub use order::*;
pub use restaurant::*;
