//! Dhaba Server - restaurant POS backend
//!
//! Order lifecycle and table consistency for a small restaurant: dine-in
//! orders tied to tables, numbered takeaway orders, and daily financial
//! summaries, backed by an embedded redb database.
//!
//! # Module structure
//!
//! ```text
//! dhaba-server/src/
//! ├── core/          # Config, state, server assembly
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # Order lifecycle manager, money validation
//! ├── summary/       # Daily summary aggregation
//! ├── db/            # redb storage layer
//! └── utils/         # Errors, logging, time helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod summary;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use db::PosStorage;
pub use orders::{ManagerError, OrderManager};
pub use summary::SummaryAggregator;
pub use utils::{AppError, AppResult};
pub use utils::logger::init_logger;

use tracing_appender::non_blocking::WorkerGuard;

/// Load `.env`, create the work directory, and wire up logging.
/// The returned guard keeps the file logger alive.
pub fn setup_environment() -> std::io::Result<WorkerGuard> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string());
    std::fs::create_dir_all(&work_dir)?;

    let log_dir = format!("{}/logs", work_dir);
    std::fs::create_dir_all(&log_dir)?;
    Ok(init_logger(&log_dir))
}

pub fn print_banner() {
    println!(
        r#"
    ____  __          __
   / __ \/ /_  ____ _/ /_  ____ _
  / / / / __ \/ __ `/ __ \/ __ `/
 / /_/ / / / / /_/ / /_/ / /_/ /
/_____/_/ /_/\__,_/_.___/\__,_/
    "#
    );
}
