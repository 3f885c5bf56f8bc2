//! Booking Ledger Server
//!
//! Tracks rental bookings composed of one or more rented items and keeps
//! the derived financial fields (per-item and per-booking) continuously
//! consistent with the raw inputs a user edits.
//!
//! # Module structure
//!
//! ```text
//! ledger-server/src/
//! ├── core/          # Configuration, state, server bootstrap
//! ├── ledger/        # Calculator, aggregator, resolver, workflow
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Errors, logging, validation helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod ledger;
pub mod utils;

// Re-export public types
pub use self::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
