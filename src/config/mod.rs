//! Configuration loading and management for the paid-leave engine.
//!
//! This module loads the rule parameters the engine must not hard-code:
//! monthly accrual rate, annual cap, default reference-period start month,
//! consumption rounding granularity and valuation constants.
//!
//! # Example
//!
//! ```no_run
//! use assmat_leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/assmat").unwrap();
//! println!("Loaded regime: {}", config.regime().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, LeaveRules, RegimeMetadata, RoundingGranularity, ValuationRules};
