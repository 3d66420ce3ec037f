//! Study statistics for Mnemosyne.
//!
//! - **tracker**: the persisted `UserStats` record and the shared tracker
//! - **ticker**: cancellable study-time ticker bound to a study session

pub mod ticker;
pub mod tracker;

pub use ticker::{StatsTicker, TICK_PERIOD};
pub use tracker::{SharedStats, StatsTracker, UserStats};
