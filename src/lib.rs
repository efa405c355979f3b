//! Slurry Treatment Simulator
//!
//! Estimates fertilizer yield, cycle time and profit for the treatment of
//! swine slurry (cerdaza) into foliar and radicular fertilizers.

pub mod calculator;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod scenario;

pub use calculator::{compute, cycle_breakdown, simulate, simulate_with, SimulationReport};
pub use config::{InputLimits, SimulationConfig};
pub use error::SimulationError;
pub use format::{format_currency, format_quantity, format_time, Formatter};
pub use models::{ProcessStage, SimulationInputs, SimulationOutputs, StageTime};
