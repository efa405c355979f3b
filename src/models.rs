//! Data models for the slurry treatment process

use serde::{Deserialize, Serialize};

/// Parameters for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInputs {
    pub cerdaza_amount: f64,           // litres of raw slurry
    pub biotech_substance_amount: f64, // units of additive consumed
    pub biotech_substance_value: f64,  // USD per unit
    pub foliar_fertilizer_value: f64,  // USD per unit
    pub radicular_fertilizer_value: f64,
    pub systems_count: u32, // parallel process lines
}

/// Results of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutputs {
    pub foliar_fertilizer_amount: f64,
    pub foliar_fertilizer_total_value: f64,
    pub radicular_fertilizer_amount: f64,
    pub radicular_fertilizer_total_value: f64,
    pub total_cycle_time: f64, // minutes
    pub total_profit: f64,     // may be negative
}

impl SimulationOutputs {
    /// Combined market value of both fertilizer products
    pub fn total_revenue(&self) -> f64 {
        self.foliar_fertilizer_total_value + self.radicular_fertilizer_total_value
    }
}

/// Timed stages of one treatment cycle, in process order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    Activation,
    Stabilization,
    Reaction,
    PhAdjustment,
    Filtration,
    SolidsProcessing,
    LiquidsProcessing,
}

impl ProcessStage {
    pub const ALL: [ProcessStage; 7] = [
        ProcessStage::Activation,
        ProcessStage::Stabilization,
        ProcessStage::Reaction,
        ProcessStage::PhAdjustment,
        ProcessStage::Filtration,
        ProcessStage::SolidsProcessing,
        ProcessStage::LiquidsProcessing,
    ];

    /// Nominal duration in minutes for a full tank on a single line
    pub fn base_minutes(self) -> f64 {
        match self {
            ProcessStage::Activation => 15.0,
            ProcessStage::Stabilization => 15.0,
            ProcessStage::Reaction => 45.0,
            ProcessStage::PhAdjustment => 15.0,
            ProcessStage::Filtration => 30.0,
            ProcessStage::SolidsProcessing => 120.0,
            ProcessStage::LiquidsProcessing => 60.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessStage::Activation => "Cycle 1 (activation)",
            ProcessStage::Stabilization => "Cycle 2 (stabilization)",
            ProcessStage::Reaction => "Cycle 3 (reactions)",
            ProcessStage::PhAdjustment => "pH adjustment",
            ProcessStage::Filtration => "Filtration",
            ProcessStage::SolidsProcessing => "Solids processing",
            ProcessStage::LiquidsProcessing => "Liquids processing",
        }
    }
}

/// A stage's share of the scaled cycle time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageTime {
    pub stage: ProcessStage,
    pub minutes: f64,
}
