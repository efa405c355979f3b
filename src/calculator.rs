//! Slurry treatment calculator logic

use tracing::{debug, instrument, warn};

use crate::config::InputLimits;
use crate::error::SimulationError;
use crate::format::{Formatter, LocaleConventions, NumberFormat};
use crate::models::{ProcessStage, SimulationInputs, SimulationOutputs, StageTime};

/// Reference tank volume in litres; cycle time scales from this size
pub const TANK_CAPACITY: f64 = 10000.0;

/// Reference additive cost (USD) for one full tank
pub const BIOTECH_COST_PER_TANK: f64 = 20.0;

/// Share of the slurry that ends up as foliar (solid) fertilizer
pub const SOLIDS_FRACTION: f64 = 0.30;

/// Share of the slurry that ends up as radicular (liquid) fertilizer
pub const LIQUIDS_FRACTION: f64 = 0.70;

/// Parallel lines never cut the cycle below half its single-line time
pub const MIN_SYSTEM_EFFICIENCY: f64 = 0.5;

/// Unscaled minutes for one cycle: the sum of every stage (300)
pub fn base_cycle_time() -> f64 {
    ProcessStage::ALL.iter().map(|s| s.base_minutes()).sum()
}

/// Cycle time grows with the square root of the volume relative to one tank
pub fn scale_factor(cerdaza_amount: f64) -> f64 {
    (cerdaza_amount / TANK_CAPACITY).sqrt()
}

/// `max(0.5, 1 / systems)`; infinite when `systems_count` is zero
pub fn system_efficiency(systems_count: u32) -> f64 {
    (1.0 / f64::from(systems_count)).max(MIN_SYSTEM_EFFICIENCY)
}

/// Compute yields, cycle time and profit.
///
/// Performs no validation. Out-of-range inputs give mathematically defined
/// but meaningless results: negative values flow straight through, and
/// `systems_count == 0` makes `total_cycle_time` infinite. Use [`simulate`]
/// to reject such inputs first.
pub fn compute(inputs: &SimulationInputs) -> SimulationOutputs {
    let systems = f64::from(inputs.systems_count);

    let foliar_fertilizer_amount = inputs.cerdaza_amount * SOLIDS_FRACTION * systems;
    let radicular_fertilizer_amount = inputs.cerdaza_amount * LIQUIDS_FRACTION * systems;

    let foliar_fertilizer_total_value = foliar_fertilizer_amount * inputs.foliar_fertilizer_value;
    let radicular_fertilizer_total_value =
        radicular_fertilizer_amount * inputs.radicular_fertilizer_value;

    let total_cycle_time = base_cycle_time()
        * scale_factor(inputs.cerdaza_amount)
        * system_efficiency(inputs.systems_count);

    let total_profit =
        (foliar_fertilizer_total_value + radicular_fertilizer_total_value) - biotech_cost(inputs);

    SimulationOutputs {
        foliar_fertilizer_amount,
        foliar_fertilizer_total_value,
        radicular_fertilizer_amount,
        radicular_fertilizer_total_value,
        total_cycle_time,
        total_profit,
    }
}

/// Validate against the default limits, then compute
pub fn simulate(inputs: &SimulationInputs) -> Result<SimulationOutputs, SimulationError> {
    simulate_with(inputs, &InputLimits::default())
}

/// Validate against `limits`, then compute
#[instrument(
    level = "debug",
    skip_all,
    fields(cerdaza = inputs.cerdaza_amount, systems = inputs.systems_count)
)]
pub fn simulate_with(
    inputs: &SimulationInputs,
    limits: &InputLimits,
) -> Result<SimulationOutputs, SimulationError> {
    if let Err(e) = limits.check(inputs) {
        warn!(field = e.field(), "rejected simulation inputs: {}", e);
        return Err(e);
    }

    debug!(
        scale_factor = scale_factor(inputs.cerdaza_amount),
        system_efficiency = system_efficiency(inputs.systems_count),
        "derived cycle factors"
    );

    Ok(compute(inputs))
}

/// Total additive cost for a run
pub fn biotech_cost(inputs: &SimulationInputs) -> f64 {
    inputs.biotech_substance_amount * inputs.biotech_substance_value
}

/// Split the scaled cycle time across the process stages.
///
/// The stage minutes add up to `compute(inputs).total_cycle_time`.
pub fn cycle_breakdown(inputs: &SimulationInputs) -> Vec<StageTime> {
    let factor = scale_factor(inputs.cerdaza_amount) * system_efficiency(inputs.systems_count);
    ProcessStage::ALL
        .iter()
        .map(|&stage| StageTime {
            stage,
            minutes: stage.base_minutes() * factor,
        })
        .collect()
}

/// Inputs and results of one run, ready for display
#[derive(Debug, Clone, Copy)]
pub struct SimulationReport {
    pub inputs: SimulationInputs,
    pub outputs: SimulationOutputs,
}

impl SimulationReport {
    pub fn new(inputs: SimulationInputs, outputs: SimulationOutputs) -> Self {
        Self { inputs, outputs }
    }

    /// Render the report with a specific locale and currency
    pub fn render<L: NumberFormat>(&self, fmt: &Formatter<L>) -> String {
        let mut output = String::new();
        let i = &self.inputs;
        let o = &self.outputs;

        output.push_str("=== Simulation Results ===\n");
        output.push_str(&format!(
            "Slurry: {} L on {} system(s)\n",
            fmt.quantity(i.cerdaza_amount),
            i.systems_count
        ));
        output.push_str(&format!(
            "Biotech substance: {} x {}\n\n",
            fmt.quantity(i.biotech_substance_amount),
            fmt.currency(i.biotech_substance_value)
        ));

        output.push_str("Products:\n");
        output.push_str(&format!(
            "  Foliar fertilizer:    {:>16} L  {:>18}\n",
            fmt.quantity(o.foliar_fertilizer_amount),
            fmt.currency(o.foliar_fertilizer_total_value)
        ));
        output.push_str(&format!(
            "  Radicular fertilizer: {:>16} L  {:>18}\n\n",
            fmt.quantity(o.radicular_fertilizer_amount),
            fmt.currency(o.radicular_fertilizer_total_value)
        ));

        output.push_str("Economics:\n");
        output.push_str(&format!("  Revenue:       {}\n", fmt.currency(o.total_revenue())));
        output.push_str(&format!("  Biotech cost:  {}\n", fmt.currency(biotech_cost(i))));
        let outcome = if o.total_profit >= 0.0 { "profit" } else { "loss" };
        output.push_str(&format!(
            "  Total profit:  {} ({})\n\n",
            fmt.currency(o.total_profit),
            outcome
        ));

        output.push_str(&format!("Cycle time: {}\n", fmt.time(o.total_cycle_time)));
        for stage_time in cycle_breakdown(i) {
            output.push_str(&format!(
                "  {:<24} {:>7.1} min\n",
                stage_time.stage.label(),
                stage_time.minutes
            ));
        }

        output
    }
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(&Formatter::<LocaleConventions>::default()))
    }
}
