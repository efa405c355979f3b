//! Form defaults and input limits
//!
//! A `SimulationConfig` is what a caller fills in (from a JSON file, CLI
//! flags, or both). It only becomes `SimulationInputs` after every field has
//! passed its `InputLimits` check.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimulationError;
use crate::models::SimulationInputs;

/// Inclusive lower bounds for each input field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputLimits {
    pub cerdaza_amount: f64,
    pub biotech_substance_amount: f64,
    pub biotech_substance_value: f64,
    pub foliar_fertilizer_value: f64,
    pub radicular_fertilizer_value: f64,
    pub systems_count: u32,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            cerdaza_amount: 1.0,
            biotech_substance_amount: 0.1,
            biotech_substance_value: 0.01,
            foliar_fertilizer_value: 0.01,
            radicular_fertilizer_value: 0.01,
            systems_count: 1,
        }
    }
}

impl InputLimits {
    /// Check every field of `inputs`, reporting the first one that fails.
    ///
    /// Values must be finite and at least the configured minimum. Zero and
    /// negative values are rejected even if a looser minimum was configured,
    /// and `systems_count` never drops below one.
    pub fn check(&self, inputs: &SimulationInputs) -> Result<(), SimulationError> {
        check_positive("cerdazaAmount", inputs.cerdaza_amount, self.cerdaza_amount)?;
        check_positive(
            "biotechSubstanceAmount",
            inputs.biotech_substance_amount,
            self.biotech_substance_amount,
        )?;
        check_positive(
            "biotechSubstanceValue",
            inputs.biotech_substance_value,
            self.biotech_substance_value,
        )?;
        check_positive(
            "foliarFertilizerValue",
            inputs.foliar_fertilizer_value,
            self.foliar_fertilizer_value,
        )?;
        check_positive(
            "radicularFertilizerValue",
            inputs.radicular_fertilizer_value,
            self.radicular_fertilizer_value,
        )?;

        let min_systems = self.systems_count.max(1);
        if inputs.systems_count < min_systems {
            return Err(SimulationError::BelowMinimum {
                field: "systemsCount",
                value: f64::from(inputs.systems_count),
                minimum: f64::from(min_systems),
            });
        }

        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64, minimum: f64) -> Result<(), SimulationError> {
    if !value.is_finite() {
        return Err(SimulationError::NotFinite { field, value });
    }
    if value < minimum || value <= 0.0 {
        return Err(SimulationError::BelowMinimum {
            field,
            value,
            minimum,
        });
    }
    Ok(())
}

/// Form-bound parameter values with their limits
///
/// Missing fields in a JSON file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    pub cerdaza_amount: f64,
    pub biotech_substance_amount: f64,
    pub biotech_substance_value: f64,
    pub foliar_fertilizer_value: f64,
    pub radicular_fertilizer_value: f64,
    pub systems_count: u32,
    pub limits: InputLimits,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cerdaza_amount: 10000.0,
            biotech_substance_amount: 1.0,
            biotech_substance_value: 20.0,
            foliar_fertilizer_value: 5.0,
            radicular_fertilizer_value: 3.0,
            systems_count: 1,
            limits: InputLimits::default(),
        }
    }
}

impl SimulationConfig {
    /// Read a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SimulationConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(path = %path.display(), "loaded simulation config");
        Ok(config)
    }

    /// The raw field values, unchecked
    pub fn inputs(&self) -> SimulationInputs {
        SimulationInputs {
            cerdaza_amount: self.cerdaza_amount,
            biotech_substance_amount: self.biotech_substance_amount,
            biotech_substance_value: self.biotech_substance_value,
            foliar_fertilizer_value: self.foliar_fertilizer_value,
            radicular_fertilizer_value: self.radicular_fertilizer_value,
            systems_count: self.systems_count,
        }
    }

    /// Check the field values against `limits` and build the inputs
    pub fn validate(&self) -> Result<SimulationInputs, SimulationError> {
        let inputs = self.inputs();
        self.limits.check(&inputs)?;
        Ok(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let inputs = SimulationConfig::default().validate().unwrap();
        assert_eq!(inputs.cerdaza_amount, 10000.0);
        assert_eq!(inputs.biotech_substance_amount, 1.0);
        assert_eq!(inputs.biotech_substance_value, 20.0);
        assert_eq!(inputs.foliar_fertilizer_value, 5.0);
        assert_eq!(inputs.radicular_fertilizer_value, 3.0);
        assert_eq!(inputs.systems_count, 1);
    }

    #[test]
    fn zero_systems_rejected() {
        let config = SimulationConfig {
            systems_count: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), "systemsCount");
    }

    #[test]
    fn negative_amount_rejected() {
        let config = SimulationConfig {
            cerdaza_amount: -5.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimulationError::BelowMinimum {
                field: "cerdazaAmount",
                value: -5.0,
                minimum: 1.0,
            })
        );
    }

    #[test]
    fn nan_rejected() {
        let config = SimulationConfig {
            foliar_fertilizer_value: f64::NAN,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::NotFinite {
                field: "foliarFertilizerValue",
                ..
            }
        ));
    }

    #[test]
    fn below_form_minimum_rejected() {
        let config = SimulationConfig {
            biotech_substance_amount: 0.05,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err().field(),
            "biotechSubstanceAmount"
        );
    }

    #[test]
    fn loose_limits_still_reject_zero() {
        let config = SimulationConfig {
            radicular_fertilizer_value: 0.0,
            limits: InputLimits {
                radicular_fertilizer_value: 0.0,
                systems_count: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err().field(),
            "radicularFertilizerValue"
        );

        let config = SimulationConfig {
            systems_count: 0,
            limits: InputLimits {
                systems_count: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field(), "systemsCount");
    }

    #[test]
    fn first_failing_field_reported() {
        let config = SimulationConfig {
            biotech_substance_value: 0.0,
            systems_count: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err().field(),
            "biotechSubstanceValue"
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "systemsCount": 3, "limits": { "cerdazaAmount": 500 } }"#)
                .unwrap();
        assert_eq!(config.systems_count, 3);
        assert_eq!(config.cerdaza_amount, 10000.0);
        assert_eq!(config.limits.cerdaza_amount, 500.0);
        assert_eq!(config.limits.biotech_substance_amount, 0.1);
    }
}
