//! Batch evaluation of scenario files
//!
//! A scenario is a JSON `SimulationConfig`. Every `*.json` file below a
//! directory is loaded, validated and computed independently.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{info, info_span, warn};
use walkdir::WalkDir;

use crate::calculator::{simulate_with, SimulationReport};
use crate::config::SimulationConfig;
use crate::error::SimulationError;

/// Find all `*.json` files below `dir`, sorted by path
pub fn find_scenario_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[derive(Debug)]
pub enum Outcome {
    Evaluated(SimulationReport),
    /// Parsed, but an input failed its limit check
    Rejected(SimulationError),
    /// Could not be read or parsed
    Failed(String),
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Load, validate and compute a single scenario file
pub fn evaluate_scenario(path: &Path) -> ScenarioOutcome {
    let _span = info_span!("scenario", path = %path.display()).entered();

    let outcome = match SimulationConfig::load(path) {
        Ok(config) => {
            let inputs = config.inputs();
            match simulate_with(&inputs, &config.limits) {
                Ok(outputs) => Outcome::Evaluated(SimulationReport::new(inputs, outputs)),
                Err(e) => Outcome::Rejected(e),
            }
        }
        Err(e) => {
            warn!("failed: {:#}", e);
            Outcome::Failed(format!("{:#}", e))
        }
    };

    ScenarioOutcome {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Evaluate every scenario file below `dir`
pub fn evaluate_directory(dir: &Path) -> Result<(Vec<ScenarioOutcome>, BatchStats)> {
    let files = find_scenario_files(dir)?;
    info!(dir = %dir.display(), count = files.len(), "evaluating scenarios");

    let mut stats = BatchStats::default();
    let mut outcomes = Vec::with_capacity(files.len());

    for path in &files {
        let outcome = evaluate_scenario(path);
        match &outcome.outcome {
            Outcome::Evaluated(_) => stats.evaluated += 1,
            Outcome::Rejected(_) => stats.rejected += 1,
            Outcome::Failed(_) => stats.errors += 1,
        }
        outcomes.push(outcome);
    }

    Ok((outcomes, stats))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub evaluated: usize,
    pub rejected: usize,
    pub errors: usize,
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Evaluated {} scenarios. Rejected: {}, Errors: {}",
            self.evaluated, self.rejected, self.errors
        )
    }
}
