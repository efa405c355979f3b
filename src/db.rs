//! Run history schema and operations

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{SimulationInputs, SimulationOutputs};

/// A stored simulation run
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub id: i64,
    pub label: Option<String>,
    pub recorded_at: String,
    pub inputs: SimulationInputs,
    pub outputs: SimulationOutputs,
}

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT,
            recorded_at TEXT NOT NULL DEFAULT (datetime('now')),

            cerdaza_amount REAL NOT NULL,
            biotech_substance_amount REAL NOT NULL,
            biotech_substance_value REAL NOT NULL,
            foliar_fertilizer_value REAL NOT NULL,
            radicular_fertilizer_value REAL NOT NULL,
            systems_count INTEGER NOT NULL,

            foliar_fertilizer_amount REAL NOT NULL,
            foliar_fertilizer_total_value REAL NOT NULL,
            radicular_fertilizer_amount REAL NOT NULL,
            radicular_fertilizer_total_value REAL NOT NULL,
            total_cycle_time REAL NOT NULL,
            total_profit REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_runs_recorded_at ON runs(recorded_at);
        "#,
    )?;
    Ok(())
}

/// Store a run, returning its id
pub fn insert_run(
    conn: &Connection,
    label: Option<&str>,
    inputs: &SimulationInputs,
    outputs: &SimulationOutputs,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO runs (
            label,
            cerdaza_amount, biotech_substance_amount, biotech_substance_value,
            foliar_fertilizer_value, radicular_fertilizer_value, systems_count,
            foliar_fertilizer_amount, foliar_fertilizer_total_value,
            radicular_fertilizer_amount, radicular_fertilizer_total_value,
            total_cycle_time, total_profit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            label,
            inputs.cerdaza_amount,
            inputs.biotech_substance_amount,
            inputs.biotech_substance_value,
            inputs.foliar_fertilizer_value,
            inputs.radicular_fertilizer_value,
            inputs.systems_count,
            outputs.foliar_fertilizer_amount,
            outputs.foliar_fertilizer_total_value,
            outputs.radicular_fertilizer_amount,
            outputs.radicular_fertilizer_total_value,
            outputs.total_cycle_time,
            outputs.total_profit,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent runs first
pub fn list_runs(conn: &Connection, limit: usize) -> Result<Vec<RecordedRun>> {
    let mut stmt = conn.prepare(
        "SELECT id, label, recorded_at,
                cerdaza_amount, biotech_substance_amount, biotech_substance_value,
                foliar_fertilizer_value, radicular_fertilizer_value, systems_count,
                foliar_fertilizer_amount, foliar_fertilizer_total_value,
                radicular_fertilizer_amount, radicular_fertilizer_total_value,
                total_cycle_time, total_profit
         FROM runs
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt.query_map([limit], |row| {
        Ok(RecordedRun {
            id: row.get(0)?,
            label: row.get(1)?,
            recorded_at: row.get(2)?,
            inputs: SimulationInputs {
                cerdaza_amount: row.get(3)?,
                biotech_substance_amount: row.get(4)?,
                biotech_substance_value: row.get(5)?,
                foliar_fertilizer_value: row.get(6)?,
                radicular_fertilizer_value: row.get(7)?,
                systems_count: row.get(8)?,
            },
            outputs: SimulationOutputs {
                foliar_fertilizer_amount: row.get(9)?,
                foliar_fertilizer_total_value: row.get(10)?,
                radicular_fertilizer_amount: row.get(11)?,
                radicular_fertilizer_total_value: row.get(12)?,
                total_cycle_time: row.get(13)?,
                total_profit: row.get(14)?,
            },
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Delete all stored runs, returning how many were removed
pub fn clear_runs(conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM runs", [])?;
    Ok(removed)
}
