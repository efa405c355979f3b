// Integration tests for the public calculator API

use std::fs;

use cerdaza_simulator::calculator::{system_efficiency, SimulationReport};
use cerdaza_simulator::format::{Formatter, EN_US, USD};
use cerdaza_simulator::scenario::{self, Outcome};
use cerdaza_simulator::{
    compute, cycle_breakdown, format_currency, format_quantity, format_time, logging, simulate,
    SimulationConfig, SimulationError, SimulationInputs,
};

const TOLERANCE: f64 = 1e-9;

fn defaults() -> SimulationInputs {
    SimulationConfig::default().validate().unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * b.abs().max(1.0)
}

#[test]
fn scenario_a_default_form_values() {
    logging::init_test();
    let out = simulate(&defaults()).unwrap();

    assert!(close(out.foliar_fertilizer_amount, 3000.0));
    assert!(close(out.radicular_fertilizer_amount, 7000.0));
    assert!(close(out.foliar_fertilizer_total_value, 15000.0));
    assert!(close(out.radicular_fertilizer_total_value, 21000.0));
    assert!(close(out.total_cycle_time, 300.0));
    assert!(close(out.total_profit, 35980.0));
}

#[test]
fn scenario_b_two_systems_halves_cycle() {
    let inputs = SimulationInputs {
        systems_count: 2,
        ..defaults()
    };
    let out = simulate(&inputs).unwrap();

    assert!(close(out.foliar_fertilizer_amount, 6000.0));
    assert!(close(out.radicular_fertilizer_amount, 14000.0));
    assert!(close(out.total_cycle_time, 150.0));
}

#[test]
fn scenario_c_time_formatting() {
    assert_eq!(format_time(75.0), "1 h 15 min");
    assert_eq!(format_time(45.0), "45 min");
}

#[test]
fn products_add_up_to_processed_volume() {
    for &(cerdaza, systems) in &[(1.0, 1), (2500.0, 3), (10000.0, 2), (123456.7, 9)] {
        let inputs = SimulationInputs {
            cerdaza_amount: cerdaza,
            systems_count: systems,
            ..defaults()
        };
        let out = compute(&inputs);
        let total = out.foliar_fertilizer_amount + out.radicular_fertilizer_amount;
        assert!(close(total, cerdaza * f64::from(systems)), "{cerdaza} x {systems}");
    }
}

#[test]
fn profit_is_revenue_minus_biotech_cost() {
    let inputs = SimulationInputs {
        cerdaza_amount: 4321.0,
        biotech_substance_amount: 3.5,
        biotech_substance_value: 17.25,
        foliar_fertilizer_value: 2.2,
        radicular_fertilizer_value: 0.9,
        systems_count: 4,
    };
    let out = compute(&inputs);
    assert_eq!(
        out.total_profit,
        out.foliar_fertilizer_total_value + out.radicular_fertilizer_total_value
            - inputs.biotech_substance_amount * inputs.biotech_substance_value
    );
    assert_eq!(
        out.total_revenue(),
        out.foliar_fertilizer_total_value + out.radicular_fertilizer_total_value
    );
}

#[test]
fn more_systems_scale_yield_and_floor_cycle_time() {
    let single = compute(&defaults());
    let mut previous = single;

    for systems in 2..=6 {
        let out = compute(&SimulationInputs {
            systems_count: systems,
            ..defaults()
        });
        assert!(out.foliar_fertilizer_amount > previous.foliar_fertilizer_amount);
        assert!(out.radicular_fertilizer_amount > previous.radicular_fertilizer_amount);
        assert!(close(
            out.foliar_fertilizer_amount,
            single.foliar_fertilizer_amount * f64::from(systems)
        ));
        assert!(close(out.total_cycle_time, single.total_cycle_time * 0.5));
        previous = out;
    }
}

#[test]
fn efficiency_never_exceeds_one() {
    assert_eq!(system_efficiency(1), 1.0);
    for systems in 2..50 {
        assert_eq!(system_efficiency(systems), 0.5);
    }
}

#[test]
fn compute_is_idempotent() {
    let inputs = SimulationInputs {
        cerdaza_amount: 777.7,
        ..defaults()
    };
    assert_eq!(compute(&inputs), compute(&inputs));
}

#[test]
fn invalid_inputs_never_reach_compute() {
    let zero_systems = SimulationInputs {
        systems_count: 0,
        ..defaults()
    };
    assert!(matches!(
        simulate(&zero_systems),
        Err(SimulationError::BelowMinimum {
            field: "systemsCount",
            ..
        })
    ));

    let negative = SimulationInputs {
        biotech_substance_value: -1.0,
        ..defaults()
    };
    assert_eq!(
        simulate(&negative).unwrap_err().field(),
        "biotechSubstanceValue"
    );
}

#[test]
fn breakdown_matches_total_for_small_batches() {
    let inputs = SimulationInputs {
        cerdaza_amount: 2500.0,
        ..defaults()
    };
    let total: f64 = cycle_breakdown(&inputs).iter().map(|s| s.minutes).sum();
    assert!(close(total, 150.0));
    assert!(close(compute(&inputs).total_cycle_time, 150.0));
}

#[test]
fn default_formatters() {
    assert_eq!(format_quantity(7000.0), "7.000,00");
    assert_eq!(format_currency(21000.0), "US$\u{a0}21.000,00");
}

#[test]
fn report_in_another_locale() {
    let inputs = defaults();
    let report = SimulationReport::new(inputs, compute(&inputs));
    let rendered = report.render(&Formatter::new(EN_US, USD));
    assert!(rendered.contains("3,000.00 L"));
    assert!(rendered.contains("US$35,980.00"));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plant.json");
    fs::write(
        &path,
        r#"{ "cerdazaAmount": 40000, "systemsCount": 2, "foliarFertilizerValue": 4.5 }"#,
    )
    .unwrap();

    let config = SimulationConfig::load(&path).unwrap();
    let inputs = config.validate().unwrap();
    assert_eq!(inputs.cerdaza_amount, 40000.0);
    assert_eq!(inputs.radicular_fertilizer_value, 3.0);

    let out = compute(&inputs);
    // sqrt(4) = 2, efficiency 0.5
    assert!(close(out.total_cycle_time, 300.0));
    assert!(close(out.foliar_fertilizer_amount, 24000.0));
}

#[test]
fn unreadable_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SimulationConfig::load(&dir.path().join("missing.json")).is_err());
}

#[test]
fn batch_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.json"), r#"{ "systemsCount": 1 }"#).unwrap();
    fs::write(dir.path().join("two.json"), r#"{ "systemsCount": 2 }"#).unwrap();
    fs::write(dir.path().join("bad.json"), r#"{ "cerdazaAmount": 0 }"#).unwrap();

    let (outcomes, stats) = scenario::evaluate_directory(dir.path()).unwrap();
    assert_eq!(stats.evaluated, 2);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.errors, 0);

    // sorted by path: bad, one, two
    assert!(matches!(outcomes[0].outcome, Outcome::Rejected(_)));
    match &outcomes[2].outcome {
        Outcome::Evaluated(report) => assert!(close(report.outputs.total_cycle_time, 150.0)),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn outputs_serialize_with_camel_case_names() {
    let value = serde_json::to_value(compute(&defaults())).unwrap();
    assert!(value.get("foliarFertilizerAmount").is_some());
    assert!(value.get("totalCycleTime").is_some());

    let inputs: SimulationInputs = serde_json::from_str(
        r#"{ "cerdazaAmount": 10000, "biotechSubstanceAmount": 1, "biotechSubstanceValue": 20,
             "foliarFertilizerValue": 5, "radicularFertilizerValue": 3, "systemsCount": 1 }"#,
    )
    .unwrap();
    assert_eq!(inputs, defaults());
}
