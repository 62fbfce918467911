//! Cash-Flow Source Tests
//!
//! Fixed replay and the seeded reference generator.

use liquidity_simulator_core_rs::{
    run, CashFlowConfig, CashFlowSource, DayEvents, FixedCashFlows, PoolId,
    RandomCashFlowGenerator, ScenarioKind, SimulationError,
};

// ============================================================================
// Fixed Sequences
// ============================================================================

#[test]
fn test_fixed_source_replays_in_order() {
    let days = vec![
        DayEvents::new().with(PoolId::PrivateEquity, -5.0),
        DayEvents::new().with(PoolId::PrivateCredit, 2.0),
    ];
    let mut source = FixedCashFlows::new(days.clone());

    assert_eq!(source.next_day(1), days[0]);
    assert_eq!(source.next_day(2), days[1]);
    assert!(source.next_day(3).is_quiet());
    assert!(source.next_day(0).is_quiet());
}

#[test]
fn test_fixed_source_drives_engine_like_slice() {
    let days = vec![
        DayEvents::new().with(PoolId::PrivateEquity, -5.0),
        DayEvents::new(),
        DayEvents::new().with(PoolId::PrivateEquity, 8.0),
    ];
    let params = ScenarioKind::InternalPool.preset(5);

    let generated = FixedCashFlows::new(days.clone()).generate(params.days);
    let a = run(&params, &generated, ScenarioKind::InternalPool).unwrap();
    let b = run(&params, &days, ScenarioKind::InternalPool).unwrap();

    assert_eq!(a.records, b.records);
}

// ============================================================================
// Random Generator
// ============================================================================

#[test]
fn test_generator_covers_every_pool_every_day() {
    let mut source = RandomCashFlowGenerator::new(CashFlowConfig::default(), 11).unwrap();
    let days = source.generate(30);

    assert_eq!(days.len(), 30);
    for day in &days {
        assert_eq!(day.entries().count(), 3);
    }
}

#[test]
fn test_generator_magnitudes_within_range() {
    let mut source = RandomCashFlowGenerator::new(CashFlowConfig::default(), 3).unwrap();

    for day in source.generate(2000) {
        for (_, amount) in day.entries() {
            assert!(amount == 0.0 || (1.0..=10.0).contains(&amount.abs()), "amount {}", amount);
        }
    }
}

#[test]
fn test_generator_event_frequencies() {
    let mut source = RandomCashFlowGenerator::new(CashFlowConfig::default(), 8).unwrap();
    let amounts: Vec<f64> = source
        .generate(5000)
        .iter()
        .flat_map(|day| day.entries().map(|(_, a)| a).collect::<Vec<_>>())
        .collect();
    let n = amounts.len() as f64;

    let calls = amounts.iter().filter(|a| **a < 0.0).count() as f64 / n;
    let distributions = amounts.iter().filter(|a| **a > 0.0).count() as f64 / n;

    assert!((calls - 0.10).abs() < 0.015, "call frequency {}", calls);
    assert!((distributions - 0.07).abs() < 0.015, "distribution frequency {}", distributions);
}

#[test]
fn test_zero_probabilities_give_quiet_days() {
    let config = CashFlowConfig {
        capital_call_probability: 0.0,
        distribution_probability: 0.0,
        ..CashFlowConfig::default()
    };
    let mut source = RandomCashFlowGenerator::new(config, 1).unwrap();

    for day in source.generate(100) {
        assert!(day.entries().all(|(_, a)| a == 0.0));
    }
}

#[test]
fn test_certain_capital_calls() {
    let config = CashFlowConfig {
        capital_call_probability: 1.0,
        distribution_probability: 0.0,
        min_magnitude: 2.0,
        max_magnitude: 2.0,
    };
    let mut source = RandomCashFlowGenerator::new(config, 1).unwrap();

    for day in source.generate(10) {
        assert!(day.entries().all(|(_, a)| a == -2.0));
    }
}

#[test]
fn test_unseeded_generator_is_replayable() {
    let config = CashFlowConfig::default();
    let mut first = RandomCashFlowGenerator::unseeded(config).unwrap();
    let mut replay = RandomCashFlowGenerator::new(config, first.seed()).unwrap();

    assert_eq!(first.generate(100), replay.generate(100));
}

#[test]
fn test_invalid_configs_rejected() {
    let bad = [
        CashFlowConfig {
            capital_call_probability: 0.7,
            distribution_probability: 0.5,
            ..CashFlowConfig::default()
        },
        CashFlowConfig {
            capital_call_probability: -0.1,
            ..CashFlowConfig::default()
        },
        CashFlowConfig {
            min_magnitude: 0.0,
            ..CashFlowConfig::default()
        },
        CashFlowConfig {
            min_magnitude: 10.0,
            max_magnitude: 1.0,
            ..CashFlowConfig::default()
        },
        CashFlowConfig {
            max_magnitude: f64::INFINITY,
            ..CashFlowConfig::default()
        },
    ];

    for config in bad {
        assert!(matches!(
            RandomCashFlowGenerator::new(config, 1),
            Err(SimulationError::InvalidConfig(_))
        ));
    }
}
