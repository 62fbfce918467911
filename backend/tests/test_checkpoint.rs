//! Checkpoint and Resume Tests
//!
//! A run paused after day K and resumed from its serialized checkpoint must
//! produce the same ledger as an uninterrupted run.

use liquidity_simulator_core_rs::orchestrator::{
    compute_config_hash, ledger_digest, validate_records, RunCheckpoint,
};
use liquidity_simulator_core_rs::scenario::FacilitySizingDrag;
use liquidity_simulator_core_rs::{
    run, run_with_adjustment, CashFlowConfig, CashFlowSource, DayEvents, Orchestrator, RandomCashFlowGenerator,
    ScenarioKind, SimulationError,
};

fn events(days: usize, seed: u64) -> Vec<DayEvents> {
    RandomCashFlowGenerator::new(CashFlowConfig::default(), seed)
        .unwrap()
        .generate(days)
}

#[test]
fn test_resume_matches_uninterrupted_run() {
    for kind in ScenarioKind::ALL {
        let params = kind.preset(40);
        let events = events(40, 17);
        let full = run(&params, &events, kind).unwrap();

        let mut first = Orchestrator::new(params, kind).unwrap();
        for day in 0..15 {
            first.step(&events[day]).unwrap();
        }
        let json = first.checkpoint().unwrap().to_json().unwrap();
        let mut records = first.records().to_vec();

        let checkpoint = RunCheckpoint::from_json(&json).unwrap();
        assert_eq!(checkpoint.day, 15);
        assert_eq!(checkpoint.scenario, kind);

        let resumed = Orchestrator::from_checkpoint(params, checkpoint).unwrap();
        assert_eq!(resumed.current_day(), 15);
        let rest = resumed.run_to_completion(&events).unwrap();
        assert_eq!(rest.records.first().map(|r| r.day()), Some(16));

        records.extend(rest.records);
        assert_eq!(records, full.records);
        assert_eq!(rest.summary, full.summary);
        assert_eq!(
            ledger_digest(&records).unwrap(),
            ledger_digest(&full.records).unwrap()
        );
        assert!(validate_records(&records, 40).is_ok());
    }
}

#[test]
fn test_checkpoint_rejects_changed_parameters() {
    let params = ScenarioKind::PreFunded.preset(10);
    let mut orch = Orchestrator::new(params, ScenarioKind::PreFunded).unwrap();
    orch.step(&DayEvents::new()).unwrap();
    let checkpoint = orch.checkpoint().unwrap();

    let mut changed = params;
    changed.borrow_rate = 5.0;

    let err = Orchestrator::from_checkpoint(changed, checkpoint).err();
    assert!(matches!(err, Some(SimulationError::ConfigMismatch { .. })));
}

#[test]
fn test_checkpoint_rejects_inconsistent_day() {
    let params = ScenarioKind::InternalPool.preset(10);
    let mut orch = Orchestrator::new(params, ScenarioKind::InternalPool).unwrap();
    orch.step(&DayEvents::new()).unwrap();

    let mut checkpoint = orch.checkpoint().unwrap();
    checkpoint.day = 5;

    let err = Orchestrator::from_checkpoint(params, checkpoint).err();
    assert!(matches!(err, Some(SimulationError::StateValidationError(_))));
}

#[test]
fn test_checkpoint_of_complete_run_resumes_complete() {
    let params = ScenarioKind::PreFunded.preset(3);
    let mut orch = Orchestrator::new(params, ScenarioKind::PreFunded).unwrap();
    for _ in 0..3 {
        orch.step(&DayEvents::new()).unwrap();
    }

    let resumed = Orchestrator::from_checkpoint(params, orch.checkpoint().unwrap()).unwrap();
    assert!(resumed.is_complete());
    let output = resumed.run_to_completion(&[]).unwrap();
    assert!(output.records.is_empty());
    assert_eq!(output.summary, orch.summary());
}

#[test]
fn test_config_hash_tracks_every_parameter() {
    let base = ScenarioKind::PreFunded.preset(30);
    let base_hash = compute_config_hash(&base).unwrap();

    let mut returns = base;
    returns.expected_returns.pe = 16.0;
    assert_ne!(compute_config_hash(&returns).unwrap(), base_hash);

    let mut cash = base;
    cash.cash_pool = 99.0;
    assert_ne!(compute_config_hash(&cash).unwrap(), base_hash);

    assert_eq!(compute_config_hash(&base).unwrap(), base_hash);
}

#[test]
fn test_malformed_checkpoint_json_rejected() {
    assert!(matches!(
        RunCheckpoint::from_json("{\"day\": 3}"),
        Err(SimulationError::SerializationError(_))
    ));
}

#[test]
fn test_resume_keeps_injected_adjustment() {
    let kind = ScenarioKind::InternalPool;
    let params = kind.preset(6);
    let events = events(6, 4);
    let sizing = FacilitySizingDrag { notional: 10.0 };
    let full = run_with_adjustment(&params, &events, kind, &sizing).unwrap();

    let mut first = Orchestrator::with_adjustment(params, kind, &sizing).unwrap();
    for day in 0..3 {
        first.step(&events[day]).unwrap();
    }
    let json = first.checkpoint().unwrap().to_json().unwrap();

    let resumed = Orchestrator::from_checkpoint(params, RunCheckpoint::from_json(&json).unwrap())
        .unwrap()
        .run_to_completion(&events)
        .unwrap();

    assert_eq!(resumed.records.as_slice(), &full.records[3..]);
    assert_eq!(resumed.summary, full.summary);
    assert_eq!(resumed.summary.cash_pool.cash_drag, full.summary.cash_pool.cash_drag);
}

#[test]
fn test_resume_with_matching_adjustment() {
    let kind = ScenarioKind::InternalPool;
    let params = kind.preset(4);
    let sizing = FacilitySizingDrag { notional: 10.0 };

    let mut orch = Orchestrator::with_adjustment(params, kind, &sizing).unwrap();
    orch.step(&DayEvents::new()).unwrap();
    let checkpoint = orch.checkpoint().unwrap();

    let resumed =
        Orchestrator::from_checkpoint_with_adjustment(params, checkpoint.clone(), &sizing).unwrap();
    assert_eq!(resumed.facility_drag(), orch.facility_drag());

    let err = Orchestrator::from_checkpoint_with_adjustment(
        params,
        checkpoint,
        &FacilitySizingDrag::default(),
    )
    .err();
    assert!(matches!(err, Some(SimulationError::ConfigMismatch { .. })));
}

#[test]
fn test_checkpoint_missing_pool_rejected() {
    let params = ScenarioKind::PreFunded.preset(5);
    let mut orch = Orchestrator::new(params, ScenarioKind::PreFunded).unwrap();
    orch.step(&DayEvents::new()).unwrap();

    let mut value = serde_json::to_value(orch.checkpoint().unwrap()).unwrap();
    value["carry"]["state"]["pools"]
        .as_object_mut()
        .unwrap()
        .remove("PRE");
    let checkpoint: RunCheckpoint = serde_json::from_value(value).unwrap();

    let err = Orchestrator::from_checkpoint(params, checkpoint).err();
    assert!(matches!(err, Some(SimulationError::StateValidationError(_))));
}
