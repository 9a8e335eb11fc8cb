mod common;

use std::fs;

use common::{relative_to_cwd, FakeSimulator};
use mesasweep_lib::{
    Error, PlanetInputs, RunRequest, SkipReason, StageKind, StageOutcome, SweepDriver, SweepGrid,
    SweepOptions,
};
use tempfile::tempdir;

fn uniform_request(gamma: f64, z: f64) -> RunRequest {
    RunRequest {
        heating_gamma: gamma,
        metallicity: z,
        pressure_depth_bar: None,
        depth_heating: false,
    }
}

fn quiet_options() -> SweepOptions {
    SweepOptions {
        verbose: false,
        ..SweepOptions::default()
    }
}

#[test]
fn fiducial_point_runs_create_and_evolve_and_copies_core() {
    let dir = tempdir().expect("temp dir");
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        quiet_options(),
        FakeSimulator::new(),
    );

    let point = driver
        .run_point(&uniform_request(0.01, 0.02))
        .expect("point runs");

    assert_eq!(driver.simulator().call_count(StageKind::Create), 1);
    assert_eq!(driver.simulator().call_count(StageKind::Core), 0);
    assert_eq!(driver.simulator().call_count(StageKind::Evolve), 1);

    let outcomes: Vec<_> = point.stages.iter().map(|s| s.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            StageOutcome::Succeeded,
            StageOutcome::Skipped {
                reason: SkipReason::CoreInsertionDisabled,
                copied: true
            },
            StageOutcome::Succeeded,
        ]
    );
    assert!(point.completed());

    let create = fs::read(dir.path().join(&point.names.create_model)).expect("create model");
    let core = fs::read(dir.path().join(&point.names.core_model)).expect("core model");
    assert_eq!(create, core);

    let core_stage = &point.stages[1];
    assert_eq!(
        core_stage.diagnostics,
        vec![SkipReason::CoreInsertionDisabled.warning().to_string()]
    );

    for needle in ["1.67_MJ", "10.00_ME", "2.00_RJ", "0.02", "uniform"] {
        assert!(point.names.create_inlist.contains(needle), "missing {needle}");
    }
    assert!(driver.simulator().unseen_dirs().is_empty());
}

#[test]
fn stage_inlists_and_directories_are_written() {
    let dir = tempdir().expect("temp dir");
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        quiet_options(),
        FakeSimulator::new(),
    );
    let point = driver
        .run_point(&uniform_request(0.01, 0.02))
        .expect("point runs");

    for inlist in [&point.names.create_inlist, &point.names.evolve_inlist] {
        let text = fs::read_to_string(dir.path().join(inlist)).expect("stage inlist written");
        assert!(text.contains("&star_job"));
        let suffix = inlist.strip_prefix("inlist_").expect("prefix");
        assert!(dir.path().join(format!("{suffix}_photos")).is_dir());
        assert!(dir.path().join(format!("{suffix}_logs")).is_dir());
    }
    // Skipped core stage gets no inlist and no run directories.
    assert!(!dir.path().join(&point.names.core_inlist).exists());

    let pointer = fs::read_to_string(dir.path().join("inlist")).expect("pointer inlist");
    assert!(pointer.contains(&point.names.evolve_inlist));

    let calls = driver.simulator().calls();
    assert_eq!(calls[0].inlist, dir.path().join(&point.names.create_inlist));
    assert_eq!(
        calls[1].expected_output,
        dir.path().join(&point.names.evolve_model)
    );
}

#[test]
fn missing_models_are_reported_and_the_sweep_continues() {
    let dir = tempdir().expect("temp dir");
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        quiet_options(),
        FakeSimulator::new().failing(StageKind::Create),
    );

    let report = driver
        .run_sweep(None, &SweepGrid::default())
        .expect("best-effort sweep never fails on missing models");

    assert_eq!(report.points.len(), 9);
    assert_eq!(report.completed(), 9);
    assert_eq!(report.totals.completed, Some(9));
    assert_eq!(driver.simulator().call_count(StageKind::Create), 9);
    assert_eq!(driver.simulator().call_count(StageKind::Evolve), 9);

    let first = &report.points[0];
    assert_eq!(first.stages[0].outcome, StageOutcome::OutputMissing);
    assert_eq!(first.stages[1].outcome, StageOutcome::OutputMissing);
    let diagnostics: Vec<_> = first.diagnostics().collect();
    assert!(diagnostics.contains(
        &"[do_create_planet] MESA failed creating the planet. Check your parameters."
    ));
    assert!(diagnostics
        .contains(&"[do_put_in_core] MESA failed creating core model. Check your parameters."));
}

#[test]
fn evolve_failure_leaves_point_incomplete() {
    let dir = tempdir().expect("temp dir");
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        quiet_options(),
        FakeSimulator::new().failing(StageKind::Evolve),
    );

    let report = driver
        .run_sweep(Some(uniform_request(0.1, 0.015)), &SweepGrid::default())
        .expect("sweep runs");
    assert_eq!(report.points.len(), 1);
    assert_eq!(report.incomplete(), 1);
    assert_eq!(
        report.points[0].stages[2].diagnostics,
        vec!["[do_evolve_planet] MESA failed evolving core model. Check your parameters."]
    );
}

#[test]
fn strict_mode_stops_at_first_missing_model() {
    let dir = tempdir().expect("temp dir");
    let options = SweepOptions {
        strict: true,
        ..quiet_options()
    };
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        options,
        FakeSimulator::new().failing(StageKind::Evolve),
    );

    let err = driver
        .run_sweep(None, &SweepGrid::default())
        .expect_err("strict sweep fails");
    assert!(matches!(
        err,
        Error::StageFailed {
            stage: StageKind::Evolve,
            ..
        }
    ));
    assert_eq!(driver.simulator().call_count(StageKind::Evolve), 1);
}

#[test]
fn dry_run_creates_directories_only() {
    let dir = tempdir().expect("temp dir");
    let options = SweepOptions {
        run_sims: false,
        ..quiet_options()
    };
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        options,
        FakeSimulator::new(),
    );

    let report = driver
        .run_sweep(None, &SweepGrid::default())
        .expect("dry run");

    assert!(driver.simulator().calls().is_empty());
    assert_eq!(report.points.len(), 9);
    assert_eq!(report.totals.points, 9);
    assert_eq!(report.totals.completed, None);
    assert_eq!(report.totals.incomplete, None);
    for point in &report.points {
        assert_eq!(point.diagnostics().count(), 0);
        assert_eq!(point.stages[0].outcome, StageOutcome::DryRun);
        assert_eq!(
            point.stages[1].outcome,
            StageOutcome::Skipped {
                reason: SkipReason::CoreInsertionDisabled,
                copied: false
            }
        );
        assert!(point.parameters.dayside_flux > 0.0);
        assert!(!dir.path().join(&point.names.create_inlist).exists());
        assert!(!dir.path().join(&point.names.core_model).exists());
    }
    assert!(!dir.path().join("inlist").exists());
}

#[test]
fn resume_skips_stages_with_existing_models() {
    let dir = tempdir().expect("temp dir");
    let request = uniform_request(0.01, 0.02);

    let first = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        quiet_options(),
        FakeSimulator::new(),
    );
    first.run_point(&request).expect("first run");

    let options = SweepOptions {
        resume: true,
        ..quiet_options()
    };
    let second = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        options,
        FakeSimulator::new(),
    );
    let point = second.run_point(&request).expect("resumed run");

    assert!(second.simulator().calls().is_empty());
    assert_eq!(point.stages[0].outcome, StageOutcome::AlreadyPresent);
    assert_eq!(point.stages[2].outcome, StageOutcome::AlreadyPresent);
    assert!(point.completed());
}

#[test]
fn enabled_core_insertion_runs_the_core_stage() {
    let dir = tempdir().expect("temp dir");
    let options = SweepOptions {
        insert_core: true,
        ..quiet_options()
    };
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        options,
        FakeSimulator::new(),
    );

    let point = driver
        .run_point(&uniform_request(0.01, 0.02))
        .expect("point runs");
    assert_eq!(driver.simulator().call_count(StageKind::Core), 1);
    assert_eq!(point.stages[1].outcome, StageOutcome::Succeeded);

    let create_inlist =
        fs::read_to_string(dir.path().join(&point.names.create_inlist)).expect("create inlist");
    let envelope = mesasweep_lib::inlist::fortran_float(point.parameters.mass_without_core);
    assert!(create_inlist.contains(&envelope));

    let core_inlist =
        fs::read_to_string(dir.path().join(&point.names.core_inlist)).expect("core inlist");
    assert!(core_inlist.contains(&format!("saved_model_name = '{}'", point.names.create_model)));
}

#[test]
fn massless_core_is_skipped_even_when_insertion_enabled() {
    let dir = tempdir().expect("temp dir");
    let inputs = PlanetInputs {
        core_mass_me: 0.0,
        ..PlanetInputs::default()
    };
    let options = SweepOptions {
        insert_core: true,
        ..quiet_options()
    };
    let driver = SweepDriver::new(inputs, dir.path(), options, FakeSimulator::new());

    let point = driver
        .run_point(&uniform_request(0.01, 0.02))
        .expect("point runs");
    assert_eq!(driver.simulator().call_count(StageKind::Core), 0);
    assert_eq!(
        point.stages[1].outcome,
        StageOutcome::Skipped {
            reason: SkipReason::NoCoreMass,
            copied: true
        }
    );
    assert_eq!(
        point.stages[1].diagnostics,
        vec!["Code did not generate an actual core model because Mcore =< 0.0."]
    );
    assert!(point.names.create_inlist.contains("0.00_ME"));
}

#[test]
fn depth_heating_sweep_covers_pressure_axis() {
    let dir = tempdir().expect("temp dir");
    let options = SweepOptions {
        depth_heating: true,
        run_sims: false,
        ..quiet_options()
    };
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        options,
        FakeSimulator::new(),
    );

    let report = driver
        .run_sweep(None, &SweepGrid::default())
        .expect("dry run");
    assert_eq!(report.points.len(), 27);

    let labels: std::collections::BTreeSet<_> = report
        .points
        .iter()
        .map(|p| p.parameters.heating_mode.label())
        .collect();
    assert_eq!(labels.len(), 3);
    assert!(labels.contains("depthdependent_1000.0bar_pdep"));
    assert!(report
        .points
        .iter()
        .all(|p| p.parameters.uniform_heating_rate() == 0.0));
}

#[test]
fn grid_points_do_not_leak_overrides() {
    let dir = tempdir().expect("temp dir");
    let options = SweepOptions {
        run_sims: false,
        ..quiet_options()
    };
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        dir.path(),
        options,
        FakeSimulator::new(),
    );
    let report = driver
        .run_sweep(None, &SweepGrid::default())
        .expect("dry run");

    assert_eq!(driver.base(), &PlanetInputs::default());
    let low = &report.points[0].parameters;
    let high = &report.points[6].parameters;
    assert_eq!(low.heating_gamma, 0.01);
    assert_eq!(high.heating_gamma, 0.1);
    assert!((high.heating_rate / low.heating_rate - 10.0).abs() < 1e-9);
    assert_eq!(low.dayside_flux, high.dayside_flux);
}

#[cfg(unix)]
#[test]
fn relative_work_dir_resolves_from_the_simulator_cwd() {
    let dir = tempdir().expect("temp dir");
    let relative = relative_to_cwd(dir.path());
    assert!(relative.is_relative());

    let options = SweepOptions {
        insert_core: true,
        ..quiet_options()
    };
    let driver = SweepDriver::new(
        PlanetInputs::default(),
        &relative,
        options,
        FakeSimulator::new(),
    );
    let point = driver
        .run_point(&uniform_request(0.01, 0.02))
        .expect("point runs");

    assert!(driver.work_dir().is_absolute());
    assert_eq!(driver.simulator().call_count(StageKind::Core), 1);
    assert!(driver.simulator().unseen_dirs().is_empty());
    for call in driver.simulator().calls() {
        assert!(call.work_dir.is_absolute());
        assert!(call.inlist.is_absolute());
        assert!(call.expected_output.is_absolute());
    }
    assert!(point.completed());
    for model in [
        &point.names.create_model,
        &point.names.core_model,
        &point.names.evolve_model,
    ] {
        assert!(dir.path().join(model).is_file(), "missing {model}");
    }
}
