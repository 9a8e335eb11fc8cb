//! Output formatting for sweep reports, parameter sets and names.
//!
//! Every printer takes an [`OutputFormat`]: `text` is meant for people
//! reading a terminal, `json` is a pretty-printed serde rendering of the same
//! value for scripts.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use mesasweep_lib::{
    ArtifactNames, ConstantSet, ParameterSet, RunDirs, StageKind, StageOutcome, SweepReport,
};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output as JSON")
}

/// Short label for a stage outcome in text output.
pub fn outcome_label(outcome: &StageOutcome) -> String {
    match outcome {
        StageOutcome::Succeeded => "succeeded".to_string(),
        StageOutcome::OutputMissing => "output missing".to_string(),
        StageOutcome::Skipped { copied: true, .. } => "skipped (input model copied)".to_string(),
        StageOutcome::Skipped { copied: false, .. } => "skipped".to_string(),
        StageOutcome::AlreadyPresent => "already present".to_string(),
        StageOutcome::DryRun => "not run (dry run)".to_string(),
    }
}

/// Render a sweep report.
pub fn render_sweep(report: &SweepReport, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    let mut out = String::new();
    let totals = &report.totals;
    let _ = write!(out, "Sweep in {}", report.work_dir.display());
    match (totals.completed, totals.incomplete) {
        (Some(completed), Some(incomplete)) => {
            let _ = writeln!(
                out,
                ": {} point(s), {completed} complete, {incomplete} incomplete",
                totals.points
            );
        }
        _ => {
            let _ = writeln!(out, " (dry run): {} point(s)", totals.points);
        }
    }
    for point in &report.points {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} [{}]",
            point.names.evolve_inlist,
            point.parameters.heating_mode.label()
        );
        for stage in &point.stages {
            let _ = writeln!(
                out,
                "  {:<7} {:<30} {}",
                stage.kind.as_str(),
                outcome_label(&stage.outcome),
                stage.inlist_id
            );
            for diagnostic in &stage.diagnostics {
                let _ = writeln!(out, "          ! {diagnostic}");
            }
        }
    }
    Ok(out)
}

/// Render the derived parameter block of one point.
pub fn render_parameters(params: &ParameterSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(params),
        OutputFormat::Text => Ok(format!(
            "Derived parameters ({}):\n{}",
            params.heating_mode, params
        )),
    }
}

#[derive(Serialize)]
struct NamesView<'a> {
    #[serde(flatten)]
    names: &'a ArtifactNames,
    directories: Vec<StageDirs<'a>>,
}

#[derive(Serialize)]
struct StageDirs<'a> {
    stage: StageKind,
    inlist: &'a str,
    #[serde(flatten)]
    dirs: RunDirs,
}

/// Render inlist identifiers, run directories and model names of one point.
pub fn render_names(names: &ArtifactNames, work_dir: &Path, format: OutputFormat) -> Result<String> {
    let directories: Vec<StageDirs<'_>> = StageKind::ALL
        .iter()
        .map(|&stage| {
            let inlist = names.inlist(stage);
            StageDirs {
                stage,
                inlist,
                dirs: RunDirs::for_inlist(work_dir, inlist),
            }
        })
        .collect();

    if format == OutputFormat::Json {
        return to_json(&NamesView { names, directories });
    }

    let mut out = String::new();
    for entry in &directories {
        let _ = writeln!(out, "{}:", entry.stage);
        let _ = writeln!(out, "  inlist  {}", entry.inlist);
        let _ = writeln!(out, "  model   {}", names.model(entry.stage));
        let _ = writeln!(out, "  photos  {}", entry.dirs.photos.display());
        let _ = writeln!(out, "  logs    {}", entry.dirs.logs.display());
    }
    Ok(out)
}

/// Render the physical constants table.
pub fn render_constants(table: &ConstantSet, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let entries: Vec<_> = table.iter().collect();
        return to_json(&entries);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<9} {:>12} {:<14} Description", "Symbol", "Value", "Unit");
    for constant in table.iter() {
        let _ = writeln!(
            out,
            "{:<9} {:>12.4e} {:<14} {}",
            constant.symbol, constant.value, constant.unit, constant.description
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesasweep_lib::{
        constants, HeatingMode, PlanetInputs, ProcessSimulator, SweepDriver, SweepGrid,
        SweepOptions,
    };

    fn fiducial() -> ParameterSet {
        ParameterSet::derive(&PlanetInputs::default(), HeatingMode::Uniform).unwrap()
    }

    #[test]
    fn constants_table_lists_every_symbol() {
        let text = render_constants(constants(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("Symbol"));
        assert_eq!(text.lines().count(), constants().len() + 1);
        assert!(text.contains("M_jup"));
    }

    #[test]
    fn constants_json_is_an_array() {
        let json = render_constants(constants(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), constants().len());
        assert_eq!(entries[0]["symbol"], "bar");
    }

    #[test]
    fn names_text_lists_directories_per_stage() {
        let names = ArtifactNames::new(&fiducial());
        let text = render_names(&names, Path::new("runs"), OutputFormat::Text).unwrap();
        assert!(text.contains(&names.create_inlist));
        assert!(text.contains(&names.evolve_model));
        assert!(text.contains("_photos"));
        assert!(text.contains("evolve:"));
    }

    #[test]
    fn names_json_flattens_artifacts() {
        let names = ArtifactNames::new(&fiducial());
        let json = render_names(&names, Path::new("runs"), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["create_inlist"], names.create_inlist.as_str());
        assert_eq!(value["directories"].as_array().unwrap().len(), 3);
        assert_eq!(value["directories"][1]["stage"], "core");
    }

    #[test]
    fn outcome_labels_are_distinct() {
        let labels = [
            outcome_label(&StageOutcome::Succeeded),
            outcome_label(&StageOutcome::OutputMissing),
            outcome_label(&StageOutcome::AlreadyPresent),
            outcome_label(&StageOutcome::DryRun),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn dry_run_summary_leaves_out_completion() {
        let dir = tempfile::tempdir().unwrap();
        let options = SweepOptions {
            run_sims: false,
            verbose: false,
            ..SweepOptions::default()
        };
        let driver = SweepDriver::new(
            PlanetInputs::default(),
            dir.path(),
            options,
            ProcessSimulator::default(),
        );
        let report = driver.run_sweep(None, &SweepGrid::default()).unwrap();

        let text = render_sweep(&report, OutputFormat::Text).unwrap();
        let summary = text.lines().next().unwrap();
        assert!(summary.ends_with(" (dry run): 9 point(s)"), "{summary}");
        assert!(!text.contains("incomplete"));

        let json = render_sweep(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totals"]["points"], 9);
        assert!(value["totals"].get("completed").is_none());
    }

    #[test]
    fn parameters_text_has_header_and_rows() {
        let text = render_parameters(&fiducial(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("Derived parameters (uniform):"));
        assert!(text.contains("flux_dayside"));
    }
}
