//! Grid enumeration and the sequential sweep driver.
//!
//! Every grid point starts from the same immutable [`PlanetInputs`], applies
//! its overrides, derives a fresh [`ParameterSet`] and walks the stage plan.
//! Stages are best-effort: a missing model is reported and the sweep moves on
//! to the next stage and the next point. [`SweepOptions::strict`] turns the
//! first missing model into an error instead.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::heating::HeatingMode;
use crate::inlist::{render_pointer, Inlist, POINTER_INLIST};
use crate::naming::{ArtifactNames, RunDirs};
use crate::params::{Overrides, ParameterSet, PlanetInputs};
use crate::simulator::{Invocation, Simulator};
use crate::stage::{plan_stages, StageDescriptor, StageOutcome, StageReport};

/// Values swept over. Points are enumerated gamma-major, then pressure depth,
/// then metallicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepGrid {
    pub gammas: Vec<f64>,
    pub pressure_depths_bar: Vec<f64>,
    pub metallicities: Vec<f64>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            gammas: vec![0.01, 0.001, 0.1],
            pressure_depths_bar: vec![10.0, 100.0, 1000.0],
            metallicities: vec![0.01, 0.015, 0.02],
        }
    }
}

impl SweepGrid {
    /// Enumerate the grid. Uniform heating ignores the pressure-depth axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyGridAxis`] if a swept axis has no values.
    pub fn points(&self, depth_heating: bool) -> Result<Vec<RunRequest>> {
        if self.gammas.is_empty() {
            return Err(Error::EmptyGridAxis { axis: "gammas" });
        }
        if self.metallicities.is_empty() {
            return Err(Error::EmptyGridAxis {
                axis: "metallicities",
            });
        }
        if depth_heating && self.pressure_depths_bar.is_empty() {
            return Err(Error::EmptyGridAxis {
                axis: "pressure_depths_bar",
            });
        }

        let depths: Vec<Option<f64>> = if depth_heating {
            self.pressure_depths_bar.iter().copied().map(Some).collect()
        } else {
            vec![None]
        };

        let mut points = Vec::with_capacity(self.gammas.len() * depths.len() * self.metallicities.len());
        for &heating_gamma in &self.gammas {
            for &pressure_depth_bar in &depths {
                for &metallicity in &self.metallicities {
                    points.push(RunRequest {
                        heating_gamma,
                        metallicity,
                        pressure_depth_bar,
                        depth_heating,
                    });
                }
            }
        }
        Ok(points)
    }
}

/// One grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub heating_gamma: f64,
    pub metallicity: f64,
    /// Pressure depth override; only meaningful with depth heating.
    #[serde(default)]
    pub pressure_depth_bar: Option<f64>,
    #[serde(default)]
    pub depth_heating: bool,
}

impl RunRequest {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            heating_gamma: Some(self.heating_gamma),
            metallicity: Some(self.metallicity),
            pressure_depth_bar: self.pressure_depth_bar,
        }
    }

    /// Heating mode for this point, given the already-overridden inputs.
    pub fn heating_mode(&self, inputs: &PlanetInputs) -> HeatingMode {
        if self.depth_heating {
            HeatingMode::DepthDependent {
                pressure_depth_bar: inputs.pressure_depth_bar,
            }
        } else {
            HeatingMode::Uniform
        }
    }
}

/// Behaviour switches for a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepOptions {
    /// Log the derived parameters of every point.
    pub verbose: bool,
    /// Invoke the simulator. When false only parameters, names and
    /// directories are produced.
    pub run_sims: bool,
    /// Deposit heat at a pressure depth instead of uniformly.
    pub depth_heating: bool,
    /// Run the core insertion stage instead of copying the create model.
    pub insert_core: bool,
    /// Abort on the first stage that does not leave its model behind.
    pub strict: bool,
    /// Skip stages whose model already exists.
    pub resume: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            run_sims: true,
            depth_heating: false,
            insert_core: false,
            strict: false,
            resume: false,
        }
    }
}

/// Everything recorded for one grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointReport {
    pub request: RunRequest,
    pub parameters: ParameterSet,
    pub names: ArtifactNames,
    pub stages: Vec<StageReport>,
}

impl PointReport {
    /// True when the evolve model is available at the end of the point.
    pub fn completed(&self) -> bool {
        self.stages
            .last()
            .map(|s| s.outcome.has_output())
            .unwrap_or(false)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &str> {
        self.stages
            .iter()
            .flat_map(|s| s.diagnostics.iter().map(String::as_str))
    }
}

/// Point counts of a finished sweep. Completion is only tracked when the
/// simulator actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepTotals {
    pub points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete: Option<usize>,
}

/// Result of a whole sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub work_dir: PathBuf,
    pub run_sims: bool,
    pub totals: SweepTotals,
    pub points: Vec<PointReport>,
}

impl SweepReport {
    pub fn completed(&self) -> usize {
        self.points.iter().filter(|p| p.completed()).count()
    }

    pub fn incomplete(&self) -> usize {
        self.points.len() - self.completed()
    }
}

/// Sequential sweep driver.
#[derive(Debug)]
pub struct SweepDriver<S> {
    base: PlanetInputs,
    work_dir: PathBuf,
    options: SweepOptions,
    simulator: S,
}

impl<S: Simulator> SweepDriver<S> {
    pub fn new(
        base: PlanetInputs,
        work_dir: impl Into<PathBuf>,
        options: SweepOptions,
        simulator: S,
    ) -> Self {
        let work_dir = work_dir.into();
        // The simulator runs inside `work_dir`, so every path handed to it
        // must be absolute.
        let work_dir = std::path::absolute(&work_dir).unwrap_or(work_dir);
        Self {
            base,
            work_dir,
            options,
            simulator,
        }
    }

    pub fn base(&self) -> &PlanetInputs {
        &self.base
    }

    pub fn options(&self) -> &SweepOptions {
        &self.options
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Sweep entry point: one point when `params_new` is given, otherwise the
    /// whole `grid` in the configured heating mode.
    pub fn run_sweep(
        &self,
        params_new: Option<RunRequest>,
        grid: &SweepGrid,
    ) -> Result<SweepReport> {
        match params_new {
            Some(request) => {
                fs::create_dir_all(&self.work_dir)?;
                let point = self.run_point(&request)?;
                Ok(self.report(vec![point]))
            }
            None => self.run(grid),
        }
    }

    /// Run every point of `grid` in order.
    pub fn run(&self, grid: &SweepGrid) -> Result<SweepReport> {
        let requests = grid.points(self.options.depth_heating)?;
        fs::create_dir_all(&self.work_dir)?;
        info!(
            points = requests.len(),
            work_dir = %self.work_dir.display(),
            run_sims = self.options.run_sims,
            "starting sweep"
        );

        let mut points = Vec::with_capacity(requests.len());
        for request in &requests {
            points.push(self.run_point(request)?);
        }

        let report = self.report(points);
        info!(totals = ?report.totals, "sweep finished");
        Ok(report)
    }

    /// Derive parameters for one point and walk its stage plan.
    pub fn run_point(&self, request: &RunRequest) -> Result<PointReport> {
        let inputs = self.base.with_overrides(&request.overrides());
        let mode = request.heating_mode(&inputs);
        let parameters = ParameterSet::derive(&inputs, mode)?;
        let names = ArtifactNames::new(&parameters);

        if self.options.verbose {
            info!("derived parameters for {}:\n{}", names.evolve_inlist, parameters);
        }

        let plan = plan_stages(&parameters, &names, self.options.insert_core);
        let mut stages = Vec::with_capacity(plan.len());
        for descriptor in &plan {
            let report = self.execute_stage(descriptor, &parameters, &names)?;
            if self.options.strict && report.outcome == StageOutcome::OutputMissing {
                return Err(Error::StageFailed {
                    stage: descriptor.kind,
                    artifact: self.work_dir.join(&descriptor.output_model),
                });
            }
            stages.push(report);
        }

        Ok(PointReport {
            request: *request,
            parameters,
            names,
            stages,
        })
    }

    fn execute_stage(
        &self,
        descriptor: &StageDescriptor,
        params: &ParameterSet,
        names: &ArtifactNames,
    ) -> Result<StageReport> {
        let output = self.work_dir.join(&descriptor.output_model);
        let mut report = StageReport {
            kind: descriptor.kind,
            inlist_id: descriptor.inlist_id.clone(),
            output_model: descriptor.output_model.clone(),
            outcome: StageOutcome::DryRun,
            run: None,
            diagnostics: Vec::new(),
        };

        if let Some(reason) = descriptor.skip {
            if !self.options.run_sims {
                report.outcome = StageOutcome::Skipped {
                    reason,
                    copied: false,
                };
                return Ok(report);
            }

            warn!(stage = %descriptor.kind, "{}", reason.warning());
            report.diagnostics.push(reason.warning().to_string());

            let copied = match descriptor.input_model.as_deref() {
                Some(input) => match fs::copy(self.work_dir.join(input), &output) {
                    Ok(_) => true,
                    Err(err) => {
                        warn!(stage = %descriptor.kind, error = %err, "could not copy {}", input);
                        false
                    }
                },
                None => false,
            };
            report.outcome = if copied {
                StageOutcome::Skipped { reason, copied }
            } else {
                self.missing_output(descriptor, &mut report);
                StageOutcome::OutputMissing
            };
            return Ok(report);
        }

        let dirs = RunDirs::for_inlist(&self.work_dir, &descriptor.inlist_id);
        dirs.ensure()?;

        if !self.options.run_sims {
            return Ok(report);
        }

        if self.options.resume && output.exists() {
            info!(
                stage = %descriptor.kind,
                model = %descriptor.output_model,
                "model already present, skipping stage"
            );
            report.outcome = StageOutcome::AlreadyPresent;
            return Ok(report);
        }

        let inlist_path = self.write_inlists(descriptor, params, names, &dirs)?;
        let invocation = Invocation {
            stage: descriptor.kind,
            work_dir: self.work_dir.clone(),
            inlist: inlist_path,
            expected_output: output.clone(),
        };

        match self.simulator.run(&invocation) {
            Ok(stats) => {
                info!(
                    stage = %descriptor.kind,
                    elapsed_secs = stats.elapsed.as_secs_f64(),
                    "simulator finished"
                );
                report.run = Some(stats);
            }
            Err(err) => {
                warn!(stage = %descriptor.kind, error = %err, "simulator invocation failed");
                report.diagnostics.push(err.to_string());
            }
        }

        report.outcome = if output.exists() {
            StageOutcome::Succeeded
        } else {
            self.missing_output(descriptor, &mut report);
            StageOutcome::OutputMissing
        };
        Ok(report)
    }

    fn missing_output(&self, descriptor: &StageDescriptor, report: &mut StageReport) {
        let message = descriptor.kind.failure_message();
        warn!(stage = %descriptor.kind, model = %descriptor.output_model, "{}", message);
        report.diagnostics.push(message);
    }

    fn write_inlists(
        &self,
        descriptor: &StageDescriptor,
        params: &ParameterSet,
        names: &ArtifactNames,
        dirs: &RunDirs,
    ) -> Result<PathBuf> {
        let inlist = Inlist::for_stage(
            descriptor.kind,
            params,
            names,
            dirs,
            self.options.insert_core && params.has_core(),
        );
        let path = self.work_dir.join(&descriptor.inlist_id);
        fs::write(&path, inlist.render())?;
        fs::write(
            self.work_dir.join(POINTER_INLIST),
            render_pointer(&descriptor.inlist_id),
        )?;
        Ok(path)
    }

    fn report(&self, points: Vec<PointReport>) -> SweepReport {
        let completed = self
            .options
            .run_sims
            .then(|| points.iter().filter(|p| p.completed()).count());
        SweepReport {
            work_dir: self.work_dir.clone(),
            run_sims: self.options.run_sims,
            totals: SweepTotals {
                points: points.len(),
                completed,
                incomplete: completed.map(|done| points.len() - done),
            },
            points,
        }
    }
}
