//! Boundary to the external structure/evolution code.
//!
//! The driver only knows that a simulator, started in a working directory that
//! holds the stage inlists, may eventually leave a model file behind. Whether
//! it did is decided afterwards by checking for that file, never by the exit
//! status.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::stage::StageKind;

/// Everything a simulator needs to run one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub stage: StageKind,
    /// Directory the simulator runs in; also holds the inlists and models.
    pub work_dir: PathBuf,
    /// Stage inlist written for this run.
    pub inlist: PathBuf,
    /// Model the stage is expected to save.
    pub expected_output: PathBuf,
}

/// Bookkeeping for a finished invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub elapsed: Duration,
    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,
}

/// Something that can execute a stage.
pub trait Simulator {
    /// Run one stage to completion. Blocks until the run is over.
    fn run(&self, invocation: &Invocation) -> Result<RunStats>;
}

/// Runs the simulator as a child process (by default `./rn` from the work
/// directory, as in a standard MESA work folder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSimulator {
    program: PathBuf,
    args: Vec<String>,
}

/// Program started when none is configured.
pub const DEFAULT_SIMULATOR_PROGRAM: &str = "./rn";

impl Default for ProcessSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATOR_PROGRAM)
    }
}

impl ProcessSimulator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Simulator for ProcessSimulator {
    fn run(&self, invocation: &Invocation) -> Result<RunStats> {
        debug!(
            stage = %invocation.stage,
            program = %self.program.display(),
            inlist = %invocation.inlist.display(),
            "starting simulator"
        );
        let started = Instant::now();
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&invocation.work_dir)
            .env("MESASWEEP_STAGE", invocation.stage.as_str())
            .env("MESASWEEP_INLIST", &invocation.inlist)
            .env("MESASWEEP_EXPECTED_OUTPUT", &invocation.expected_output)
            .status()
            .map_err(|source| Error::SimulatorSpawn {
                program: self.program.clone(),
                source,
            })?;
        let elapsed = started.elapsed();

        if !status.success() {
            warn!(
                stage = %invocation.stage,
                status = %status,
                "simulator exited unsuccessfully"
            );
        }

        Ok(RunStats {
            elapsed,
            exit_code: status.code(),
        })
    }
}
