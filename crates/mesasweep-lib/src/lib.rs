//! Planet interior parameter-sweep library.
//!
//! This crate derives irradiation and heating parameters for a gas giant,
//! names the inlists and model files of every run, writes the inlists, and
//! drives an external MESA-style simulator through the create, core and evolve
//! stages for each point of a sweep grid. Higher-level consumers (the CLI)
//! should only depend on the items exported here.
//!

#![deny(warnings)]

pub mod config;
pub mod constants;
pub mod error;
pub mod heating;
pub mod inlist;
pub mod naming;
pub mod params;
pub mod simulator;
pub mod stage;
pub mod sweep;

pub use config::{SimulatorConfig, SweepConfig};
pub use constants::{constants, Constant, ConstantSet};
pub use error::{Error, Result};
pub use heating::HeatingMode;
pub use naming::{ArtifactNames, RunDirs};
pub use params::{Overrides, ParameterSet, PlanetInputs};
pub use simulator::{Invocation, ProcessSimulator, RunStats, Simulator};
pub use stage::{plan_stages, SkipReason, StageDescriptor, StageKind, StageOutcome, StageReport};
pub use sweep::{
    PointReport, RunRequest, SweepDriver, SweepGrid, SweepOptions, SweepReport,
    SweepTotals,
};
