//! Ordered stage plan for one grid point.
//!
//! A grid point moves through `Create -> Core -> Evolve`. The plan is an
//! explicit list of [`StageDescriptor`]s; whether the core stage really runs
//! is a property of its descriptor ([`StageDescriptor::skip`]) rather than a
//! branch hidden in the driver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::naming::ArtifactNames;
use crate::params::ParameterSet;
use crate::simulator::RunStats;

/// The three simulator stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Create,
    Core,
    Evolve,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [StageKind::Create, StageKind::Core, StageKind::Evolve];

    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Create => "create",
            StageKind::Core => "core",
            StageKind::Evolve => "evolve",
        }
    }

    /// Tag used to prefix diagnostics for this stage.
    pub fn tag(self) -> &'static str {
        match self {
            StageKind::Create => "do_create_planet",
            StageKind::Core => "do_put_in_core",
            StageKind::Evolve => "do_evolve_planet",
        }
    }

    /// Diagnostic reported when the stage's model file is missing afterwards.
    pub fn failure_message(self) -> String {
        let what = match self {
            StageKind::Create => "creating the planet",
            StageKind::Core => "creating core model",
            StageKind::Evolve => "evolving core model",
        };
        format!("[{}] MESA failed {}. Check your parameters.", self.tag(), what)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the core stage did not call the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Core mass is zero or negative, so there is nothing to insert.
    NoCoreMass,
    /// Core insertion was not requested for this sweep.
    CoreInsertionDisabled,
}

impl SkipReason {
    /// Pick the skip reason for the core stage, if it should be skipped.
    ///
    /// Core mass is checked first: a massless core is reported as such even
    /// when insertion is also disabled.
    pub fn for_core(params: &ParameterSet, insert_core: bool) -> Option<Self> {
        if !params.has_core() {
            Some(SkipReason::NoCoreMass)
        } else if !insert_core {
            Some(SkipReason::CoreInsertionDisabled)
        } else {
            None
        }
    }

    pub fn warning(self) -> &'static str {
        match self {
            SkipReason::NoCoreMass => {
                "Code did not generate an actual core model because Mcore =< 0.0."
            }
            SkipReason::CoreInsertionDisabled => {
                "Code did not generate an actual core model because core insertion is disabled."
            }
        }
    }
}

/// One step of the per-point plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDescriptor {
    pub kind: StageKind,
    pub inlist_id: String,
    /// Model consumed by this stage.
    pub input_model: Option<String>,
    /// Model this stage must leave behind.
    pub output_model: String,
    /// When set, the input model is copied to the output instead of running.
    pub skip: Option<SkipReason>,
}

/// Build the ordered stage list for a grid point.
pub fn plan_stages(
    params: &ParameterSet,
    names: &ArtifactNames,
    insert_core: bool,
) -> Vec<StageDescriptor> {
    StageKind::ALL
        .iter()
        .map(|&kind| StageDescriptor {
            kind,
            inlist_id: names.inlist(kind).to_string(),
            input_model: names.input_model(kind).map(str::to_string),
            output_model: names.model(kind).to_string(),
            skip: match kind {
                StageKind::Core => SkipReason::for_core(params, insert_core),
                _ => None,
            },
        })
        .collect()
}

/// Result of executing one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The simulator ran and the output model exists.
    Succeeded,
    /// The output model is missing after the stage.
    OutputMissing,
    /// The stage was skipped; `copied` tells whether the input model was
    /// copied in place of the output.
    Skipped { reason: SkipReason, copied: bool },
    /// Resume mode found the output already on disk.
    AlreadyPresent,
    /// Simulations are disabled; nothing was run or checked.
    DryRun,
}

impl StageOutcome {
    /// Whether the stage's output model is known to be available.
    pub fn has_output(&self) -> bool {
        matches!(
            self,
            StageOutcome::Succeeded
                | StageOutcome::AlreadyPresent
                | StageOutcome::Skipped { copied: true, .. }
        )
    }
}

/// What happened to one stage of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub kind: StageKind,
    pub inlist_id: String,
    pub output_model: String,
    pub outcome: StageOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunStats>,
    /// Human-readable diagnostics emitted for this stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}
