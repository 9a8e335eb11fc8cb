//! Internal heating mode selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::naming::format_float;

/// How the extra internal heating is deposited in the planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeatingMode {
    /// Flat heating per unit mass throughout the planet.
    Uniform,
    /// Heating deposited at a given pressure depth (bar) through the
    /// simulator's `other_energy` hook.
    DepthDependent { pressure_depth_bar: f64 },
}

impl HeatingMode {
    /// Token embedded in inlist identifiers and model filenames.
    pub fn label(&self) -> String {
        match self {
            HeatingMode::Uniform => "uniform".to_string(),
            HeatingMode::DepthDependent { pressure_depth_bar } => {
                format!("depthdependent_{}bar_pdep", format_float(*pressure_depth_bar))
            }
        }
    }

    /// Whether the evolve stage must enable the simulator's `other_energy` hook.
    pub fn uses_other_energy(&self) -> bool {
        matches!(self, HeatingMode::DepthDependent { .. })
    }
}

impl fmt::Display for HeatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
