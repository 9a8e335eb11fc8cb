//! Deterministic inlist identifiers, run directories and model filenames.
//!
//! Names encode the planet mass (MJ), core mass (ME), radius (RJ), heating
//! gamma, metallicity and heating mode. The same parameter set always yields
//! byte-identical names, which is what lets a rerun detect finished stages by
//! file presence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::params::ParameterSet;
use crate::stage::StageKind;

/// Leading token stripped from an inlist identifier to name its directories.
pub const INLIST_PREFIX: &str = "inlist_";

/// Format a float the way identifiers expect: shortest round-trip digits,
/// keeping a `.0` on integral values (`100.0`, not `100`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Photo and log directories belonging to one inlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunDirs {
    pub photos: PathBuf,
    pub logs: PathBuf,
}

impl RunDirs {
    /// Directories for `inlist_id`, relative to `root`.
    pub fn for_inlist(root: &Path, inlist_id: &str) -> Self {
        let suffix = inlist_id.strip_prefix(INLIST_PREFIX).unwrap_or(inlist_id);
        Self {
            photos: root.join(format!("{suffix}_photos")),
            logs: root.join(format!("{suffix}_logs")),
        }
    }

    /// Create both directories if missing. Safe to call repeatedly.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.photos, &self.logs] {
            if !dir.is_dir() {
                debug!(path = %dir.display(), "creating run directory");
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

/// Every name derived for a single grid point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactNames {
    pub create_inlist: String,
    pub core_inlist: String,
    pub evolve_inlist: String,
    pub create_model: String,
    pub core_model: String,
    pub evolve_model: String,
}

impl ArtifactNames {
    pub fn new(params: &ParameterSet) -> Self {
        let mass = format!(
            "{:.2}_MJ_{:.2}_ME_{:.2}_RJ",
            params.planet_mass_mj(),
            params.core_mass_me(),
            params.planet_radius_rj()
        );
        let z = format_float(params.metallicity);
        let mode = params.heating_mode.label();
        let with_gamma = format!(
            "{mass}_{:.5}_gamma_{z}_Zmetal_{mode}",
            params.heating_gamma
        );
        let without_gamma = format!("{mass}_{z}_Zmetal_{mode}");

        Self {
            create_inlist: format!("{INLIST_PREFIX}create_{without_gamma}"),
            core_inlist: format!("{INLIST_PREFIX}core_{without_gamma}"),
            evolve_inlist: format!("{INLIST_PREFIX}evolve_{with_gamma}"),
            create_model: format!("planet_create_{with_gamma}.mod"),
            core_model: format!("planet_core_{with_gamma}.mod"),
            evolve_model: format!("planet_evolve_{with_gamma}.mod"),
        }
    }

    pub fn inlist(&self, kind: StageKind) -> &str {
        match kind {
            StageKind::Create => &self.create_inlist,
            StageKind::Core => &self.core_inlist,
            StageKind::Evolve => &self.evolve_inlist,
        }
    }

    pub fn model(&self, kind: StageKind) -> &str {
        match kind {
            StageKind::Create => &self.create_model,
            StageKind::Core => &self.core_model,
            StageKind::Evolve => &self.evolve_model,
        }
    }

    /// Model consumed by a stage, if any.
    pub fn input_model(&self, kind: StageKind) -> Option<&str> {
        match kind {
            StageKind::Create => None,
            StageKind::Core => Some(&self.create_model),
            StageKind::Evolve => Some(&self.core_model),
        }
    }
}
