//! Rendering of the Fortran namelist files the simulator reads.
//!
//! Each stage gets its own inlist (`inlist_create_...` and so on) holding a
//! `&star_job` and a `&controls` group. The simulator itself always starts from
//! a file literally named `inlist`, so [`render_pointer`] produces that file
//! with both groups redirected to the stage inlist.

use std::fmt::Write;

use crate::constants::M_SUN_CGS;
use crate::naming::{ArtifactNames, RunDirs};
use crate::params::ParameterSet;
use crate::stage::StageKind;

/// Name of the entry-point inlist the simulator looks for in its working directory.
pub const POINTER_INLIST: &str = "inlist";

/// A single namelist value.
#[derive(Debug, Clone, PartialEq)]
pub enum NamelistValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl NamelistValue {
    fn render(&self) -> String {
        match self {
            NamelistValue::Bool(true) => ".true.".to_string(),
            NamelistValue::Bool(false) => ".false.".to_string(),
            NamelistValue::Int(v) => v.to_string(),
            NamelistValue::Float(v) => fortran_float(*v),
            NamelistValue::Str(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

/// Render a float with a Fortran double-precision exponent (`1.899d30`).
pub fn fortran_float(value: f64) -> String {
    format!("{value:e}").replace('e', "d")
}

/// One `&group ... /` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Namelist {
    name: &'static str,
    entries: Vec<(String, NamelistValue)>,
}

impl Namelist {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: NamelistValue) -> &mut Self {
        self.entries.push((key.into(), value));
        self
    }

    pub fn flag(&mut self, key: &str, value: bool) -> &mut Self {
        self.set(key, NamelistValue::Bool(value))
    }

    pub fn float(&mut self, key: &str, value: f64) -> &mut Self {
        self.set(key, NamelistValue::Float(value))
    }

    pub fn string(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.set(key, NamelistValue::Str(value.into()))
    }

    pub fn get(&self, key: &str) -> Option<&NamelistValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "&{}", self.name);
        for (key, value) in &self.entries {
            let _ = writeln!(out, "    {} = {}", key, value.render());
        }
        let _ = writeln!(out, "/ ! end of {} namelist", self.name);
    }
}

/// Inlist contents for one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Inlist {
    pub star_job: Namelist,
    pub controls: Namelist,
}

impl Inlist {
    /// Build the inlist for `kind`.
    ///
    /// `core_inserted` selects whether the create stage builds the envelope
    /// alone (core added later) or the full planet mass.
    pub fn for_stage(
        kind: StageKind,
        params: &ParameterSet,
        names: &ArtifactNames,
        dirs: &RunDirs,
        core_inserted: bool,
    ) -> Self {
        let mut star_job = Namelist::new("star_job");
        let mut controls = Namelist::new("controls");

        match kind {
            StageKind::Create => {
                let mass = if core_inserted {
                    params.mass_without_core
                } else {
                    params.planet_mass
                };
                star_job
                    .flag("create_initial_model", true)
                    .float("mass_in_gm_for_create_initial_model", mass)
                    .float("radius_in_cm_for_create_initial_model", params.planet_radius);
                controls.float("max_age", params.max_age_create);
            }
            StageKind::Core => {
                star_job
                    .flag("load_saved_model", true)
                    .string("saved_model_name", names.create_model.as_str())
                    .flag("relax_core", true)
                    .float("new_core_mass", params.core_mass / M_SUN_CGS)
                    .float("core_avg_rho", params.core_density)
                    .float("core_avg_eps", 0.0);
                controls.float("max_age", params.max_age_core);
            }
            StageKind::Evolve => {
                star_job
                    .flag("load_saved_model", true)
                    .string("saved_model_name", names.core_model.as_str())
                    .flag("set_initial_age", true)
                    .float("initial_age", 0.0)
                    .flag("set_initial_model_number", true)
                    .set("initial_model_number", NamelistValue::Int(0));
                controls
                    .float("max_age", params.max_age_evolve)
                    .float("column_depth_for_irradiation", params.irradiation_column)
                    .float("irradiation_flux", params.dayside_flux)
                    .float("inject_uniform_extra_heat", params.uniform_specific_heating())
                    .flag("use_other_energy", params.heating_mode.uses_other_energy());
                if params.heating_mode.uses_other_energy() {
                    controls
                        .float("x_ctrl(1)", params.heating_rate)
                        .float("x_ctrl(2)", params.pressure_depth);
                }
            }
        }

        star_job
            .flag("save_model_when_terminate", true)
            .string("save_model_filename", names.model(kind))
            .flag("pgstar_flag", false);
        controls
            .float("initial_z", params.metallicity)
            .float("initial_y", params.helium_fraction)
            .string("log_directory", dirs.logs.display().to_string())
            .string("photo_directory", dirs.photos.display().to_string());

        Self { star_job, controls }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.star_job.render_into(&mut out);
        out.push('\n');
        self.controls.render_into(&mut out);
        out
    }
}

/// Render the entry-point `inlist` that redirects both groups to `stage_inlist`.
pub fn render_pointer(stage_inlist: &str) -> String {
    let mut star_job = Namelist::new("star_job");
    star_job
        .flag("read_extra_star_job_inlist1", true)
        .string("extra_star_job_inlist1_name", stage_inlist);
    let mut controls = Namelist::new("controls");
    controls
        .flag("read_extra_controls_inlist1", true)
        .string("extra_controls_inlist1_name", stage_inlist);

    let mut out = String::new();
    star_job.render_into(&mut out);
    out.push('\n');
    controls.render_into(&mut out);
    out.push('\n');
    Namelist::new("pgstar").render_into(&mut out);
    out
}
