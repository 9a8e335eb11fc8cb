//! Planet and host-star inputs, and the derived parameter set handed to the
//! simulator.
//!
//! Inputs are kept in the units people think in (Jupiter masses, solar radii,
//! AU, bar). [`ParameterSet::derive`] converts everything to cgs and computes
//! the irradiation and heating quantities in a fixed order:
//!
//! ```text
//! mass_without_core = M_p - M_core
//! F_day             = sigma * Teff^4 * (R_star / a)^2
//! T_eq              = (F_day / (4 sigma))^(1/4)
//! Gamma             = gamma * sigma * Teff^4 * 4 pi R_star^2 * (R_p / (2 a))^2
//! P_dep             = P_dep[bar] * bar
//! ```
//!
//! Overrides from a sweep are applied to the inputs first and the whole set is
//! derived again, so the flux, temperature and heating rate always agree with
//! the gamma and metallicity actually used for a run.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AU_CGS, BAR_CGS, M_EARTH_CGS, M_JUP_CGS, R_JUP_CGS, R_SUN_CGS, SIGMA_SB_CGS,
};
use crate::error::{Error, Result};
use crate::heating::HeatingMode;

/// Base inputs for one planet/star system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetInputs {
    /// Planet mass in Jupiter masses.
    pub planet_mass_mj: f64,
    /// Initial planet radius in Jupiter radii.
    pub planet_radius_rj: f64,
    /// Core mass in Earth masses.
    pub core_mass_me: f64,
    /// Mean core density (g cm⁻³).
    pub core_density: f64,
    /// Metallicity of planet and star.
    pub metallicity: f64,
    /// Helium mass fraction of planet and (initial) star.
    pub helium_fraction: f64,
    /// Stop age of the create stage.
    pub max_age_create: f64,
    /// Stop age of the core insertion stage.
    pub max_age_core: f64,
    /// Stop age of the evolve stage.
    pub max_age_evolve: f64,
    /// Column depth (g cm⁻²) at which stellar irradiation is deposited.
    pub irradiation_column: f64,
    /// Host star mass in solar masses.
    pub star_mass_msun: f64,
    /// Host star radius in solar radii.
    pub star_radius_rsun: f64,
    /// Host star effective temperature (K).
    pub star_teff: f64,
    /// Orbital separation in AU.
    pub orbital_separation_au: f64,
    /// Ratio of internal heating to intercepted stellar power.
    pub heating_gamma: f64,
    /// Pressure depth (bar) for depth-dependent heating.
    pub pressure_depth_bar: f64,
}

impl Default for PlanetInputs {
    fn default() -> Self {
        Self {
            planet_mass_mj: 1.67,
            planet_radius_rj: 2.00,
            core_mass_me: 10.0,
            core_density: 10.0,
            metallicity: 0.02,
            helium_fraction: 0.24,
            max_age_create: 50.0,
            max_age_core: 2.0e3,
            max_age_evolve: 1.0e10,
            irradiation_column: 300.0,
            star_mass_msun: 0.903,
            star_radius_rsun: 0.910,
            star_teff: 5617.0,
            orbital_separation_au: 0.02335,
            heating_gamma: 1.0e-4,
            pressure_depth_bar: 100.0,
        }
    }
}

/// Values replaced by a single grid point of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub heating_gamma: Option<f64>,
    pub metallicity: Option<f64>,
    pub pressure_depth_bar: Option<f64>,
}

impl PlanetInputs {
    /// Return a copy of these inputs with the given overrides applied.
    pub fn with_overrides(&self, overrides: &Overrides) -> Self {
        let mut next = self.clone();
        if let Some(gamma) = overrides.heating_gamma {
            next.heating_gamma = gamma;
        }
        if let Some(z) = overrides.metallicity {
            next.metallicity = z;
        }
        if let Some(pdep) = overrides.pressure_depth_bar {
            next.pressure_depth_bar = pdep;
        }
        next
    }
}

/// Fully derived, cgs parameter set for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    pub planet_mass: f64,
    pub planet_radius: f64,
    pub core_mass: f64,
    pub core_density: f64,
    pub mass_without_core: f64,
    pub metallicity: f64,
    pub helium_fraction: f64,
    pub max_age_create: f64,
    pub max_age_core: f64,
    pub max_age_evolve: f64,
    pub irradiation_column: f64,
    pub dayside_flux: f64,
    pub equilibrium_temperature: f64,
    pub heating_gamma: f64,
    /// Nominal absolute heating power (erg s⁻¹) implied by `heating_gamma`.
    pub heating_rate: f64,
    /// Pressure depth in dyn cm⁻².
    pub pressure_depth: f64,
    pub heating_mode: HeatingMode,
}

impl ParameterSet {
    /// Derive the complete parameter set from base inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when the star radius, effective
    /// temperature, orbital separation or pressure depth is not a finite
    /// positive number.
    pub fn derive(inputs: &PlanetInputs, mode: HeatingMode) -> Result<Self> {
        require_positive("star_radius_rsun", inputs.star_radius_rsun)?;
        require_positive("star_teff", inputs.star_teff)?;
        require_positive("orbital_separation_au", inputs.orbital_separation_au)?;
        require_positive("pressure_depth_bar", inputs.pressure_depth_bar)?;
        require_finite("planet_mass_mj", inputs.planet_mass_mj)?;
        require_finite("planet_radius_rj", inputs.planet_radius_rj)?;
        require_finite("core_mass_me", inputs.core_mass_me)?;
        require_finite("heating_gamma", inputs.heating_gamma)?;

        let planet_mass = inputs.planet_mass_mj * M_JUP_CGS;
        let planet_radius = inputs.planet_radius_rj * R_JUP_CGS;
        let core_mass = inputs.core_mass_me * M_EARTH_CGS;
        let star_radius = inputs.star_radius_rsun * R_SUN_CGS;
        let separation = inputs.orbital_separation_au * AU_CGS;

        let dayside_flux = dayside_flux(inputs.star_teff, star_radius, separation);

        Ok(Self {
            planet_mass,
            planet_radius,
            core_mass,
            core_density: inputs.core_density,
            mass_without_core: planet_mass - core_mass,
            metallicity: inputs.metallicity,
            helium_fraction: inputs.helium_fraction,
            max_age_create: inputs.max_age_create,
            max_age_core: inputs.max_age_core,
            max_age_evolve: inputs.max_age_evolve,
            irradiation_column: inputs.irradiation_column,
            dayside_flux,
            equilibrium_temperature: equilibrium_temperature(dayside_flux),
            heating_gamma: inputs.heating_gamma,
            heating_rate: heating_rate(
                inputs.heating_gamma,
                inputs.star_teff,
                star_radius,
                planet_radius,
                separation,
            ),
            pressure_depth: inputs.pressure_depth_bar * BAR_CGS,
            heating_mode: mode,
        })
    }

    /// Heating power injected uniformly by the simulator.
    ///
    /// Zero in depth-dependent mode, where the heat goes in through the
    /// `other_energy` hook at the pressure depth instead.
    pub fn uniform_heating_rate(&self) -> f64 {
        match self.heating_mode {
            HeatingMode::Uniform => self.heating_rate,
            HeatingMode::DepthDependent { .. } => 0.0,
        }
    }

    /// Uniform extra heat per unit mass (erg g⁻¹ s⁻¹).
    pub fn uniform_specific_heating(&self) -> f64 {
        if self.planet_mass > 0.0 {
            self.uniform_heating_rate() / self.planet_mass
        } else {
            0.0
        }
    }

    pub fn planet_mass_mj(&self) -> f64 {
        self.planet_mass / M_JUP_CGS
    }

    pub fn planet_radius_rj(&self) -> f64 {
        self.planet_radius / R_JUP_CGS
    }

    pub fn core_mass_me(&self) -> f64 {
        self.core_mass / M_EARTH_CGS
    }

    pub fn pressure_depth_bar(&self) -> f64 {
        self.pressure_depth / BAR_CGS
    }

    pub fn has_core(&self) -> bool {
        self.core_mass > 0.0
    }
}

/// Stellar flux intercepted on the planet's dayside (erg cm⁻² s⁻¹).
pub fn dayside_flux(star_teff: f64, star_radius_cm: f64, separation_cm: f64) -> f64 {
    SIGMA_SB_CGS * star_teff.powi(4) * (star_radius_cm / separation_cm).powi(2)
}

/// Equilibrium temperature for full heat redistribution (K).
pub fn equilibrium_temperature(dayside_flux: f64) -> f64 {
    (dayside_flux / 4.0 / SIGMA_SB_CGS).powf(0.25)
}

/// Absolute internal heating power (erg s⁻¹), a fraction `gamma` of the
/// stellar power intercepted by the planet's cross-section.
pub fn heating_rate(
    gamma: f64,
    star_teff: f64,
    star_radius_cm: f64,
    planet_radius_cm: f64,
    separation_cm: f64,
) -> f64 {
    let luminosity = SIGMA_SB_CGS * star_teff.powi(4) * (4.0 * PI * star_radius_cm.powi(2));
    gamma * luminosity * (planet_radius_cm / (2.0 * separation_cm)).powi(2)
}

fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter {
            name,
            message: format!("must be a finite positive number, got {value}"),
        });
    }
    Ok(())
}

fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidParameter {
            name,
            message: format!("must be finite, got {value}"),
        });
    }
    Ok(())
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: [(&str, String); 17] = [
            ("mp", format!("{:.6e} g ({:.2} MJ)", self.planet_mass, self.planet_mass_mj())),
            ("rp", format!("{:.6e} cm ({:.2} RJ)", self.planet_radius, self.planet_radius_rj())),
            ("mcore", format!("{:.6e} g ({:.2} ME)", self.core_mass, self.core_mass_me())),
            ("rhocore", format!("{} g/cc", self.core_density)),
            ("mp_wo_core", format!("{:.6e} g", self.mass_without_core)),
            ("z", format!("{}", self.metallicity)),
            ("y", format!("{}", self.helium_fraction)),
            ("maxage_1", format!("{:e}", self.max_age_create)),
            ("maxage_2", format!("{:e}", self.max_age_core)),
            ("maxage_3", format!("{:e}", self.max_age_evolve)),
            ("irrad_col", format!("{}", self.irradiation_column)),
            ("flux_dayside", format!("{:.6e} erg/cm^2/s", self.dayside_flux)),
            ("Teq", format!("{:.2} K", self.equilibrium_temperature)),
            ("heating_gamma", format!("{}", self.heating_gamma)),
            ("heating_Gamma", format!("{:.6e} erg/s", self.uniform_heating_rate())),
            ("pdep", format!("{:.6e} dyn/cm^2", self.pressure_depth)),
            (
                "use_other_energy",
                if self.heating_mode.uses_other_energy() {
                    ".true.".to_string()
                } else {
                    ".false.".to_string()
                },
            ),
        ];
        for (name, value) in rows {
            writeln!(f, "{name:<17} = {value}")?;
        }
        Ok(())
    }
}
