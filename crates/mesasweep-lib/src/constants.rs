//! Physical constants in cgs units.
//!
//! Every value is available both as a `pub const` for direct use in formulas
//! and through the read-only [`ConstantSet`] for lookup by symbol, which is what
//! the CLI lists and what configuration code resolves names against.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{Error, Result};

/// One bar in dyn cm⁻² (erg cm⁻³).
pub const BAR_CGS: f64 = 1.0e6;

/// Newtonian gravitational constant (cm³ g⁻¹ s⁻²).
pub const G_CGS: f64 = 6.6743e-8;
/// Boltzmann constant (erg K⁻¹).
pub const K_B_CGS: f64 = 1.3807e-16;
/// Stefan-Boltzmann constant (erg cm⁻² s⁻¹ K⁻⁴).
pub const SIGMA_SB_CGS: f64 = 5.6704e-5;
/// Proton mass (g).
pub const M_PROTON_CGS: f64 = 1.6726e-24;

/// Solar mass (g).
pub const M_SUN_CGS: f64 = 1.989e33;
/// Earth mass (g).
pub const M_EARTH_CGS: f64 = 5.974e27;
/// Jupiter mass (g).
pub const M_JUP_CGS: f64 = 1.899e30;

/// Solar radius (cm).
pub const R_SUN_CGS: f64 = 6.955e10;
/// Earth radius (cm).
pub const R_EARTH_CGS: f64 = 6.378e8;
/// Jupiter radius (cm).
pub const R_JUP_CGS: f64 = 7.149e9;

/// Solar luminosity (erg s⁻¹).
pub const L_SUN_CGS: f64 = 3.839e33;

/// Parsec (cm).
pub const PC_CGS: f64 = 3.086e18;
/// Light-year (cm).
pub const LY_CGS: f64 = 9.461e17;
/// Astronomical unit (cm).
pub const AU_CGS: f64 = 1.496e13;

/// Year (s).
pub const YR_CGS: f64 = 3.156e7;

/// A named constant with its unit annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Constant {
    pub symbol: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub description: &'static str,
}

/// Immutable lookup table of cgs constants, kept in definition order.
#[derive(Debug, Clone)]
pub struct ConstantSet {
    entries: Vec<Constant>,
}

static CONSTANTS: Lazy<ConstantSet> = Lazy::new(ConstantSet::cgs);

/// Process-wide constants table.
pub fn constants() -> &'static ConstantSet {
    &CONSTANTS
}

impl ConstantSet {
    fn cgs() -> Self {
        let entry = |symbol, value, unit, description| Constant {
            symbol,
            value,
            unit,
            description,
        };
        Self {
            entries: vec![
                entry("bar", BAR_CGS, "dyn cm^-2", "bar to cgs pressure"),
                entry("G", G_CGS, "cm^3 g^-1 s^-2", "gravitational constant"),
                entry("k_B", K_B_CGS, "erg K^-1", "Boltzmann constant"),
                entry(
                    "sigma_SB",
                    SIGMA_SB_CGS,
                    "erg cm^-2 s^-1 K^-4",
                    "Stefan-Boltzmann constant",
                ),
                entry("m_p", M_PROTON_CGS, "g", "proton mass"),
                entry("M_sun", M_SUN_CGS, "g", "solar mass"),
                entry("M_earth", M_EARTH_CGS, "g", "Earth mass"),
                entry("M_jup", M_JUP_CGS, "g", "Jupiter mass"),
                entry("R_sun", R_SUN_CGS, "cm", "solar radius"),
                entry("R_earth", R_EARTH_CGS, "cm", "Earth radius"),
                entry("R_jup", R_JUP_CGS, "cm", "Jupiter radius"),
                entry("L_sun", L_SUN_CGS, "erg s^-1", "solar luminosity"),
                entry("pc", PC_CGS, "cm", "parsec"),
                entry("ly", LY_CGS, "cm", "light-year"),
                entry("au", AU_CGS, "cm", "astronomical unit"),
                entry("yr", YR_CGS, "s", "year"),
            ],
        }
    }

    /// Look up a constant value by symbol.
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entry(symbol).map(|c| c.value)
    }

    /// Look up the full entry for a symbol.
    pub fn entry(&self, symbol: &str) -> Option<&Constant> {
        self.entries.iter().find(|c| c.symbol == symbol)
    }

    /// Like [`ConstantSet::get`] but reports unknown symbols with suggestions.
    pub fn require(&self, symbol: &str) -> Result<f64> {
        self.get(symbol).ok_or_else(|| Error::UnknownConstant {
            name: symbol.to_string(),
            suggestions: self.fuzzy_matches(symbol, 3),
        })
    }

    /// Symbols most similar to `query`, best match first.
    pub fn fuzzy_matches(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.to_ascii_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .entries
            .iter()
            .map(|c| {
                let score = strsim::jaro_winkler(&query, &c.symbol.to_ascii_lowercase());
                (score, c.symbol)
            })
            .filter(|(score, _)| *score >= 0.7)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, symbol)| symbol.to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constant> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
