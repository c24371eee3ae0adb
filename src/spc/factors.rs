//! X-bar/R control chart factors.
//!
//! All constants (A2, D3, D4, d2) are sourced from ASTM E2587 — Standard
//! Practice for Use of Control Charts in Statistical Process Control.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Factor tables indexed by subgroup size n=2..10. Index 0 corresponds to n=2.
// ---------------------------------------------------------------------------

/// A2 factors: UCL/LCL = X-double-bar ± A2 * R-bar.
const A2: [f64; 9] = [1.880, 1.023, 0.729, 0.577, 0.483, 0.419, 0.373, 0.337, 0.308];

/// D3 factors: LCL_R = D3 * R-bar.
const D3: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.076, 0.136, 0.184, 0.223];

/// D4 factors: UCL_R = D4 * R-bar.
const D4: [f64; 9] = [3.267, 2.575, 2.282, 2.114, 2.004, 1.924, 1.864, 1.816, 1.777];

/// d2 factors: sigma-hat = R-bar / d2.
const D2: [f64; 9] = [1.128, 1.693, 2.059, 2.326, 2.534, 2.704, 2.847, 2.970, 3.078];

/// Subgroup size the fixed factors belong to.
pub const DEFAULT_SUBGROUP_SIZE: usize = 5;

/// How the calculator picks its chart factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorMode {
    /// Always use the n=5 factors, whatever the subgroup size.
    #[default]
    Fixed,
    /// Look the factors up by subgroup size (2..=10), falling back to n=5.
    BySubgroupSize,
}

/// The four constants an X-bar/R chart needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFactors {
    pub a2: f64,
    pub d3: f64,
    pub d4: f64,
    pub d2: f64,
}

impl ChartFactors {
    /// Factors for subgroup size 5: A2=0.577, D3=0, D4=2.114, d2=2.326.
    pub const N5: ChartFactors = ChartFactors {
        a2: 0.577,
        d3: 0.0,
        d4: 2.114,
        d2: 2.326,
    };

    /// Table lookup for `n` in 2..=10, `None` otherwise.
    pub fn lookup(subgroup_size: usize) -> Option<Self> {
        if !(2..=10).contains(&subgroup_size) {
            return None;
        }
        let idx = subgroup_size - 2;
        Some(Self {
            a2: A2[idx],
            d3: D3[idx],
            d4: D4[idx],
            d2: D2[idx],
        })
    }

    /// Resolves the factors for a subgroup size under the given mode.
    pub fn resolve(mode: FactorMode, subgroup_size: usize) -> Self {
        match mode {
            FactorMode::Fixed => Self::N5,
            FactorMode::BySubgroupSize => Self::lookup(subgroup_size).unwrap_or(Self::N5),
        }
    }
}

impl Default for ChartFactors {
    fn default() -> Self {
        Self::N5
    }
}
