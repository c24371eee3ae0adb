//! Process capability indices (Cp, Cpk, Cpu, Cpl), performance indices
//! (Pp, Ppk) and the centering index Ca.
//!
//! Short-term indices use the within-subgroup sigma estimated from the
//! control chart (R̄/d2); long-term indices use the overall sample
//! standard deviation.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.

use serde::{Deserialize, Serialize};

/// Specification limits of a characteristic.
///
/// Either limit may be absent. Indices that need a missing limit stay `None`.
///
/// # Examples
///
/// ```
/// use u_spc::capability::SpecLimits;
///
/// let spec = SpecLimits::new(Some(11.0), Some(9.0));
/// let indices = spec.indices(10.0, 0.25, 0.3);
/// assert!(indices.cp.is_some());
/// assert!(indices.cpk.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecLimits {
    pub usl: Option<f64>,
    pub lsl: Option<f64>,
    /// Nominal value for Ca; defaults to the midpoint of the limits.
    pub target: Option<f64>,
}

/// Computed indices. Every field is `None` unless computable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CapabilityIndices {
    /// Cp = (USL - LSL) / (6 * sigma_within). Requires both limits.
    pub cp: Option<f64>,
    /// Cpk = min(Cpu, Cpl), or the one-sided index.
    pub cpk: Option<f64>,
    /// Cpu = (USL - mean) / (3 * sigma_within). Requires USL.
    pub cpu: Option<f64>,
    /// Cpl = (mean - LSL) / (3 * sigma_within). Requires LSL.
    pub cpl: Option<f64>,
    /// Pp = (USL - LSL) / (6 * sigma_overall).
    pub pp: Option<f64>,
    /// Ppk = min(Ppu, Ppl), or the one-sided index.
    pub ppk: Option<f64>,
    pub ppu: Option<f64>,
    pub ppl: Option<f64>,
    /// Ca = |mean - target| / ((USL - LSL) / 2). Requires both limits.
    pub ca: Option<f64>,
}

impl SpecLimits {
    pub fn new(usl: Option<f64>, lsl: Option<f64>) -> Self {
        Self {
            usl,
            lsl,
            target: None,
        }
    }

    /// Sets the nominal value used for Ca.
    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Returns `true` if neither limit is set.
    pub fn is_unbounded(&self) -> bool {
        self.usl.is_none() && self.lsl.is_none()
    }

    /// Computes all indices for a process with the given mean and sigmas.
    ///
    /// Short-term indices are computed only when `sigma_within > 0`,
    /// long-term indices only when `sigma_overall > 0`. A zero, negative
    /// or NaN sigma leaves the corresponding indices `None`.
    pub fn indices(&self, mean: f64, sigma_within: f64, sigma_overall: f64) -> CapabilityIndices {
        let short = self.one_sided_pair(mean, sigma_within);
        let long = self.one_sided_pair(mean, sigma_overall);

        let ca = match (self.usl, self.lsl) {
            (Some(u), Some(l)) if u > l => {
                let target = self.target.unwrap_or((u + l) / 2.0);
                Some((mean - target).abs() / ((u - l) / 2.0))
            }
            _ => None,
        };

        CapabilityIndices {
            cp: short.spread,
            cpk: short.worst,
            cpu: short.upper,
            cpl: short.lower,
            pp: long.spread,
            ppk: long.worst,
            ppu: long.upper,
            ppl: long.lower,
            ca,
        }
    }

    fn one_sided_pair(&self, mean: f64, sigma: f64) -> IndexSet {
        if sigma.is_nan() || sigma <= 0.0 {
            return IndexSet::default();
        }
        let upper = self.usl.map(|u| (u - mean) / (3.0 * sigma));
        let lower = self.lsl.map(|l| (mean - l) / (3.0 * sigma));
        let spread = match (self.usl, self.lsl) {
            (Some(u), Some(l)) => Some((u - l) / (6.0 * sigma)),
            _ => None,
        };
        let worst = match (upper, lower) {
            (Some(u), Some(l)) => Some(u.min(l)),
            (Some(u), None) => Some(u),
            (None, Some(l)) => Some(l),
            (None, None) => None,
        };
        IndexSet {
            spread,
            worst,
            upper,
            lower,
        }
    }
}

#[derive(Default)]
struct IndexSet {
    spread: Option<f64>,
    worst: Option<f64>,
    upper: Option<f64>,
    lower: Option<f64>,
}

/// Centering index in percent: `|mean - target| / ((usl - lsl) / 2) * 100`.
///
/// 0 means perfectly centered; 100 means the mean sits on a limit.
pub fn calculate_ca(mean: f64, target: f64, usl: f64, lsl: f64) -> f64 {
    let tolerance = usl - lsl;
    (mean - target).abs() / (tolerance / 2.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// USL = 220, LSL = 200, mean = 215, sigma = 2
    /// Cp = 20/12 = 1.6667, Cpu = 5/6 = 0.8333, Cpl = 15/6 = 2.5
    #[test]
    fn off_center_process() {
        let spec = SpecLimits::new(Some(220.0), Some(200.0));
        let idx = spec.indices(215.0, 2.0, 2.0);

        assert!((idx.cp.unwrap() - 1.6667).abs() < 0.001);
        assert!((idx.cpu.unwrap() - 0.8333).abs() < 0.001);
        assert!((idx.cpl.unwrap() - 2.5).abs() < 1e-12);
        assert!(
            (idx.cpk.unwrap() - idx.cpu.unwrap()).abs() < 1e-15,
            "Cpk should equal min(Cpu, Cpl)"
        );
    }

    #[test]
    fn usl_only_computes_cpu_not_cpl() {
        let idx = SpecLimits::new(Some(10.0), None).indices(8.0, 0.5, 0.5);
        assert!(idx.cp.is_none(), "Cp requires both limits");
        assert!(idx.cpl.is_none());
        assert_eq!(idx.cpk, idx.cpu);
        assert!(idx.ca.is_none());
    }

    #[test]
    fn lsl_only_computes_cpl_not_cpu() {
        let idx = SpecLimits::new(None, Some(5.0)).indices(8.0, 0.5, 0.5);
        assert!(idx.cp.is_none());
        assert!(idx.cpu.is_none());
        assert_eq!(idx.cpk, idx.cpl);
    }

    #[test]
    fn no_limits_means_no_indices() {
        let spec = SpecLimits::new(None, None);
        assert!(spec.is_unbounded());
        assert_eq!(spec.indices(8.0, 0.5, 0.5), CapabilityIndices::default());
    }

    #[test]
    fn non_positive_sigma_yields_none() {
        let spec = SpecLimits::new(Some(12.0), Some(8.0));
        for sigma in [0.0, -1.0, f64::NAN] {
            let idx = spec.indices(10.0, sigma, sigma);
            assert!(idx.cp.is_none() && idx.cpk.is_none());
            assert!(idx.pp.is_none() && idx.ppk.is_none());
        }
    }

    #[test]
    fn pp_differs_from_cp_when_sigmas_differ() {
        let idx = SpecLimits::new(Some(220.0), Some(200.0)).indices(210.0, 1.5, 3.0);
        assert!(idx.pp.unwrap() < idx.cp.unwrap());
        assert!((idx.pp.unwrap() - 20.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn ca_uses_midpoint_by_default() {
        let spec = SpecLimits::new(Some(12.0), Some(8.0));
        let idx = spec.indices(11.0, 1.0, 1.0);
        // |11 - 10| / 2 = 0.5
        assert!((idx.ca.unwrap() - 0.5).abs() < 1e-12);

        let idx = spec.with_target(11.0).indices(11.0, 1.0, 1.0);
        assert!(idx.ca.unwrap().abs() < 1e-12);
    }

    #[test]
    fn ca_is_defined_even_without_variation() {
        let idx = SpecLimits::new(Some(12.0), Some(8.0)).indices(10.0, 0.0, 0.0);
        assert!(idx.cp.is_none());
        assert_eq!(idx.ca, Some(0.0));
    }

    #[test]
    fn calculate_ca_in_percent() {
        assert!((calculate_ca(11.0, 10.0, 12.0, 8.0) - 50.0).abs() < 1e-12);
        assert!(calculate_ca(10.0, 10.0, 12.0, 8.0).abs() < 1e-12);
    }
}
