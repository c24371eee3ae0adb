//! X-bar/R analysis of a raw measurement sequence.
//!
//! # Algorithm
//!
//! 1. Basic statistics over all raw values (mean, sample standard deviation,
//!    min, max, range).
//! 2. Partition the values, in supplied order, into consecutive subgroups of
//!    the configured size. The last subgroup may be short.
//! 3. For each subgroup compute the mean (X-bar) and range (R).
//! 4. Grand mean (X-double-bar) and average range (R-bar).
//! 5. X-bar limits: CL ± A2 * R-bar. R limits: D3 * R-bar, D4 * R-bar.
//! 6. Within-subgroup sigma: R-bar / d2, the basis of Cp/Cpk.
//!
//! # Reference
//!
//! Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//! Chapter 6: Control Charts for Variables.

use chrono::Utc;
use tracing::{debug, warn};
use u_optim::stats;

use super::chart::{ChartPoint, Sample, SpcResult, XBarPoint};
use super::factors::{ChartFactors, FactorMode, DEFAULT_SUBGROUP_SIZE};
use crate::capability::SpecLimits;
use crate::error::{Result, SpcError};

/// X-bar/R calculator.
///
/// Holds only configuration; every call to [`compute`](Self::compute) is
/// independent and the calculator can be shared across threads.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use u_spc::spc::{Sample, SpcCalculator};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
/// let samples: Vec<Sample> = [10.1, 9.9, 10.0, 10.2, 9.8, 10.0, 10.1, 9.9, 10.3, 9.7]
///     .iter()
///     .enumerate()
///     .map(|(i, &v)| Sample::new(v, t0 + chrono::Duration::minutes(i as i64)))
///     .collect();
///
/// let result = SpcCalculator::default().compute(&samples, Some(10.5), Some(9.5));
/// assert_eq!(result.x_bar_data.len(), 2);
/// assert!(result.ucl > result.lcl);
/// assert!(result.cpk.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpcCalculator {
    subgroup_size: usize,
    factor_mode: FactorMode,
    target: Option<f64>,
}

impl SpcCalculator {
    /// Creates a calculator with the given subgroup size and fixed n=5 factors.
    ///
    /// # Panics
    ///
    /// Panics if `subgroup_size` is 0.
    pub fn new(subgroup_size: usize) -> Self {
        assert!(subgroup_size >= 1, "subgroup_size must be >= 1, got {subgroup_size}");
        Self {
            subgroup_size,
            factor_mode: FactorMode::Fixed,
            target: None,
        }
    }

    /// Fallible variant of [`new`](Self::new).
    pub fn try_new(subgroup_size: usize) -> Result<Self> {
        if subgroup_size == 0 {
            return Err(SpcError::InvalidSubgroupSize(subgroup_size));
        }
        Ok(Self::new(subgroup_size))
    }

    /// Selects how chart factors are chosen.
    pub fn with_factor_mode(mut self, mode: FactorMode) -> Self {
        self.factor_mode = mode;
        self
    }

    /// Sets the nominal value used for the Ca index.
    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn subgroup_size(&self) -> usize {
        self.subgroup_size
    }

    pub fn factor_mode(&self) -> FactorMode {
        self.factor_mode
    }

    /// Chart factors used by this calculator.
    pub fn factors(&self) -> ChartFactors {
        ChartFactors::resolve(self.factor_mode, self.subgroup_size)
    }

    /// Analyzes `samples` against optional specification limits.
    ///
    /// Never fails: empty input yields [`SpcResult::empty`], and indices
    /// that cannot be computed stay `None`. Non-finite values are not
    /// rejected here; they surface as NaN statistics (see
    /// [`SpcResult::is_finite`]). Use [`validate_samples`] at the boundary.
    pub fn compute(&self, samples: &[Sample], usl: Option<f64>, lsl: Option<f64>) -> SpcResult {
        if samples.is_empty() {
            debug!("no samples, returning empty result");
            return SpcResult::empty();
        }

        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        let n = values.len();
        if !values.iter().all(|v| v.is_finite()) {
            warn!(samples = n, "non-finite sample values reached the calculator");
        }

        // Basic statistics
        let mean = stats::mean(&values).unwrap_or(f64::NAN);
        let std_dev = if n < 2 {
            0.0
        } else {
            stats::std_dev(&values).unwrap_or(f64::NAN)
        };
        let min = stats::min(&values).unwrap_or(f64::NAN);
        let max = stats::max(&values).unwrap_or(f64::NAN);

        // Subgroup means and ranges
        let (x_bar_values, r_values): (Vec<f64>, Vec<f64>) = values
            .chunks(self.subgroup_size)
            .map(|subgroup| {
                let mean_val = stats::mean(subgroup).unwrap_or(f64::NAN);
                (mean_val, subgroup_range(subgroup))
            })
            .unzip();

        // Grand mean and average range
        let x_bar_mean = stats::mean(&x_bar_values).unwrap_or(f64::NAN);
        let r_mean = stats::mean(&r_values).unwrap_or(f64::NAN);

        let factors = self.factors();
        let ucl = x_bar_mean + factors.a2 * r_mean;
        let lcl = x_bar_mean - factors.a2 * r_mean;
        let ucl_r = factors.d4 * r_mean;
        let lcl_r = factors.d3 * r_mean;

        let sigma = r_mean / factors.d2;

        let mut spec = SpecLimits::new(usl, lsl);
        if let Some(target) = self.target {
            spec = spec.with_target(target);
        }
        let indices = spec.indices(mean, sigma, std_dev);

        let x_bar_data: Vec<XBarPoint> = x_bar_values
            .iter()
            .enumerate()
            .map(|(i, &value)| XBarPoint {
                index: i + 1,
                value,
                // The first sample of subgroup i always exists for chunks();
                // "now" only covers a misaligned index.
                timestamp: samples
                    .get(i * self.subgroup_size)
                    .map_or_else(Utc::now, |s| s.timestamp),
            })
            .collect();

        let range_data: Vec<ChartPoint> = r_values
            .iter()
            .enumerate()
            .map(|(i, &value)| ChartPoint {
                index: i + 1,
                value,
            })
            .collect();

        debug!(
            samples = n,
            subgroups = x_bar_data.len(),
            x_bar_mean,
            r_mean,
            sigma,
            cpk = ?indices.cpk,
            "spc computed"
        );

        SpcResult {
            sample_count: n,
            mean,
            std_dev,
            min,
            max,
            range: max - min,
            cp: indices.cp,
            cpk: indices.cpk,
            cpu: indices.cpu,
            cpl: indices.cpl,
            pp: indices.pp,
            ppk: indices.ppk,
            ppu: indices.ppu,
            ppl: indices.ppl,
            ca: indices.ca,
            ucl,
            lcl,
            ucl_r,
            lcl_r,
            x_bar_mean,
            r_mean,
            sigma,
            x_bar_data,
            range_data,
            raw_data: samples.to_vec(),
        }
    }
}

impl Default for SpcCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_SUBGROUP_SIZE)
    }
}

/// Analyzes `samples` with the given subgroup size and fixed n=5 factors.
///
/// # Panics
///
/// Panics if `subgroup_size` is 0. Run [`validate_samples`] first when the
/// size comes from untrusted input.
pub fn compute(
    samples: &[Sample],
    usl: Option<f64>,
    lsl: Option<f64>,
    subgroup_size: usize,
) -> SpcResult {
    SpcCalculator::new(subgroup_size).compute(samples, usl, lsl)
}

/// Boundary check for calculator input.
///
/// Rejects a zero subgroup size and any NaN or infinite sample value.
pub fn validate_samples(samples: &[Sample], subgroup_size: usize) -> Result<()> {
    if subgroup_size == 0 {
        return Err(SpcError::InvalidSubgroupSize(subgroup_size));
    }
    if let Some((index, sample)) = samples
        .iter()
        .enumerate()
        .find(|(_, s)| !s.value.is_finite())
    {
        return Err(SpcError::NonFiniteSample {
            index,
            value: sample.value,
        });
    }
    Ok(())
}

/// Range (max - min) of a subgroup, NaN if it contains NaN.
fn subgroup_range(subgroup: &[f64]) -> f64 {
    match (stats::max(subgroup), stats::min(subgroup)) {
        (Some(max), Some(min)) => max - min,
        _ => f64::NAN,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn to_samples(values: &[f64]) -> Vec<Sample> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(v, t0 + Duration::seconds(i as i64)))
            .collect()
    }

    proptest! {
        #[test]
        fn basic_stats_are_ordered(
            values in proptest::collection::vec(-1e3_f64..1e3, 1..=60),
            size in 1_usize..=10,
        ) {
            let r = compute(&to_samples(&values), None, None, size);
            let tol = 1e-9 * (1.0 + r.max.abs().max(r.min.abs()));
            prop_assert!(r.std_dev >= 0.0, "std_dev = {}", r.std_dev);
            prop_assert!(r.max + tol >= r.mean && r.mean + tol >= r.min,
                "min {} mean {} max {}", r.min, r.mean, r.max);
            prop_assert_eq!(r.range, r.max - r.min);
            prop_assert_eq!(r.x_bar_data.len(), values.len().div_ceil(size));
        }

        #[test]
        fn control_limits_are_ordered(
            values in proptest::collection::vec(-1e3_f64..1e3, 1..=60),
        ) {
            let r = compute(&to_samples(&values), None, None, 5);
            prop_assert!(r.ucl >= r.lcl, "ucl {} < lcl {}", r.ucl, r.lcl);
            prop_assert!(r.ucl_r >= r.lcl_r, "uclR {} < lclR {}", r.ucl_r, r.lcl_r);
            prop_assert_eq!(r.lcl_r, 0.0);
        }

        #[test]
        fn cpk_is_worst_side(
            values in proptest::collection::vec(0.0_f64..10.0, 2..=60),
            lsl in -5.0_f64..5.0,
            width in 0.1_f64..20.0,
        ) {
            let r = compute(&to_samples(&values), Some(lsl + width), Some(lsl), 5);
            match (r.cpu, r.cpl) {
                (Some(u), Some(l)) => prop_assert_eq!(r.cpk, Some(u.min(l))),
                _ => prop_assert!(r.cpk.is_none() && r.sigma <= 0.0),
            }
        }

        #[test]
        fn no_limits_no_indices(
            values in proptest::collection::vec(-1e3_f64..1e3, 1..=40),
        ) {
            let r = compute(&to_samples(&values), None, None, 5);
            prop_assert!(r.cp.is_none() && r.cpk.is_none() && r.cpu.is_none() && r.cpl.is_none());
        }
    }
}
