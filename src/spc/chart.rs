//! Core chart data types shared by the calculator and the rule detector.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time attached to a measurement.
pub type Timestamp = DateTime<Utc>;

/// A single raw measurement.
///
/// The engine preserves the order in which samples are supplied and never
/// re-sorts them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Measured value.
    pub value: f64,
    /// When the value was measured.
    pub timestamp: Timestamp,
}

impl Sample {
    /// Creates a sample.
    pub fn new(value: f64, timestamp: Timestamp) -> Self {
        Self { value, timestamp }
    }
}

/// Control limits for a chart.
///
/// # Invariants
///
/// - `lcl <= cl <= ucl`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line.
    pub cl: f64,
    /// Lower control limit.
    pub lcl: f64,
}

/// A single point of a chart series: 1-based subgroup index and statistic.
///
/// Used for the R chart series and as the input of rule detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// 1-based subgroup index.
    pub index: usize,
    /// Subgroup statistic (mean or range).
    pub value: f64,
}

/// A point of the X-bar series.
///
/// The timestamp is that of the first sample in the subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XBarPoint {
    /// 1-based subgroup index.
    pub index: usize,
    /// Subgroup mean.
    pub value: f64,
    /// Timestamp of the subgroup's first sample.
    pub timestamp: Timestamp,
}

impl From<&ChartPoint> for ChartPoint {
    fn from(point: &ChartPoint) -> Self {
        *point
    }
}

impl From<XBarPoint> for ChartPoint {
    fn from(point: XBarPoint) -> Self {
        ChartPoint::from(&point)
    }
}

impl From<&XBarPoint> for ChartPoint {
    fn from(point: &XBarPoint) -> Self {
        ChartPoint {
            index: point.index,
            value: point.value,
        }
    }
}

/// Result of an SPC calculation.
///
/// Capability and performance indices are `None` unless computable. An empty
/// input produces an all-zero result with empty series; consumers treat it
/// as "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpcResult {
    /// Number of raw samples.
    pub sample_count: usize,
    /// Mean of all raw values.
    pub mean: f64,
    /// Sample standard deviation (n − 1) of all raw values.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub range: f64,

    /// Cp = (USL − LSL) / 6σ̂.
    pub cp: Option<f64>,
    /// Cpk = min(Cpu, Cpl), or the one-sided index when only one limit is set.
    pub cpk: Option<f64>,
    /// Cpu = (USL − mean) / 3σ̂.
    pub cpu: Option<f64>,
    /// Cpl = (mean − LSL) / 3σ̂.
    pub cpl: Option<f64>,

    /// Pp = (USL − LSL) / 6s, using the overall standard deviation.
    pub pp: Option<f64>,
    /// Ppk = min(Ppu, Ppl).
    pub ppk: Option<f64>,
    pub ppu: Option<f64>,
    pub ppl: Option<f64>,
    /// Centering index as a fraction of the half tolerance.
    pub ca: Option<f64>,

    /// X-bar chart upper control limit.
    pub ucl: f64,
    /// X-bar chart lower control limit.
    pub lcl: f64,
    /// R chart upper control limit.
    pub ucl_r: f64,
    /// R chart lower control limit.
    pub lcl_r: f64,

    /// Grand mean of subgroup means (X-bar center line).
    pub x_bar_mean: f64,
    /// Average subgroup range (R chart center line).
    pub r_mean: f64,
    /// Within-subgroup sigma estimate, R̄ / d2.
    pub sigma: f64,

    pub x_bar_data: Vec<XBarPoint>,
    pub range_data: Vec<ChartPoint>,
    /// Echo of the input for charting.
    pub raw_data: Vec<Sample>,
}

impl SpcResult {
    /// The zero-valued result returned for empty input.
    pub fn empty() -> Self {
        Self {
            sample_count: 0,
            mean: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            range: 0.0,
            cp: None,
            cpk: None,
            cpu: None,
            cpl: None,
            pp: None,
            ppk: None,
            ppu: None,
            ppl: None,
            ca: None,
            ucl: 0.0,
            lcl: 0.0,
            ucl_r: 0.0,
            lcl_r: 0.0,
            x_bar_mean: 0.0,
            r_mean: 0.0,
            sigma: 0.0,
            x_bar_data: Vec::new(),
            range_data: Vec::new(),
            raw_data: Vec::new(),
        }
    }

    /// Returns `true` if no data was analyzed.
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// X-bar chart limits with the grand mean as center line.
    pub fn x_bar_limits(&self) -> ControlLimits {
        ControlLimits {
            ucl: self.ucl,
            cl: self.x_bar_mean,
            lcl: self.lcl,
        }
    }

    /// R chart limits with the average range as center line.
    pub fn r_limits(&self) -> ControlLimits {
        ControlLimits {
            ucl: self.ucl_r,
            cl: self.r_mean,
            lcl: self.lcl_r,
        }
    }

    /// Returns `false` if any computed statistic is NaN or infinite.
    ///
    /// Non-finite samples that bypass [`validate_samples`](super::validate_samples)
    /// surface here instead of silently flowing into charts.
    pub fn is_finite(&self) -> bool {
        let scalars = [
            self.mean,
            self.std_dev,
            self.min,
            self.max,
            self.range,
            self.ucl,
            self.lcl,
            self.ucl_r,
            self.lcl_r,
            self.x_bar_mean,
            self.r_mean,
            self.sigma,
        ];
        let indices = [
            self.cp, self.cpk, self.cpu, self.cpl, self.pp, self.ppk, self.ppu, self.ppl, self.ca,
        ];
        scalars.iter().all(|v| v.is_finite())
            && indices.iter().flatten().all(|v| v.is_finite())
            && self.x_bar_data.iter().all(|p| p.value.is_finite())
            && self.range_data.iter().all(|p| p.value.is_finite())
    }
}

impl Default for SpcResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_result_is_zeroed() {
        let r = SpcResult::empty();
        assert!(r.is_empty());
        assert_eq!(r.sample_count, 0);
        assert!(r.cp.is_none() && r.cpk.is_none());
        assert!(r.x_bar_data.is_empty() && r.range_data.is_empty());
        assert!(r.is_finite());
    }

    #[test]
    fn limits_accessors_use_center_lines() {
        let mut r = SpcResult::empty();
        r.ucl = 12.0;
        r.lcl = 8.0;
        r.x_bar_mean = 10.0;
        r.ucl_r = 4.2;
        r.r_mean = 2.0;
        assert_eq!(
            r.x_bar_limits(),
            ControlLimits {
                ucl: 12.0,
                cl: 10.0,
                lcl: 8.0
            }
        );
        assert!((r.r_limits().cl - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn x_bar_point_converts_to_chart_point() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let p = XBarPoint {
            index: 3,
            value: 9.5,
            timestamp: ts,
        };
        assert_eq!(
            ChartPoint::from(&p),
            ChartPoint {
                index: 3,
                value: 9.5
            }
        );
    }

    #[test]
    fn is_finite_flags_nan() {
        let mut r = SpcResult::empty();
        r.mean = f64::NAN;
        assert!(!r.is_finite());

        let mut r = SpcResult::empty();
        r.cpk = Some(f64::INFINITY);
        assert!(!r.is_finite());
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let json = serde_json::to_value(SpcResult::empty()).unwrap();
        for key in [
            "sampleCount",
            "stdDev",
            "uclR",
            "lclR",
            "xBarData",
            "rangeData",
            "rawData",
            "xBarMean",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert!(json["cpk"].is_null());
    }
}
