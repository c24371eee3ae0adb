//! Classification of capability results into dashboard statuses.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};
use crate::spc::{RuleSeverity, RuleViolationResult, SpecBreach};

/// Cpk thresholds for [`evaluate_cpk_status`].
///
/// Each threshold is an inclusive lower bound of its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpkThresholds {
    pub excellent: f64,
    pub good: f64,
    pub acceptable: f64,
}

impl CpkThresholds {
    /// Builds thresholds from values stored ×100 (e.g. `167` for 1.67).
    pub fn from_percent(excellent: u32, good: u32, acceptable: u32) -> Self {
        Self {
            excellent: f64::from(excellent) / 100.0,
            good: f64::from(good) / 100.0,
            acceptable: f64::from(acceptable) / 100.0,
        }
    }

    /// Checks that the bands are ordered `excellent >= good >= acceptable`.
    pub fn validate(&self) -> Result<()> {
        let ordered = self.excellent >= self.good && self.good >= self.acceptable;
        if ordered && self.acceptable.is_finite() && self.excellent.is_finite() {
            Ok(())
        } else {
            Err(SpcError::InvalidThresholds {
                excellent: self.excellent,
                good: self.good,
                acceptable: self.acceptable,
            })
        }
    }
}

impl Default for CpkThresholds {
    fn default() -> Self {
        Self {
            excellent: 1.67,
            good: 1.33,
            acceptable: 1.00,
        }
    }
}

/// Capability band of a single Cpk value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpkStatus {
    /// No Cpk could be computed.
    Unknown,
    Poor,
    Acceptable,
    Good,
    Excellent,
}

impl CpkStatus {
    /// Color tag used by charts and badges.
    pub fn color(self) -> &'static str {
        match self {
            CpkStatus::Unknown => "gray",
            CpkStatus::Poor => "red",
            CpkStatus::Acceptable => "yellow",
            CpkStatus::Good => "blue",
            CpkStatus::Excellent => "green",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CpkStatus::Unknown => "N/A",
            CpkStatus::Poor => "Poor",
            CpkStatus::Acceptable => "Acceptable",
            CpkStatus::Good => "Good",
            CpkStatus::Excellent => "Excellent",
        }
    }
}

/// Output of [`evaluate_cpk_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpkEvaluation {
    pub status: CpkStatus,
    pub color: &'static str,
    pub label: &'static str,
}

/// Maps a Cpk value to its capability band.
///
/// `None` and NaN always map to [`CpkStatus::Unknown`], never to `Poor`.
///
/// # Examples
///
/// ```
/// use u_spc::capability::{evaluate_cpk_status, CpkStatus, CpkThresholds};
///
/// let t = CpkThresholds::default();
/// assert_eq!(evaluate_cpk_status(Some(1.5), &t).status, CpkStatus::Good);
/// assert_eq!(evaluate_cpk_status(None, &t).status, CpkStatus::Unknown);
/// ```
pub fn evaluate_cpk_status(cpk: Option<f64>, thresholds: &CpkThresholds) -> CpkEvaluation {
    let status = match cpk {
        None => CpkStatus::Unknown,
        Some(v) if v.is_nan() => CpkStatus::Unknown,
        Some(v) if v >= thresholds.excellent => CpkStatus::Excellent,
        Some(v) if v >= thresholds.good => CpkStatus::Good,
        Some(v) if v >= thresholds.acceptable => CpkStatus::Acceptable,
        Some(_) => CpkStatus::Poor,
    };
    CpkEvaluation {
        status,
        color: status.color(),
        label: status.label(),
    }
}

/// Overall health of an analyzed process, combining Cpk and rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Critical,
    NeedsImprovement,
    Acceptable,
    Good,
    Excellent,
}

impl ProcessStatus {
    /// Status band of a Cpk value alone. Missing or NaN Cpk counts as `Good`.
    pub fn from_cpk(cpk: Option<f64>) -> Self {
        match cpk {
            None => ProcessStatus::Good,
            Some(v) if v.is_nan() => ProcessStatus::Good,
            Some(v) if v >= 1.67 => ProcessStatus::Excellent,
            Some(v) if v >= 1.33 => ProcessStatus::Good,
            Some(v) if v >= 1.0 => ProcessStatus::Acceptable,
            Some(v) if v >= 0.67 => ProcessStatus::NeedsImprovement,
            Some(_) => ProcessStatus::Critical,
        }
    }

    fn downgrade(self) -> Self {
        match self {
            ProcessStatus::Excellent => ProcessStatus::Good,
            ProcessStatus::Good => ProcessStatus::Acceptable,
            _ => ProcessStatus::NeedsImprovement,
        }
    }
}

/// Combines the Cpk band with the outcome of rule detection.
///
/// A violated critical rule forces `Critical`; any other violation lowers
/// the Cpk band by one step, bottoming out at `NeedsImprovement`.
pub fn overall_status(cpk: Option<f64>, violations: &[RuleViolationResult]) -> ProcessStatus {
    overall_status_with_breaches(cpk, violations, &[])
}

/// [`overall_status`] that also accounts for subgroup means outside the
/// specification limits. Any breach forces `Critical`.
pub fn overall_status_with_breaches(
    cpk: Option<f64>,
    violations: &[RuleViolationResult],
    breaches: &[SpecBreach],
) -> ProcessStatus {
    let base = ProcessStatus::from_cpk(cpk);
    if breaches.iter().any(|b| b.severity() == RuleSeverity::Critical) {
        return ProcessStatus::Critical;
    }

    let mut violated = violations.iter().filter(|v| v.violated).peekable();
    if violated.peek().is_none() {
        return base;
    }
    if violated.any(|v| v.severity() == RuleSeverity::Critical) || base == ProcessStatus::Critical {
        return ProcessStatus::Critical;
    }
    base.downgrade()
}
