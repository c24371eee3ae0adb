//! Process capability analysis.
//!
//! # Indices
//!
//! - **Cp**, **Cpk**, **Cpu**, **Cpl** — short-term capability (R̄/d2 sigma)
//! - **Pp**, **Ppk** — long-term performance (overall sigma)
//! - **Ca** — centering relative to the half tolerance
//!
//! # Status
//!
//! - [`evaluate_cpk_status`] — Cpk band with color and label
//! - [`overall_status`] — Cpk band adjusted by run-rule violations
//! - [`overall_status_with_breaches`] — same, with specification-limit breaches forcing critical
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.

mod indices;
mod status;

pub use indices::{calculate_ca, CapabilityIndices, SpecLimits};
pub use status::{
    evaluate_cpk_status, overall_status, overall_status_with_breaches, CpkEvaluation, CpkStatus,
    CpkThresholds, ProcessStatus,
};
