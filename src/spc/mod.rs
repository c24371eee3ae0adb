//! Statistical Process Control (SPC) analysis.
//!
//! # X-bar/R calculation
//!
//! - [`SpcCalculator`] / [`compute`] — subgroup statistics, control limits
//!   and capability indices from a raw measurement sequence
//! - [`ChartFactors`] — A2/D3/D4/d2 constants (fixed n=5 or by subgroup size)
//!
//! # Run Rules
//!
//! - [`detect`] / [`RuleViolationDetector`] — the eight Western Electric rules
//!   over the subgroup-mean series
//! - [`detect_spec_breaches`] — subgroup means outside USL/LSL
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

mod calculator;
mod chart;
mod factors;
mod rules;

pub use calculator::{compute, validate_samples, SpcCalculator};
pub use chart::{ChartPoint, ControlLimits, Sample, SpcResult, Timestamp, XBarPoint};
pub use factors::{ChartFactors, FactorMode, DEFAULT_SUBGROUP_SIZE};
pub use rules::{
    detect, detect_spec_breaches, Rule, RuleConfig, RuleSeverity, RuleViolationDetector,
    RuleViolationResult, SpecBreach, SpecSide,
};
