//! # u-spc
//!
//! Statistical process control (SPC) engine: X-bar/R control limits,
//! process capability indices, and Western Electric run-rule detection.
//!
//! The engine operates on in-memory measurement sequences and returns
//! in-memory results. It has no knowledge of storage, transport or report
//! formats.
//!
//! ## Modules
//!
//! - [`spc`] — X-bar/R calculation ([`spc::compute`]) and run rules ([`spc::detect`])
//! - [`capability`] — Capability indices (Cp, Cpk, Pp, Ppk, Ca) and status classification
//! - [`config`] — TOML analysis settings
//! - [`error`] — Boundary validation and settings errors
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use u_spc::capability::{evaluate_cpk_status, CpkThresholds};
//! use u_spc::spc::{compute, detect, RuleConfig, Sample};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
//! let samples: Vec<Sample> = (0..50)
//!     .map(|i| Sample::new(10.0 + ((i * 7) % 5) as f64 * 0.05, t0 + Duration::minutes(i)))
//!     .collect();
//!
//! let result = compute(&samples, Some(10.6), Some(9.8), 5);
//! let rules = detect(
//!     &result.x_bar_data,
//!     result.x_bar_mean,
//!     result.ucl,
//!     result.lcl,
//!     &RuleConfig::default(),
//! );
//! assert_eq!(rules.len(), 8);
//!
//! let status = evaluate_cpk_status(result.cpk, &CpkThresholds::default());
//! println!("Cpk {:?} -> {}", result.cpk, status.label);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Always a result**: degenerate input yields `None`/empty values, never errors
//! - **Pure**: no shared state; every call is independent and thread-safe
//! - **Research-backed**: factors from ASTM E2587, rules from the Western Electric handbook

pub mod capability;
pub mod config;
pub mod error;
pub mod spc;

pub use error::{Result, SpcError};
