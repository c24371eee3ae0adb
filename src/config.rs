//! Analysis settings (TOML).
//!
//! ```toml
//! [analysis]
//! subgroup_size = 5
//! factor_mode = "fixed"        # or "by_subgroup_size"
//! target = 10.0                # optional, used for Ca
//!
//! [rules]
//! rule1Enabled = true
//! rule4Enabled = false
//!
//! [cpk]
//! excellent = 1.67
//! good = 1.33
//! acceptable = 1.0
//! ```
//!
//! Every section and key is optional and falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capability::CpkThresholds;
use crate::error::{Result, SpcError};
use crate::spc::{
    FactorMode, RuleConfig, RuleViolationDetector, SpcCalculator, DEFAULT_SUBGROUP_SIZE,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpcSettings {
    pub analysis: AnalysisConfig,
    pub rules: RuleConfig,
    pub cpk: CpkThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub subgroup_size: usize,
    pub factor_mode: FactorMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            subgroup_size: DEFAULT_SUBGROUP_SIZE,
            factor_mode: FactorMode::Fixed,
            target: None,
        }
    }
}

impl SpcSettings {
    /// Parses and validates settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: SpcSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SpcError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded spc settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.subgroup_size == 0 {
            return Err(SpcError::InvalidSubgroupSize(0));
        }
        self.cpk.validate()
    }

    /// Calculator configured from the `[analysis]` section.
    pub fn calculator(&self) -> Result<SpcCalculator> {
        let mut calc = SpcCalculator::try_new(self.analysis.subgroup_size)?
            .with_factor_mode(self.analysis.factor_mode);
        if let Some(target) = self.analysis.target {
            calc = calc.with_target(target);
        }
        Ok(calc)
    }

    /// Rule detector configured from the `[rules]` section.
    pub fn detector(&self) -> RuleViolationDetector {
        RuleViolationDetector::new(self.rules)
    }
}
