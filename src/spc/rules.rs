//! Western Electric run rules for the X-bar chart.
//!
//! Detects non-random patterns in the subgroup-mean series that indicate
//! special causes of variation even when individual points remain within
//! control limits. All eight rules are evaluated left to right with a
//! sliding window; a hit is reported at the last point of the qualifying
//! window.
//!
//! # References
//!
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - Nelson, L.S. (1984). "The Shewhart Control Chart — Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::chart::{ChartPoint, SpcResult};

/// The eight run rules, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Rule 1: one point beyond the 3-sigma control limits.
    BeyondLimits,
    /// Rule 2: 9 points in a row on the same side of the center line.
    NineOneSide,
    /// Rule 3: 6 points in a row steadily increasing or decreasing.
    SixTrend,
    /// Rule 4: 14 points in a row alternating up and down.
    FourteenAlternating,
    /// Rule 5: 2 out of 3 points beyond 2 sigma.
    TwoOfThreeBeyond2Sigma,
    /// Rule 6: 4 out of 5 points beyond 1 sigma.
    FourOfFiveBeyond1Sigma,
    /// Rule 7: 15 points in a row within 1 sigma (stratification).
    FifteenWithin1Sigma,
    /// Rule 8: 8 points in a row beyond 1 sigma on either side (mixture).
    EightBeyond1Sigma,
}

/// How urgent a violated rule is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    Warning,
    Critical,
}

impl Rule {
    pub const ALL: [Rule; 8] = [
        Rule::BeyondLimits,
        Rule::NineOneSide,
        Rule::SixTrend,
        Rule::FourteenAlternating,
        Rule::TwoOfThreeBeyond2Sigma,
        Rule::FourOfFiveBeyond1Sigma,
        Rule::FifteenWithin1Sigma,
        Rule::EightBeyond1Sigma,
    ];

    /// Rule number, 1..=8.
    pub fn number(self) -> u8 {
        match self {
            Rule::BeyondLimits => 1,
            Rule::NineOneSide => 2,
            Rule::SixTrend => 3,
            Rule::FourteenAlternating => 4,
            Rule::TwoOfThreeBeyond2Sigma => 5,
            Rule::FourOfFiveBeyond1Sigma => 6,
            Rule::FifteenWithin1Sigma => 7,
            Rule::EightBeyond1Sigma => 8,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Rule::ALL.into_iter().find(|r| r.number() == number)
    }

    /// Short human label.
    pub fn name(self) -> &'static str {
        match self {
            Rule::BeyondLimits => "Beyond 3σ",
            Rule::NineOneSide => "9 Same Side",
            Rule::SixTrend => "6 Trending",
            Rule::FourteenAlternating => "14 Alternating",
            Rule::TwoOfThreeBeyond2Sigma => "2 of 3 Beyond 2σ",
            Rule::FourOfFiveBeyond1Sigma => "4 of 5 Beyond 1σ",
            Rule::FifteenWithin1Sigma => "15 Within 1σ",
            Rule::EightBeyond1Sigma => "8 Beyond 1σ",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::BeyondLimits => "One or more points beyond 3σ control limits",
            Rule::NineOneSide => "9 points in a row on same side of center line",
            Rule::SixTrend => "6 points in a row trending up or down",
            Rule::FourteenAlternating => "14 points alternating up and down",
            Rule::TwoOfThreeBeyond2Sigma => "2 of 3 consecutive points beyond 2σ",
            Rule::FourOfFiveBeyond1Sigma => "4 of 5 consecutive points beyond 1σ",
            Rule::FifteenWithin1Sigma => "15 points in a row within 1σ (stratification)",
            Rule::EightBeyond1Sigma => "8 points in a row beyond 1σ on both sides",
        }
    }

    /// Number of consecutive points the rule looks at.
    pub fn window_len(self) -> usize {
        match self {
            Rule::BeyondLimits => 1,
            Rule::NineOneSide => 9,
            Rule::SixTrend => 6,
            Rule::FourteenAlternating => 14,
            Rule::TwoOfThreeBeyond2Sigma => 3,
            Rule::FourOfFiveBeyond1Sigma => 5,
            Rule::FifteenWithin1Sigma => 15,
            Rule::EightBeyond1Sigma => 8,
        }
    }

    /// A point beyond the control limits is critical; patterns are warnings.
    pub fn severity(self) -> RuleSeverity {
        match self {
            Rule::BeyondLimits => RuleSeverity::Critical,
            _ => RuleSeverity::Warning,
        }
    }

    fn check(self, points: &[ChartPoint], zones: &Zones) -> Vec<usize> {
        match self {
            Rule::BeyondLimits => check_rule1(points, zones),
            Rule::NineOneSide => check_rule2(points, zones),
            Rule::SixTrend => check_rule3(points),
            Rule::FourteenAlternating => check_rule4(points),
            Rule::TwoOfThreeBeyond2Sigma => check_rule5(points, zones),
            Rule::FourOfFiveBeyond1Sigma => check_rule6(points, zones),
            Rule::FifteenWithin1Sigma => check_rule7(points, zones),
            Rule::EightBeyond1Sigma => check_rule8(points, zones),
        }
    }
}

/// Per-rule enable flags. Every rule is enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleConfig {
    pub rule1_enabled: bool,
    pub rule2_enabled: bool,
    pub rule3_enabled: bool,
    pub rule4_enabled: bool,
    pub rule5_enabled: bool,
    pub rule6_enabled: bool,
    pub rule7_enabled: bool,
    pub rule8_enabled: bool,
}

impl RuleConfig {
    /// A configuration with every rule disabled.
    pub fn none() -> Self {
        Self {
            rule1_enabled: false,
            rule2_enabled: false,
            rule3_enabled: false,
            rule4_enabled: false,
            rule5_enabled: false,
            rule6_enabled: false,
            rule7_enabled: false,
            rule8_enabled: false,
        }
    }

    /// Builds a configuration enabling only the listed rules.
    pub fn only(rules: &[Rule]) -> Self {
        let mut config = Self::none();
        for &rule in rules {
            config.set_enabled(rule, true);
        }
        config
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        match rule {
            Rule::BeyondLimits => self.rule1_enabled,
            Rule::NineOneSide => self.rule2_enabled,
            Rule::SixTrend => self.rule3_enabled,
            Rule::FourteenAlternating => self.rule4_enabled,
            Rule::TwoOfThreeBeyond2Sigma => self.rule5_enabled,
            Rule::FourOfFiveBeyond1Sigma => self.rule6_enabled,
            Rule::FifteenWithin1Sigma => self.rule7_enabled,
            Rule::EightBeyond1Sigma => self.rule8_enabled,
        }
    }

    pub fn set_enabled(&mut self, rule: Rule, enabled: bool) {
        let flag = match rule {
            Rule::BeyondLimits => &mut self.rule1_enabled,
            Rule::NineOneSide => &mut self.rule2_enabled,
            Rule::SixTrend => &mut self.rule3_enabled,
            Rule::FourteenAlternating => &mut self.rule4_enabled,
            Rule::TwoOfThreeBeyond2Sigma => &mut self.rule5_enabled,
            Rule::FourOfFiveBeyond1Sigma => &mut self.rule6_enabled,
            Rule::FifteenWithin1Sigma => &mut self.rule7_enabled,
            Rule::EightBeyond1Sigma => &mut self.rule8_enabled,
        };
        *flag = enabled;
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            rule1_enabled: true,
            rule2_enabled: true,
            rule3_enabled: true,
            rule4_enabled: true,
            rule5_enabled: true,
            rule6_enabled: true,
            rule7_enabled: true,
            rule8_enabled: true,
        }
    }
}

/// Outcome of one rule.
///
/// Disabled rules are still reported, with `violated == false` and no points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolationResult {
    pub rule_number: u8,
    pub rule_name: String,
    pub violated: bool,
    /// Series indices of the last point of each qualifying window.
    pub violation_points: Vec<usize>,
    pub description: String,
}

impl RuleViolationResult {
    fn new(rule: Rule, violation_points: Vec<usize>) -> Self {
        Self {
            rule_number: rule.number(),
            rule_name: rule.name().to_string(),
            violated: !violation_points.is_empty(),
            violation_points,
            description: rule.description().to_string(),
        }
    }

    pub fn rule(&self) -> Option<Rule> {
        Rule::from_number(self.rule_number)
    }

    /// Severity of the rule; unknown rule numbers count as warnings.
    pub fn severity(&self) -> RuleSeverity {
        self.rule().map_or(RuleSeverity::Warning, Rule::severity)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Zone boundaries derived from the X-bar limits.
///
/// `sigma = (UCL - CL) / 3`.
#[derive(Debug, Clone, Copy)]
struct Zones {
    cl: f64,
    ucl: f64,
    lcl: f64,
    sigma1_upper: f64,
    sigma1_lower: f64,
    sigma2_upper: f64,
    sigma2_lower: f64,
}

impl Zones {
    fn new(mean: f64, ucl: f64, lcl: f64) -> Self {
        let sigma = (ucl - mean) / 3.0;
        Self {
            cl: mean,
            ucl,
            lcl,
            sigma1_upper: mean + sigma,
            sigma1_lower: mean - sigma,
            sigma2_upper: mean + 2.0 * sigma,
            sigma2_lower: mean - 2.0 * sigma,
        }
    }

    fn beyond_sigma1(&self, v: f64) -> bool {
        v > self.sigma1_upper || v < self.sigma1_lower
    }

    fn beyond_sigma2(&self, v: f64) -> bool {
        v > self.sigma2_upper || v < self.sigma2_lower
    }
}

/// Indices of the last point of every `len`-point window matching `pred`.
///
/// Series shorter than `len` yield nothing.
fn scan_windows<F>(points: &[ChartPoint], len: usize, pred: F) -> Vec<usize>
where
    F: Fn(&[ChartPoint]) -> bool,
{
    if len == 0 || points.len() < len {
        return Vec::new();
    }
    points
        .windows(len)
        .filter(|w| pred(w))
        .map(|w| w[len - 1].index)
        .collect()
}

/// Rule 1: point beyond the control limits.
fn check_rule1(points: &[ChartPoint], zones: &Zones) -> Vec<usize> {
    scan_windows(points, 1, |w| w[0].value > zones.ucl || w[0].value < zones.lcl)
}

/// Rule 2: 9 consecutive points strictly on one side of the center line.
///
/// A point exactly on the center line breaks the run.
fn check_rule2(points: &[ChartPoint], zones: &Zones) -> Vec<usize> {
    scan_windows(points, 9, |w| {
        w.iter().all(|p| p.value > zones.cl) || w.iter().all(|p| p.value < zones.cl)
    })
}

/// Rule 3: 6 consecutive points strictly increasing or strictly decreasing.
fn check_rule3(points: &[ChartPoint]) -> Vec<usize> {
    scan_windows(points, 6, |w| {
        let increasing = w.windows(2).all(|p| p[1].value > p[0].value);
        let decreasing = w.windows(2).all(|p| p[1].value < p[0].value);
        increasing || decreasing
    })
}

/// Rule 4: 14 consecutive points where every interior point is a strict
/// local maximum or minimum. Ties break the pattern.
fn check_rule4(points: &[ChartPoint]) -> Vec<usize> {
    scan_windows(points, 14, |w| {
        w.windows(3).all(|t| {
            let (prev, curr, next) = (t[0].value, t[1].value, t[2].value);
            (curr > prev && curr > next) || (curr < prev && curr < next)
        })
    })
}

/// Rule 5: at least 2 of 3 consecutive points beyond 2 sigma, either side.
fn check_rule5(points: &[ChartPoint], zones: &Zones) -> Vec<usize> {
    scan_windows(points, 3, |w| {
        w.iter().filter(|p| zones.beyond_sigma2(p.value)).count() >= 2
    })
}

/// Rule 6: at least 4 of 5 consecutive points beyond 1 sigma, either side.
fn check_rule6(points: &[ChartPoint], zones: &Zones) -> Vec<usize> {
    scan_windows(points, 5, |w| {
        w.iter().filter(|p| zones.beyond_sigma1(p.value)).count() >= 4
    })
}

/// Rule 7: 15 consecutive points within CL ± 1 sigma, bounds inclusive.
fn check_rule7(points: &[ChartPoint], zones: &Zones) -> Vec<usize> {
    scan_windows(points, 15, |w| {
        w.iter()
            .all(|p| p.value >= zones.sigma1_lower && p.value <= zones.sigma1_upper)
    })
}

/// Rule 8: 8 consecutive points beyond 1 sigma, on either side.
fn check_rule8(points: &[ChartPoint], zones: &Zones) -> Vec<usize> {
    scan_windows(points, 8, |w| w.iter().all(|p| zones.beyond_sigma1(p.value)))
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Runs the eight run rules over a subgroup-mean series.
///
/// Always returns one record per rule, in rule order. `mean` is the center
/// line; `sigma` is derived as `(ucl - mean) / 3`. The series can be a
/// slice of [`ChartPoint`]s or the `x_bar_data` of an [`SpcResult`].
///
/// # Examples
///
/// ```
/// use u_spc::spc::{detect, ChartPoint, RuleConfig};
///
/// let series: Vec<ChartPoint> = [10.0, 10.2, 15.0, 9.9]
///     .iter()
///     .enumerate()
///     .map(|(i, &value)| ChartPoint { index: i + 1, value })
///     .collect();
///
/// let results = detect(&series, 10.0, 12.0, 8.0, &RuleConfig::default());
/// assert_eq!(results.len(), 8);
/// assert!(results[0].violated);
/// assert_eq!(results[0].violation_points, vec![3]);
/// ```
pub fn detect<I>(
    series: I,
    mean: f64,
    ucl: f64,
    lcl: f64,
    config: &RuleConfig,
) -> [RuleViolationResult; 8]
where
    I: IntoIterator,
    I::Item: Into<ChartPoint>,
{
    let series: Vec<ChartPoint> = series.into_iter().map(Into::into).collect();
    let zones = Zones::new(mean, ucl, lcl);

    let results = Rule::ALL.map(|rule| {
        let points = if config.is_enabled(rule) {
            rule.check(&series, &zones)
        } else {
            Vec::new()
        };
        if !points.is_empty() {
            trace!(rule = rule.number(), hits = points.len(), "run rule violated");
        }
        RuleViolationResult::new(rule, points)
    });

    debug!(
        points = series.len(),
        violated = results.iter().filter(|r| r.violated).count(),
        "run rules evaluated"
    );
    results
}

/// Rule detector bound to a fixed [`RuleConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleViolationDetector {
    config: RuleConfig,
}

impl RuleViolationDetector {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// See [`detect`].
    pub fn detect<I>(&self, series: I, mean: f64, ucl: f64, lcl: f64) -> [RuleViolationResult; 8]
    where
        I: IntoIterator,
        I::Item: Into<ChartPoint>,
    {
        detect(series, mean, ucl, lcl, &self.config)
    }

    /// Runs the rules on a calculation result's own X-bar series, using its
    /// grand mean as center line and its X-bar control limits.
    pub fn detect_result(&self, result: &SpcResult) -> [RuleViolationResult; 8] {
        let limits = result.x_bar_limits();
        self.detect(&result.x_bar_data, limits.cl, limits.ucl, limits.lcl)
    }
}

/// Which specification limit a point crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecSide {
    AboveUsl,
    BelowLsl,
}

/// A subgroup mean outside the specification limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecBreach {
    pub index: usize,
    pub value: f64,
    pub side: SpecSide,
    /// The limit that was crossed.
    pub limit: f64,
}

impl SpecBreach {
    /// Breaches of specification limits are always critical.
    pub fn severity(&self) -> RuleSeverity {
        RuleSeverity::Critical
    }
}

/// Flags every point strictly above USL or strictly below LSL.
pub fn detect_spec_breaches(
    series: &[ChartPoint],
    usl: Option<f64>,
    lsl: Option<f64>,
) -> Vec<SpecBreach> {
    let mut breaches = Vec::new();
    for point in series {
        if let Some(u) = usl {
            if point.value > u {
                breaches.push(SpecBreach {
                    index: point.index,
                    value: point.value,
                    side: SpecSide::AboveUsl,
                    limit: u,
                });
            }
        }
        if let Some(l) = lsl {
            if point.value < l {
                breaches.push(SpecBreach {
                    index: point.index,
                    value: point.value,
                    side: SpecSide::BelowLsl,
                    limit: l,
                });
            }
        }
    }
    breaches
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn to_points(values: &[f64]) -> Vec<ChartPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| ChartPoint { index: i + 1, value })
            .collect()
    }

    proptest! {
        #[test]
        fn detect_is_deterministic(
            values in proptest::collection::vec(-10.0_f64..10.0, 0..=40),
        ) {
            let points = to_points(&values);
            let config = RuleConfig::default();
            let first = detect(&points, 0.0, 3.0, -3.0, &config);
            let second = detect(&points, 0.0, 3.0, -3.0, &config);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn violations_never_precede_a_full_window(
            values in proptest::collection::vec(-10.0_f64..10.0, 0..=40),
        ) {
            let points = to_points(&values);
            let results = detect(&points, 0.0, 3.0, -3.0, &RuleConfig::default());
            for (rule, result) in Rule::ALL.iter().zip(results.iter()) {
                prop_assert_eq!(result.violated, !result.violation_points.is_empty());
                for &idx in &result.violation_points {
                    prop_assert!(idx >= rule.window_len() && idx <= values.len(),
                        "rule {} hit at {}", rule.number(), idx);
                }
            }
        }

        #[test]
        fn all_disabled_reports_nothing(
            values in proptest::collection::vec(-10.0_f64..10.0, 0..=40),
        ) {
            let results = detect(&to_points(&values), 0.0, 3.0, -3.0, &RuleConfig::none());
            prop_assert!(results.iter().all(|r| !r.violated && r.violation_points.is_empty()));
        }

        #[test]
        fn rule1_matches_points_outside_limits(
            values in proptest::collection::vec(-10.0_f64..10.0, 0..=40),
        ) {
            let results = detect(&to_points(&values), 0.0, 3.0, -3.0, &RuleConfig::default());
            let outside = values.iter().any(|v| *v > 3.0 || *v < -3.0);
            prop_assert_eq!(results[0].violated, outside);
        }
    }
}
