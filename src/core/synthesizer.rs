//! Probability synthesis
//!
//! Folds signed contributions into home/draw/away percentages starting from a
//! neutral baseline of 50. Three aggregation policies are supported:
//!
//! - Additive-Clamp:   home = clamp(50 + Σv, floor, ceiling), fixed draw allowance
//! - Ratio-Normalize:  home/away pools of 50 + balance, normalized to 100
//! - Confidence-Score: home = clamp(Σ favourable weight / Σ weight × 100, floor, ceiling)
//!
//! Whatever the policy, a negative draw is floored at 0 and the away share
//! becomes 100 - home, so the triple always sums to 100.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Contribution, ProbabilityTriple};

/// Neutral pre-checklist prior
pub const BASELINE: f64 = 50.0;

const DEFAULT_FLOOR: f64 = 10.0;
const DEFAULT_CEILING: f64 = 90.0;
const DEFAULT_CONFIDENCE_CEILING: f64 = 70.0;
const DEFAULT_DRAW_ALLOWANCE: f64 = 20.0;
const DEFAULT_PRECISION: u32 = 1;
/// Finer rounding is meaningless for percentages and overflows `powi`
const MAX_PRECISION: u32 = 10;

/// How contributions are aggregated into probabilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationPolicy {
    AdditiveClamp {
        #[serde(default = "default_floor")]
        floor: f64,
        #[serde(default = "default_ceiling")]
        ceiling: f64,
        #[serde(default = "default_draw_allowance")]
        draw_allowance: f64,
    },
    RatioNormalize {
        /// Decimal places kept on the normalized home/away shares, at most 10
        #[serde(default = "default_precision")]
        precision: u32,
    },
    ConfidenceScore {
        #[serde(default = "default_floor")]
        floor: f64,
        #[serde(default = "default_confidence_ceiling")]
        ceiling: f64,
        #[serde(default = "default_draw_allowance")]
        draw_allowance: f64,
    },
}

fn default_floor() -> f64 {
    DEFAULT_FLOOR
}

fn default_ceiling() -> f64 {
    DEFAULT_CEILING
}

fn default_confidence_ceiling() -> f64 {
    DEFAULT_CONFIDENCE_CEILING
}

fn default_draw_allowance() -> f64 {
    DEFAULT_DRAW_ALLOWANCE
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

impl AggregationPolicy {
    /// Additive-Clamp with the 10-90 range and a 20 point draw allowance
    pub fn additive_clamp() -> Self {
        AggregationPolicy::AdditiveClamp {
            floor: DEFAULT_FLOOR,
            ceiling: DEFAULT_CEILING,
            draw_allowance: DEFAULT_DRAW_ALLOWANCE,
        }
    }

    /// Ratio-Normalize rounded to one decimal
    pub fn ratio_normalize() -> Self {
        AggregationPolicy::RatioNormalize {
            precision: DEFAULT_PRECISION,
        }
    }

    /// Confidence-Score with the 10-70 range and a 20 point draw allowance
    pub fn confidence_score() -> Self {
        AggregationPolicy::ConfidenceScore {
            floor: DEFAULT_FLOOR,
            ceiling: DEFAULT_CONFIDENCE_CEILING,
            draw_allowance: DEFAULT_DRAW_ALLOWANCE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregationPolicy::AdditiveClamp { .. } => "additive-clamp",
            AggregationPolicy::RatioNormalize { .. } => "ratio-normalize",
            AggregationPolicy::ConfidenceScore { .. } => "confidence-score",
        }
    }
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self::additive_clamp()
    }
}

/// Synthesized probabilities plus the per-side balances behind them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub probabilities: ProbabilityTriple,
    /// Total weight favouring the home side
    pub home_balance: f64,
    /// Total weight favouring the away side
    pub away_balance: f64,
}

/// Synthesize probabilities from contributions
///
/// Confidence-Score uses the answered weights as its denominator; use
/// [`synthesize_with_total`] to score against the whole checklist.
///
/// # Examples
/// ```
/// use matchedge::core::synthesizer::{synthesize, AggregationPolicy};
/// use matchedge::models::Contribution;
///
/// let contributions = vec![Contribution { factor: "Form".into(), weight: 5.0, value: 5.0 }];
/// let result = synthesize(&AggregationPolicy::additive_clamp(), &contributions);
/// assert_eq!(result.probabilities.home, 55.0);
/// ```
pub fn synthesize(policy: &AggregationPolicy, contributions: &[Contribution]) -> Synthesis {
    let total_weight: f64 = contributions.iter().map(|c| c.weight).sum();
    synthesize_with_total(policy, contributions, total_weight)
}

/// Synthesize probabilities, scoring confidence against `total_weight`
pub fn synthesize_with_total(
    policy: &AggregationPolicy,
    contributions: &[Contribution],
    total_weight: f64,
) -> Synthesis {
    let (home_balance, away_balance) = balances(contributions);

    let probabilities = match *policy {
        AggregationPolicy::AdditiveClamp {
            floor,
            ceiling,
            draw_allowance,
        } => {
            let net: f64 = contributions.iter().map(|c| c.value).sum();
            let home = clamp(BASELINE + net, floor, ceiling);
            finalize(home, 100.0 - home - draw_allowance)
        }
        AggregationPolicy::RatioNormalize { precision } => {
            let p_home = (BASELINE + home_balance).max(0.0);
            let p_away = (BASELINE + away_balance).max(0.0);
            let total = p_home + p_away;

            if total > 0.0 {
                let home = round_to(p_home / total * 100.0, precision);
                let away = round_to(p_away / total * 100.0, precision);
                finalize(home, round_to(100.0 - home - away, precision))
            } else {
                ProbabilityTriple::NEUTRAL
            }
        }
        AggregationPolicy::ConfidenceScore {
            floor,
            ceiling,
            draw_allowance,
        } => {
            let confidence = if total_weight > 0.0 {
                home_balance / total_weight * 100.0
            } else {
                BASELINE
            };
            let home = clamp(confidence, floor, ceiling);
            finalize(home, 100.0 - home - draw_allowance)
        }
    };

    debug!(
        policy = policy.name(),
        home = probabilities.home,
        draw = probabilities.draw,
        away = probabilities.away,
        "synthesized probabilities"
    );

    Synthesis {
        probabilities,
        home_balance,
        away_balance,
    }
}

/// Sum of weight leaning home and leaning away
pub fn balances(contributions: &[Contribution]) -> (f64, f64) {
    contributions
        .iter()
        .fold((0.0, 0.0), |(home, away), c| {
            if c.value > 0.0 {
                (home + c.value, away)
            } else {
                (home, away - c.value)
            }
        })
}

/// Apply the shared range rules and derive away as the remainder
fn finalize(home: f64, draw: f64) -> ProbabilityTriple {
    let home = home.clamp(0.0, 100.0);
    let max_draw = 100.0 - home;

    let draw = if draw < 0.0 {
        warn!(home, draw, "negative draw share floored at 0");
        0.0
    } else if draw > max_draw {
        max_draw
    } else {
        draw
    };

    ProbabilityTriple {
        home,
        draw,
        away: 100.0 - home - draw,
    }
}

/// Clamp without panicking on a misconfigured (floor > ceiling) range
fn clamp(value: f64, floor: f64, ceiling: f64) -> f64 {
    value.max(floor).min(ceiling)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_PRECISION) as i32);
    (value * factor).round() / factor
}
