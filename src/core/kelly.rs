//! Kelly Criterion Bet Sizing
//!
//! Expected value and optimal stake fraction against a market price.
//!
//! The Kelly criterion formula:
//!     f* = (p*(b+1) - 1) / b = p - (1-p)/b
//!
//! Where:
//!     f* = fraction of bankroll to bet, clamped to [0, 1]
//!     b  = odds - 1 (net odds)
//!     p  = probability of winning (0-1)
//!     odds = decimal odds (e.g., 2.0 doubles the stake)

use serde::{Deserialize, Serialize};

use crate::error::{validate_bankroll, validate_probability, validate_staking, EngineError};
use crate::models::Outcome;

/// How the expected value reads for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSignal {
    Positive,
    Neutral,
    Negative,
}

impl ValueSignal {
    pub fn from_ev(ev: f64) -> Self {
        if ev > 0.0 {
            ValueSignal::Positive
        } else if ev < 0.0 {
            ValueSignal::Negative
        } else {
            ValueSignal::Neutral
        }
    }
}

/// Stake recommendation for one outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeRecommendation {
    pub outcome: Outcome,
    pub probability: f64,           // 0-1
    pub odds: f64,                  // market decimal odds
    pub expected_value: f64,        // p*odds - 1
    pub kelly_fraction: f64,        // full Kelly, clamped to [0, 1]
    pub recommended_fraction: f64,  // after multiplier, caps and exposure scaling
    pub stake: f64,
    pub signal: ValueSignal,
}

/// Expected net return per unit staked
///
/// # Examples
/// ```
/// use matchedge::core::kelly::calculate_expected_value;
/// let ev = calculate_expected_value(0.55, 2.0);
/// assert!((ev - 0.10).abs() < 1e-9);
/// ```
pub fn calculate_expected_value(probability: f64, odds: f64) -> f64 {
    probability * odds - 1.0
}

/// Calculate the Kelly fraction for a single bet
///
/// # Arguments
/// * `probability` - Estimated probability of winning (0-1)
/// * `odds` - Decimal odds
///
/// # Returns
/// Kelly fraction in [0, 1]; zero whenever the bet has no edge.
/// Fails with `DegenerateOdds` when the odds are not finite or the net odds
/// are not positive.
///
/// # Examples
/// ```
/// use matchedge::core::kelly::calculate_kelly_fraction;
/// let kelly = calculate_kelly_fraction(0.55, 2.0).unwrap();
/// assert!((kelly - 0.10).abs() < 1e-9);
/// ```
pub fn calculate_kelly_fraction(probability: f64, odds: f64) -> Result<f64, EngineError> {
    validate_probability(probability)?;

    let b = odds - 1.0;
    if !odds.is_finite() || b <= 0.0 {
        return Err(EngineError::DegenerateOdds(odds));
    }

    let raw = calculate_expected_value(probability, odds) / b;
    Ok(raw.clamp(0.0, 1.0))
}

/// Staking limits applied on top of full Kelly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingConfig {
    /// Fraction of Kelly to use (1.0 = full Kelly, 0.25 = quarter Kelly)
    pub kelly_multiplier: f64,
    /// Maximum single stake as a fraction of bankroll
    pub max_stake_pct: f64,
    /// Maximum total stake across the three outcomes
    pub max_total_exposure: f64,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            kelly_multiplier: 1.0,
            max_stake_pct: 1.0,
            max_total_exposure: 1.0,
        }
    }
}

/// Kelly criterion calculator for bet sizing
///
/// Supports:
/// - Full Kelly (default) and fractional Kelly
/// - Per-bet and total exposure caps across one match's outcomes
#[derive(Debug, Clone)]
pub struct KellyCalculator {
    pub bankroll: f64,
    pub config: StakingConfig,
}

impl KellyCalculator {
    /// Create a new Kelly calculator
    pub fn new(bankroll: f64, config: StakingConfig) -> Result<Self, EngineError> {
        validate_bankroll(bankroll)?;
        validate_staking(&config)?;
        Ok(Self { bankroll, config })
    }

    /// Full Kelly with no caps
    pub fn with_defaults(bankroll: f64) -> Result<Self, EngineError> {
        Self::new(bankroll, StakingConfig::default())
    }

    /// Calculate bet sizing for a single outcome
    pub fn calculate_single(
        &self,
        outcome: Outcome,
        probability: f64,
        odds: f64,
    ) -> Result<StakeRecommendation, EngineError> {
        let kelly = calculate_kelly_fraction(probability, odds)?;
        let ev = calculate_expected_value(probability, odds);

        // No edge, no stake
        let recommended = if kelly <= 0.0 {
            0.0
        } else {
            (kelly * self.config.kelly_multiplier)
                .min(self.config.max_stake_pct)
                .clamp(0.0, 1.0)
        };

        Ok(StakeRecommendation {
            outcome,
            probability,
            odds,
            expected_value: ev,
            kelly_fraction: kelly,
            recommended_fraction: recommended,
            stake: self.bankroll * recommended,
            signal: ValueSignal::from_ev(ev),
        })
    }

    /// Calculate bet sizing for several outcomes of the same match
    ///
    /// Outcomes are mutually exclusive, so when the requested stakes exceed
    /// the total exposure limit they are scaled down proportionally.
    pub fn calculate_multiple(
        &self,
        bets: &[(Outcome, f64, f64)],
    ) -> Result<Vec<StakeRecommendation>, EngineError> {
        let mut sizings = bets
            .iter()
            .map(|&(outcome, p, o)| self.calculate_single(outcome, p, o))
            .collect::<Result<Vec<_>, _>>()?;

        let total_fraction: f64 = sizings.iter().map(|s| s.recommended_fraction).sum();
        let max_exposure = self.config.max_total_exposure.clamp(0.0, 1.0);

        if total_fraction > max_exposure {
            let scale_factor = max_exposure / total_fraction;
            for sizing in &mut sizings {
                sizing.recommended_fraction *= scale_factor;
                sizing.stake = self.bankroll * sizing.recommended_fraction;
            }
        }

        Ok(sizings)
    }
}
