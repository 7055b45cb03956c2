//! Fair odds conversion
//!
//! Probabilities are percentages (0-100); odds are decimal prices.
//!     fair_odds(p)           = round(100 / p, 2)
//!     implied_probability(o) = 100 / o

use crate::error::EngineError;
use crate::models::{OddsTriple, ProbabilityTriple};

/// Fair decimal price for a probability in percent
///
/// Returns `f64::INFINITY` when the probability is zero (no finite price).
///
/// # Examples
/// ```
/// use matchedge::core::odds::fair_odds;
/// assert_eq!(fair_odds(25.0), 4.0);
/// assert!(fair_odds(0.0).is_infinite());
/// ```
pub fn fair_odds(probability: f64) -> f64 {
    if probability > 0.0 {
        round2(100.0 / probability)
    } else {
        f64::INFINITY
    }
}

/// Fair price for consumers that cannot work with an infinite price
pub fn require_finite_odds(probability: f64) -> Result<f64, EngineError> {
    let odds = fair_odds(probability);
    if odds.is_finite() {
        Ok(odds)
    } else {
        Err(EngineError::NonFiniteProbability)
    }
}

/// Probability in percent implied by a decimal price
pub fn implied_probability(odds: f64) -> f64 {
    if odds > 0.0 {
        100.0 / odds
    } else {
        0.0
    }
}

impl From<&ProbabilityTriple> for OddsTriple {
    fn from(p: &ProbabilityTriple) -> Self {
        OddsTriple {
            home: fair_odds(p.home),
            draw: fair_odds(p.draw),
            away: fair_odds(p.away),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fair_odds_basic() {
        assert_eq!(fair_odds(25.0), 4.0);
        assert_eq!(fair_odds(50.0), 2.0);
        assert_eq!(fair_odds(100.0), 1.0);
        assert_eq!(fair_odds(30.0), 3.33);
    }

    #[test]
    fn test_fair_odds_zero_is_infinite() {
        assert_eq!(fair_odds(0.0), f64::INFINITY);
        assert_eq!(
            require_finite_odds(0.0).unwrap_err(),
            EngineError::NonFiniteProbability
        );
        assert_eq!(require_finite_odds(20.0).unwrap(), 5.0);
    }

    #[test]
    fn test_implied_probability() {
        assert!((implied_probability(1.80) - 55.5556).abs() < 0.0001);
        assert_eq!(implied_probability(4.0), 25.0);
        assert_eq!(implied_probability(0.0), 0.0);
    }

    #[test]
    fn test_round_trip() {
        let mut p = 0.5;
        while p <= 100.0 {
            let odds = fair_odds(p);
            let back = implied_probability(odds);
            // two-decimal rounding of the price bounds the relative error at 0.5%
            assert!((back - p).abs() <= p * 0.005 + 1e-9, "p={} back={}", p, back);
            assert_eq!(fair_odds(implied_probability(odds)), odds, "p={}", p);
            p += 0.5;
        }
    }

    #[test]
    fn test_odds_triple_from_probabilities() {
        let p = ProbabilityTriple {
            home: 90.0,
            draw: 0.0,
            away: 10.0,
        };
        let odds = OddsTriple::from(&p);
        assert_eq!(odds.home, 1.11);
        assert!(odds.draw.is_infinite());
        assert_eq!(odds.away, 10.0);
    }
}
