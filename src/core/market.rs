//! Market comparison
//!
//! Removes the bookmaker margin from a quote and measures how far each market
//! price sits from the model's fair price.

use serde::{Deserialize, Serialize};

use super::odds::implied_probability;
use crate::models::{finite_or_null, MarketQuote, OddsTriple, Outcome, ProbabilityTriple};

/// Handicap risk is the home risk scaled by this factor
const HANDICAP_RISK_FACTOR: f64 = 1.2;

/// Market versus model for one outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeComparison {
    pub outcome: Outcome,
    pub market_odds: f64,
    #[serde(with = "finite_or_null")]
    pub fair_odds: f64,
    /// Raw implied probability, margin included
    pub implied: f64,
    /// Implied probability with the margin removed
    pub normalized: f64,
    /// (market - fair) / fair; positive means the market pays more than fair
    pub risk: Option<f64>,
}

/// Market versus model for all three outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketComparison {
    pub outcomes: Vec<OutcomeComparison>,
    /// Sum of raw implied probabilities
    pub implied_total: f64,
    /// implied_total - 100
    pub overround: f64,
    pub normalized: ProbabilityTriple,
}

impl MarketComparison {
    pub fn get(&self, outcome: Outcome) -> Option<&OutcomeComparison> {
        self.outcomes.iter().find(|o| o.outcome == outcome)
    }

    /// Outcomes where the market pays more than the fair price
    pub fn value_outcomes(&self) -> impl Iterator<Item = &OutcomeComparison> {
        self.outcomes.iter().filter(|o| o.risk.is_some_and(|r| r > 0.0))
    }
}

/// Risk deltas for markets derived from the 1X2 prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlternativeMarkets {
    pub draw_no_bet: Option<f64>,
    /// Home or draw
    pub double_chance: Option<f64>,
    pub handicap: Option<f64>,
}

/// Compare a market quote against fair odds
///
/// # Examples
/// ```
/// use matchedge::core::market::compare;
/// use matchedge::models::{MarketQuote, OddsTriple};
///
/// let quote = MarketQuote::new(1.80, 3.20, 4.00).unwrap();
/// let fair = OddsTriple { home: 2.0, draw: 3.33, away: 5.0 };
/// let comparison = compare(&quote, &fair);
/// assert!((comparison.overround - 11.81).abs() < 0.01);
/// ```
pub fn compare(quote: &MarketQuote, fair: &OddsTriple) -> MarketComparison {
    let implied = Outcome::ALL.map(|o| implied_probability(quote.get(o)));
    let implied_total: f64 = implied.iter().sum();

    let normalized = implied.map(|p| p / implied_total * 100.0);

    let outcomes = Outcome::ALL
        .iter()
        .zip(implied.iter().zip(normalized.iter()))
        .map(|(&outcome, (&implied, &normalized))| OutcomeComparison {
            outcome,
            market_odds: quote.get(outcome),
            fair_odds: fair.get(outcome),
            implied,
            normalized,
            risk: risk(quote.get(outcome), fair.get(outcome)),
        })
        .collect();

    MarketComparison {
        outcomes,
        implied_total,
        overround: implied_total - 100.0,
        normalized: ProbabilityTriple {
            home: normalized[0],
            draw: normalized[1],
            away: normalized[2],
        },
    }
}

/// Relative distance between market and fair price
///
/// `None` when the fair price is not finite.
pub fn risk(market_odds: f64, fair_odds: f64) -> Option<f64> {
    if fair_odds.is_finite() && fair_odds > 0.0 {
        Some((market_odds - fair_odds) / fair_odds)
    } else {
        None
    }
}

/// Risk for draw-no-bet, double chance and handicap markets
pub fn alternatives(quote: &MarketQuote, fair: &OddsTriple) -> AlternativeMarkets {
    let home_risk = risk(quote.home(), fair.home);

    let market_dc = (quote.home() + quote.draw()) / 2.0;
    let fair_dc = (fair.home + fair.draw) / 2.0;

    AlternativeMarkets {
        draw_no_bet: home_risk,
        double_chance: risk(market_dc, fair_dc),
        handicap: home_risk.map(|r| r * HANDICAP_RISK_FACTOR),
    }
}
