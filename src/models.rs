use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::market::{AlternativeMarkets, MarketComparison};
use crate::core::synthesizer::AggregationPolicy;
use crate::core::kelly::StakeRecommendation;
use crate::error::EngineError;

/// Minimum decimal price accepted for a market quote
pub const MIN_MARKET_ODDS: f64 = 1.01;

/// Side of the match an answer points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    #[serde(alias = "neither", alias = "none")]
    Draw,
    Away,
}

impl Side {
    /// The opposite side (Draw stays Draw)
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Draw => Side::Draw,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Draw => write!(f, "draw"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Which sides a factor may be answered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Yes/no question about the home side
    Home,
    /// Yes/no question about the away side
    Away,
    /// Either team (or neither) may hold the edge
    #[default]
    #[serde(alias = "neither")]
    Both,
}

impl Polarity {
    pub fn permits(self, side: Side) -> bool {
        match self {
            Polarity::Both => true,
            Polarity::Home => side != Side::Away,
            Polarity::Away => side != Side::Home,
        }
    }
}

/// A weighted checklist question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub polarity: Polarity,
    /// The question names a disadvantage: the chosen side is hurt by it
    #[serde(default)]
    pub adverse: bool,
}

impl Factor {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            polarity: Polarity::Both,
            adverse: false,
        }
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn adverse(mut self) -> Self {
        self.adverse = true;
        self
    }
}

/// A user's choice for one factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub factor: String,
    pub side: Side,
}

impl Answer {
    pub fn new(factor: impl Into<String>, side: Side) -> Self {
        Self {
            factor: factor.into(),
            side,
        }
    }
}

/// Signed weight of one answered factor (positive favours home)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: String,
    pub weight: f64,
    pub value: f64,
}

impl Contribution {
    /// Side this contribution leans towards
    pub fn side(&self) -> Side {
        if self.value > 0.0 {
            Side::Home
        } else if self.value < 0.0 {
            Side::Away
        } else {
            Side::Draw
        }
    }
}

/// One of the three match outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Home => "Home win",
            Outcome::Draw => "Draw",
            Outcome::Away => "Away win",
        }
    }
}

/// Home/draw/away probabilities in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTriple {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl ProbabilityTriple {
    pub const NEUTRAL: ProbabilityTriple = ProbabilityTriple {
        home: 50.0,
        draw: 0.0,
        away: 50.0,
    };

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Fair decimal odds per outcome (infinite when the probability is zero)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsTriple {
    #[serde(with = "finite_or_null")]
    pub home: f64,
    #[serde(with = "finite_or_null")]
    pub draw: f64,
    #[serde(with = "finite_or_null")]
    pub away: f64,
}

impl OddsTriple {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Bookmaker decimal odds for the three outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuote")]
pub struct MarketQuote {
    home: f64,
    draw: f64,
    away: f64,
}

#[derive(Deserialize)]
struct RawQuote {
    home: f64,
    draw: f64,
    away: f64,
}

impl TryFrom<RawQuote> for MarketQuote {
    type Error = EngineError;

    fn try_from(raw: RawQuote) -> Result<Self, Self::Error> {
        MarketQuote::new(raw.home, raw.draw, raw.away)
    }
}

impl MarketQuote {
    /// Validate and build a quote; every price must be at least 1.01
    pub fn new(home: f64, draw: f64, away: f64) -> Result<Self, EngineError> {
        for (outcome, odds) in [(Outcome::Home, home), (Outcome::Draw, draw), (Outcome::Away, away)] {
            if !odds.is_finite() || odds < MIN_MARKET_ODDS {
                return Err(EngineError::InvalidOdds { outcome, odds });
            }
        }
        Ok(Self { home, draw, away })
    }

    pub fn home(&self) -> f64 {
        self.home
    }

    pub fn draw(&self) -> f64 {
        self.draw
    }

    pub fn away(&self) -> f64 {
        self.away
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Everything needed to analyse one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub match_id: String,
    #[serde(default = "default_home_team")]
    pub home_team: String,
    #[serde(default = "default_away_team")]
    pub away_team: String,
    pub factors: Vec<Factor>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    pub quote: MarketQuote,
    pub bankroll: f64,
}

fn default_home_team() -> String {
    "Home".to_string()
}

fn default_away_team() -> String {
    "Away".to_string()
}

/// Result of a full evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub policy: AggregationPolicy,
    pub contributions: Vec<Contribution>,
    pub home_balance: f64,
    pub away_balance: f64,
    pub probabilities: ProbabilityTriple,
    pub fair_odds: OddsTriple,
    pub market: MarketComparison,
    pub stakes: Vec<StakeRecommendation>,
    pub alternatives: AlternativeMarkets,
    pub criteria: usize,
}

impl AnalysisReport {
    pub fn stake(&self, outcome: Outcome) -> Option<&StakeRecommendation> {
        self.stakes.iter().find(|s| s.outcome == outcome)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// JSON has no infinity: write non-finite prices as null and read null back as +inf
pub(crate) mod finite_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_permits() {
        assert!(Polarity::Both.permits(Side::Home));
        assert!(Polarity::Both.permits(Side::Draw));
        assert!(Polarity::Both.permits(Side::Away));
        assert!(Polarity::Home.permits(Side::Home));
        assert!(Polarity::Home.permits(Side::Draw));
        assert!(!Polarity::Home.permits(Side::Away));
        assert!(!Polarity::Away.permits(Side::Home));
    }

    #[test]
    fn test_market_quote_rejects_low_odds() {
        assert!(MarketQuote::new(1.80, 3.20, 4.00).is_ok());
        assert!(MarketQuote::new(1.01, 1.01, 1.01).is_ok());

        let err = MarketQuote::new(1.80, 1.0, 4.00).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidOdds {
                outcome: Outcome::Draw,
                ..
            }
        ));
        assert!(MarketQuote::new(f64::NAN, 3.2, 4.0).is_err());
    }

    #[test]
    fn test_market_quote_deserialize_validates() {
        let ok: MarketQuote =
            serde_json::from_str(r#"{"home": 1.8, "draw": 3.2, "away": 4.0}"#).unwrap();
        assert!((ok.home() - 1.8).abs() < 1e-9);

        let bad = serde_json::from_str::<MarketQuote>(r#"{"home": 0.9, "draw": 3.2, "away": 4.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_side_aliases() {
        let side: Side = serde_json::from_str(r#""neither""#).unwrap();
        assert_eq!(side, Side::Draw);
        assert_eq!(Side::Home.opposite(), Side::Away);
        assert_eq!(Side::Draw.opposite(), Side::Draw);
    }

    #[test]
    fn test_factor_defaults_from_json() {
        let factor: Factor = serde_json::from_str(r#"{"name": "Recent form", "weight": 5}"#).unwrap();
        assert_eq!(factor.polarity, Polarity::Both);
        assert!(!factor.adverse);
    }

    #[test]
    fn test_infinite_odds_serialize_as_null() {
        let odds = OddsTriple {
            home: 2.0,
            draw: f64::INFINITY,
            away: 2.0,
        };
        let json = serde_json::to_string(&odds).unwrap();
        assert!(json.contains("\"draw\":null"));

        let back: OddsTriple = serde_json::from_str(&json).unwrap();
        assert!(back.draw.is_infinite());
    }
}
