//! Matchedge - checklist-driven match analysis
//!
//! This library provides:
//! - Weighted, directional checklist normalization
//! - Home/draw/away probability synthesis (additive-clamp, ratio-normalize, confidence-score)
//! - Fair odds and de-margined market comparison
//! - Expected value and Kelly criterion stake sizing
//!
//! # Example
//!
//! ```
//! use matchedge::core::kelly::KellyCalculator;
//! use matchedge::core::odds::fair_odds;
//! use matchedge::models::Outcome;
//!
//! assert_eq!(fair_odds(25.0), 4.0);
//!
//! let calc = KellyCalculator::with_defaults(1000.0).unwrap();
//! let sizing = calc.calculate_single(Outcome::Home, 0.55, 2.0).unwrap();
//! println!("Recommended stake: {:.2}", sizing.stake);
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use config::EngineConfig;
pub use crate::core::{AggregationPolicy, KellyCalculator, StakeRecommendation, StakingConfig, ValueSignal};
pub use engine::DecisionEngine;
pub use error::{EngineError, LoadError};
pub use models::{
    AnalysisReport, AnalysisRequest, Answer, Contribution, Factor, MarketQuote, OddsTriple,
    Outcome, Polarity, ProbabilityTriple, Side,
};
pub use session::ChecklistSession;
