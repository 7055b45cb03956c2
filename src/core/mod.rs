//! Core business logic modules

pub mod checklist;
pub mod kelly;
pub mod market;
pub mod odds;
pub mod synthesizer;

// Re-export commonly used types
pub use checklist::{default_factors, normalize};
pub use kelly::{
    calculate_expected_value, calculate_kelly_fraction, KellyCalculator, StakeRecommendation,
    StakingConfig, ValueSignal,
};
pub use market::{compare, AlternativeMarkets, MarketComparison};
pub use odds::{fair_odds, implied_probability, require_finite_odds};
pub use synthesizer::{synthesize, AggregationPolicy, Synthesis};
