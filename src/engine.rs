//! Decision engine pipeline
//!
//! answers -> contributions -> probabilities -> fair odds / market comparison
//! -> stake recommendations. Every call is a pure function of the request and
//! the engine configuration.

use tracing::debug;

use crate::config::EngineConfig;
use crate::core::checklist::normalize;
use crate::core::kelly::KellyCalculator;
use crate::core::market::{alternatives, compare};
use crate::core::synthesizer::{synthesize_with_total, Synthesis};
use crate::error::{validate_bankroll, EngineError};
use crate::models::{AnalysisReport, AnalysisRequest, Factor, Answer, OddsTriple, Outcome};

/// Stateless evaluator for match analyses
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fold a checklist into probabilities without market data
    pub fn synthesize(&self, factors: &[Factor], answers: &[Answer]) -> Result<Synthesis, EngineError> {
        let contributions = normalize(factors, answers)?;
        let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
        Ok(synthesize_with_total(&self.config.policy, &contributions, total_weight))
    }

    /// Run the full pipeline for one match
    ///
    /// # Examples
    /// ```
    /// use matchedge::engine::DecisionEngine;
    /// use matchedge::models::{AnalysisRequest, Answer, Factor, MarketQuote, Side};
    ///
    /// let request = AnalysisRequest {
    ///     match_id: "BRA-ARG".into(),
    ///     home_team: "Brasil".into(),
    ///     away_team: "Argentina".into(),
    ///     factors: vec![Factor::new("Recent form", 5.0)],
    ///     answers: vec![Answer::new("Recent form", Side::Home)],
    ///     quote: MarketQuote::new(1.80, 3.20, 4.00).unwrap(),
    ///     bankroll: 100.0,
    /// };
    ///
    /// let report = DecisionEngine::default().evaluate(&request).unwrap();
    /// assert_eq!(report.probabilities.home, 55.0);
    /// ```
    pub fn evaluate(&self, request: &AnalysisRequest) -> Result<AnalysisReport, EngineError> {
        validate_bankroll(request.bankroll)?;

        let contributions = normalize(&request.factors, &request.answers)?;
        let total_weight: f64 = request.factors.iter().map(|f| f.weight).sum();
        let synthesis = synthesize_with_total(&self.config.policy, &contributions, total_weight);
        let probabilities = synthesis.probabilities;

        let fair_odds = OddsTriple::from(&probabilities);
        let market = compare(&request.quote, &fair_odds);
        let alternatives = alternatives(&request.quote, &fair_odds);

        let calculator = KellyCalculator::new(request.bankroll, self.config.staking)?;
        let bets = Outcome::ALL.map(|o| (o, probabilities.get(o) / 100.0, request.quote.get(o)));
        let stakes = calculator.calculate_multiple(&bets)?;

        debug!(
            match_id = %request.match_id,
            answered = contributions.len(),
            overround = market.overround,
            "evaluated match"
        );

        Ok(AnalysisReport {
            match_id: request.match_id.clone(),
            home_team: request.home_team.clone(),
            away_team: request.away_team.clone(),
            policy: self.config.policy,
            contributions,
            home_balance: synthesis.home_balance,
            away_balance: synthesis.away_balance,
            probabilities,
            fair_odds,
            market,
            stakes,
            alternatives,
            criteria: request.factors.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kelly::{StakingConfig, ValueSignal};
    use crate::core::synthesizer::AggregationPolicy;
    use crate::models::{MarketQuote, Polarity, Side};

    fn request(answers: Vec<Answer>) -> AnalysisRequest {
        AnalysisRequest {
            match_id: "BRA-ARG-2024".to_string(),
            home_team: "Brasil".to_string(),
            away_team: "Argentina".to_string(),
            factors: vec![
                Factor::new("Recent form", 5.0),
                Factor::new("Injuries", 4.0).adverse(),
                Factor::new("Home record", 3.0).with_polarity(Polarity::Home),
                Factor::new("Motivation", 3.0),
            ],
            answers,
            quote: MarketQuote::new(1.80, 3.20, 4.00).unwrap(),
            bankroll: 1000.0,
        }
    }

    #[test]
    fn test_evaluate_full_pipeline() {
        let req = request(vec![
            Answer::new("Recent form", Side::Home),
            Answer::new("Injuries", Side::Away),
            Answer::new("Home record", Side::Home),
        ]);

        let report = DecisionEngine::default().evaluate(&req).unwrap();

        // 50 + 5 + 4 + 3
        assert_eq!(report.probabilities.home, 62.0);
        assert_eq!(report.probabilities.draw, 18.0);
        assert_eq!(report.probabilities.away, 20.0);
        assert_eq!(report.home_balance, 12.0);
        assert_eq!(report.fair_odds.home, 1.61);
        assert_eq!(report.stakes.len(), 3);
        assert_eq!(report.criteria, 4);

        let home = report.stake(Outcome::Home).unwrap();
        // 0.62 * 1.80 - 1 = 0.116
        assert!((home.expected_value - 0.116).abs() < 1e-9);
        // 0.116 / 0.8 = 0.145
        assert!((home.kelly_fraction - 0.145).abs() < 1e-9);
        assert!((home.stake - 145.0).abs() < 1e-6);
        assert_eq!(home.signal, ValueSignal::Positive);

        let away = report.stake(Outcome::Away).unwrap();
        assert_eq!(away.stake, 0.0);
        assert_eq!(away.signal, ValueSignal::Negative);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let req = request(vec![Answer::new("Motivation", Side::Away)]);
        let engine = DecisionEngine::new(EngineConfig::default().with_policy(AggregationPolicy::ratio_normalize()));

        let a = engine.evaluate(&req).unwrap();
        let b = engine.evaluate(&req).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_evaluate_propagates_invalid_side() {
        let req = request(vec![Answer::new("Home record", Side::Away)]);
        let err = DecisionEngine::default().evaluate(&req).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSide { .. }));
    }

    #[test]
    fn test_evaluate_rejects_negative_bankroll() {
        let mut req = request(vec![]);
        req.bankroll = -5.0;
        assert_eq!(
            DecisionEngine::default().evaluate(&req).unwrap_err(),
            EngineError::InvalidBankroll(-5.0)
        );
    }

    #[test]
    fn test_ceiling_case_has_no_nan() {
        let mut req = request(vec![]);
        req.factors = vec![Factor::new("Everything", 45.0)];
        req.answers = vec![Answer::new("Everything", Side::Home)];

        let report = DecisionEngine::default().evaluate(&req).unwrap();
        assert_eq!(report.probabilities.home, 90.0);
        assert_eq!(report.probabilities.draw, 0.0);
        assert_eq!(report.probabilities.away, 10.0);
        assert!(report.fair_odds.draw.is_infinite());

        let draw = report.market.get(Outcome::Draw).unwrap();
        assert_eq!(draw.risk, None);
        for stake in &report.stakes {
            assert!(stake.stake.is_finite());
            assert!(stake.kelly_fraction.is_finite());
        }
        assert_eq!(report.stake(Outcome::Draw).unwrap().stake, 0.0);
    }

    #[test]
    fn test_confidence_policy_scores_against_full_checklist() {
        let req = request(vec![Answer::new("Recent form", Side::Home)]);
        let engine = DecisionEngine::new(EngineConfig::default().with_policy(AggregationPolicy::confidence_score()));

        let report = engine.evaluate(&req).unwrap();
        // 5 / 15 * 100 = 33.33
        assert!((report.probabilities.home - 100.0 / 3.0).abs() < 1e-9);
        assert!((report.probabilities.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_staking_config_applies() {
        // home 59%: ev = 0.062, k = 0.0775
        let req = request(vec![
            Answer::new("Recent form", Side::Home),
            Answer::new("Injuries", Side::Away),
        ]);
        let config = EngineConfig::new(
            AggregationPolicy::additive_clamp(),
            StakingConfig {
                kelly_multiplier: 0.5,
                ..StakingConfig::default()
            },
        );
        let full = DecisionEngine::default().evaluate(&req).unwrap();
        let half = DecisionEngine::new(config).evaluate(&req).unwrap();

        let full_home = full.stake(Outcome::Home).unwrap().stake;
        let half_home = half.stake(Outcome::Home).unwrap().stake;
        assert!((full_home - 77.5).abs() < 1e-6);
        assert!((half_home - full_home / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_kelly_multiplier_rejected() {
        // home 55%: every outcome is negative EV at 1.80/3.20/4.00
        let req = request(vec![Answer::new("Recent form", Side::Home)]);

        for multiplier in [f64::NAN, f64::INFINITY] {
            let engine = DecisionEngine::new(EngineConfig::default().with_kelly_multiplier(multiplier));
            assert!(matches!(
                engine.evaluate(&req),
                Err(EngineError::InvalidStaking { field: "kelly_multiplier", .. })
            ));
        }
    }

    #[test]
    fn test_duplicate_factor_names_rejected() {
        let mut req = request(vec![Answer::new("Recent form", Side::Home)]);
        req.factors.push(Factor::new("Recent form", 40.0));

        let engine = DecisionEngine::new(EngineConfig::default().with_policy(AggregationPolicy::confidence_score()));
        assert_eq!(
            engine.evaluate(&req).unwrap_err(),
            EngineError::DuplicateFactor("Recent form".to_string())
        );
    }

    #[test]
    fn test_synthesize_without_market() {
        let req = request(vec![Answer::new("Recent form", Side::Away)]);
        let synthesis = DecisionEngine::default()
            .synthesize(&req.factors, &req.answers)
            .unwrap();
        assert_eq!(synthesis.probabilities.home, 45.0);
        assert_eq!(synthesis.away_balance, 5.0);
    }
}
