//! Per-match checklist session
//!
//! Collects answers one at a time for a single match and re-evaluates the
//! whole request after every step. The session is a plain value owned by the
//! caller; nothing is cached and no running totals are kept.

use crate::core::checklist::contribution;
use crate::engine::DecisionEngine;
use crate::error::EngineError;
use crate::models::{AnalysisReport, AnalysisRequest, Answer, Factor, MarketQuote, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistSession {
    request: AnalysisRequest,
}

impl ChecklistSession {
    pub fn new(
        match_id: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        factors: Vec<Factor>,
        quote: MarketQuote,
        bankroll: f64,
    ) -> Self {
        Self {
            request: AnalysisRequest {
                match_id: match_id.into(),
                home_team: home_team.into(),
                away_team: away_team.into(),
                factors,
                answers: Vec::new(),
                quote,
                bankroll,
            },
        }
    }

    /// Resume from an existing request, keeping its answers
    pub fn from_request(request: AnalysisRequest) -> Self {
        Self { request }
    }

    pub fn match_id(&self) -> &str {
        &self.request.match_id
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    pub fn into_request(self) -> AnalysisRequest {
        self.request
    }

    /// Record (or replace) the answer for one factor
    pub fn answer(&mut self, factor: &str, side: Side) -> Result<(), EngineError> {
        let found = self
            .request
            .factors
            .iter()
            .find(|f| f.name == factor)
            .ok_or_else(|| EngineError::UnknownFactor(factor.to_string()))?;

        // validates the side against the factor's polarity
        contribution(found, side)?;

        match self.request.answers.iter_mut().find(|a| a.factor == factor) {
            Some(existing) => existing.side = side,
            None => self.request.answers.push(Answer::new(factor, side)),
        }
        Ok(())
    }

    /// First factor still waiting for an answer
    pub fn next_factor(&self) -> Option<&Factor> {
        self.request
            .factors
            .iter()
            .find(|f| !self.request.answers.iter().any(|a| a.factor == f.name))
    }

    /// (answered, total) factor counts
    pub fn progress(&self) -> (usize, usize) {
        (self.request.answers.len(), self.request.factors.len())
    }

    pub fn is_complete(&self) -> bool {
        self.next_factor().is_none()
    }

    /// Evaluate the answers collected so far
    pub fn evaluate(&self, engine: &DecisionEngine) -> Result<AnalysisReport, EngineError> {
        engine.evaluate(&self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checklist::default_factors;

    fn session() -> ChecklistSession {
        ChecklistSession::new(
            "BRA-ARG",
            "Brasil",
            "Argentina",
            vec![Factor::new("Form", 5.0), Factor::new("Defence", 3.0)],
            MarketQuote::new(1.80, 3.20, 4.00).unwrap(),
            100.0,
        )
    }

    #[test]
    fn test_stepwise_matches_single_shot() {
        let engine = DecisionEngine::default();
        let mut s = session();

        assert_eq!(s.next_factor().unwrap().name, "Form");
        s.answer("Form", Side::Home).unwrap();
        let partial = s.evaluate(&engine).unwrap();
        assert_eq!(partial.probabilities.home, 55.0);

        assert_eq!(s.next_factor().unwrap().name, "Defence");
        s.answer("Defence", Side::Away).unwrap();
        assert!(s.is_complete());
        assert_eq!(s.progress(), (2, 2));

        let stepwise = s.evaluate(&engine).unwrap();
        let single_shot = engine.evaluate(&s.clone().into_request()).unwrap();
        assert_eq!(stepwise, single_shot);
        assert_eq!(stepwise.probabilities.home, 52.0);
    }

    #[test]
    fn test_reanswer_replaces() {
        let engine = DecisionEngine::default();
        let mut s = session();
        s.answer("Form", Side::Home).unwrap();
        s.answer("Form", Side::Away).unwrap();

        assert_eq!(s.progress(), (1, 2));
        assert_eq!(s.evaluate(&engine).unwrap().probabilities.home, 45.0);
    }

    #[test]
    fn test_rejects_unknown_factor() {
        let mut s = session();
        assert_eq!(
            s.answer("Weather", Side::Home).unwrap_err(),
            EngineError::UnknownFactor("Weather".to_string())
        );
        assert_eq!(s.progress(), (0, 2));
    }

    #[test]
    fn test_default_checklist_session() {
        let mut s = ChecklistSession::new(
            "m1",
            "A",
            "B",
            default_factors(),
            MarketQuote::new(2.0, 3.0, 4.0).unwrap(),
            50.0,
        );
        while let Some(factor) = s.next_factor().map(|f| f.name.clone()) {
            s.answer(&factor, Side::Draw).unwrap();
        }
        assert_eq!(s.progress(), (15, 15));
        let report = s.evaluate(&DecisionEngine::default()).unwrap();
        assert_eq!(report.probabilities.home, 50.0);
        assert_eq!(s.match_id(), "m1");
    }
}
