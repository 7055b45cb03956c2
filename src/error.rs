use std::path::PathBuf;
use thiserror::Error;

use crate::core::kelly::StakingConfig;
use crate::models::{Outcome, Side};

/// Errors raised by the decision engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Side '{side}' is not permitted for factor '{factor}'")]
    InvalidSide { factor: String, side: Side },

    #[error("Answer references unknown factor '{0}'")]
    UnknownFactor(String),

    #[error("Factor '{0}' was answered more than once")]
    DuplicateAnswer(String),

    #[error("Factor '{0}' appears more than once in the checklist")]
    DuplicateFactor(String),

    #[error("Factor '{factor}' has invalid weight {weight} (must be finite and positive)")]
    InvalidWeight { factor: String, weight: f64 },

    #[error("Market odds for {outcome:?} must be at least 1.01, got {odds}")]
    InvalidOdds { outcome: Outcome, odds: f64 },

    #[error("Bankroll must be finite and non-negative, got {0}")]
    InvalidBankroll(f64),

    #[error("Probability must be between 0 and 1, got {0}")]
    InvalidProbability(f64),

    #[error("Net odds are zero or negative (decimal odds {0}); cannot size a stake")]
    DegenerateOdds(f64),

    #[error("Probability of zero has no finite fair price")]
    NonFiniteProbability,

    #[error("Staking setting {field} is out of range: {value}")]
    InvalidStaking { field: &'static str, value: f64 },
}

/// Errors reading or writing analysis and configuration files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn validate_bankroll(bankroll: f64) -> Result<(), EngineError> {
    if !bankroll.is_finite() || bankroll < 0.0 {
        return Err(EngineError::InvalidBankroll(bankroll));
    }
    Ok(())
}

pub fn validate_probability(prob: f64) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(EngineError::InvalidProbability(prob));
    }
    Ok(())
}

pub fn validate_weight(factor: &str, weight: f64) -> Result<(), EngineError> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(EngineError::InvalidWeight {
            factor: factor.to_string(),
            weight,
        });
    }
    Ok(())
}

/// Kelly multiplier must be finite and non-negative; both caps lie in [0, 1]
pub fn validate_staking(config: &StakingConfig) -> Result<(), EngineError> {
    if !config.kelly_multiplier.is_finite() || config.kelly_multiplier < 0.0 {
        return Err(EngineError::InvalidStaking {
            field: "kelly_multiplier",
            value: config.kelly_multiplier,
        });
    }
    for (field, value) in [
        ("max_stake_pct", config.max_stake_pct),
        ("max_total_exposure", config.max_total_exposure),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(EngineError::InvalidStaking { field, value });
        }
    }
    Ok(())
}

#[cfg(feature = "api")]
pub use api::AppError;

#[cfg(feature = "api")]
mod api {
    use actix_web::{http::StatusCode, HttpResponse, ResponseError};
    use std::fmt;

    use super::EngineError;
    use crate::models::ErrorResponse;

    /// Application error types
    #[derive(Debug)]
    pub enum AppError {
        /// Request rejected by the engine
        ValidationError(String),
    }

    impl fmt::Display for AppError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            }
        }
    }

    impl std::error::Error for AppError {}

    impl From<EngineError> for AppError {
        fn from(err: EngineError) -> Self {
            AppError::ValidationError(err.to_string())
        }
    }

    impl ResponseError for AppError {
        fn status_code(&self) -> StatusCode {
            match self {
                AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            }
        }

        fn error_response(&self) -> HttpResponse {
            let AppError::ValidationError(message) = self;

            HttpResponse::build(self.status_code()).json(ErrorResponse {
                error: "validation_error".to_string(),
                message: message.clone(),
            })
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bankroll() {
        assert!(validate_bankroll(0.0).is_ok());
        assert!(validate_bankroll(1000.0).is_ok());
        assert!(validate_bankroll(-1.0).is_err());
        assert!(validate_bankroll(f64::INFINITY).is_err());
        assert!(validate_bankroll(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_probability_valid() {
        assert!(validate_probability(0.0).is_ok());
        assert!(validate_probability(0.5).is_ok());
        assert!(validate_probability(1.0).is_ok());
    }

    #[test]
    fn test_validate_probability_invalid() {
        assert!(validate_probability(-0.1).is_err());
        assert!(validate_probability(1.1).is_err());
        assert!(validate_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight("Form", 5.0).is_ok());
        assert!(validate_weight("Form", 0.0).is_err());
        assert!(validate_weight("Form", -2.0).is_err());
    }

    #[test]
    fn test_validate_staking() {
        assert!(validate_staking(&StakingConfig::default()).is_ok());

        let quarter = StakingConfig {
            kelly_multiplier: 0.25,
            max_stake_pct: 0.05,
            max_total_exposure: 0.0,
        };
        assert!(validate_staking(&quarter).is_ok());

        for multiplier in [f64::NAN, f64::INFINITY, -0.5] {
            let config = StakingConfig {
                kelly_multiplier: multiplier,
                ..StakingConfig::default()
            };
            assert!(matches!(
                validate_staking(&config),
                Err(EngineError::InvalidStaking { field: "kelly_multiplier", .. })
            ));
        }

        let over_cap = StakingConfig {
            max_stake_pct: 1.5,
            ..StakingConfig::default()
        };
        assert!(validate_staking(&over_cap).is_err());

        let nan_exposure = StakingConfig {
            max_total_exposure: f64::NAN,
            ..StakingConfig::default()
        };
        assert!(validate_staking(&nan_exposure).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::InvalidSide {
            factor: "Home advantage".to_string(),
            side: Side::Away,
        };
        let msg = err.to_string();
        assert!(msg.contains("Home advantage"));
        assert!(msg.contains("away"));
    }
}
