//! Engine configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::kelly::StakingConfig;
use crate::core::synthesizer::AggregationPolicy;
use crate::error::LoadError;

/// Aggregation policy and staking limits used by the engine
///
/// Missing sections fall back to Additive-Clamp (10-90, draw allowance 20)
/// and full Kelly without caps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub policy: AggregationPolicy,
    pub staking: StakingConfig,
}

impl EngineConfig {
    pub fn new(policy: AggregationPolicy, staking: StakingConfig) -> Self {
        Self { policy, staking }
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_policy(mut self, policy: AggregationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_kelly_multiplier(mut self, multiplier: f64) -> Self {
        self.staking.kelly_multiplier = multiplier;
        self
    }
}
