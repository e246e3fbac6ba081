//! Render configuration.

use serde::{Deserialize, Serialize};

use crate::error::RenderResult;

/// How the samples of a full-quality pixel turn into the stored color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelResolve {
    /// Write every sample straight to the target; the last one wins.
    LastSample,
    /// Write the mean of all samples once.
    #[default]
    Average,
}

/// Sequential or bounded-concurrency parallel execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Row-major on the calling thread. Progress reports the linear index of
    /// the pixel just written.
    Sequential,
    /// One job per pixel on the rayon pool, bounded in flight. Progress
    /// reports a running count of finished jobs.
    Parallel,
}

impl From<bool> for ExecutionMode {
    /// `true` selects parallel execution.
    fn from(parallel: bool) -> Self {
        if parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }
}

/// Full multi-sample rendering or the single-ray preview path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Full,
    Fast,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum pixel jobs in flight, and the number of samplers in the pool.
    /// `None` uses the size of the rayon thread pool.
    pub threads: Option<usize>,
    /// Sample resolve policy for full-quality renders
    pub resolve: PixelResolve,
    /// Base seed for the sampler pool; sampler `i` gets `seed + i`.
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl RenderConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parallelism width actually used: at least one.
    pub fn parallelism(&self) -> usize {
        self.threads
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.threads, None);
        assert_eq!(config.resolve, PixelResolve::Average);
        assert_eq!(config.seed, None);
        assert!(config.parallelism() >= 1);
    }

    #[test]
    fn test_from_json_partial() {
        let config = RenderConfig::from_json(r#"{ "threads": 3, "resolve": "last_sample" }"#).unwrap();
        assert_eq!(config.threads, Some(3));
        assert_eq!(config.resolve, PixelResolve::LastSample);
        assert_eq!(config.seed, None);
        assert_eq!(config.parallelism(), 3);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = RenderConfig::from_json(r#"{ "resolve": "median" }"#).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_zero_threads_still_runs_one() {
        let config = RenderConfig {
            threads: Some(0),
            ..Default::default()
        };
        assert_eq!(config.parallelism(), 1);
    }

    #[test]
    fn test_execution_mode_from_flag() {
        assert_eq!(ExecutionMode::from(true), ExecutionMode::Parallel);
        assert_eq!(ExecutionMode::from(false), ExecutionMode::Sequential);
    }
}
