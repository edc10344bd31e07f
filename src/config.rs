// THEORY:
// The `config` module holds the knobs a deployment may turn: which details are
// spoken, how detections are filtered, how many frames are remembered and how
// many workers extract features. It deserializes from partial JSON with every
// missing field falling back to its default, and `validate` rejects values the
// pipeline cannot run with before any frame is processed.

use crate::error::DescribeError;
use serde::{Deserialize, Serialize};

/// Tunable behavior of the `SceneDescriber` and `ParallelDescriber`.
///
/// The palette, hue boundaries and plural dictionary are not configurable;
/// they live as process-wide constants next to the code that uses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriberConfig {
    /// Mention each group's dominant color.
    pub include_color: bool,
    /// Mention each group's region ("to your left").
    pub include_position: bool,
    /// Detections are kept only when their score is strictly above this value.
    pub min_score_threshold: f32,
    /// Upper bound on detections considered per frame. `None` keeps them all.
    pub max_objects: Option<usize>,
    /// Number of frames a `FrameWindow` built from this config retains.
    pub window_size: usize,
    /// Number of batches the parallel pipeline splits a frame into.
    /// `None` uses the number of logical CPUs.
    pub worker_count: Option<usize>,
}

impl Default for DescriberConfig {
    fn default() -> Self {
        Self {
            include_color: true,
            include_position: true,
            min_score_threshold: 0.5,
            max_objects: None,
            window_size: 5,
            worker_count: None,
        }
    }
}

impl DescriberConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), DescribeError> {
        if !(0.0..=1.0).contains(&self.min_score_threshold) {
            return Err(DescribeError::Config(
                "Score threshold must be between 0 and 1".to_string(),
            ));
        }

        if self.window_size == 0 {
            return Err(DescribeError::Config(
                "Window size must be at least 1".to_string(),
            ));
        }

        if self.worker_count == Some(0) {
            return Err(DescribeError::Config(
                "Worker count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, DescribeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn effective_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(num_cpus::get).max(1)
    }
}
