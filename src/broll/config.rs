use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::config::DocumentedConfig;
use crate::common::paths;
use crate::documented_config;

use super::executor::{DEFAULT_MAX_ITERATIONS, ExecutorLimits, FAILURE_LIMIT};
use super::target::DEFAULT_REFERENCE_TRACK;
use super::timecode::DEFAULT_FRAME_RATE;

const DEFAULT_APPEND_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrollConfig {
    /// Shortest segment in seconds
    pub min_seconds: f64,
    /// Longest segment in seconds
    pub max_seconds: f64,
    /// Seconds added in fixed-duration mode
    pub fixed_seconds: f64,
    /// Frame rate used when the project does not report one
    pub default_frame_rate: f64,
    /// Track whose end is matched in match mode
    pub reference_track: u32,
    /// Consecutive rejected appends before a fill gives up
    pub failure_limit: u32,
    /// Upper bound on append attempts per fill
    pub max_iterations: u64,
    /// Time the host gets to answer a single append, in milliseconds
    pub append_timeout_ms: u64,
    /// Overall time budget for a fill, in seconds; 0 means no budget
    pub run_timeout_seconds: Option<u64>,
}

impl Default for BrollConfig {
    fn default() -> Self {
        Self {
            min_seconds: 2.0,
            max_seconds: 5.0,
            fixed_seconds: 60.0,
            default_frame_rate: DEFAULT_FRAME_RATE,
            reference_track: DEFAULT_REFERENCE_TRACK.0,
            failure_limit: FAILURE_LIMIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            append_timeout_ms: DEFAULT_APPEND_TIMEOUT_MS,
            run_timeout_seconds: None,
        }
    }
}

documented_config!(BrollConfig {
    fields: [
        min_seconds, "Shortest segment in seconds",
        max_seconds, "Longest segment in seconds",
        fixed_seconds, "Seconds added in fixed-duration mode",
        default_frame_rate, "Frame rate used when the project does not report one",
        reference_track, "Video track whose end is matched in match mode",
        failure_limit, "Consecutive rejected appends before a fill gives up",
        max_iterations, "Upper bound on append attempts per fill",
        append_timeout_ms, "Time the host gets to answer a single append (ms)",
    ],
    optional: [
        run_timeout_seconds, "Overall time budget for a fill (seconds, 0 for none)",
    ],
    config_path: paths::broll_config_file(),
});

impl BrollConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(&<Self as DocumentedConfig>::config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = <Self as DocumentedConfig>::load_from_path_documented(path)?;
        if !config.default_frame_rate.is_finite() || config.default_frame_rate <= 0.0 {
            config.default_frame_rate = DEFAULT_FRAME_RATE;
        }
        if config.failure_limit == 0 {
            config.failure_limit = FAILURE_LIMIT;
        }
        if config.max_iterations == 0 {
            config.max_iterations = DEFAULT_MAX_ITERATIONS;
        }
        if config.append_timeout_ms == 0 {
            config.append_timeout_ms = DEFAULT_APPEND_TIMEOUT_MS;
        }
        if config.run_timeout_seconds == Some(0) {
            config.run_timeout_seconds = None;
        }
        Ok(config)
    }

    /// Load `path` when given, the user config file otherwise.
    pub fn resolve(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    pub fn executor_limits(&self) -> ExecutorLimits {
        ExecutorLimits {
            failure_limit: self.failure_limit,
            max_iterations: self.max_iterations,
            append_timeout: Duration::from_millis(self.append_timeout_ms),
            run_timeout: self.run_timeout_seconds.map(Duration::from_secs),
        }
    }
}
