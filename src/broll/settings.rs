use regex::Regex;

use super::catalog::compile_patterns;
use super::cli::FillArgs;
use super::config::BrollConfig;
use super::error::ConfigError;
use super::model::{SegmentRange, TrackIndex};
use super::target::{Destination, FillMode};
use super::timecode::{checked_frame_rate, segment_seconds_to_frames};

/// Everything a fill needs from the user, converted to frames.
#[derive(Debug, Clone)]
pub struct FillSettings {
    pub destination: Destination,
    pub mode: FillMode,
    pub range: SegmentRange,
    pub include: Vec<Regex>,
    pub seed: Option<u64>,
}

impl FillSettings {
    /// Command-line values win over the config file.
    pub fn resolve(args: &FillArgs, config: &BrollConfig, fps: f64) -> Result<Self, ConfigError> {
        let fps = checked_frame_rate(fps)?;
        let destination: Destination = args.track.parse()?;

        let min_frames =
            segment_seconds_to_frames("min", args.min.unwrap_or(config.min_seconds), fps)?;
        let max_frames =
            segment_seconds_to_frames("max", args.max.unwrap_or(config.max_seconds), fps)?;
        let range = SegmentRange::new(min_frames, max_frames)?;

        let mode = match (args.seconds, args.fixed) {
            (Some(seconds), _) => FillMode::Fixed { seconds },
            (None, true) => FillMode::Fixed {
                seconds: config.fixed_seconds,
            },
            (None, false) => FillMode::MatchTrack {
                reference: TrackIndex(args.reference_track.unwrap_or(config.reference_track)),
            },
        };
        if let FillMode::Fixed { seconds } = mode
            && (!seconds.is_finite() || seconds < 0.0)
        {
            return Err(ConfigError::InvalidSeconds {
                field: "total",
                value: seconds,
            });
        }

        Ok(Self {
            destination,
            mode,
            range,
            include: compile_patterns(&args.include)?,
            seed: args.seed,
        })
    }
}
