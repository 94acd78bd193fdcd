use std::fmt;
use std::str::FromStr;

use super::error::{ConfigError, FillError};
use super::host::EditingHost;
use super::model::{FillTarget, TrackIndex};
use super::timecode::duration_seconds_to_frames;

/// The track that is matched against in match mode unless told otherwise.
pub const DEFAULT_REFERENCE_TRACK: TrackIndex = TrackIndex(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Append a fresh video/audio track pair and fill it from the timeline start.
    NewTrack,
    /// Continue from the end of an existing video track.
    Existing(TrackIndex),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::NewTrack => f.write_str("New Track"),
            Destination::Existing(track) => write!(f, "Track {}", track.0),
        }
    }
}

impl FromStr for Destination {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized == "new" || normalized == "new track" {
            return Ok(Destination::NewTrack);
        }

        let digits = normalized
            .strip_prefix("track")
            .or_else(|| normalized.strip_prefix('v'))
            .unwrap_or(&normalized)
            .trim();
        match digits.parse::<u32>() {
            Ok(index) if index > 0 => Ok(Destination::Existing(TrackIndex(index))),
            _ => Err(ConfigError::InvalidTrackSelection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillMode {
    /// Fill until the destination ends where the reference track ends.
    MatchTrack { reference: TrackIndex },
    /// Add a fixed duration.
    Fixed { seconds: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationChoice {
    pub label: String,
    pub destination: Destination,
}

/// Choices offered to the user: a new track, then every track except the first.
pub fn destination_choices(video_track_count: u32) -> Vec<DestinationChoice> {
    std::iter::once(Destination::NewTrack)
        .chain((2..=video_track_count).map(|index| Destination::Existing(TrackIndex(index))))
        .map(|destination| DestinationChoice {
            label: destination.to_string(),
            destination,
        })
        .collect()
}

pub fn validate_destination(
    destination: Destination,
    mode: FillMode,
    video_track_count: u32,
) -> Result<(), ConfigError> {
    let check_exists = |track: TrackIndex| {
        if track.0 == 0 || track.0 > video_track_count {
            Err(ConfigError::TrackOutOfRange {
                track,
                count: video_track_count,
            })
        } else {
            Ok(())
        }
    };

    if let FillMode::MatchTrack { reference } = mode {
        check_exists(reference)?;
        if destination == Destination::Existing(reference) {
            return Err(ConfigError::DestinationIsReference(reference));
        }
    }
    if let Destination::Existing(track) = destination {
        check_exists(track)?;
    }
    Ok(())
}

/// Where filling starts on the chosen destination.
pub fn destination_start<H: EditingHost + ?Sized>(
    host: &H,
    destination: Destination,
) -> Result<i64, FillError> {
    match destination {
        Destination::NewTrack => Ok(host.timeline_start_frame()),
        Destination::Existing(track) => Ok(host.track_end_frame(track)?),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetDecision {
    /// Fill `target_frames` starting at `start_position`.
    Fill {
        target_frames: u64,
        start_position: i64,
    },
    /// The destination already reaches the reference end.
    NothingToAdd {
        reference_end: i64,
        start_position: i64,
    },
}

pub fn derive_target<H: EditingHost + ?Sized>(
    host: &H,
    mode: FillMode,
    start_position: i64,
    fps: f64,
) -> Result<TargetDecision, FillError> {
    match mode {
        FillMode::MatchTrack { reference } => {
            let reference_end = host.track_end_frame(reference)?;
            let frames = reference_end - start_position;
            if frames <= 0 {
                return Ok(TargetDecision::NothingToAdd {
                    reference_end,
                    start_position,
                });
            }
            Ok(TargetDecision::Fill {
                target_frames: frames as u64,
                start_position,
            })
        }
        FillMode::Fixed { seconds } => Ok(TargetDecision::Fill {
            target_frames: duration_seconds_to_frames("total", seconds, fps)?,
            start_position,
        }),
    }
}

/// Turn a decision into a concrete target, creating the track if needed.
///
/// Called only once there is something to fill, so a no-op never leaves an
/// empty track behind.
pub fn commit_destination<H: EditingHost + ?Sized>(
    host: &mut H,
    destination: Destination,
    target_frames: u64,
    start_position: i64,
) -> Result<FillTarget, FillError> {
    let track = match destination {
        Destination::NewTrack => host.add_track_pair()?,
        Destination::Existing(track) => track,
    };
    Ok(FillTarget {
        target_frames,
        start_position,
        track,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broll::catalog::CatalogEntry;
    use crate::broll::host::{AppendOutcome, AppendRequest, PlacedItemId};
    use anyhow::{Result, bail};

    struct Tracks {
        start: i64,
        ends: Vec<i64>,
        added: u32,
    }

    impl EditingHost for Tracks {
        fn frame_rate(&self) -> Option<f64> {
            Some(25.0)
        }

        fn media_entries(&self) -> Vec<CatalogEntry> {
            Vec::new()
        }

        fn timeline_start_frame(&self) -> i64 {
            self.start
        }

        fn video_track_count(&self) -> u32 {
            self.ends.len() as u32
        }

        fn track_end_frame(&self, track: TrackIndex) -> Result<i64> {
            match self.ends.get(track.0 as usize - 1) {
                Some(end) => Ok(*end),
                None => bail!("no track {track}"),
            }
        }

        fn add_track_pair(&mut self) -> Result<TrackIndex> {
            self.ends.push(self.start);
            self.added += 1;
            Ok(TrackIndex(self.ends.len() as u32))
        }

        fn append_segment(&mut self, _request: &AppendRequest) -> AppendOutcome {
            AppendOutcome::Rejected("read-only".to_string())
        }

        fn resize_placed(&mut self, _item: &PlacedItemId, _frames: u64) -> Result<()> {
            Ok(())
        }

        fn remove_placed(&mut self, _item: &PlacedItemId) -> Result<()> {
            Ok(())
        }
    }

    fn host() -> Tracks {
        Tracks {
            start: 86_400,
            ends: vec![88_800, 87_000],
            added: 0,
        }
    }

    const MATCH_V1: FillMode = FillMode::MatchTrack {
        reference: DEFAULT_REFERENCE_TRACK,
    };

    #[test]
    fn parses_destination_names() {
        assert_eq!("new".parse::<Destination>().unwrap(), Destination::NewTrack);
        assert_eq!(
            "New Track".parse::<Destination>().unwrap(),
            Destination::NewTrack
        );
        assert_eq!(
            "Track 3".parse::<Destination>().unwrap(),
            Destination::Existing(TrackIndex(3))
        );
        assert_eq!(
            "v2".parse::<Destination>().unwrap(),
            Destination::Existing(TrackIndex(2))
        );
        assert_eq!(
            "4".parse::<Destination>().unwrap(),
            Destination::Existing(TrackIndex(4))
        );
        assert!("0".parse::<Destination>().is_err());
        assert!("sideways".parse::<Destination>().is_err());
    }

    #[test]
    fn choices_skip_reference_track() {
        let labels: Vec<String> = destination_choices(3)
            .into_iter()
            .map(|choice| choice.label)
            .collect();
        assert_eq!(labels, vec!["New Track", "Track 2", "Track 3"]);
        assert_eq!(destination_choices(1).len(), 1);
    }

    #[test]
    fn match_mode_fills_up_to_reference_end() {
        let host = host();
        let start = destination_start(&host, Destination::Existing(TrackIndex(2))).unwrap();
        assert_eq!(start, 87_000);
        let decision = derive_target(&host, MATCH_V1, start, 25.0).unwrap();
        assert_eq!(
            decision,
            TargetDecision::Fill {
                target_frames: 1_800,
                start_position: 87_000
            }
        );
    }

    #[test]
    fn match_mode_reports_nothing_to_add() {
        let mut host = host();
        host.ends[1] = 90_000;
        let decision = derive_target(&host, MATCH_V1, 90_000, 25.0).unwrap();
        assert!(matches!(decision, TargetDecision::NothingToAdd { .. }));
        let decision = derive_target(&host, MATCH_V1, 88_800, 25.0).unwrap();
        assert!(matches!(decision, TargetDecision::NothingToAdd { .. }));
    }

    #[test]
    fn fixed_mode_rounds_seconds() {
        let host = host();
        let decision =
            derive_target(&host, FillMode::Fixed { seconds: 2.5 }, 100, 29.97).unwrap();
        assert_eq!(
            decision,
            TargetDecision::Fill {
                target_frames: 75,
                start_position: 100
            }
        );
    }

    #[test]
    fn new_track_starts_at_timeline_start_and_is_created_on_commit() {
        let mut host = host();
        let start = destination_start(&host, Destination::NewTrack).unwrap();
        assert_eq!(start, 86_400);
        assert_eq!(host.added, 0);
        let target = commit_destination(&mut host, Destination::NewTrack, 2_400, start).unwrap();
        assert_eq!(target.track, TrackIndex(3));
        assert_eq!(host.added, 1);
    }

    #[test]
    fn destination_validation() {
        assert!(validate_destination(Destination::NewTrack, MATCH_V1, 2).is_ok());
        assert_eq!(
            validate_destination(Destination::Existing(TrackIndex(1)), MATCH_V1, 2),
            Err(ConfigError::DestinationIsReference(TrackIndex(1)))
        );
        assert_eq!(
            validate_destination(Destination::Existing(TrackIndex(5)), MATCH_V1, 2),
            Err(ConfigError::TrackOutOfRange {
                track: TrackIndex(5),
                count: 2
            })
        );
        assert!(
            validate_destination(
                Destination::Existing(TrackIndex(1)),
                FillMode::Fixed { seconds: 3.0 },
                2
            )
            .is_ok()
        );
        assert!(
            validate_destination(
                Destination::NewTrack,
                FillMode::MatchTrack {
                    reference: TrackIndex(4)
                },
                2
            )
            .is_err()
        );
    }
}
