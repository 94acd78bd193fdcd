use anyhow::Result;
use std::fmt;
use std::time::Duration;

use super::catalog::CatalogEntry;
use super::model::{ContainerRef, ItemId, ItemKind, PlacementCandidate, TrackIndex};

/// Handle to an item the host placed on a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacedItemId(pub String);

impl fmt::Display for PlacedItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a host needs to materialize one segment.
#[derive(Debug, Clone)]
pub struct AppendRequest {
    pub item: ItemId,
    pub kind: ItemKind,
    pub container: ContainerRef,
    pub track: TrackIndex,
    pub record_frame: i64,
    /// Source window for clips. Stills are appended untrimmed and resized.
    pub trim_start: u64,
    pub trim_length: u64,
    /// The host must answer within this time, rejecting if it cannot. Placements
    /// that come back later are removed again by the executor.
    pub timeout: Duration,
}

impl AppendRequest {
    pub fn from_candidate(
        candidate: &PlacementCandidate,
        track: TrackIndex,
        timeout: Duration,
    ) -> Self {
        Self {
            item: candidate.item.id.clone(),
            kind: candidate.item.kind,
            container: candidate.item.container.clone(),
            track,
            record_frame: candidate.record_position,
            trim_start: candidate.trim_start,
            trim_length: candidate.trim_length,
            timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Placed(PlacedItemId),
    Rejected(String),
}

/// The editing application a fill runs against.
///
/// Appends are atomic: a rejected append leaves the timeline untouched.
pub trait EditingHost {
    /// Timeline frame rate, if the host reports one.
    fn frame_rate(&self) -> Option<f64>;

    /// Every entry of the media catalog, folders flattened.
    fn media_entries(&self) -> Vec<CatalogEntry>;

    fn timeline_start_frame(&self) -> i64;

    fn video_track_count(&self) -> u32;

    /// End frame of the last item on `track`, or the timeline start if empty.
    fn track_end_frame(&self, track: TrackIndex) -> Result<i64>;

    /// Add a video track and a matching audio track. Returns the new video track.
    fn add_track_pair(&mut self) -> Result<TrackIndex>;

    fn append_segment(&mut self, request: &AppendRequest) -> AppendOutcome;

    /// Set the displayed length of a placed still.
    fn resize_placed(&mut self, item: &PlacedItemId, frames: u64) -> Result<()>;

    fn remove_placed(&mut self, item: &PlacedItemId) -> Result<()>;
}
