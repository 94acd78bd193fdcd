use serde::Serialize;
use std::fmt;

use super::error::ConfigError;

/// Opaque handle to an entry in the host's media catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to the bin/folder that holds a source item.
///
/// Hosts that resolve items relative to a "current folder" switch to this
/// container before appending.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ContainerRef(pub Vec<String>);

impl ContainerRef {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, name: &str) -> Self {
        let mut path = self.0.clone();
        path.push(name.to_string());
        Self(path)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("/")
        } else {
            write!(f, "/{}", self.0.join("/"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Time-bounded media with a finite usable length.
    Clip,
    /// Image media; any length can be shown, set by a resize after placement.
    Still,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Usable length in frames. Ignored for stills.
    pub usable_frames: u64,
    pub container: ContainerRef,
}

impl SourceItem {
    pub fn clip(id: impl Into<String>, usable_frames: u64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: ItemId(id),
            kind: ItemKind::Clip,
            usable_frames,
            container: ContainerRef::root(),
        }
    }

    pub fn still(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: ItemId(id),
            kind: ItemKind::Still,
            usable_frames: 0,
            container: ContainerRef::root(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_container(mut self, container: ContainerRef) -> Self {
        self.container = container;
        self
    }

    pub fn is_still(&self) -> bool {
        matches!(self.kind, ItemKind::Still)
    }

    /// Upper bound on a segment taken from this item, if any.
    pub fn length_cap(&self) -> Option<u64> {
        match self.kind {
            ItemKind::Clip => Some(self.usable_frames),
            ItemKind::Still => None,
        }
    }
}

/// Closed range of segment lengths in frames; `0 < min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentRange {
    min_frames: u64,
    max_frames: u64,
}

impl SegmentRange {
    pub fn new(min_frames: u64, max_frames: u64) -> Result<Self, ConfigError> {
        if min_frames == 0 {
            return Err(ConfigError::EmptyMinimum);
        }
        if min_frames > max_frames {
            return Err(ConfigError::InvertedRange {
                min: min_frames,
                max: max_frames,
            });
        }
        Ok(Self {
            min_frames,
            max_frames,
        })
    }

    pub fn min_frames(&self) -> u64 {
        self.min_frames
    }

    pub fn max_frames(&self) -> u64 {
        self.max_frames
    }
}

/// 1-based video track index, as editors number their tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TrackIndex(pub u32);

impl fmt::Display for TrackIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FillTarget {
    pub target_frames: u64,
    /// Absolute timeline frame where filling begins.
    pub start_position: i64,
    pub track: TrackIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementCandidate {
    pub item: SourceItem,
    pub trim_start: u64,
    pub trim_length: u64,
    /// Absolute timeline frame. Filled in by the executor.
    pub record_position: i64,
}

impl PlacementCandidate {
    pub fn trim_end(&self) -> u64 {
        self.trim_start + self.trim_length
    }
}

/// Mutable bookkeeping of a single fill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanningState {
    pub cumulative_filled: u64,
    pub placed_count: usize,
    pub consecutive_failures: u32,
}

impl PlanningState {
    pub fn remaining(&self, target: &FillTarget) -> u64 {
        target.target_frames.saturating_sub(self.cumulative_filled)
    }

    pub fn record_position(&self, target: &FillTarget) -> i64 {
        target.start_position + self.cumulative_filled as i64
    }
}
