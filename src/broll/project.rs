//! Project-file editing host.
//!
//! A project document describes a media pool (a folder tree of clips) and a
//! timeline of video tracks. [`ProjectHost`] loads one, applies placements in
//! memory with the same acceptance rules an editor enforces, and writes the
//! result back out.

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

use super::catalog::CatalogEntry;
use super::host::{AppendOutcome, AppendRequest, EditingHost, PlacedItemId};
use super::model::{ContainerRef, ItemKind, TrackIndex};
use super::timecode::try_parse_timecode;

/// Length a still gets on append, before it is resized.
pub const DEFAULT_STILL_SECONDS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    pub media_pool: MediaFolder,
    pub timeline: TimelineDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFolder {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clips: Vec<MediaClip>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<MediaFolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaClip {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDocument {
    pub name: String,
    #[serde(default)]
    pub start_frame: i64,
    #[serde(default)]
    pub video_tracks: Vec<VideoTrack>,
    #[serde(default)]
    pub audio_track_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoTrack {
    #[serde(default)]
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    /// Media pool clip id.
    pub source: String,
    pub record_start: i64,
    pub record_end: i64,
    #[serde(default)]
    pub source_start: u64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub still: bool,
}

impl TimelineItem {
    fn overlaps(&self, start: i64, end: i64) -> bool {
        self.record_start < end && self.record_end > start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectFormat {
    Json,
    Yaml,
}

impl ProjectFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => ProjectFormat::Yaml,
            _ => ProjectFormat::Json,
        }
    }
}

impl ProjectDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading project file {}", path.display()))?;
        Self::parse(&contents, ProjectFormat::for_path(path))
            .with_context(|| format!("parsing project file {}", path.display()))
    }

    fn parse(contents: &str, format: ProjectFormat) -> Result<Self> {
        let document = match format {
            ProjectFormat::Json => serde_json::from_str(contents)?,
            ProjectFormat::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match ProjectFormat::for_path(path) {
            ProjectFormat::Json => {
                serde_json::to_string_pretty(self).context("serializing project")? + "\n"
            }
            ProjectFormat::Yaml => serde_yaml::to_string(self).context("serializing project")?,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("writing project file {}", path.display()))
    }

    /// Flatten the media pool, depth first, remembering each clip's folder.
    pub fn catalog_entries(&self) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();
        collect_entries(&self.media_pool, ContainerRef::root(), &mut entries);
        entries
    }

    fn folder(&self, container: &ContainerRef) -> Option<&MediaFolder> {
        container.0.iter().try_fold(&self.media_pool, |folder, name| {
            folder.folders.iter().find(|child| &child.name == name)
        })
    }

    fn item_count(&self) -> usize {
        self.timeline
            .video_tracks
            .iter()
            .map(|track| track.items.len())
            .sum()
    }
}

fn collect_entries(folder: &MediaFolder, container: ContainerRef, out: &mut Vec<CatalogEntry>) {
    for clip in &folder.clips {
        out.push(CatalogEntry {
            id: clip.id.clone(),
            name: clip.name.clone(),
            type_label: clip.type_label.clone(),
            duration: clip.duration.clone(),
            container: container.clone(),
        });
    }
    for child in &folder.folders {
        collect_entries(child, container.child(&child.name), out);
    }
}

pub struct ProjectHost {
    document: ProjectDocument,
    current_folder: ContainerRef,
    next_item: usize,
    /// Used when the document does not state a frame rate.
    fallback_fps: f64,
}

impl ProjectHost {
    pub fn new(document: ProjectDocument, fallback_fps: f64) -> Self {
        let next_item = document.item_count() + 1;
        Self {
            document,
            current_folder: ContainerRef::root(),
            next_item,
            fallback_fps,
        }
    }

    pub fn open(path: &Path, fallback_fps: f64) -> Result<Self> {
        Ok(Self::new(ProjectDocument::load(path)?, fallback_fps))
    }

    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }

    pub fn into_document(self) -> ProjectDocument {
        self.document
    }

    pub fn current_folder(&self) -> &ContainerRef {
        &self.current_folder
    }

    /// Return to the media pool root, as editors expect after a batch of appends.
    pub fn reset_folder(&mut self) {
        self.current_folder = ContainerRef::root();
    }

    /// Frame rate every conversion for this project uses.
    pub fn fps(&self) -> f64 {
        self.frame_rate().unwrap_or(self.fallback_fps)
    }

    fn track(&self, track: TrackIndex) -> Result<&VideoTrack> {
        let index = (track.0 as usize)
            .checked_sub(1)
            .ok_or_else(|| anyhow!("track {track} does not exist"))?;
        self.document
            .timeline
            .video_tracks
            .get(index)
            .ok_or_else(|| anyhow!("track {track} does not exist"))
    }

    fn track_mut(&mut self, track: TrackIndex) -> Option<&mut VideoTrack> {
        let index = (track.0 as usize).checked_sub(1)?;
        self.document.timeline.video_tracks.get_mut(index)
    }

    fn allocate_item_id(&mut self) -> String {
        loop {
            let id = format!("broll-{}", self.next_item);
            self.next_item += 1;
            let taken = self
                .document
                .timeline
                .video_tracks
                .iter()
                .flat_map(|track| &track.items)
                .any(|item| item.id == id);
            if !taken {
                return id;
            }
        }
    }

    fn locate_item(&self, id: &PlacedItemId) -> Option<(usize, usize)> {
        self.document
            .timeline
            .video_tracks
            .iter()
            .enumerate()
            .find_map(|(track_idx, track)| {
                track
                    .items
                    .iter()
                    .position(|item| item.id == id.0)
                    .map(|item_idx| (track_idx, item_idx))
            })
    }

    fn try_append(&mut self, request: &AppendRequest) -> Result<PlacedItemId, String> {
        let deadline = Instant::now() + request.timeout;
        // Clips resolve relative to the current folder.
        self.current_folder = request.container.clone();
        let fps = self.fps();

        let clip = self
            .document
            .folder(&self.current_folder)
            .and_then(|folder| folder.clips.iter().find(|clip| clip.id == request.item.0))
            .ok_or_else(|| {
                format!(
                    "media {} not found in folder {}",
                    request.item, self.current_folder
                )
            })?;

        let length = match request.kind {
            ItemKind::Clip => {
                if request.trim_length == 0 {
                    return Err("cannot append an empty segment".to_string());
                }
                let duration = clip
                    .duration
                    .as_deref()
                    .and_then(|duration| try_parse_timecode(duration, fps))
                    .unwrap_or(0);
                let trim_end = request.trim_start + request.trim_length;
                if trim_end > duration {
                    return Err(format!(
                        "trim window {}..{} exceeds {} ({duration} frames)",
                        request.trim_start, trim_end, clip.name
                    ));
                }
                request.trim_length
            }
            ItemKind::Still => (DEFAULT_STILL_SECONDS * fps).round().max(1.0) as u64,
        };

        let source = clip.id.clone();
        let start = request.record_frame;
        let end = start + length as i64;
        let track = self.track(request.track).map_err(|err| err.to_string())?;
        if let Some(existing) = track.items.iter().find(|item| item.overlaps(start, end)) {
            return Err(format!(
                "{start}..{end} overlaps {} on {}",
                existing.id, request.track
            ));
        }

        if Instant::now() > deadline {
            return Err(format!("no answer within {:?}", request.timeout));
        }

        let id = self.allocate_item_id();
        let item = TimelineItem {
            id: id.clone(),
            source,
            record_start: start,
            record_end: end,
            source_start: request.trim_start,
            still: matches!(request.kind, ItemKind::Still),
        };
        let track = self
            .track_mut(request.track)
            .ok_or_else(|| format!("track {} does not exist", request.track))?;
        track.items.push(item);
        track.items.sort_by_key(|item| item.record_start);
        Ok(PlacedItemId(id))
    }
}

impl EditingHost for ProjectHost {
    fn frame_rate(&self) -> Option<f64> {
        self.document
            .frame_rate
            .filter(|fps| fps.is_finite() && *fps > 0.0)
    }

    fn media_entries(&self) -> Vec<CatalogEntry> {
        self.document.catalog_entries()
    }

    fn timeline_start_frame(&self) -> i64 {
        self.document.timeline.start_frame
    }

    fn video_track_count(&self) -> u32 {
        self.document.timeline.video_tracks.len() as u32
    }

    fn track_end_frame(&self, track: TrackIndex) -> Result<i64> {
        let track = self.track(track)?;
        Ok(track
            .items
            .iter()
            .map(|item| item.record_end)
            .max()
            .unwrap_or(self.document.timeline.start_frame))
    }

    fn add_track_pair(&mut self) -> Result<TrackIndex> {
        let timeline = &mut self.document.timeline;
        timeline.video_tracks.push(VideoTrack::default());
        timeline.audio_track_count += 1;
        Ok(TrackIndex(timeline.video_tracks.len() as u32))
    }

    fn append_segment(&mut self, request: &AppendRequest) -> AppendOutcome {
        match self.try_append(request) {
            Ok(id) => AppendOutcome::Placed(id),
            Err(reason) => AppendOutcome::Rejected(reason),
        }
    }

    fn resize_placed(&mut self, item: &PlacedItemId, frames: u64) -> Result<()> {
        let (track_idx, item_idx) = self
            .locate_item(item)
            .ok_or_else(|| anyhow!("placed item {item} not found"))?;
        let track = &mut self.document.timeline.video_tracks[track_idx];
        let placed = &track.items[item_idx];
        if !placed.still {
            bail!("{item} is not a still and cannot be resized");
        }
        if frames == 0 {
            bail!("cannot resize {item} to zero frames");
        }

        let start = placed.record_start;
        let end = start + frames as i64;
        let collides = track
            .items
            .iter()
            .enumerate()
            .any(|(idx, other)| idx != item_idx && other.overlaps(start, end));
        if collides {
            bail!("resizing {item} to {frames} frames would overlap the next item");
        }
        track.items[item_idx].record_end = end;
        Ok(())
    }

    fn remove_placed(&mut self, item: &PlacedItemId) -> Result<()> {
        let (track_idx, item_idx) = self
            .locate_item(item)
            .ok_or_else(|| anyhow!("placed item {item} not found"))?;
        self.document.timeline.video_tracks[track_idx]
            .items
            .remove(item_idx);
        Ok(())
    }
}
