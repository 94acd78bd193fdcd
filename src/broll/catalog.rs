use regex::Regex;
use serde::Serialize;

use super::error::ConfigError;
use super::model::{ContainerRef, ItemKind, SourceItem};
use super::timecode::try_parse_timecode;

/// One media-pool entry as the host reports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Host type label, e.g. "Video", "Video + Audio", "Still", "Timeline".
    pub type_label: String,
    /// Duration timecode; stills usually have none.
    pub duration: Option<String>,
    pub container: ContainerRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryClass {
    Media(ItemKind),
    Timeline,
    Unsupported,
}

pub fn classify_type(type_label: &str) -> EntryClass {
    if type_label.contains("Timeline") {
        EntryClass::Timeline
    } else if type_label.contains("Still") || type_label.contains("Image") {
        EntryClass::Media(ItemKind::Still)
    } else if type_label.contains("Video") {
        EntryClass::Media(ItemKind::Clip)
    } else {
        EntryClass::Unsupported
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    Timeline,
    Unsupported { type_label: String },
    UnknownDuration { duration: Option<String> },
    FilteredOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub entry: CatalogEntry,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogScan {
    pub eligible: Vec<SourceItem>,
    pub excluded: Vec<Exclusion>,
}

impl CatalogScan {
    pub fn clip_count(&self) -> usize {
        self.eligible.iter().filter(|item| !item.is_still()).count()
    }

    pub fn still_count(&self) -> usize {
        self.eligible.iter().filter(|item| item.is_still()).count()
    }

    /// Exclusions worth telling the user about; timelines are expected noise.
    pub fn notable_exclusions(&self) -> impl Iterator<Item = &Exclusion> {
        self.excluded
            .iter()
            .filter(|exclusion| !matches!(exclusion.reason, ExclusionReason::Timeline))
    }
}

pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|err| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: err.to_string(),
            })
        })
        .collect()
}

/// Split catalog entries into usable source items and the rest.
///
/// An empty `include` list selects every media entry; otherwise an entry must
/// match at least one pattern by name.
pub fn scan_entries(entries: Vec<CatalogEntry>, fps: f64, include: &[Regex]) -> CatalogScan {
    let mut scan = CatalogScan::default();

    for entry in entries {
        let kind = match classify_type(&entry.type_label) {
            EntryClass::Media(kind) => kind,
            EntryClass::Timeline => {
                scan.excluded.push(Exclusion {
                    entry,
                    reason: ExclusionReason::Timeline,
                });
                continue;
            }
            EntryClass::Unsupported => {
                let type_label = entry.type_label.clone();
                scan.excluded.push(Exclusion {
                    entry,
                    reason: ExclusionReason::Unsupported { type_label },
                });
                continue;
            }
        };

        if !include.is_empty() && !include.iter().any(|re| re.is_match(&entry.name)) {
            scan.excluded.push(Exclusion {
                entry,
                reason: ExclusionReason::FilteredOut,
            });
            continue;
        }

        let usable_frames = match kind {
            ItemKind::Still => 0,
            ItemKind::Clip => {
                let frames = entry
                    .duration
                    .as_deref()
                    .and_then(|duration| try_parse_timecode(duration, fps))
                    .unwrap_or(0);
                if frames == 0 {
                    let duration = entry.duration.clone();
                    scan.excluded.push(Exclusion {
                        entry,
                        reason: ExclusionReason::UnknownDuration { duration },
                    });
                    continue;
                }
                frames
            }
        };

        let item = match kind {
            ItemKind::Clip => SourceItem::clip(entry.id, usable_frames),
            ItemKind::Still => SourceItem::still(entry.id),
        };
        scan.eligible.push(item.with_name(entry.name).with_container(entry.container));
    }

    scan
}
