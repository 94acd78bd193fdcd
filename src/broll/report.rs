use serde_json::json;

use crate::ui::prelude::{Level, emit};

use super::catalog::{CatalogScan, ExclusionReason};
use super::executor::{AbortReason, FillOutcome, FillSummary};
use super::timecode::format_timecode;

#[derive(Debug, Clone)]
pub(crate) struct ReportLine {
    pub(crate) level: Level,
    pub(crate) code: &'static str,
    pub(crate) message: String,
    pub(crate) data: Option<serde_json::Value>,
}

impl ReportLine {
    pub(crate) fn new(level: Level, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            code,
            message: message.into(),
            data: None,
        }
    }

    fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

pub(crate) fn emit_report(lines: Vec<ReportLine>) {
    for line in lines {
        emit(line.level, line.code, &line.message, line.data);
    }
}

fn abort_explanation(reason: AbortReason, failure_limit: u32) -> String {
    match reason {
        AbortReason::FailureLimit => {
            format!("Stopped after {failure_limit} consecutive failed appends")
        }
        AbortReason::IterationCeiling => "Stopped at the append attempt ceiling".to_string(),
        AbortReason::TimedOut => "Stopped when the fill ran out of time".to_string(),
    }
}

pub(crate) fn outcome_lines(outcome: &FillOutcome, fps: f64, failure_limit: u32) -> Vec<ReportLine> {
    let summary = outcome.summary();
    let data = json!({
        "complete": outcome.is_complete(),
        "track": summary.target.track.0,
        "placed": summary.placed_count(),
        "filled_frames": summary.filled_frames,
        "target_frames": summary.target.target_frames,
        "attempts": summary.attempts,
        "failed_attempts": summary.failed_attempts,
    });

    let mut lines = Vec::new();
    match outcome {
        FillOutcome::Completed(summary) => {
            lines.push(
                ReportLine::new(
                    Level::Success,
                    "broll.fill.completed",
                    format!(
                        "Added {} clips to {} ({} filled)",
                        summary.placed_count(),
                        summary.target.track,
                        format_timecode(summary.filled_frames, fps)
                    ),
                )
                .with_data(data),
            );
        }
        FillOutcome::Aborted { summary, reason } => {
            lines.push(
                ReportLine::new(
                    Level::Warn,
                    "broll.fill.aborted",
                    format!(
                        "{}: added {} clips to {}, filled {} of {} frames ({} short)",
                        abort_explanation(*reason, failure_limit),
                        summary.placed_count(),
                        summary.target.track,
                        summary.filled_frames,
                        summary.target.target_frames,
                        format_timecode(summary.shortfall(), fps)
                    ),
                )
                .with_data(data),
            );
        }
    }
    lines
}

/// One line per placement, for dry runs and `--debug`.
pub(crate) fn placement_lines(summary: &FillSummary, fps: f64) -> Vec<ReportLine> {
    summary
        .placements
        .iter()
        .map(|placement| {
            let c = &placement.candidate;
            ReportLine::new(
                Level::Info,
                "broll.fill.placement",
                format!(
                    "{:>10}  {:<32} src {:>6}..{:<6} {}",
                    c.record_position,
                    c.item.name,
                    c.trim_start,
                    c.trim_end(),
                    format_timecode(c.trim_length, fps)
                ),
            )
            .with_data(json!(c))
        })
        .collect()
}

/// Warnings for media a fill will skip. Filtered and unsupported entries only
/// show up with `--debug`.
pub(crate) fn exclusion_lines(scan: &CatalogScan) -> Vec<ReportLine> {
    scan.notable_exclusions()
        .map(|exclusion| {
            let why = match &exclusion.reason {
                ExclusionReason::UnknownDuration { duration } => format!(
                    "unknown length ({})",
                    duration.as_deref().unwrap_or("no duration")
                ),
                ExclusionReason::Unsupported { type_label } => {
                    format!("unsupported type {type_label}")
                }
                ExclusionReason::FilteredOut => "not matched by --include".to_string(),
                ExclusionReason::Timeline => "timeline".to_string(),
            };
            let level = match exclusion.reason {
                ExclusionReason::UnknownDuration { .. } => Level::Warn,
                _ => Level::Debug,
            };
            ReportLine::new(
                level,
                "broll.scan.excluded",
                format!("Skipping {}: {why}", exclusion.entry.name),
            )
            .with_data(json!(exclusion))
        })
        .collect()
}

pub(crate) fn scan_lines(scan: &CatalogScan) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = scan
        .eligible
        .iter()
        .map(|item| {
            let length = if item.is_still() {
                "still".to_string()
            } else {
                format!("{} frames", item.usable_frames)
            };
            ReportLine::new(
                Level::Info,
                "broll.scan.item",
                format!("{}  {}  ({length})", item.container, item.name),
            )
            .with_data(json!(item))
        })
        .collect();

    lines.extend(exclusion_lines(scan));

    lines.push(ReportLine::new(
        Level::Info,
        "broll.scan.summary",
        format!(
            "Found {} usable items ({} clips, {} stills)",
            scan.eligible.len(),
            scan.clip_count(),
            scan.still_count()
        ),
    ));
    lines
}
