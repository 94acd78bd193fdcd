use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::path::PathBuf;

use crate::ui::is_debug_enabled;
use crate::ui::prelude::*;

use super::catalog::{compile_patterns, scan_entries};
use super::cli::{BrollCommands, FillArgs, ScanArgs, TimecodeArgs, TracksArgs};
use super::config::BrollConfig;
use super::error::FillError;
use super::executor::FillExecutor;
use super::host::EditingHost;
use super::model::TrackIndex;
use super::project::ProjectHost;
use super::report::{
    ReportLine, emit_report, exclusion_lines, outcome_lines, placement_lines, scan_lines,
};
use super::settings::FillSettings;
use super::target::{
    FillMode, TargetDecision, commit_destination, derive_target, destination_choices,
    destination_start, validate_destination,
};
use super::timecode::{checked_frame_rate, format_timecode, parse_timecode, try_parse_timecode};

pub fn handle_broll_command(command: BrollCommands, config_path: Option<&PathBuf>) -> Result<()> {
    let config = BrollConfig::resolve(config_path)?;
    match command {
        BrollCommands::Fill(args) => handle_fill(args, &config),
        BrollCommands::Scan(args) => handle_scan(args, &config),
        BrollCommands::Tracks(args) => handle_tracks(args, &config),
        BrollCommands::Timecode(args) => handle_timecode(args, &config),
    }
}

fn handle_fill(args: FillArgs, config: &BrollConfig) -> Result<()> {
    let mut host = ProjectHost::open(&args.project, config.default_frame_rate)?;
    let fps = host.fps();
    let settings = FillSettings::resolve(&args, config, fps)?;

    validate_destination(settings.destination, settings.mode, host.video_track_count())?;

    let start = destination_start(&host, settings.destination)?;
    let (target_frames, start_position) = match derive_target(&host, settings.mode, start, fps)? {
        TargetDecision::NothingToAdd {
            reference_end,
            start_position,
        } => {
            let reference = match settings.mode {
                FillMode::MatchTrack { reference } => reference,
                FillMode::Fixed { .. } => TrackIndex(config.reference_track),
            };
            emit(
                Level::Info,
                "broll.fill.nothing_to_add",
                &format!(
                    "Selected track is already longer than Track {}. Nothing to add.",
                    reference.0
                ),
                Some(json!({
                    "reference_end": reference_end,
                    "start_position": start_position,
                })),
            );
            return Ok(());
        }
        TargetDecision::Fill {
            target_frames,
            start_position,
        } => (target_frames, start_position),
    };
    if target_frames == 0 {
        emit(
            Level::Info,
            "broll.fill.nothing_to_add",
            "Requested duration is shorter than one frame. Nothing to add.",
            None,
        );
        return Ok(());
    }

    let scan = scan_entries(host.media_entries(), fps, &settings.include);
    emit_report(exclusion_lines(&scan));
    if scan.eligible.is_empty() {
        return Err(FillError::NoEligibleItems.into());
    }
    emit(
        Level::Info,
        "broll.fill.sources",
        &format!(
            "Found {} usable items ({} clips, {} stills)",
            scan.eligible.len(),
            scan.clip_count(),
            scan.still_count()
        ),
        None,
    );

    let target = commit_destination(&mut host, settings.destination, target_frames, start_position)?;
    emit(
        Level::Info,
        "broll.fill.target",
        &format!(
            "Targeting Video Track {} from frame {} for {} ({} frames)",
            target.track.0,
            target.start_position,
            format_timecode(target.target_frames, fps),
            target.target_frames
        ),
        Some(json!(target)),
    );

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let outcome = FillExecutor::new(&mut host, rng)
        .with_limits(config.executor_limits())
        .run(target, &scan.eligible, settings.range)?;
    host.reset_folder();
    emit(
        Level::Debug,
        "broll.fill.folder",
        &format!("Media pool folder reset to {}", host.current_folder()),
        None,
    );

    if args.dry_run || is_debug_enabled() {
        let level = if args.dry_run { Level::Info } else { Level::Debug };
        emit_report(
            placement_lines(outcome.summary(), fps)
                .into_iter()
                .map(|line| ReportLine { level, ..line })
                .collect(),
        );
    }
    emit_report(outcome_lines(&outcome, fps, config.failure_limit));

    if args.dry_run {
        emit(
            Level::Info,
            "broll.fill.dry_run",
            "Dry run: project left unchanged",
            None,
        );
        return Ok(());
    }

    let out_path = args.out_file.as_ref().unwrap_or(&args.project);
    host.into_document()
        .save(out_path)
        .with_context(|| format!("saving filled project to {}", out_path.display()))?;
    emit(
        Level::Success,
        "broll.fill.saved",
        &format!("Saved {}", out_path.display()),
        Some(json!({ "path": out_path })),
    );
    Ok(())
}

fn handle_scan(args: ScanArgs, config: &BrollConfig) -> Result<()> {
    let host = ProjectHost::open(&args.project, config.default_frame_rate)?;
    let fps = host.fps();
    let include = compile_patterns(&args.include)?;
    let scan = scan_entries(host.media_entries(), fps, &include);
    emit_report(scan_lines(&scan));
    Ok(())
}

fn handle_tracks(args: TracksArgs, config: &BrollConfig) -> Result<()> {
    let host = ProjectHost::open(&args.project, config.default_frame_rate)?;
    let fps = host.fps();
    let start = host.timeline_start_frame();

    emit(
        Level::Info,
        "broll.tracks.timeline",
        &format!("Timeline: {}", host.document().timeline.name),
        None,
    );
    for track in 1..=host.video_track_count() {
        let end = host.track_end_frame(TrackIndex(track))?;
        let length = (end - start).max(0) as u64;
        emit(
            Level::Info,
            "broll.tracks.track",
            &format!(
                "V{track}  ends at frame {end}  ({} from start)",
                format_timecode(length, fps)
            ),
            Some(json!({ "track": track, "end_frame": end })),
        );
    }

    separator();
    for choice in destination_choices(host.video_track_count()) {
        emit(
            Level::Info,
            "broll.tracks.choice",
            &format!("Destination: {}", choice.label),
            Some(json!({ "label": choice.label })),
        );
    }
    Ok(())
}

fn handle_timecode(args: TimecodeArgs, config: &BrollConfig) -> Result<()> {
    let fps = checked_frame_rate(args.fps.unwrap_or(config.default_frame_rate))?;
    if try_parse_timecode(&args.timecode, fps).is_none() {
        emit(
            Level::Warn,
            "broll.timecode.unparsed",
            &format!("Could not parse '{}', treating it as 0 frames", args.timecode),
            None,
        );
    }
    let frames = parse_timecode(&args.timecode, fps);
    emit(
        Level::Info,
        "broll.timecode.frames",
        &frames.to_string(),
        Some(json!({ "timecode": args.timecode, "fps": fps, "frames": frames })),
    );
    Ok(())
}
