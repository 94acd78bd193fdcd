use clap::{Args, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum BrollCommands {
    /// Fill a track with random segments from the media pool
    Fill(FillArgs),
    /// List the media that a fill would draw from
    Scan(ScanArgs),
    /// List destination tracks and where they end
    Tracks(TracksArgs),
    /// Convert a timecode to a frame count
    Timecode(TimecodeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// Project file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(value_hint = ValueHint::FilePath)]
    pub project: PathBuf,

    /// Destination: "new" for a new track, or an existing track number
    #[arg(short = 't', long, default_value = "new")]
    pub track: String,

    /// Shortest segment in seconds (config: min_seconds)
    #[arg(long, value_name = "SECONDS")]
    pub min: Option<f64>,

    /// Longest segment in seconds (config: max_seconds)
    #[arg(long, value_name = "SECONDS")]
    pub max: Option<f64>,

    /// Add a fixed number of seconds instead of matching the reference track
    #[arg(long, value_name = "SECONDS", conflicts_with = "fixed")]
    pub seconds: Option<f64>,

    /// Add the configured fixed duration instead of matching the reference track
    #[arg(long)]
    pub fixed: bool,

    /// Track whose end is matched (config: reference_track)
    #[arg(long, value_name = "TRACK")]
    pub reference_track: Option<u32>,

    /// Only use media whose name matches this regex (repeatable)
    #[arg(short = 'i', long = "include", value_name = "REGEX")]
    pub include: Vec<String>,

    /// Seed the random draws for a reproducible fill
    #[arg(long)]
    pub seed: Option<u64>,

    /// Plan and report without writing the project
    #[arg(long)]
    pub dry_run: bool,

    /// Write the result here instead of back to the project file
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Project file to scan
    #[arg(value_hint = ValueHint::FilePath)]
    pub project: PathBuf,

    /// Only list media whose name matches this regex (repeatable)
    #[arg(short = 'i', long = "include", value_name = "REGEX")]
    pub include: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TracksArgs {
    /// Project file to inspect
    #[arg(value_hint = ValueHint::FilePath)]
    pub project: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TimecodeArgs {
    /// Timecode such as 01:00:10:12 or 00:00:59;29
    pub timecode: String,

    /// Frame rate (config: default_frame_rate)
    #[arg(long)]
    pub fps: Option<f64>,
}
