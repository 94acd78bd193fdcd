use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the binary with `--config` pointing into the test environment.
pub fn run_broll_command(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_broll"))
        .arg("--no-color")
        .arg("--config")
        .arg(env.config_path())
        .args(args)
        .current_dir(env.path())
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

pub fn read_project(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// `(record_start, record_end)` of every item on a 1-based video track.
pub fn track_spans(project: &Value, track: usize) -> Vec<(i64, i64)> {
    project["timeline"]["video_tracks"][track - 1]["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    (
                        item["record_start"].as_i64().unwrap_or_default(),
                        item["record_end"].as_i64().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Spans must butt up against each other with no gaps or overlaps.
pub fn assert_contiguous(spans: &[(i64, i64)], start: i64, end: i64) {
    assert!(!spans.is_empty(), "track has no items");
    assert_eq!(spans[0].0, start, "first item starts late: {spans:?}");
    for pair in spans.windows(2) {
        assert_eq!(pair[0].1, pair[1].0, "gap or overlap in {spans:?}");
    }
    assert_eq!(spans[spans.len() - 1].1, end, "track ends wrong: {spans:?}");
}
