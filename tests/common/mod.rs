use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A project file with V1 ending 10 seconds in and V2 ending 12.5 seconds in.
pub const SAMPLE_PROJECT: &str = r#"{
  "frame_rate": 24.0,
  "media_pool": {
    "name": "Master",
    "clips": [
      { "id": "tl", "name": "Timeline 1", "type": "Timeline" }
    ],
    "folders": [
      {
        "name": "B-Roll",
        "clips": [
          { "id": "beach", "name": "beach.mp4", "type": "Video", "duration": "00:00:04:00" },
          { "id": "city", "name": "city.mov", "type": "Video + Audio", "duration": "00:00:06:12" },
          { "id": "logo", "name": "logo.png", "type": "Still" },
          { "id": "broken", "name": "broken.mp4", "type": "Video", "duration": "--" }
        ]
      }
    ]
  },
  "timeline": {
    "name": "Timeline 1",
    "start_frame": 86400,
    "video_tracks": [
      { "items": [ { "id": "a1", "source": "city", "record_start": 86400, "record_end": 86640 } ] },
      { "items": [ { "id": "a2", "source": "beach", "record_start": 86400, "record_end": 86700 } ] }
    ],
    "audio_track_count": 2
  }
}
"#;

pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config file the commands are pointed at; created on first use.
    pub fn config_path(&self) -> PathBuf {
        self.path().join("broll.toml")
    }

    pub fn write_project(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
