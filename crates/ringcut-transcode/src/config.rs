use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Encoder settings applied to every conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeProfile {
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub video_codec: String,
    /// Muxer name. `ipod` writes the `.m4r` ringtone container.
    pub format: String,
    /// Audio filter appended when a request asks for a fade.
    pub fade_filter: String,
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self {
            audio_codec: "libfdk_aac".into(),
            audio_bitrate: "96k".into(),
            video_codec: "copy".into(),
            format: "ipod".into(),
            fade_filter: "afade=t=in:ss=0:d=1.5".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    /// Program to execute, looked up on `PATH` when not absolute.
    pub program: PathBuf,
    pub timeout_secs: u64,
    pub profile: TranscodeProfile,
}

impl TranscoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            timeout_secs: 300,
            profile: TranscodeProfile::default(),
        }
    }
}
