use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ringcut_transcode::TranscoderConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "port";
/// Environment variable holding the storage root.
pub const ENV_STORAGE_PATH: &str = "STORAGE_PATH";
/// Environment variable naming the transcoder program.
pub const ENV_FFMPEG: &str = "RINGCUT_FFMPEG";
/// Environment variable bounding a single transcode, in seconds.
pub const ENV_TRANSCODE_TIMEOUT: &str = "RINGCUT_TRANSCODE_TIMEOUT_SECS";

pub const DEFAULT_PORT: u16 = 8877;

/// Startup configuration. Built once and handed to the server; nothing
/// reads the environment after that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub storage_root: PathBuf,
    pub max_upload_bytes: usize,
    pub transcoder: TranscoderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            storage_root: std::env::temp_dir().join("audio"),
            max_upload_bytes: 64 * 1024 * 1024,
            transcoder: TranscoderConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply overrides from an environment-like lookup.
    ///
    /// `port` replaces only the port of `bind_addr`.
    pub fn with_env<F>(mut self, lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("{ENV_PORT}={port:?}: {e}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            self.storage_root = PathBuf::from(path);
        }
        if let Some(program) = lookup(ENV_FFMPEG) {
            self.transcoder.program = PathBuf::from(program);
        }
        if let Some(secs) = lookup(ENV_TRANSCODE_TIMEOUT) {
            self.transcoder.timeout_secs = secs.trim().parse().map_err(|e| {
                ServerError::Config(format!("{ENV_TRANSCODE_TIMEOUT}={secs:?}: {e}"))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.transcoder.timeout_secs == 0 {
            return Err(ServerError::Config("transcoder timeout must be > 0".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ServerError::Config("max_upload_bytes must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8877".parse::<SocketAddr>().unwrap());
        assert!(c.storage_root.ends_with("audio"));
        assert_eq!(c.max_upload_bytes, 64 * 1024 * 1024);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn env_overrides() {
        let c = ServerConfig::default()
            .with_env(env(&[
                ("port", "9000"),
                ("STORAGE_PATH", "/srv/ringtones"),
                ("RINGCUT_FFMPEG", "/usr/local/bin/ffmpeg"),
                ("RINGCUT_TRANSCODE_TIMEOUT_SECS", "45"),
            ]))
            .unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.storage_root, PathBuf::from("/srv/ringtones"));
        assert_eq!(c.transcoder.program, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(c.transcoder.timeout_secs, 45);
    }

    #[test]
    fn empty_env_changes_nothing() {
        let c = ServerConfig::default().with_env(env(&[])).unwrap();
        assert_eq!(c, ServerConfig::default());
    }

    #[test]
    fn bad_port_is_config_error() {
        let err = ServerConfig::default()
            .with_env(env(&[("port", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn toml_roundtrip_and_partial_files() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "127.0.0.1:7000"

            [transcoder]
            timeout_secs = 20
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 7000);
        assert_eq!(c.transcoder.timeout_secs, 20);
        assert_eq!(c.transcoder.profile.format, "ipod");

        let text = c.to_toml().unwrap();
        assert_eq!(ServerConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut c = ServerConfig::default();
        c.transcoder.timeout_secs = 0;
        assert!(c.validate().is_err());
    }
}
