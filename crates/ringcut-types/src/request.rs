use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::ContentHash;

/// Parameters for cutting a ringtone out of an uploaded asset.
///
/// `start` and `duration` are seconds. The request references the asset by
/// hash and is never persisted; a successful conversion echoes it back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub hash: ContentHash,
    pub start: f64,
    pub duration: f64,
    #[serde(default)]
    pub fade: bool,
}

impl ConversionRequest {
    pub fn new(hash: ContentHash, start: f64, duration: f64, fade: bool) -> Self {
        Self {
            hash,
            start,
            duration,
            fade,
        }
    }

    /// Check the window shape: `start >= 0`, `duration > 0`, both finite.
    ///
    /// Whether the window fits inside the source audio is not checked here.
    pub fn validate(&self) -> Result<(), TypeError> {
        if !self.start.is_finite() || self.start < 0.0 {
            return Err(TypeError::InvalidParameter {
                field: "start",
                reason: format!("must be a finite number >= 0, got {}", self.start),
            });
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(TypeError::InvalidParameter {
                field: "duration",
                reason: format!("must be a finite number > 0, got {}", self.duration),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: f64, duration: f64) -> ConversionRequest {
        ConversionRequest::new(ContentHash::of(b"asset"), start, duration, false)
    }

    #[test]
    fn valid_window() {
        assert!(request(0.0, 2.0).validate().is_ok());
        assert!(request(12.5, 0.01).validate().is_ok());
    }

    #[test]
    fn rejects_negative_start() {
        let err = request(-1.0, 2.0).validate().unwrap_err();
        assert!(matches!(err, TypeError::InvalidParameter { field: "start", .. }));
    }

    #[test]
    fn rejects_non_positive_duration() {
        for duration in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err = request(0.0, duration).validate().unwrap_err();
            assert!(matches!(err, TypeError::InvalidParameter { field: "duration", .. }));
        }
    }

    #[test]
    fn fade_defaults_to_false() {
        let hash = ContentHash::of(b"asset");
        let json = format!(r#"{{"hash":"{hash}","start":1,"duration":2}}"#);
        let parsed: ConversionRequest = serde_json::from_str(&json).unwrap();
        assert!(!parsed.fade);
        assert_eq!(parsed.start, 1.0);
    }

    #[test]
    fn echoes_as_json() {
        let req = ConversionRequest::new(ContentHash::of(b"asset"), 0.0, 2.0, true);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["hash"], req.hash.to_hex());
        assert_eq!(value["duration"], 2.0);
        assert_eq!(value["fade"], true);
    }
}
