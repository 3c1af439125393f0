//! Error type shared by the bridge commands and the custom protocol

use serde::{Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("frame not ready (scene still loading)")]
    FrameNotReady,

    #[error("shared state lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("frame buffer does not match {width}x{height}")]
    FrameSize { width: u32, height: u32 },

    #[error("failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build response: {0}")]
    Http(#[from] tauri::http::Error),

    #[error("invalid scene time {0}: must be finite and non-negative")]
    InvalidTime(f64),
}

impl BridgeError {
    /// HTTP status used when the error surfaces through the `frame://` protocol
    pub fn status(&self) -> u16 {
        match self {
            BridgeError::FrameNotReady => 503,
            BridgeError::InvalidTime(_) => 400,
            _ => 500,
        }
    }
}

// Commands hand errors to the web view as plain strings
impl Serialize for BridgeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_string(&BridgeError::FrameNotReady).unwrap();
        assert_eq!(json, "\"frame not ready (scene still loading)\"");
    }

    #[test]
    fn maps_to_http_status() {
        assert_eq!(BridgeError::FrameNotReady.status(), 503);
        assert_eq!(BridgeError::InvalidTime(-1.0).status(), 400);
        assert_eq!(BridgeError::LockPoisoned("frame buffer").status(), 500);
    }
}
