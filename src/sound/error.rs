//! Sound system error types.
//!
//! None of these ever escape the alert engine: they are logged at the
//! boundary and leave the engine ready for a retry.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// A suspended audio context refused to resume.
    #[error("audio context could not be resumed: {0}")]
    ResumeFailed(String),

    /// Failed to create the audio output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if a later user gesture may fix this error.
    #[must_use]
    pub fn needs_gesture(&self) -> bool {
        matches!(self, Self::ResumeFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "Connect an audio output device",
            Self::ResumeFailed(_) => "Tap or press a key to enable sound",
            Self::StreamError(_) => "Check the audio settings",
            Self::PlaybackError(_) => "Restart the session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("audio device not available"));

        let err = SoundError::ResumeFailed("blocked".to_string());
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::ResumeFailed("x".into()).is_device_error());
        assert!(!SoundError::PlaybackError("x".into()).is_device_error());
    }

    #[test]
    fn test_needs_gesture() {
        assert!(SoundError::ResumeFailed("x".into()).needs_gesture());
        assert!(!SoundError::PlaybackError("x".into()).needs_gesture());
    }

    #[test]
    fn test_suggestion() {
        let err = SoundError::ResumeFailed("x".into());
        assert!(err.suggestion().contains("Tap"));

        let err = SoundError::DeviceNotAvailable("x".into());
        assert!(err.suggestion().contains("audio output"));
    }
}
