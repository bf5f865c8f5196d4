//! Audio backend implementation using rodio.
//!
//! This module provides the `RodioBackend`, which opens the default output
//! device through rodio v0.20 and plays synthesized tones on it.

use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::error::SoundError;
use super::tone::{with_gaps, Tone, ToneSource, ALERT_GAIN};
use super::{AudioBackend, AudioContext};

/// Opens audio contexts on the default rodio output device.
#[derive(Debug, Default)]
pub struct RodioBackend;

impl RodioBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for RodioBackend {
    fn open(&mut self) -> Result<Box<dyn AudioContext>, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Box::new(RodioContext {
            _stream: stream,
            stream_handle,
        }))
    }
}

/// A live rodio output stream.
///
/// Desktop output streams are never suspended, so `resume` has nothing to
/// do; the unlock sequence still plays its silent buffer through it.
pub struct RodioContext {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioContext {
    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl AudioContext for RodioContext {
    fn is_suspended(&self) -> bool {
        false
    }

    fn resume(&mut self) -> Result<(), SoundError> {
        Ok(())
    }

    fn play_silence(&mut self, duration: Duration) -> Result<(), SoundError> {
        let sink = self.new_sink()?;
        sink.append(ToneSource::silence(duration));
        sink.detach();
        Ok(())
    }

    fn play_tones(&mut self, tones: &[Tone]) -> Result<(), SoundError> {
        let sink = self.new_sink()?;
        for (gap, tone) in with_gaps(tones) {
            if !gap.is_zero() {
                sink.append(ToneSource::silence(gap));
            }
            sink.append(ToneSource::new(&tone, ALERT_GAIN));
        }
        sink.detach(); // Non-blocking: tones continue after this returns

        debug!("Alert tones queued ({} tones)", tones.len());
        Ok(())
    }
}

impl std::fmt::Debug for RodioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::tone::ALERT_PATTERN;

    // Note: These tests may run in environments without audio hardware
    // (e.g., CI containers). They skip when no device can be opened.

    #[test]
    fn test_open_without_device_reports_error() {
        let mut backend = RodioBackend::new();
        match backend.open() {
            Ok(context) => assert!(!context.is_suspended()),
            Err(e) => assert!(e.is_device_error()),
        }
    }

    #[test]
    fn test_play_alert_pattern() {
        let mut backend = RodioBackend::new();
        let mut context = match backend.open() {
            Ok(c) => c,
            Err(_) => return, // Skip test if no audio
        };

        assert!(context.resume().is_ok());
        let _ = context.play_tones(&ALERT_PATTERN);
    }
}
