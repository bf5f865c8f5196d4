//! Audible completion alerts.
//!
//! This module provides the alert tone for finished timers, including:
//!
//! - A lazily opened audio context shared by every alert in a session
//! - A gesture-gated unlock that primes playback on restrictive platforms
//! - Tone synthesis (no bundled sound files)
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ AudioAlertEngine │ ← unlock() / alert()
//! └────────┬─────────┘
//!          │ opens lazily
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   AudioBackend   │────▶│   AudioContext   │
//! │ (rodio / mock)   │     │ resume, play     │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use cookalong::gesture::{GestureKind, UserGesture};
//! use cookalong::sound::{AudioAlertEngine, RodioBackend};
//!
//! let mut engine = AudioAlertEngine::new(RodioBackend::new());
//!
//! // Inside an input handler
//! engine.unlock(&UserGesture::new(GestureKind::Click));
//!
//! // Later, from a timer callback; never fails
//! engine.alert();
//! ```

mod alert;
mod error;
mod player;
pub mod tone;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use alert::AudioAlertEngine;
pub use error::SoundError;
pub use player::{RodioBackend, RodioContext};
pub use tone::{Tone, ALERT_PATTERN};

/// Factory for audio contexts.
pub trait AudioBackend {
    /// Opens a new audio context on the output device.
    ///
    /// # Errors
    ///
    /// Returns an error if no output device can be opened.
    fn open(&mut self) -> Result<Box<dyn AudioContext>, SoundError>;
}

/// An open audio output.
pub trait AudioContext {
    /// Returns true if the platform suspended this context until a gesture.
    fn is_suspended(&self) -> bool;

    /// Resumes a suspended context.
    fn resume(&mut self) -> Result<(), SoundError>;

    /// Plays an inaudible buffer of the given length.
    fn play_silence(&mut self, duration: Duration) -> Result<(), SoundError>;

    /// Queues a tone sequence. Must not block until playback ends.
    fn play_tones(&mut self, tones: &[Tone]) -> Result<(), SoundError>;
}

// ============================================================================
// Mock
// ============================================================================

#[derive(Debug, Default)]
struct MockAudioState {
    open_fails: AtomicBool,
    starts_suspended: AtomicBool,
    resume_fails: AtomicBool,
    play_fails: AtomicBool,
    open_count: AtomicUsize,
    resume_count: AtomicUsize,
    silence_count: AtomicUsize,
    played: Mutex<Vec<Vec<Tone>>>,
}

/// Mock audio backend for testing.
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockAudioBackend {
    state: Arc<MockAudioState>,
}

impl MockAudioBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open_fails(&self, fails: bool) {
        self.state.open_fails.store(fails, Ordering::SeqCst);
    }

    pub fn set_starts_suspended(&self, suspended: bool) {
        self.state.starts_suspended.store(suspended, Ordering::SeqCst);
    }

    pub fn set_resume_fails(&self, fails: bool) {
        self.state.resume_fails.store(fails, Ordering::SeqCst);
    }

    pub fn set_play_fails(&self, fails: bool) {
        self.state.play_fails.store(fails, Ordering::SeqCst);
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.state.open_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn resume_count(&self) -> usize {
        self.state.resume_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn silence_count(&self) -> usize {
        self.state.silence_count.load(Ordering::SeqCst)
    }

    /// Tone sequences played so far, one entry per alert.
    #[must_use]
    pub fn played(&self) -> Vec<Vec<Tone>> {
        self.state.played.lock().unwrap().clone()
    }

    #[must_use]
    pub fn alert_count(&self) -> usize {
        self.state.played.lock().unwrap().len()
    }
}

impl AudioBackend for MockAudioBackend {
    fn open(&mut self) -> Result<Box<dyn AudioContext>, SoundError> {
        if self.state.open_fails.load(Ordering::SeqCst) {
            return Err(SoundError::DeviceNotAvailable("Mock failure".to_string()));
        }
        self.state.open_count.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockAudioContext {
            suspended: self.state.starts_suspended.load(Ordering::SeqCst),
            state: Arc::clone(&self.state),
        }))
    }
}

#[derive(Debug)]
struct MockAudioContext {
    suspended: bool,
    state: Arc<MockAudioState>,
}

impl AudioContext for MockAudioContext {
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), SoundError> {
        self.state.resume_count.fetch_add(1, Ordering::SeqCst);
        if self.state.resume_fails.load(Ordering::SeqCst) {
            return Err(SoundError::ResumeFailed("Mock failure".to_string()));
        }
        self.suspended = false;
        Ok(())
    }

    fn play_silence(&mut self, _duration: Duration) -> Result<(), SoundError> {
        if self.state.play_fails.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.state.silence_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn play_tones(&mut self, tones: &[Tone]) -> Result<(), SoundError> {
        if self.state.play_fails.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.state.played.lock().unwrap().push(tones.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_playback() {
        let mut backend = MockAudioBackend::new();
        let mut context = backend.open().unwrap();

        context.play_silence(Duration::from_millis(10)).unwrap();
        context.play_tones(&ALERT_PATTERN).unwrap();

        assert_eq!(backend.open_count(), 1);
        assert_eq!(backend.silence_count(), 1);
        assert_eq!(backend.played(), vec![ALERT_PATTERN.to_vec()]);
    }

    #[test]
    fn test_mock_suspended_context() {
        let mut backend = MockAudioBackend::new();
        backend.set_starts_suspended(true);

        let mut context = backend.open().unwrap();
        assert!(context.is_suspended());
        context.resume().unwrap();
        assert!(!context.is_suspended());
    }

    #[test]
    fn test_mock_failures() {
        let mut backend = MockAudioBackend::new();
        backend.set_open_fails(true);
        assert!(backend.open().is_err());

        backend.set_open_fails(false);
        backend.set_play_fails(true);
        let mut context = backend.open().unwrap();
        assert!(context.play_tones(&ALERT_PATTERN).is_err());
        assert_eq!(backend.alert_count(), 0);
    }
}
