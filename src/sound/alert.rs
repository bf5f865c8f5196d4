//! The session's alert tone engine.

use tracing::{debug, info, warn};

use super::error::SoundError;
use super::tone::{ALERT_PATTERN, UNLOCK_BUFFER};
use super::{AudioBackend, AudioContext};
use crate::gesture::UserGesture;

/// Plays the completion alert on one lazily opened audio context.
///
/// Audio is a convenience: no method here returns an error or panics on
/// audio failure. Failures are logged and leave the engine ready to retry.
pub struct AudioAlertEngine {
    backend: Box<dyn AudioBackend>,
    context: Option<Box<dyn AudioContext>>,
    unlocked: bool,
    muted: bool,
}

impl AudioAlertEngine {
    /// Creates an engine. No audio device is touched until first use.
    pub fn new(backend: impl AudioBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            context: None,
            unlocked: false,
            muted: false,
        }
    }

    /// Returns true once a gesture has successfully primed playback.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Returns true if the audio context has been opened.
    #[must_use]
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Silences `alert()`. Unlocking still works while muted.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        debug!("Alert sound {}", if muted { "muted" } else { "unmuted" });
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Primes audio playback from inside a user gesture.
    ///
    /// Opens the context if needed, resumes it if the platform suspended
    /// it, and plays a short silent buffer. After the first success every
    /// further call returns immediately. Returns the unlocked flag.
    pub fn unlock(&mut self, gesture: &UserGesture) -> bool {
        if self.unlocked {
            return true;
        }

        match self.try_unlock() {
            Ok(()) => {
                self.unlocked = true;
                info!("Audio unlocked by {} gesture", gesture.kind());
            }
            Err(e) if e.needs_gesture() => {
                info!("Audio still suspended, will retry on next gesture: {}", e);
            }
            Err(e) => {
                warn!("Audio unlock failed, will retry on next gesture: {}", e);
            }
        }
        self.unlocked
    }

    /// Plays the three-tone completion alert. Never fails.
    pub fn alert(&mut self) {
        if self.muted {
            debug!("Alert sound muted, skipping");
            return;
        }
        match self.try_alert() {
            Ok(()) => {}
            Err(e) if e.is_device_error() => {
                debug!("No audio output, alert tone skipped: {}", e);
            }
            Err(e) => warn!("Alert tone not played: {} ({})", e, e.suggestion()),
        }
    }

    fn try_unlock(&mut self) -> Result<(), SoundError> {
        let context = self.ensure_context()?;
        if context.is_suspended() {
            context.resume()?;
        }
        context.play_silence(UNLOCK_BUFFER)
    }

    fn try_alert(&mut self) -> Result<(), SoundError> {
        let context = self.ensure_context()?;
        if context.is_suspended() {
            context.resume()?;
        }
        context.play_tones(&ALERT_PATTERN)
    }

    fn ensure_context(&mut self) -> Result<&mut Box<dyn AudioContext>, SoundError> {
        if self.context.is_none() {
            let context = self.backend.open()?;
            debug!("Audio context opened");
            return Ok(self.context.insert(context));
        }
        self.context
            .as_mut()
            .ok_or_else(|| SoundError::DeviceNotAvailable("no audio context".to_string()))
    }
}

impl std::fmt::Debug for AudioAlertEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioAlertEngine")
            .field("has_context", &self.context.is_some())
            .field("unlocked", &self.unlocked)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureKind;
    use crate::sound::MockAudioBackend;

    fn tap() -> UserGesture {
        UserGesture::new(GestureKind::Touch)
    }

    fn create_engine() -> (AudioAlertEngine, MockAudioBackend) {
        let backend = MockAudioBackend::new();
        (AudioAlertEngine::new(backend.clone()), backend)
    }

    mod unlock_tests {
        use super::*;

        #[test]
        fn test_context_is_lazy() {
            let (engine, backend) = create_engine();
            assert!(!engine.has_context());
            assert!(!engine.is_unlocked());
            assert_eq!(backend.open_count(), 0);
        }

        #[test]
        fn test_unlock_plays_silent_buffer_once() {
            let (mut engine, backend) = create_engine();

            assert!(engine.unlock(&tap()));
            assert!(engine.is_unlocked());
            assert_eq!(backend.open_count(), 1);
            assert_eq!(backend.silence_count(), 1);
        }

        #[test]
        fn test_repeated_unlock_has_no_side_effects() {
            let (mut engine, backend) = create_engine();
            engine.unlock(&tap());

            for _ in 0..10 {
                assert!(engine.unlock(&tap()));
            }

            assert!(engine.is_unlocked());
            assert_eq!(backend.open_count(), 1);
            assert_eq!(backend.silence_count(), 1);
            assert_eq!(backend.resume_count(), 0);
        }

        #[test]
        fn test_unlock_resumes_suspended_context() {
            let (mut engine, backend) = create_engine();
            backend.set_starts_suspended(true);

            assert!(engine.unlock(&tap()));
            assert_eq!(backend.resume_count(), 1);
        }

        #[test]
        fn test_failed_resume_is_retried_on_next_gesture() {
            let (mut engine, backend) = create_engine();
            backend.set_starts_suspended(true);
            backend.set_resume_fails(true);

            assert!(!engine.unlock(&tap()));
            assert!(!engine.is_unlocked());
            assert_eq!(backend.silence_count(), 0);

            backend.set_resume_fails(false);
            assert!(engine.unlock(&tap()));
            // Context is reused, not reopened
            assert_eq!(backend.open_count(), 1);
            assert_eq!(backend.resume_count(), 2);
        }

        #[test]
        fn test_missing_device_leaves_engine_locked() {
            let (mut engine, backend) = create_engine();
            backend.set_open_fails(true);

            assert!(!engine.unlock(&tap()));
            assert!(!engine.has_context());

            backend.set_open_fails(false);
            assert!(engine.unlock(&tap()));
        }

        #[test]
        fn test_unlock_while_muted() {
            let (mut engine, backend) = create_engine();
            engine.set_muted(true);
            assert!(engine.unlock(&tap()));
            assert_eq!(backend.silence_count(), 1);
        }
    }

    mod alert_tests {
        use super::*;

        #[test]
        fn test_alert_plays_pattern() {
            let (mut engine, backend) = create_engine();
            engine.unlock(&tap());
            engine.alert();

            assert_eq!(backend.played(), vec![ALERT_PATTERN.to_vec()]);
        }

        #[test]
        fn test_alert_without_unlock_still_attempts() {
            let (mut engine, backend) = create_engine();
            engine.alert();
            assert_eq!(backend.alert_count(), 1);
            assert!(!engine.is_unlocked());
        }

        #[test]
        fn test_alert_failures_are_swallowed() {
            let (mut engine, backend) = create_engine();
            backend.set_open_fails(true);
            engine.alert();

            backend.set_open_fails(false);
            backend.set_play_fails(true);
            engine.alert();

            assert_eq!(backend.alert_count(), 0);
            assert!(engine.has_context());
        }

        #[test]
        fn test_alert_with_unresumable_context() {
            let (mut engine, backend) = create_engine();
            backend.set_starts_suspended(true);
            backend.set_resume_fails(true);

            engine.alert();
            assert_eq!(backend.alert_count(), 0);
        }

        #[test]
        fn test_muted_alert_is_silent() {
            let (mut engine, backend) = create_engine();
            engine.set_muted(true);
            engine.alert();
            assert_eq!(backend.alert_count(), 0);
            assert_eq!(backend.open_count(), 0);
        }
    }
}
