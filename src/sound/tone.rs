//! Alert tone synthesis.
//!
//! Tones are generated sample by sample rather than decoded from files, so
//! the alert works without any bundled assets. Each tone is a sine wave
//! shaped by a short linear attack and release to avoid clicks at the
//! edges.

use std::f32::consts::TAU;
use std::time::Duration;

use rodio::Source;

/// Output sample rate for synthesized tones.
pub const SAMPLE_RATE: u32 = 44_100;

/// Envelope rise time.
pub const ATTACK: Duration = Duration::from_millis(10);

/// Envelope fall time.
pub const RELEASE: Duration = Duration::from_millis(30);

/// Peak amplitude of alert tones.
pub const ALERT_GAIN: f32 = 0.3;

/// Length of the inaudible buffer played on unlock.
pub const UNLOCK_BUFFER: Duration = Duration::from_millis(50);

/// One tone within a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz (0 for silence)
    pub frequency_hz: f32,
    /// Start time relative to the start of the sequence
    pub offset: Duration,
    /// How long the tone sounds
    pub duration: Duration,
}

impl Tone {
    pub const fn new(frequency_hz: f32, offset_ms: u64, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            offset: Duration::from_millis(offset_ms),
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// Time at which this tone stops sounding.
    pub fn end(&self) -> Duration {
        self.offset + self.duration
    }
}

/// Completion alert: two short high tones, then a longer lower one.
pub const ALERT_PATTERN: [Tone; 3] = [
    Tone::new(880.0, 0, 150),
    Tone::new(880.0, 200, 150),
    Tone::new(660.0, 400, 400),
];

/// A finite mono sine source with an attack/release envelope.
#[derive(Debug, Clone)]
pub struct ToneSource {
    frequency_hz: f32,
    gain: f32,
    total_samples: usize,
    attack_samples: usize,
    release_samples: usize,
    index: usize,
}

fn samples_for(duration: Duration) -> usize {
    (duration.as_secs_f64() * f64::from(SAMPLE_RATE)).round() as usize
}

impl ToneSource {
    /// Creates a source for `tone` at the given peak gain.
    #[must_use]
    pub fn new(tone: &Tone, gain: f32) -> Self {
        let total_samples = samples_for(tone.duration);
        // Short tones split the envelope rather than overlapping it.
        let half = total_samples / 2;
        Self {
            frequency_hz: tone.frequency_hz,
            gain,
            total_samples,
            attack_samples: samples_for(ATTACK).min(half),
            release_samples: samples_for(RELEASE).min(half),
            index: 0,
        }
    }

    /// Creates a silent source of the given length.
    #[must_use]
    pub fn silence(duration: Duration) -> Self {
        Self::new(
            &Tone {
                frequency_hz: 0.0,
                offset: Duration::ZERO,
                duration,
            },
            0.0,
        )
    }

    /// Envelope level (0.0..=1.0) at sample `i`.
    fn envelope(&self, i: usize) -> f32 {
        if self.attack_samples > 0 && i < self.attack_samples {
            return i as f32 / self.attack_samples as f32;
        }
        let until_end = self.total_samples.saturating_sub(i);
        if self.release_samples > 0 && until_end <= self.release_samples {
            return until_end as f32 / self.release_samples as f32;
        }
        1.0
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total_samples {
            return None;
        }
        let i = self.index;
        self.index += 1;

        if self.gain == 0.0 || self.frequency_hz <= 0.0 {
            return Some(0.0);
        }
        let t = i as f32 / SAMPLE_RATE as f32;
        Some((TAU * self.frequency_hz * t).sin() * self.gain * self.envelope(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total_samples - self.index;
        (left, Some(left))
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.index)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.total_samples as f64 / f64::from(SAMPLE_RATE),
        ))
    }
}

/// Splits a tone sequence into (leading silence, tone) pairs for sequential
/// playback on a single sink.
#[must_use]
pub fn with_gaps(tones: &[Tone]) -> Vec<(Duration, Tone)> {
    let mut cursor = Duration::ZERO;
    tones
        .iter()
        .map(|tone| {
            let gap = tone.offset.saturating_sub(cursor);
            cursor = cursor.max(tone.end());
            (gap, *tone)
        })
        .collect()
}
