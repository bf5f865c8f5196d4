//! Cook-along timer engine
//!
//! This library provides the interactive timer core of a guided,
//! step-by-step cooking session. It includes:
//! - Duration mining from free-form recipe steps
//! - Independent countdown timers driven by an injectable scheduler
//! - Gesture-gated audio alerts with synthesized tones
//! - Native notifications with a blocking-prompt fallback
//! - A two-strategy wake lock that keeps the screen on
//! - The session controller and its terminal runtime

pub mod cli;
pub mod engine;
pub mod gesture;
pub mod notification;
pub mod parser;
pub mod platform;
pub mod scheduler;
pub mod session;
pub mod sound;
pub mod types;
pub mod wakelock;

// Re-export commonly used types for convenience
pub use types::{QuickPreset, SessionConfig, TimerId, TimerStatus, TimerView, WakeLockMode};

pub use engine::{CompletionAlerts, TickOutcome, Timer, TimerRegistry};
pub use gesture::{GestureKind, UserGesture};
pub use parser::{detect, format_clock, format_duration, DetectedDuration};
pub use scheduler::{ManualScheduler, Scheduler, TaskId, TokioScheduler};
pub use session::{PlaySessionController, SessionCommand, SessionComponents, SessionEvent};

// Re-export platform integrations and their mocks
pub use notification::{
    BlockingPrompt, Delivery, MockNativeNotifier, MockPrompt, NativeNotifier,
    NotificationDispatcher, NotificationError, Permission,
};
pub use sound::{AudioAlertEngine, AudioBackend, AudioContext, MockAudioBackend, SoundError};
pub use wakelock::{
    ActivityHost, KeepAwakeMedia, MockActivityHost, MockKeepAwakeMedia, PlatformCapabilities,
    StaticCapabilities, StrategyKind, WakeLockController, WakeLockError,
};
