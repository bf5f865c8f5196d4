//! Keeping the screen awake during a cook-along session.
//!
//! Two strategies exist and one is chosen when the controller is built:
//!
//! - **Modern**: a keep-awake media resource (a held sleep inhibitor)
//!   that may only start playing from a user gesture.
//! - **Legacy**: for hosts without a wake-lock primitive, a recurring
//!   task simulates activity every [`LEGACY_REASSERT_PERIOD`] by starting a
//!   navigation and cancelling it immediately.
//!
//! The legacy technique is timing-sensitive. If the cancel loses the race
//! the host may perform the navigation for real. It is kept only as the
//! fallback for hosts that offer nothing better.
//!
//! # Error Handling
//!
//! All errors in this module are recoverable. They are logged and the
//! controller stays disabled until the next gesture retries.

pub mod capability;
pub mod error;
pub mod legacy;
pub mod modern;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::gesture::UserGesture;
use crate::scheduler::{Scheduler, TaskId};

pub use capability::{DetectedCapabilities, PlatformCapabilities, StaticCapabilities};
pub use error::WakeLockError;
pub use legacy::{ActivityHost, ScreensaverPoke};
pub use modern::{InhibitorProcess, KeepAwakeMedia};

/// Interval between legacy activity simulations.
pub const LEGACY_REASSERT_PERIOD: Duration = Duration::from_secs(15);

/// The strategy a controller uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Modern,
    Legacy,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Modern => write!(f, "modern"),
            StrategyKind::Legacy => write!(f, "legacy"),
        }
    }
}

enum Strategy {
    Modern {
        media: Box<dyn KeepAwakeMedia>,
    },
    Legacy {
        host: Box<dyn ActivityHost>,
        task: Option<TaskId>,
    },
}

/// Prevents the device from sleeping while a session is active.
pub struct WakeLockController {
    strategy: Strategy,
    wants_enabled: bool,
    enabled: bool,
}

impl WakeLockController {
    /// Picks the strategy from `capabilities`. Only the backend of the
    /// chosen strategy is kept.
    pub fn new(
        capabilities: &dyn PlatformCapabilities,
        media: impl KeepAwakeMedia + 'static,
        host: impl ActivityHost + 'static,
    ) -> Self {
        let strategy = if capabilities.supports_modern_wake_lock() {
            Strategy::Modern {
                media: Box::new(media),
            }
        } else {
            Strategy::Legacy {
                host: Box::new(host),
                task: None,
            }
        };
        let controller = Self {
            strategy,
            wants_enabled: false,
            enabled: false,
        };
        debug!("Wake lock strategy: {}", controller.strategy());
        controller
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        match self.strategy {
            Strategy::Modern { .. } => StrategyKind::Modern,
            Strategy::Legacy { .. } => StrategyKind::Legacy,
        }
    }

    /// Returns true if sleep prevention is actually active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true if the session asked for sleep prevention.
    #[must_use]
    pub fn wants_enabled(&self) -> bool {
        self.wants_enabled
    }

    /// Returns true if `task` is this controller's reassertion task.
    #[must_use]
    pub fn owns_task(&self, task: TaskId) -> bool {
        matches!(self.strategy, Strategy::Legacy { task: Some(own), .. } if own == task)
    }

    /// Requests sleep prevention.
    ///
    /// Modern: records the intent; playback waits for a gesture.
    /// Legacy: schedules the recurring activity task (at most one).
    pub fn enable(&mut self, scheduler: &mut dyn Scheduler) {
        self.wants_enabled = true;
        match &mut self.strategy {
            Strategy::Modern { .. } => {
                debug!("Wake lock requested, waiting for a gesture");
            }
            Strategy::Legacy { task, .. } => {
                if task.is_none() {
                    let id = scheduler.schedule_repeating(LEGACY_REASSERT_PERIOD);
                    *task = Some(id);
                    self.enabled = true;
                    info!("Legacy wake lock enabled ({})", id);
                }
            }
        }
    }

    /// Starts keep-awake playback from a gesture if it is wanted and not
    /// yet running. A rejection leaves the lock disabled for the next
    /// gesture to retry. Returns the enabled flag.
    ///
    /// A playback that died since the last gesture clears `enabled`, so
    /// this gesture starts it again.
    pub fn unlock(&mut self, gesture: &UserGesture) -> bool {
        if let Strategy::Modern { media } = &mut self.strategy {
            if self.enabled && !media.is_active() {
                warn!("Keep-awake playback stopped, restarting");
                self.enabled = false;
            }
            if self.wants_enabled && !self.enabled {
                match media.play() {
                    Ok(()) => {
                        self.enabled = true;
                        info!("Wake lock enabled by {} gesture", gesture.kind());
                    }
                    Err(e) if e.is_rejection() => {
                        info!("Wake lock playback rejected, will retry: {}", e);
                    }
                    Err(e) => warn!("Wake lock not enabled: {} ({})", e, e.suggestion()),
                }
            }
        }
        self.enabled
    }

    /// Releases the lock and clears the intent.
    pub fn disable(&mut self, scheduler: &mut dyn Scheduler) {
        match &mut self.strategy {
            Strategy::Modern { media } => {
                if self.enabled {
                    media.pause();
                }
            }
            Strategy::Legacy { task, .. } => {
                if let Some(id) = task.take() {
                    scheduler.cancel(id);
                }
            }
        }
        if self.enabled || self.wants_enabled {
            info!("Wake lock disabled");
        }
        self.wants_enabled = false;
        self.enabled = false;
    }

    /// Runs one legacy activity simulation. Called when the reassertion
    /// task fires. Returns true if activity was simulated.
    pub fn reassert(&mut self) -> bool {
        let Strategy::Legacy { host, task } = &mut self.strategy else {
            return false;
        };
        if task.is_none() {
            return false;
        }
        if host.is_hidden() {
            debug!("Session hidden, skipping activity simulation");
            return false;
        }
        match host.begin_navigation() {
            Ok(()) => {
                host.cancel_navigation();
                debug!("Activity simulated");
                true
            }
            Err(e) => {
                warn!("Activity simulation failed: {} ({})", e, e.suggestion());
                false
            }
        }
    }
}

impl fmt::Debug for WakeLockController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WakeLockController")
            .field("strategy", &self.strategy())
            .field("wants_enabled", &self.wants_enabled)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Mocks
// ============================================================================

#[derive(Debug, Default)]
struct MockMediaState {
    play_fails: AtomicBool,
    playing: AtomicBool,
    play_count: AtomicUsize,
    pause_count: AtomicUsize,
}

/// Mock keep-awake media for testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockKeepAwakeMedia {
    state: Arc<MockMediaState>,
}

impl MockKeepAwakeMedia {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `play()` reject, as a platform does outside a gesture.
    pub fn set_play_fails(&self, fails: bool) {
        self.state.play_fails.store(fails, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.state.play_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn pause_count(&self) -> usize {
        self.state.pause_count.load(Ordering::SeqCst)
    }

    /// Stops playback without the controller asking, as when the
    /// inhibitor process dies.
    pub fn interrupt(&self) {
        self.state.playing.store(false, Ordering::SeqCst);
    }
}

impl KeepAwakeMedia for MockKeepAwakeMedia {
    fn play(&mut self) -> Result<(), WakeLockError> {
        self.state.play_count.fetch_add(1, Ordering::SeqCst);
        if self.state.play_fails.load(Ordering::SeqCst) {
            return Err(WakeLockError::MediaRejected("Mock failure".to_string()));
        }
        self.state.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&mut self) {
        self.state.pause_count.fetch_add(1, Ordering::SeqCst);
        self.state.playing.store(false, Ordering::SeqCst);
    }

    fn is_active(&mut self) -> bool {
        self.is_playing()
    }
}

#[derive(Debug, Default)]
struct MockHostState {
    hidden: AtomicBool,
    begin_fails: AtomicBool,
    begin_count: AtomicUsize,
    cancel_count: AtomicUsize,
}

/// Mock activity host for testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockActivityHost {
    state: Arc<MockHostState>,
}

impl MockActivityHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.state.hidden.store(hidden, Ordering::SeqCst);
    }

    pub fn set_begin_fails(&self, fails: bool) {
        self.state.begin_fails.store(fails, Ordering::SeqCst);
    }

    #[must_use]
    pub fn begin_count(&self) -> usize {
        self.state.begin_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.state.cancel_count.load(Ordering::SeqCst)
    }
}

impl ActivityHost for MockActivityHost {
    fn is_hidden(&self) -> bool {
        self.state.hidden.load(Ordering::SeqCst)
    }

    fn begin_navigation(&mut self) -> Result<(), WakeLockError> {
        if self.state.begin_fails.load(Ordering::SeqCst) {
            return Err(WakeLockError::ActivityFailed("Mock failure".to_string()));
        }
        self.state.begin_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn cancel_navigation(&mut self) {
        self.state.cancel_count.fetch_add(1, Ordering::SeqCst);
    }
}
