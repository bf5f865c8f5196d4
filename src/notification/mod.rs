//! Completion notifications.
//!
//! A finished timer must always reach the user. The dispatcher tries the
//! platform's native notification first and falls back to a blocking
//! prompt whenever native delivery is unsupported, not permitted, or fails.
//!
//! # Example
//!
//! ```rust,no_run
//! use cookalong::notification::{CommandNotifier, NotificationDispatcher, TerminalPrompt};
//!
//! let mut dispatcher = NotificationDispatcher::new(
//!     CommandNotifier::detect(),
//!     TerminalPrompt::new(),
//!     "Timer finished",
//! );
//! dispatcher.request_permission();
//! dispatcher.notify("Pasta");
//! ```

pub mod error;
mod native;
mod prompt;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

pub use self::error::NotificationError;
pub use self::native::CommandNotifier;
pub use self::prompt::{render_prompt, TerminalPrompt};

/// Native notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not yet requested.
    Default,
    Granted,
    Denied,
    /// The platform has no native notifications.
    Unsupported,
}

/// A platform notification service.
pub trait NativeNotifier {
    fn permission(&self) -> Permission;

    /// Asks the platform for permission to show notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself could not be made.
    fn request_permission(&mut self) -> Result<Permission, NotificationError>;

    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification was not delivered.
    fn show(&mut self, title: &str, body: &str) -> Result<(), NotificationError>;
}

/// A synchronous alert that cannot fail to reach the user.
pub trait BlockingPrompt {
    fn prompt(&mut self, message: &str);
}

/// Which path a notification took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Native,
    Prompt,
}

/// Routes completion messages to the native notifier or the prompt.
pub struct NotificationDispatcher {
    native: Box<dyn NativeNotifier>,
    prompt: Box<dyn BlockingPrompt>,
    title: String,
    permission_requested: bool,
}

impl NotificationDispatcher {
    pub fn new(
        native: impl NativeNotifier + 'static,
        prompt: impl BlockingPrompt + 'static,
        title: impl Into<String>,
    ) -> Self {
        Self {
            native: Box::new(native),
            prompt: Box::new(prompt),
            title: title.into(),
            permission_requested: false,
        }
    }

    #[must_use]
    pub fn permission(&self) -> Permission {
        self.native.permission()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Requests native permission once per dispatcher.
    ///
    /// Skipped when the platform already decided or has no support.
    /// Failures are logged; notify() will use the prompt instead.
    pub fn request_permission(&mut self) {
        if self.permission_requested {
            return;
        }
        self.permission_requested = true;

        if self.native.permission() != Permission::Default {
            debug!(
                "Notification permission already {:?}, not requesting",
                self.native.permission()
            );
            return;
        }

        match self.native.request_permission() {
            Ok(permission) => info!("Notification permission: {:?}", permission),
            Err(e) if e.is_permission_error() => {
                info!("Notification permission not granted: {}", e);
            }
            Err(e) => warn!(
                "Notification permission request failed: {} ({})",
                e,
                e.suggestion()
            ),
        }
    }

    /// Tells the user that the timer `label` finished.
    pub fn notify(&mut self, label: &str) -> Delivery {
        let body = format!("{label} is done");

        if self.native.permission() == Permission::Granted {
            match self.native.show(&self.title, &body) {
                Ok(()) => {
                    debug!("Native notification sent for {}", label);
                    return Delivery::Native;
                }
                Err(e) if e.is_permission_error() => {
                    info!("Native notification not permitted, using prompt: {}", e);
                }
                Err(e) => warn!("Native notification failed, using prompt: {}", e),
            }
        }

        self.prompt.prompt(&format!("{}: {}", self.title, body));
        Delivery::Prompt
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("permission", &self.native.permission())
            .field("title", &self.title)
            .field("permission_requested", &self.permission_requested)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Mocks
// ============================================================================

#[derive(Debug)]
struct MockNativeState {
    permission: Mutex<Permission>,
    grant_on_request: AtomicBool,
    request_fails: AtomicBool,
    show_fails: AtomicBool,
    request_count: AtomicUsize,
    shown: Mutex<Vec<(String, String)>>,
}

/// Mock native notifier for testing. Clones share state.
#[derive(Debug, Clone)]
pub struct MockNativeNotifier {
    state: Arc<MockNativeState>,
}

impl MockNativeNotifier {
    /// A notifier whose permission starts at `permission` and becomes
    /// granted when requested.
    #[must_use]
    pub fn new(permission: Permission) -> Self {
        Self {
            state: Arc::new(MockNativeState {
                permission: Mutex::new(permission),
                grant_on_request: AtomicBool::new(true),
                request_fails: AtomicBool::new(false),
                show_fails: AtomicBool::new(false),
                request_count: AtomicUsize::new(0),
                shown: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Makes permission requests end in `Denied`.
    pub fn set_deny_on_request(&self, deny: bool) {
        self.state.grant_on_request.store(!deny, Ordering::SeqCst);
    }

    pub fn set_request_fails(&self, fails: bool) {
        self.state.request_fails.store(fails, Ordering::SeqCst);
    }

    pub fn set_show_fails(&self, fails: bool) {
        self.state.show_fails.store(fails, Ordering::SeqCst);
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// `(title, body)` pairs shown so far.
    #[must_use]
    pub fn shown(&self) -> Vec<(String, String)> {
        self.state.shown.lock().unwrap().clone()
    }
}

impl NativeNotifier for MockNativeNotifier {
    fn permission(&self) -> Permission {
        *self.state.permission.lock().unwrap()
    }

    fn request_permission(&mut self) -> Result<Permission, NotificationError> {
        self.state.request_count.fetch_add(1, Ordering::SeqCst);
        if self.state.request_fails.load(Ordering::SeqCst) {
            return Err(NotificationError::AuthorizationFailed(
                "Mock failure".to_string(),
            ));
        }
        let granted = if self.state.grant_on_request.load(Ordering::SeqCst) {
            Permission::Granted
        } else {
            Permission::Denied
        };
        *self.state.permission.lock().unwrap() = granted;
        Ok(granted)
    }

    fn show(&mut self, title: &str, body: &str) -> Result<(), NotificationError> {
        if self.state.show_fails.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        if self.permission() != Permission::Granted {
            return Err(NotificationError::PermissionDenied);
        }
        self.state
            .shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

/// Mock blocking prompt recording every message. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockPrompt {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl BlockingPrompt for MockPrompt {
    fn prompt(&mut self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
