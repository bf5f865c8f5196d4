//! Notification system error types.
//!
//! Every variant is recoverable: the dispatcher answers all of them by
//! falling back to the blocking prompt.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Failed to request notification authorization from the system.
    #[error("failed to request notification permission: {0}")]
    AuthorizationFailed(String),

    /// Failed to send a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// Notification permission was denied by the user.
    #[error("notification permission denied")]
    PermissionDenied,

    /// No native notification mechanism exists on this platform.
    #[error("native notifications are not available")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "Allow notifications for this app in the system settings"
            }
            Self::SendFailed(_) => "Check that the notification service is running",
            Self::NotAvailable => "Install notify-send (Linux) to get desktop notifications",
        }
    }
}
