use std::fmt;

use futures::channel::mpsc::UnboundedSender;

use crate::permission::PermissionState;

/// Where a backend delivers foreground push messages.
pub type PushSink = UnboundedSender<crate::payload::PushPayload>;

/// Errors from the messaging backend or the platform notification facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    Unsupported,
    PermissionDenied,
    TokenRetrieval(String),
    ListenerSetup(String),
    Notification(String),
}

impl fmt::Display for MessagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "push messaging is not supported here"),
            Self::PermissionDenied => write!(f, "notification permission not granted"),
            Self::TokenRetrieval(msg) => write!(f, "token retrieval failed: {msg}"),
            Self::ListenerSetup(msg) => write!(f, "message listener setup failed: {msg}"),
            Self::Notification(msg) => write!(f, "notification display failed: {msg}"),
        }
    }
}

impl std::error::Error for MessagingError {}

/// Hosted cloud messaging service (Firebase Cloud Messaging in the web build).
#[allow(async_fn_in_trait)]
pub trait MessagingBackend {
    /// Whether push messaging works in this environment.
    async fn is_supported(&self) -> Result<bool, MessagingError>;

    /// Ask the service for this device's registration token.
    ///
    /// `Ok(None)` means the service answered without issuing one.
    async fn get_token(&self, vapid_key: &str) -> Result<Option<String>, MessagingError>;

    /// Start forwarding foreground messages into `sink`.
    fn subscribe(&self, sink: PushSink) -> Result<ListenerHandle, MessagingError>;
}

/// The platform's permission prompt and notification display.
#[allow(async_fn_in_trait)]
pub trait NotificationPlatform {
    /// Current ambient permission, read fresh from the platform.
    fn permission(&self) -> PermissionState;

    /// Prompt the user. Resolves once they answer.
    async fn request_permission(&self) -> Result<PermissionState, MessagingError>;

    fn show(&self, title: &str, body: &str) -> Result<(), MessagingError>;
}

/// Registration of a foreground listener.
///
/// Releasing the handle, explicitly or by dropping it, runs the unsubscribe
/// callback. The callback runs at most once.
#[must_use = "dropping the handle unsubscribes the listener"]
pub struct ListenerHandle {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
