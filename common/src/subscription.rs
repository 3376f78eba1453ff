//! Push notification subscription for one authenticated session.
//!
//! The manager owns the permission state, the device token and the last
//! received payload. It never returns errors: every failure is logged and
//! turned into either `PermissionState::Unsupported` or a no-op.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::messaging::{ListenerHandle, MessagingBackend, MessagingError, NotificationPlatform};
use crate::payload::PushPayload;
use crate::permission::PermissionState;

/// Registration token issued by the messaging backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceToken(pub String);

impl DeviceToken {
    /// First and last few characters, for display.
    pub fn abbreviated(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 24 {
            return self.0.clone();
        }
        let head: String = chars[..12].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the views read from the subscription.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionState {
    pub permission: PermissionState,
    pub token: Option<DeviceToken>,
    /// Most recent foreground payload; each arrival overwrites the last.
    pub last_payload: Option<PushPayload>,
    /// Number of payloads received this session.
    pub received: u64,
}

/// Foreground messages for the current session.
///
/// Yields payloads in arrival order. Dropping or closing the listener
/// releases the backend subscription exactly once.
#[derive(Debug)]
pub struct PushListener {
    handle: ListenerHandle,
    inbox: UnboundedReceiver<PushPayload>,
}

impl PushListener {
    pub fn close(self) {
        let PushListener { handle, .. } = self;
        handle.unsubscribe();
    }
}

impl Stream for PushListener {
    type Item = PushPayload;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inbox.poll_next_unpin(cx)
    }
}

/// Requests the views send to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    RequestPermission,
    RefreshToken,
}

enum SessionEvent {
    Command(SessionCommand),
    Push(PushPayload),
}

type Observer = Box<dyn FnMut(&SubscriptionState)>;

/// Drives permission, token and listener for one session.
///
/// Calls are serialized through `&mut self`; when two token fetches complete
/// back to back, the later one wins.
pub struct SubscriptionManager<B, P> {
    backend: B,
    platform: P,
    vapid_key: String,
    state: SubscriptionState,
    observer: Option<Observer>,
}

impl<B, P> SubscriptionManager<B, P>
where
    B: MessagingBackend,
    P: NotificationPlatform,
{
    pub fn new(backend: B, platform: P, vapid_key: impl Into<String>) -> Self {
        Self {
            backend,
            platform,
            vapid_key: vapid_key.into(),
            state: SubscriptionState::default(),
            observer: None,
        }
    }

    /// Call `observer` with the full state after every change.
    pub fn with_observer(mut self, observer: impl FnMut(&SubscriptionState) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &SubscriptionState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Prompt for permission and, when granted, fetch a token.
    pub async fn request_permission(&mut self) {
        if !self.messaging_supported().await {
            self.set_permission(PermissionState::Unsupported);
            return;
        }

        tracing::info!("Requesting notification permission");
        let permission = match self.platform.request_permission().await {
            Ok(permission) => permission,
            Err(e) => {
                tracing::warn!("Error requesting notification permission: {e}");
                return;
            }
        };
        tracing::info!("Permission result: {permission}");
        self.set_permission(permission);

        if permission.is_granted() {
            self.store_fetched_token().await;
        }
    }

    /// Fetch a fresh token. The stored token is kept when none arrives.
    pub async fn refresh_token(&mut self) {
        if !self.messaging_supported().await {
            tracing::info!("Push messaging not supported, skipping token refresh");
            return;
        }

        tracing::info!("Refreshing device token");
        match self.fetch_token().await {
            Ok(token) => {
                tracing::info!("Device token refreshed");
                self.set_token(token);
            }
            Err(e) => tracing::info!("Keeping previous token: {e}"),
        }
    }

    /// Sync with the platform at session start and begin listening.
    ///
    /// Returns `None` when messaging is unavailable or the listener could not
    /// be registered.
    pub async fn start_session(&mut self) -> Option<PushListener> {
        if !self.messaging_supported().await {
            tracing::info!("Push messaging not supported in this environment");
            return None;
        }

        let permission = self.platform.permission();
        tracing::info!("Current notification permission: {permission}");
        self.set_permission(permission);

        if permission.is_granted() {
            tracing::debug!("Permission already granted, fetching token");
            self.store_fetched_token().await;
        }

        let (sink, inbox) = mpsc::unbounded();
        match self.backend.subscribe(sink) {
            Ok(handle) => Some(PushListener { handle, inbox }),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    }

    /// Record a foreground payload and surface its notification, if any.
    pub fn handle_push(&mut self, payload: PushPayload) {
        tracing::debug!("Message received in foreground: {:?}", payload);

        if let Some(notification) = payload.display_notification() {
            if let Err(e) = self.platform.show(&notification.title, &notification.body) {
                tracing::warn!("{e}");
            }
        }

        self.state.last_payload = Some(payload);
        self.state.received += 1;
        self.publish();
    }

    /// Start the session and serve it until `commands` and the push
    /// listener are both exhausted.
    ///
    /// Every payload is handed to `on_push` as it is handled, so bursts that
    /// queue up behind a slow command are seen one by one.
    pub async fn run<C>(&mut self, commands: C, mut on_push: impl FnMut(&PushPayload))
    where
        C: Stream<Item = SessionCommand> + Unpin,
    {
        let pushes = match self.start_session().await {
            Some(listener) => listener.boxed_local(),
            None => stream::pending().boxed_local(),
        };
        let mut events = stream::select(
            commands.map(SessionEvent::Command),
            pushes.map(SessionEvent::Push),
        );

        while let Some(event) = events.next().await {
            match event {
                SessionEvent::Command(SessionCommand::RequestPermission) => {
                    self.request_permission().await
                }
                SessionEvent::Command(SessionCommand::RefreshToken) => self.refresh_token().await,
                SessionEvent::Push(payload) => {
                    on_push(&payload);
                    self.handle_push(payload);
                }
            }
        }
        tracing::debug!("Notification session ended");
    }

    async fn messaging_supported(&self) -> bool {
        match self.backend.is_supported().await {
            Ok(supported) => supported,
            Err(e) => {
                tracing::warn!("Messaging support check failed: {e}");
                false
            }
        }
    }

    /// Ask the backend for a token, prompting first if permission is missing.
    /// No backend call is made without a granted permission.
    async fn fetch_token(&self) -> Result<DeviceToken, MessagingError> {
        if !self.platform.permission().is_granted() {
            let permission = self.platform.request_permission().await?;
            if !permission.is_granted() {
                return Err(MessagingError::PermissionDenied);
            }
        }

        match self.backend.get_token(&self.vapid_key).await? {
            Some(token) => Ok(DeviceToken(token)),
            None => Err(MessagingError::TokenRetrieval(
                "no registration token available".into(),
            )),
        }
    }

    async fn store_fetched_token(&mut self) {
        match self.fetch_token().await {
            Ok(token) => self.set_token(token),
            Err(e) => tracing::warn!("{e}"),
        }
    }

    fn set_permission(&mut self, permission: PermissionState) {
        let previous = self.state.permission;
        if previous != permission && !previous.can_transition_to(permission) {
            tracing::info!("Permission changed outside the app: {previous} -> {permission}");
        }
        self.state.permission = permission;
        self.publish();
    }

    fn set_token(&mut self, token: DeviceToken) {
        self.state.token = Some(token);
        self.publish();
    }

    fn publish(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_are_shown_whole() {
        assert_eq!(DeviceToken("abc".into()).abbreviated(), "abc");
    }

    #[test]
    fn long_tokens_are_abbreviated() {
        let token = DeviceToken("f".repeat(12) + &"x".repeat(100) + "12345678");
        assert_eq!(token.abbreviated(), "ffffffffffff...12345678");
    }
}
