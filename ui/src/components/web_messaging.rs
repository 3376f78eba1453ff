//! Browser implementations of the messaging backend and notification platform.
//!
//! Firebase Cloud Messaging is reached through `js/messaging_bridge.js`, which
//! wraps the Firebase modular SDK. Notifications and the permission prompt go
//! straight to the `Notification` web API.

use orderdesk_common::config::MessagingConfig;

/// Firebase Cloud Messaging, configured at compile time.
#[derive(Clone, Debug)]
pub struct FirebaseMessaging {
    #[allow(dead_code)] // read in WASM builds
    config: MessagingConfig,
}

impl FirebaseMessaging {
    pub fn new(config: MessagingConfig) -> Self {
        Self { config }
    }
}

/// The browser's `Notification` API.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNotifications;

// ─── WASM implementation ─────────────────────────────────────────────────────

#[cfg(target_family = "wasm")]
mod wasm_impl {
    use futures::channel::mpsc::UnboundedSender;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    use orderdesk_common::messaging::{
        ListenerHandle, MessagingBackend, MessagingError, NotificationPlatform, PushSink,
    };
    use orderdesk_common::payload::PushPayload;
    use orderdesk_common::permission::PermissionState;

    use super::{BrowserNotifications, FirebaseMessaging};

    #[wasm_bindgen(module = "/js/messaging_bridge.js")]
    extern "C" {
        #[wasm_bindgen(js_name = initMessaging, catch)]
        async fn init_messaging(config: JsValue) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_name = requestToken, catch)]
        async fn request_token(vapid_key: &str) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_name = onForegroundMessage, catch)]
        fn on_foreground_message(
            callback: &Closure<dyn FnMut(JsValue)>,
        ) -> Result<js_sys::Function, JsValue>;
    }

    impl MessagingBackend for FirebaseMessaging {
        async fn is_supported(&self) -> Result<bool, MessagingError> {
            let missing = self.config.missing();
            if !missing.is_empty() {
                tracing::warn!("Messaging config incomplete, missing: {}", missing.join(", "));
                return Ok(false);
            }
            if !notifications_available() {
                return Ok(false);
            }

            let config = serde_wasm_bindgen::to_value(&self.config).map_err(|e| {
                tracing::warn!("Messaging config could not be encoded: {e}");
                MessagingError::Unsupported
            })?;
            let ready = init_messaging(config).await.map_err(|e| {
                tracing::warn!("Messaging SDK failed to initialize: {:?}", e);
                MessagingError::Unsupported
            })?;
            Ok(ready.as_bool().unwrap_or(false))
        }

        async fn get_token(&self, vapid_key: &str) -> Result<Option<String>, MessagingError> {
            let token = request_token(vapid_key)
                .await
                .map_err(|e| MessagingError::TokenRetrieval(format!("{:?}", e)))?;
            Ok(token.as_string().filter(|t| !t.is_empty()))
        }

        fn subscribe(&self, sink: PushSink) -> Result<ListenerHandle, MessagingError> {
            let callback = forward_to(sink);
            let unsubscribe = on_foreground_message(&callback)
                .map_err(|e| MessagingError::ListenerSetup(format!("{:?}", e)))?;

            Ok(ListenerHandle::new(move || {
                if let Err(e) = unsubscribe.call0(&JsValue::NULL) {
                    tracing::warn!("Unsubscribing foreground listener failed: {:?}", e);
                }
                // The SDK no longer holds the callback.
                drop(callback);
            }))
        }
    }

    /// Wrap `sink` in a JS callback that decodes each message.
    fn forward_to(sink: UnboundedSender<PushPayload>) -> Closure<dyn FnMut(JsValue)> {
        Closure::wrap(Box::new(move |raw: JsValue| {
            match serde_wasm_bindgen::from_value::<PushPayload>(raw) {
                Ok(payload) => {
                    if sink.unbounded_send(payload).is_err() {
                        tracing::debug!("Push arrived after the session closed");
                    }
                }
                Err(e) => tracing::warn!("Failed to decode push payload: {}", e),
            }
        }) as Box<dyn FnMut(JsValue)>)
    }

    fn notifications_available() -> bool {
        web_sys::window()
            .map(|w| js_sys::Reflect::has(&w, &"Notification".into()).unwrap_or(false))
            .unwrap_or(false)
    }

    impl NotificationPlatform for BrowserNotifications {
        fn permission(&self) -> PermissionState {
            if !notifications_available() {
                return PermissionState::Unsupported;
            }
            match web_sys::Notification::permission() {
                web_sys::NotificationPermission::Granted => PermissionState::Granted,
                web_sys::NotificationPermission::Denied => PermissionState::Denied,
                _ => PermissionState::Unrequested,
            }
        }

        async fn request_permission(&self) -> Result<PermissionState, MessagingError> {
            if !notifications_available() {
                return Err(MessagingError::Unsupported);
            }
            let promise = web_sys::Notification::request_permission()
                .map_err(|e| MessagingError::Notification(format!("{:?}", e)))?;
            let answer = JsFuture::from(promise)
                .await
                .map_err(|e| MessagingError::Notification(format!("{:?}", e)))?;
            Ok(PermissionState::from_platform(
                &answer.as_string().unwrap_or_default(),
            ))
        }

        fn show(&self, title: &str, body: &str) -> Result<(), MessagingError> {
            let options = web_sys::NotificationOptions::new();
            options.set_body(body);
            web_sys::Notification::new_with_options(title, &options)
                .map(|_| ())
                .map_err(|e| MessagingError::Notification(format!("{:?}", e)))
        }
    }
}

// ─── Non-WASM stubs for type checking ───────────────────────────────────────

#[cfg(not(target_family = "wasm"))]
mod native_impl {
    use orderdesk_common::messaging::{
        ListenerHandle, MessagingBackend, MessagingError, NotificationPlatform, PushSink,
    };
    use orderdesk_common::permission::PermissionState;

    use super::{BrowserNotifications, FirebaseMessaging};

    impl MessagingBackend for FirebaseMessaging {
        async fn is_supported(&self) -> Result<bool, MessagingError> {
            Ok(false)
        }

        async fn get_token(&self, _vapid_key: &str) -> Result<Option<String>, MessagingError> {
            Err(MessagingError::Unsupported)
        }

        fn subscribe(&self, _sink: PushSink) -> Result<ListenerHandle, MessagingError> {
            Err(MessagingError::Unsupported)
        }
    }

    impl NotificationPlatform for BrowserNotifications {
        fn permission(&self) -> PermissionState {
            PermissionState::Unsupported
        }

        async fn request_permission(&self) -> Result<PermissionState, MessagingError> {
            Err(MessagingError::Unsupported)
        }

        fn show(&self, _title: &str, _body: &str) -> Result<(), MessagingError> {
            Err(MessagingError::Unsupported)
        }
    }
}
