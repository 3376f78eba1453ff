use dioxus::prelude::*;

use orderdesk_common::permission::PermissionState;

use super::notifications::NotificationHandle;

/// Permission status, enable button and device token for this session.
#[component]
pub fn NotificationManager(notifications: NotificationHandle) -> Element {
    let state = notifications.state();
    let snapshot = state.read();
    let permission = snapshot.permission;
    let token = snapshot.token.as_ref().map(|t| t.abbreviated());
    drop(snapshot);

    let status_class = match permission {
        PermissionState::Granted => "status-granted",
        PermissionState::Denied => "status-denied",
        PermissionState::Unsupported => "status-unsupported",
        PermissionState::Unrequested => "status-default",
    };
    let request = notifications.clone();
    let refresh = notifications.clone();

    rsx! {
        div { class: "notification-manager",
            h2 { "Order Notifications" }
            p {
                "Notification status: "
                span { class: "{status_class}", "{permission}" }
            }
            if permission == PermissionState::Unsupported {
                p { class: "hint", "This browser cannot receive push notifications." }
            }
            if permission == PermissionState::Denied {
                p { class: "hint", "Notifications are blocked. Allow them in your browser settings to receive orders." }
            }
            div { class: "notification-actions",
                if permission.can_prompt() {
                    button {
                        onclick: move |_| request.request_permission(),
                        "Enable Notifications"
                    }
                }
                if permission != PermissionState::Unsupported {
                    button {
                        onclick: move |_| refresh.refresh_token(),
                        "Refresh Token"
                    }
                }
            }
            if let Some(token) = token {
                p { class: "device-token",
                    "Device token: "
                    code { "{token}" }
                }
            }
        }
    }
}
