use dioxus::prelude::*;

use orderdesk_common::config::MessagingConfig;
use orderdesk_common::order::OrderBook;
use orderdesk_common::subscription::{SessionCommand, SubscriptionManager, SubscriptionState};

use super::web_messaging::{BrowserNotifications, FirebaseMessaging};

/// Access to one session's push subscription and the orders it delivered.
///
/// Created by [`use_notification_session`] and passed down as a prop.
#[derive(Clone)]
pub struct NotificationHandle {
    state: Signal<SubscriptionState>,
    orders: Signal<OrderBook>,
    commands: Coroutine<SessionCommand>,
}

impl PartialEq for NotificationHandle {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.orders == other.orders
    }
}

impl NotificationHandle {
    pub fn state(&self) -> Signal<SubscriptionState> {
        self.state
    }

    pub fn orders(&self) -> Signal<OrderBook> {
        self.orders
    }

    pub fn request_permission(&self) {
        self.commands.send(SessionCommand::RequestPermission);
    }

    pub fn refresh_token(&self) {
        self.commands.send(SessionCommand::RefreshToken);
    }
}

/// Start the push subscription for the calling component's lifetime.
///
/// The manager lives inside a coroutine owned by the caller. When the caller
/// unmounts, the coroutine is dropped along with its listener, which
/// unsubscribes from the messaging backend.
pub fn use_notification_session() -> NotificationHandle {
    let state = use_signal(SubscriptionState::default);
    let orders = use_signal(OrderBook::new);
    let commands = use_coroutine(move |rx: UnboundedReceiver<SessionCommand>| {
        run_session(rx, state, orders)
    });
    NotificationHandle {
        state,
        orders,
        commands,
    }
}

async fn run_session(
    rx: UnboundedReceiver<SessionCommand>,
    mut state: Signal<SubscriptionState>,
    mut orders: Signal<OrderBook>,
) {
    let config = MessagingConfig::from_env();
    let vapid_key = config.vapid_key.clone();
    let mut manager =
        SubscriptionManager::new(FirebaseMessaging::new(config), BrowserNotifications, vapid_key)
            .with_observer(move |snapshot| state.set(snapshot.clone()));

    manager
        .run(rx, move |payload| {
            let mut book = orders.write();
            if book.ingest(payload, chrono::Utc::now()).is_some() {
                tracing::debug!("Order added from push ({} total)", book.len());
            }
        })
        .await;
}
