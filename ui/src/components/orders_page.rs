use dioxus::prelude::*;

use super::notification_manager::NotificationManager;
use super::notifications::NotificationHandle;

#[component]
pub fn OrdersPage(notifications: NotificationHandle) -> Element {
    let orders = notifications.orders();
    let orders = orders.read();
    let total = orders.len();

    rsx! {
        div { class: "orders-page",
            h1 { "Orders Dashboard" }
            NotificationManager { notifications }
            if orders.is_empty() {
                p { class: "empty-state", "No orders yet. New orders will appear here when received." }
            } else {
                ul { class: "order-list",
                    {orders.iter().enumerate().map(|(i, order)| {
                        // Ids may repeat, so key by arrival position instead.
                        let position = total - i;
                        let timestamp = order.local_timestamp();
                        let extras = order
                            .attributes
                            .iter()
                            .map(|(k, v)| format!("{k}: {v}"))
                            .collect::<Vec<_>>()
                            .join(" | ");
                        rsx! {
                            li { class: "order-card",
                                key: "{position}",
                                div { class: "order-header",
                                    span { class: "order-id", "Order #{order.id}" }
                                    span { class: "order-status", "{order.status}" }
                                }
                                p { class: "order-customer", "{order.customer}" }
                                p { class: "order-items", "{order.items}" }
                                if !extras.is_empty() {
                                    p { class: "order-extra", "{extras}" }
                                }
                                p { class: "order-time", "{timestamp}" }
                            }
                        }
                    })}
                }
            }
        }
    }
}
