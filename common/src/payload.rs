use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Title used when a displayable payload carries none.
pub const DEFAULT_NOTIFICATION_TITLE: &str = "New Order";

/// Body used when a displayable payload carries none.
pub const DEFAULT_NOTIFICATION_BODY: &str = "You have received a new order";

/// Data key carrying the order identifier.
pub const ORDER_ID_KEY: &str = "orderId";
pub const CUSTOMER_KEY: &str = "customer";
pub const ITEMS_KEY: &str = "items";

/// Human-readable part of a push message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A foreground push message as delivered by the messaging SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,
}

/// Order-relevant fields pulled from a payload's data section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFields {
    pub order_id: Option<String>,
    pub customer: Option<String>,
    pub items: Option<String>,
    /// Every other data entry, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl OrderFields {
    pub fn from_data(data: &BTreeMap<String, String>) -> Self {
        let mut extra = data.clone();
        Self {
            order_id: extra.remove(ORDER_ID_KEY),
            customer: extra.remove(CUSTOMER_KEY),
            items: extra.remove(ITEMS_KEY),
            extra,
        }
    }
}

/// What a payload means to the order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKind {
    /// No data section; nothing to add to the list.
    Orderless,
    OrderData(OrderFields),
}

/// A notification ready to hand to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNotification {
    pub title: String,
    pub body: String,
}

impl PushPayload {
    pub fn kind(&self) -> PayloadKind {
        match &self.data {
            Some(data) => PayloadKind::OrderData(OrderFields::from_data(data)),
            None => PayloadKind::Orderless,
        }
    }

    /// The notification to surface in the foreground, if the payload has one.
    ///
    /// Missing or empty title/body fall back to the order defaults.
    pub fn display_notification(&self) -> Option<DisplayNotification> {
        let content = self.notification.as_ref()?;
        let title = non_empty(content.title.as_deref()).unwrap_or(DEFAULT_NOTIFICATION_TITLE);
        let body = non_empty(content.body.as_deref()).unwrap_or(DEFAULT_NOTIFICATION_BODY);
        Some(DisplayNotification {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PushPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_sdk_message_shape() {
        let json = r#"{
            "from": "161088210082",
            "messageId": "m-1",
            "notification": { "title": "Order 42", "body": "2x coffee" },
            "data": { "orderId": "42", "customer": "Ana", "table": "7" }
        }"#;
        let payload = parse(json);
        assert_eq!(payload.message_id.as_deref(), Some("m-1"));

        let PayloadKind::OrderData(fields) = payload.kind() else {
            panic!("expected order data");
        };
        assert_eq!(fields.order_id.as_deref(), Some("42"));
        assert_eq!(fields.customer.as_deref(), Some("Ana"));
        assert_eq!(fields.items, None);
        assert_eq!(fields.extra.get("table").map(String::as_str), Some("7"));
        assert!(!fields.extra.contains_key(ORDER_ID_KEY));
    }

    #[test]
    fn payload_without_data_is_orderless() {
        let payload = parse(r#"{"notification":{"title":"Hi"}}"#);
        assert_eq!(payload.kind(), PayloadKind::Orderless);
    }

    #[test]
    fn empty_data_is_still_order_data() {
        let payload = parse(r#"{"data":{}}"#);
        assert_eq!(payload.kind(), PayloadKind::OrderData(OrderFields::default()));
    }

    #[test]
    fn display_notification_falls_back_to_defaults() {
        let payload = PushPayload {
            notification: Some(NotificationContent {
                title: None,
                body: Some(String::new()),
            }),
            ..Default::default()
        };
        let shown = payload.display_notification().unwrap();
        assert_eq!(shown.title, DEFAULT_NOTIFICATION_TITLE);
        assert_eq!(shown.body, DEFAULT_NOTIFICATION_BODY);
    }

    #[test]
    fn data_only_payload_is_not_displayed() {
        let payload = parse(r#"{"data":{"orderId":"1"}}"#);
        assert_eq!(payload.display_notification(), None);
    }
}
