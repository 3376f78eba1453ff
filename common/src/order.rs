use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::{OrderFields, PayloadKind, PushPayload};

pub const DEFAULT_CUSTOMER: &str = "New Customer";
pub const DEFAULT_ITEMS: &str = "Items not specified";

/// Status of a synthesized order. Records are display-only, so they never
/// progress past the state they were received in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    New,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => f.write_str("New"),
        }
    }
}

/// A display row built client-side from a push payload. Not authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub customer: String,
    pub items: String,
    pub status: OrderStatus,
    pub received_at: DateTime<Utc>,
    /// Data fields that have no dedicated column.
    pub attributes: BTreeMap<String, String>,
}

impl OrderRecord {
    /// Build a record, substituting defaults for missing fields.
    ///
    /// Ids fall back to `order-<unix millis>`; two such ids only collide when
    /// generated in the same millisecond.
    pub fn from_fields(fields: OrderFields, now: DateTime<Utc>) -> Self {
        Self {
            id: fields.order_id.unwrap_or_else(|| fallback_id(now)),
            customer: fields.customer.unwrap_or_else(|| DEFAULT_CUSTOMER.into()),
            items: fields.items.unwrap_or_else(|| DEFAULT_ITEMS.into()),
            status: OrderStatus::New,
            received_at: now,
            attributes: fields.extra,
        }
    }

    /// Receipt time in the viewer's local timezone.
    #[cfg(feature = "std")]
    pub fn local_timestamp(&self) -> String {
        self.received_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

fn fallback_id(now: DateTime<Utc>) -> String {
    format!("order-{}", now.timestamp_millis())
}

/// In-memory order list, newest first. Only grows; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    records: VecDeque<OrderRecord>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a record for `payload` if it carries order data.
    ///
    /// Returns the new record, or `None` when the list is unchanged.
    pub fn ingest(&mut self, payload: &PushPayload, now: DateTime<Utc>) -> Option<&OrderRecord> {
        match payload.kind() {
            PayloadKind::Orderless => None,
            PayloadKind::OrderData(fields) => {
                self.records.push_front(OrderRecord::from_fields(fields, now));
                self.records.front()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn order_payload(data: &[(&str, &str)]) -> PushPayload {
        PushPayload {
            data: Some(
                data.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn empty_data_gets_defaults() {
        let mut book = OrderBook::new();
        let record = book.ingest(&order_payload(&[]), at(1_700_000_000_123)).unwrap();
        assert_eq!(record.customer, DEFAULT_CUSTOMER);
        assert_eq!(record.items, DEFAULT_ITEMS);
        assert_eq!(record.status.to_string(), "New");
        assert_eq!(record.id, "order-1700000000123");
    }

    #[test]
    fn provided_fields_win_and_extras_are_kept() {
        let mut book = OrderBook::new();
        let payload = order_payload(&[
            ("orderId", "A-17"),
            ("customer", "Ana"),
            ("items", "2x flat white"),
            ("table", "4"),
        ]);
        let record = book.ingest(&payload, at(0)).unwrap();
        assert_eq!(record.id, "A-17");
        assert_eq!(record.customer, "Ana");
        assert_eq!(record.items, "2x flat white");
        assert_eq!(record.attributes.get("table").map(String::as_str), Some("4"));
    }

    #[test]
    fn orderless_payload_leaves_list_unchanged() {
        let mut book = OrderBook::new();
        book.ingest(&order_payload(&[("orderId", "1")]), at(0));
        let before = book.len();
        assert!(book.ingest(&PushPayload::default(), at(1)).is_none());
        assert_eq!(book.len(), before);
    }

    #[test]
    fn newest_first_by_arrival() {
        let mut book = OrderBook::new();
        let start = at(1_000);
        for i in 0..5 {
            let id = format!("o{i}");
            book.ingest(&order_payload(&[("orderId", &id)]), start + Duration::seconds(i));
        }
        let ids: Vec<_> = book.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["o4", "o3", "o2", "o1", "o0"]);
    }

    #[test]
    fn duplicate_ids_are_not_merged() {
        let mut book = OrderBook::new();
        book.ingest(&order_payload(&[]), at(5));
        book.ingest(&order_payload(&[]), at(5));
        assert_eq!(book.len(), 2);
    }
}
