//! Free-text annotations attached to orders.

use std::collections::BTreeMap;

use softbridge_core::{ErpResult, OrderNo};

/// Field name under which the text store keeps an alternate GUID.
pub const GUID_FIELD: &str = "guid";

/// Texts and supplementary fields for a set of orders.
///
/// Position-level entries are keyed by order number, then by order position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderTexts {
    pub position_texts: BTreeMap<OrderNo, BTreeMap<u32, Vec<String>>>,
    pub header_texts: BTreeMap<OrderNo, Vec<String>>,
    pub position_fields: BTreeMap<OrderNo, BTreeMap<u32, BTreeMap<String, String>>>,
    pub header_fields: BTreeMap<OrderNo, BTreeMap<String, String>>,
}

impl OrderTexts {
    /// Customer-facing text lines of one order position (empty when none).
    pub fn position_text(&self, order: OrderNo, position: u32) -> &[String] {
        self.position_texts
            .get(&order)
            .and_then(|p| p.get(&position))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Alternate GUID recorded for one order position.
    pub fn position_guid(&self, order: OrderNo, position: u32) -> Option<&str> {
        self.position_fields
            .get(&order)?
            .get(&position)?
            .get(GUID_FIELD)
            .map(String::as_str)
    }

    /// Alternate GUID recorded for an order header.
    pub fn header_guid(&self, order: OrderNo) -> Option<&str> {
        self.header_fields
            .get(&order)?
            .get(GUID_FIELD)
            .map(String::as_str)
    }

    /// Keep only entries for `orders`.
    pub fn restricted_to(&self, orders: &[OrderNo]) -> Self {
        let keep = |o: &OrderNo| orders.contains(o);
        Self {
            position_texts: filter(&self.position_texts, keep),
            header_texts: filter(&self.header_texts, keep),
            position_fields: filter(&self.position_fields, keep),
            header_fields: filter(&self.header_fields, keep),
        }
    }
}

fn filter<V: Clone>(
    map: &BTreeMap<OrderNo, V>,
    keep: impl Fn(&OrderNo) -> bool,
) -> BTreeMap<OrderNo, V> {
    map.iter()
        .filter(|(k, _)| keep(k))
        .map(|(k, v)| (*k, v.clone()))
        .collect()
}

/// Resolves header and position texts for orders.
pub trait TextResolver: Send + Sync {
    fn resolve_texts(&self, orders: &[OrderNo]) -> ErpResult<OrderTexts>;
}

impl<T> TextResolver for &T
where
    T: TextResolver + ?Sized,
{
    fn resolve_texts(&self, orders: &[OrderNo]) -> ErpResult<OrderTexts> {
        (**self).resolve_texts(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_fall_back_to_empty() {
        let mut texts = OrderTexts::default();
        let order = OrderNo::new(1);
        texts
            .position_texts
            .entry(order)
            .or_default()
            .insert(2, vec!["fragile".into()]);
        texts
            .header_fields
            .entry(order)
            .or_default()
            .insert(GUID_FIELD.into(), "abc".into());

        assert_eq!(texts.position_text(order, 2), ["fragile".to_string()]);
        assert!(texts.position_text(order, 3).is_empty());
        assert!(texts.position_text(OrderNo::new(9), 2).is_empty());
        assert_eq!(texts.header_guid(order), Some("abc"));
        assert_eq!(texts.position_guid(order, 2), None);
    }

    #[test]
    fn restriction_drops_other_orders() {
        let mut texts = OrderTexts::default();
        texts.header_texts.insert(OrderNo::new(1), vec!["a".into()]);
        texts.header_texts.insert(OrderNo::new(2), vec!["b".into()]);
        let only = texts.restricted_to(&[OrderNo::new(2)]);
        assert_eq!(only.header_texts.len(), 1);
        assert!(only.header_texts.contains_key(&OrderNo::new(2)));
    }
}
