//! Assembled delivery/picking documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use softbridge_core::{CustomerNo, DeliveryNoteNo, OrderNo, PickingNo, RecipientId, WarehouseNo};

/// Which quantity of a position is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Confirmed shipment: the shipped quantity counts.
    DeliveryNote,
    /// Warehouse picking instruction: the quantity to pick counts.
    PickingOrder,
}

/// Record number of a document header, the key positions are filed under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionKey(pub u32);

impl core::fmt::Display for PositionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Postal lines of an order-specific delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLines {
    pub name1: String,
    pub name2: String,
    pub name3: String,
    pub street: String,
    pub country: String,
    pub postcode: String,
    pub city: String,
}

/// Where the goods go, when that differs from the billed customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Goods recipient as recorded on the header.
    pub customer_no: CustomerNo,
    /// Recipient narrowed to a ship-to address; set once an address override was merged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<RecipientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressLines>,
}

impl DeliveryAddress {
    pub fn new(customer_no: CustomerNo) -> Self {
        Self {
            customer_no,
            recipient: None,
            address: None,
        }
    }

    /// Nothing but the recipient customer number is known.
    pub fn is_bare(&self) -> bool {
        self.recipient.is_none() && self.address.is_none()
    }
}

/// One line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub article_no: String,
    /// Shipped quantity on delivery notes, quantity to pick on picking orders.
    pub quantity: i64,
    /// `<picking no>-<order position>-<picking position>`, positions zero-padded to three digits.
    pub guid: String,
    /// GUID of the originating order position.
    pub order_position_guid: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customer_info_text: Vec<String>,
}

/// A delivery note or picking document with its positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDocument {
    pub order_no: OrderNo,
    pub customer_order_no: String,
    /// Billed customer.
    pub customer_no: CustomerNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    pub warehouse: WarehouseNo,
    pub picking_no: PickingNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picking_date: Option<NaiveDate>,
    /// `None` for picking documents that have not been shipped yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_note_no: Option<DeliveryNoteNo>,
    /// Document date: delivery note date, else last change.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_note_created: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<NaiveDate>,
    pub name1: String,
    pub name2: String,
    pub name3: String,
    pub street: String,
    pub country: String,
    pub postcode: String,
    pub city: String,
    pub phone: String,
    pub fax: String,
    pub order_kind: String,
    pub positions: Vec<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customer_info_text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_guid: Option<String>,
    /// Staff member who last processed a position (not the account manager).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

impl DeliveryDocument {
    /// Header texts as a single line.
    pub fn customer_info_line(&self) -> String {
        self.customer_info_text.join(", ")
    }

    /// Sum of position quantities.
    pub fn total_quantity(&self) -> i64 {
        self.positions.iter().map(|p| p.quantity).sum()
    }

    /// Drop the delivery address if it only repeats the billed customer.
    pub fn dedup_delivery_address(&mut self) {
        if self
            .delivery_address
            .as_ref()
            .is_some_and(|a| a.is_bare() && a.customer_no == self.customer_no)
        {
            self.delivery_address = None;
        }
    }
}
