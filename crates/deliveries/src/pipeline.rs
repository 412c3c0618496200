//! Pure assembly steps over an in-memory document index.
//!
//! Each step takes rows the orchestrator fetched and folds them into the
//! index. Nothing here talks to the query layer.

use std::collections::BTreeMap;

use softbridge_core::{
    CustomerNo, DeliveryNoteNo, ErpError, ErpResult, OrderNo, PickingNo, RecipientId, WarehouseNo,
};
use softbridge_infra::schema::{address, delivery_header, delivery_position, order_address};
use softbridge_infra::{OrderTexts, ReferenceResolver, Row};

use crate::document::{
    AddressLines, DeliveryAddress, DeliveryDocument, DocumentKind, Position, PositionKey,
};

/// A header ready for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    pub key: PositionKey,
    pub order_no: OrderNo,
    pub document: DeliveryDocument,
}

/// Build a header from one `ALK00` ⨝ `XKD00` ⨝ `AAK00` row.
///
/// Fails when the row carries the file maintenance flag (positions may still
/// hold stale zero quantities) or when neither date field is filled.
pub fn header_from_row<R: ReferenceResolver + ?Sized>(row: &Row, refs: &R) -> ErpResult<HeaderRecord> {
    let record_no = row.uint(delivery_header::RECORD_NO)?;
    if row.flag(delivery_header::MAINTENANCE_FLAG) {
        return Err(ErpError::consistency(format!(
            "file maintenance key set in {} record {record_no}",
            delivery_header::TABLE
        )));
    }

    let key = match row.opt_uint(delivery_header::RELATED_HEADER)? {
        Some(related) if related != 0 => PositionKey(related),
        _ => PositionKey(record_no),
    };
    let order_no = OrderNo::new(row.uint(delivery_header::ORDER_NO)?);

    // The two date fields are not reliably filled at the same time.
    let delivery_note_created = row.opt_date(delivery_header::DELIVERY_NOTE_DATE)?;
    let changed = row.opt_date(delivery_header::CHANGED)?;
    let date = delivery_note_created.or(changed).ok_or_else(|| {
        ErpError::consistency(format!(
            "no date for {} record {record_no} (order {order_no})",
            delivery_header::TABLE
        ))
    })?;

    let warehouse = u16::try_from(row.uint(delivery_header::WAREHOUSE)?)
        .map(WarehouseNo::new)
        .map_err(|_| ErpError::FieldType {
            field: delivery_header::WAREHOUSE.to_string(),
            expected: "a warehouse number",
        })?;
    let delivery_note_no = row
        .opt_uint(delivery_header::DELIVERY_NOTE_NO)?
        .filter(|n| *n != 0)
        .map(DeliveryNoteNo::new);
    let text = |field: &str| row.text_or_empty(field);

    let document = DeliveryDocument {
        order_no,
        customer_order_no: text(delivery_header::CUSTOMER_ORDER_NO),
        customer_no: CustomerNo::new(row.uint(delivery_header::INVOICE_RECIPIENT)?),
        delivery_address: Some(DeliveryAddress::new(CustomerNo::new(
            row.uint(delivery_header::GOODS_RECIPIENT)?,
        ))),
        warehouse,
        picking_no: PickingNo::new(row.uint(delivery_header::PICKING_NO)?),
        picking_date: row.opt_date(delivery_header::PICKING_DATE)?,
        delivery_note_no,
        date,
        captured: row.opt_date(delivery_header::CAPTURED)?,
        changed,
        delivery_note_created,
        arrival_date: row.opt_date(delivery_header::ARRIVAL_DATE)?,
        name1: text(address::NAME1),
        name2: text(address::NAME2),
        name3: text(address::NAME3),
        street: text(address::STREET),
        country: refs.country_code_to_iso(&text(address::COUNTRY_CODE)),
        postcode: text(address::POSTCODE),
        city: text(address::CITY),
        phone: text(address::PHONE),
        fax: text(address::FAX),
        order_kind: text(delivery_header::ORDER_KIND),
        positions: Vec::new(),
        customer_info_text: Vec::new(),
        order_guid: None,
        handler: None,
    };

    Ok(HeaderRecord {
        key,
        order_no,
        document,
    })
}

/// Documents indexed by position key, with the order number mapping both ways.
///
/// Texts are filed by order number while positions reference the header
/// record, hence the two maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentIndex {
    documents: BTreeMap<PositionKey, DeliveryDocument>,
    order_to_key: BTreeMap<OrderNo, PositionKey>,
    key_to_order: BTreeMap<PositionKey, OrderNo>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step 1: index header rows. A later row with the same key replaces an earlier one.
    pub fn from_header_rows<R: ReferenceResolver + ?Sized>(rows: &[Row], refs: &R) -> ErpResult<Self> {
        let mut index = Self::new();
        for row in rows {
            index.insert_header(header_from_row(row, refs)?);
        }
        Ok(index)
    }

    pub fn insert_header(&mut self, header: HeaderRecord) {
        self.order_to_key.insert(header.order_no, header.key);
        self.key_to_order.insert(header.key, header.order_no);
        self.documents.insert(header.key, header.document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, key: PositionKey) -> Option<&DeliveryDocument> {
        self.documents.get(&key)
    }

    pub fn key_for_order(&self, order: OrderNo) -> Option<PositionKey> {
        self.order_to_key.get(&order).copied()
    }

    pub fn order_for_key(&self, key: PositionKey) -> Option<OrderNo> {
        self.key_to_order.get(&key).copied()
    }

    /// Order numbers of all indexed documents.
    pub fn order_numbers(&self) -> Vec<OrderNo> {
        self.documents
            .keys()
            .filter_map(|k| self.order_for_key(*k))
            .collect()
    }

    /// Position keys split into chunks of at most `size`.
    pub fn batches(&self, size: usize) -> Vec<Vec<PositionKey>> {
        let keys: Vec<_> = self.documents.keys().copied().collect();
        keys.chunks(size.max(1)).map(<[_]>::to_vec).collect()
    }

    /// Step 2a: merge one `XAD00` ⨝ `AAK00` delivery address override.
    pub fn merge_delivery_address<R: ReferenceResolver + ?Sized>(
        &mut self,
        row: &Row,
        refs: &R,
    ) -> ErpResult<()> {
        let order = OrderNo::new(row.uint(order_address::ORDER_NO)?);
        let Some(doc) = self
            .key_for_order(order)
            .and_then(|key| self.documents.get_mut(&key))
        else {
            tracing::warn!(order = %order, "delivery address for an order outside the result");
            return Ok(());
        };

        let ship_to_no = row.opt_uint(order_address::SHIP_TO_NO)?.unwrap_or(0);
        let ship_to_no = u16::try_from(ship_to_no).map_err(|_| ErpError::FieldType {
            field: order_address::SHIP_TO_NO.to_string(),
            expected: "a ship-to number",
        })?;
        let text = |field: &str| row.text_or_empty(field);

        let billed = doc.customer_no;
        let delivery = doc
            .delivery_address
            .get_or_insert_with(|| DeliveryAddress::new(billed));
        delivery.address = Some(AddressLines {
            name1: text(address::NAME1),
            name2: text(address::NAME2),
            name3: text(address::NAME3),
            street: text(address::STREET),
            country: refs.country_code_to_iso(&text(address::COUNTRY_CODE)),
            postcode: text(address::POSTCODE),
            city: text(address::CITY),
        });
        delivery.recipient = Some(RecipientId::from(delivery.customer_no).with_address(ship_to_no));
        Ok(())
    }

    /// Step 2b/c: merge one `ALN00` position row into its header.
    ///
    /// Also records the position's last writer as the document's handler.
    pub fn merge_position<R: ReferenceResolver + ?Sized>(
        &mut self,
        row: &Row,
        kind: DocumentKind,
        texts: &OrderTexts,
        refs: &R,
    ) -> ErpResult<()> {
        let key = PositionKey(row.uint(delivery_position::HEADER_RECORD_NO)?);
        let quantity = match kind {
            DocumentKind::DeliveryNote => {
                if row.flag(delivery_position::MAINTENANCE_FLAG) {
                    return Err(ErpError::consistency(format!(
                        "file maintenance key set in {} for header {key}",
                        delivery_position::TABLE
                    )));
                }
                row.int(delivery_position::SHIPPED_QUANTITY)?
            }
            DocumentKind::PickingOrder => row.int(delivery_position::PICKING_QUANTITY)?,
        };

        let order = OrderNo::new(row.uint(delivery_position::ORDER_NO)?);
        let order_position = row.uint(delivery_position::ORDER_POSITION)?;
        let picking_no = row.uint(delivery_position::PICKING_NO)?;
        let picking_position = row.uint(delivery_position::PICKING_POSITION)?;

        let position = Position {
            article_no: row.text(delivery_position::ARTICLE_NO)?,
            quantity,
            guid: format!("{picking_no}-{order_position:03}-{picking_position:03}"),
            order_position_guid: texts
                .position_guid(order, order_position)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}-{order_position:03}", order.value())),
            customer_info_text: texts.position_text(order, order_position).to_vec(),
        };

        let handler_code = row.text_or_empty(delivery_position::LAST_HANDLER);
        let handler = refs.resolve_handler(&handler_code);
        if handler.is_none() {
            tracing::warn!(code = %handler_code, header = %key, "unknown handler code");
        }

        let doc = self.documents.get_mut(&key).ok_or_else(|| {
            ErpError::consistency(format!("position references unknown header {key}"))
        })?;
        doc.positions.push(position);
        doc.handler = handler;
        Ok(())
    }

    /// Step 3: attach header texts and order GUIDs. Orders outside the index are ignored.
    pub fn merge_texts(&mut self, texts: &OrderTexts) {
        for (order, lines) in &texts.header_texts {
            if let Some(doc) = self.document_for_order(*order) {
                doc.customer_info_text = lines.clone();
            }
        }
        for order in texts.header_fields.keys() {
            if let Some(guid) = texts.header_guid(*order) {
                let guid = guid.to_string();
                if let Some(doc) = self.document_for_order(*order) {
                    doc.order_guid = Some(guid);
                }
            }
        }
    }

    /// Step 4: drop delivery addresses that only repeat the billed customer.
    pub fn dedup_delivery_addresses(&mut self) {
        self.documents
            .values_mut()
            .for_each(DeliveryDocument::dedup_delivery_address);
    }

    pub fn into_documents(self) -> Vec<DeliveryDocument> {
        self.documents.into_values().collect()
    }

    fn document_for_order(&mut self, order: OrderNo) -> Option<&mut DeliveryDocument> {
        let key = self.key_for_order(order)?;
        self.documents.get_mut(&key)
    }
}
