//! Picking document ("Kommissionierbeleg") lookup.

use softbridge_core::{DeliveryNoteNo, ErpResult, PickingNo};
use softbridge_infra::schema::delivery_header;
use softbridge_infra::sql::{all_of, sql_quote};
use softbridge_infra::{Query, QueryExecutor, ReferenceResolver, TextResolver};

use crate::assembler::{AssemblyRequest, Deliveries};
use crate::document::{DeliveryDocument, DocumentKind};

impl<E, T, R> Deliveries<E, T, R>
where
    E: QueryExecutor,
    T: TextResolver,
    R: ReferenceResolver,
{
    /// A picking document with its quantities to pick.
    ///
    /// Returns `None` when the document does not exist, and also when its
    /// records are inconsistent (logged as a warning). Once the goods were
    /// shipped, `delivery_note_no` carries the resulting delivery note.
    pub fn get_picking_document(
        &self,
        picking: PickingNo,
        header_only: bool,
    ) -> ErpResult<Option<DeliveryDocument>> {
        let picking_no = sql_quote(picking.value());
        let request = AssemblyRequest::new(DocumentKind::PickingOrder)
            .condition(format!("{} = 0", delivery_header::COL_DELIVERY_NOTE_NO))
            .condition(format!("{} = {picking_no}", delivery_header::COL_PICKING_NO))
            .condition(format!("{}<>'X'", delivery_header::COL_STATUS))
            .header_only(header_only);

        let mut document = match self.assemble(&request) {
            Ok(documents) => match documents.into_iter().next() {
                Some(document) => document,
                None => return Ok(None),
            },
            Err(err) if err.is_consistency() => {
                tracing::warn!(picking = %picking, error = %err, "inconsistent picking document");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let shipped = self.run(
            Query::table(delivery_header::TABLE)
                .fields([delivery_header::COL_DELIVERY_NOTE_NO])
                .condition(all_of([
                    format!("{} <> 0", delivery_header::COL_DELIVERY_NOTE_NO),
                    format!("{} = {picking_no}", delivery_header::COL_PICKING_NO),
                ]))
                .limit(Some(1)),
        )?;
        document.delivery_note_no = match shipped.first() {
            Some(row) => Some(DeliveryNoteNo::new(
                row.uint(delivery_header::COL_DELIVERY_NOTE_NO)?,
            )),
            None => None,
        };
        Ok(Some(document))
    }
}
