//! Delivery note operations: lookups, change feed, processing marks, statistics.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use softbridge_core::{CustomerNo, DeliveryNoteNo, ErpError, ErpResult, OrderNo, PickingNo};
use softbridge_infra::schema::{delivery_header, delivery_position, order_header, outflow};
use softbridge_infra::sql::{all_of, softm_date, sql_quote};
use softbridge_infra::{Query, QueryExecutor, ReferenceResolver, Row, TextResolver};

use crate::assembler::{AssemblyRequest, Deliveries};
use crate::document::{DeliveryDocument, DocumentKind};

/// Page size of [`Deliveries::new_delivery_notes`] when the caller has no preference.
pub const DEFAULT_NEW_LIMIT: usize = 20;

fn live_delivery_notes() -> Vec<String> {
    vec![
        format!("{}<>0", delivery_header::COL_DELIVERY_NOTE_NO),
        format!("{}<>'X'", delivery_header::COL_STATUS),
    ]
}

/// One shipped position, for warehouse statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutflowRecord {
    pub order_no: OrderNo,
    pub delivery_note_no: DeliveryNoteNo,
    /// Billed quantity.
    pub quantity: i64,
    pub order_kind: String,
    pub article_no: String,
    pub goods_recipient: CustomerNo,
    pub customer_no: CustomerNo,
    pub set_article: bool,
    /// Position value in cents.
    pub value_cents: i64,
    pub order_position: u32,
    pub picking_position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Order capture → requested arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_hours: Option<i64>,
    /// Order capture → shipment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_hours: Option<i64>,
    /// Requested arrival → shipment; positive means late.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punctuality_hours: Option<i64>,
}

fn hours_between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<i64> {
    Some((to? - from?).num_hours())
}

fn outflow_from_row(row: &Row) -> ErpResult<OutflowRecord> {
    // Depending on the ERP parametrization only one of the two numbers is filled.
    let note = match row.opt_uint(outflow::DELIVERY_NOTE_NO)?.filter(|n| *n != 0) {
        Some(n) => n,
        None => row.uint(outflow::POSITION_DELIVERY_NOTE_NO)?,
    };

    let captured = row.opt_date(outflow::ORDER_CAPTURED)?;
    let arrival = match row.opt_date(outflow::POSITION_ARRIVAL_DATE)? {
        Some(d) => Some(d),
        None => row.opt_date(outflow::ARRIVAL_DATE)?,
    };
    let shipped = match row.opt_date(outflow::SHIP_DATE)? {
        Some(d) => Some(d),
        None => row.opt_date(outflow::HEADER_SHIP_DATE)?,
    };

    Ok(OutflowRecord {
        order_no: OrderNo::new(row.uint(outflow::ORDER_NO)?),
        delivery_note_no: DeliveryNoteNo::new(note),
        quantity: row.int(outflow::BILLED_QUANTITY)?,
        order_kind: row.text_or_empty(outflow::ORDER_KIND),
        article_no: row.text(outflow::ARTICLE_NO)?,
        goods_recipient: CustomerNo::new(row.uint(outflow::GOODS_RECIPIENT)?),
        customer_no: CustomerNo::new(row.uint(outflow::INVOICE_RECIPIENT)?),
        set_article: row.opt_int(outflow::SET_ARTICLE)? == Some(1),
        value_cents: (row.decimal(outflow::VALUE)? * 100.0).round() as i64,
        order_position: row.uint(outflow::ORDER_POSITION)?,
        picking_position: row.uint(outflow::PICKING_POSITION)?,
        date: row.opt_date(outflow::DELIVERY_NOTE_DATE)?,
        lead_time_hours: hours_between(captured, arrival),
        throughput_hours: hours_between(captured, shipped),
        punctuality_hours: hours_between(arrival, shipped),
    })
}

impl<E, T, R> Deliveries<E, T, R>
where
    E: QueryExecutor,
    T: TextResolver,
    R: ReferenceResolver,
{
    /// Live delivery notes matching `extra_conditions`.
    pub fn delivery_notes(
        &self,
        extra_conditions: &[String],
        limit: Option<usize>,
        header_only: bool,
    ) -> ErpResult<Vec<DeliveryDocument>> {
        let request = AssemblyRequest::new(DocumentKind::DeliveryNote)
            .conditions(live_delivery_notes())
            .conditions(extra_conditions.iter().cloned())
            .limit(limit)
            .header_only(header_only);
        self.assemble(&request)
    }

    /// All delivery notes of an order.
    pub fn for_order(&self, order: OrderNo, header_only: bool) -> ErpResult<Vec<DeliveryDocument>> {
        let condition = format!(
            "{} = {}",
            delivery_header::COL_ORDER_NO,
            sql_quote(order.value())
        );
        self.delivery_notes(&[condition], None, header_only)
    }

    /// The delivery note created for a picking document; `None` until it was shipped.
    pub fn for_picking_order(
        &self,
        picking: PickingNo,
        header_only: bool,
    ) -> ErpResult<Option<DeliveryDocument>> {
        let condition = format!(
            "{} = {}",
            delivery_header::COL_PICKING_NO,
            sql_quote(picking.value())
        );
        Ok(self
            .delivery_notes(&[condition], Some(1), header_only)?
            .into_iter()
            .next())
    }

    /// One delivery note by number; `None` when it does not exist.
    pub fn get_delivery_note(
        &self,
        no: DeliveryNoteNo,
        header_only: bool,
    ) -> ErpResult<Option<DeliveryDocument>> {
        let condition = format!(
            "{} = {}",
            delivery_header::COL_DELIVERY_NOTE_NO,
            sql_quote(no.value())
        );
        let mut notes = self.delivery_notes(&[condition], Some(1), header_only)?;
        if notes.len() > 1 {
            return Err(ErpError::consistency(format!(
                "{} documents found for delivery note {no}",
                notes.len()
            )));
        }
        Ok(notes.pop())
    }

    /// Delivery notes created after or changed on/after `date`, newest first.
    pub fn changed_after(
        &self,
        date: NaiveDate,
        limit: Option<usize>,
    ) -> ErpResult<Vec<DeliveryNoteNo>> {
        let d = softm_date(date);
        let mut conditions = live_delivery_notes();
        conditions.push(format!(
            "({}>{d} OR {}>={d})",
            delivery_header::COL_CAPTURED,
            delivery_header::COL_CHANGED
        ));
        self.note_numbers(
            Query::table(delivery_header::TABLE)
                .condition(all_of(&conditions))
                .limit(limit),
        )
    }

    /// Delivery notes no consumer has taken over yet. Never served from cache.
    pub fn new_delivery_notes(&self, limit: Option<usize>) -> ErpResult<Vec<DeliveryNoteNo>> {
        let conditions = [
            format!("{}<>'X'", delivery_header::COL_STATUS),
            format!("{}=0", delivery_header::COL_PROCESSED),
            format!("{}<>0", delivery_header::COL_DELIVERY_NOTE_NO),
        ];
        self.note_numbers(
            Query::table(delivery_header::TABLE)
                .condition(all_of(&conditions))
                .limit(Some(limit.unwrap_or(DEFAULT_NEW_LIMIT)))
                .cache_for(Duration::ZERO),
        )
    }

    /// Flag a delivery note as taken over so [`Self::new_delivery_notes`] skips it.
    ///
    /// Returns the number of header rows flagged (0 if it was already processed).
    pub fn mark_processed(&self, no: DeliveryNoteNo) -> ErpResult<u64> {
        let condition = all_of([
            format!(
                "{}={}",
                delivery_header::COL_DELIVERY_NOTE_NO,
                sql_quote(no.value())
            ),
            format!("{}<>'X'", delivery_header::COL_STATUS),
            format!("{}=0", delivery_header::COL_PROCESSED),
        ]);
        let affected = self
            .executor
            .update(delivery_header::TABLE, &condition, Some(self.client_tag.as_str()))?;
        tracing::info!(delivery_note = %no, affected, "marked delivery note processed");
        Ok(affected)
    }

    /// Shipped positions of one day, for statistics.
    pub fn warehouse_outflow(&self, day: NaiveDate) -> ErpResult<Vec<OutflowRecord>> {
        let conditions = [
            format!(
                "({}<>0 OR {}<>0)",
                delivery_header::COL_DELIVERY_NOTE_NO,
                delivery_position::COL_DELIVERY_NOTE_NO
            ),
            format!("{}='0'", order_header::COL_STOCK_MODE),
            format!("{}<>'X'", delivery_position::COL_STATUS),
            format!("{}<>'X'", delivery_header::COL_STATUS),
            format!("{}={}", delivery_position::COL_SHIP_DATE, sql_quote(softm_date(day))),
        ];
        let rows = self.run(
            Query::table(delivery_position::TABLE)
                .fields(outflow::FIELDS.iter().copied())
                .condition(all_of(&conditions))
                .join(
                    delivery_header::TABLE,
                    delivery_position::COL_HEADER_RECORD_NO,
                    delivery_header::COL_RECORD_NO,
                )
                .join(
                    order_header::TABLE,
                    delivery_position::COL_ORDER_NO,
                    order_header::COL_ORDER_NO,
                ),
        )?;
        rows.iter().map(outflow_from_row).collect()
    }

    /// `(unprocessed, processed)` live delivery note counts.
    pub fn processing_statistics(&self) -> ErpResult<(u64, u64)> {
        const COUNT: &str = "COUNT(*)";
        let rows = self.run(
            Query::table(delivery_header::TABLE)
                .fields([delivery_header::COL_PROCESSED, COUNT])
                .condition(all_of(live_delivery_notes()))
                .group_by(delivery_header::COL_PROCESSED),
        )?;

        let (mut unprocessed, mut processed) = (0, 0);
        for row in &rows {
            let count = u64::try_from(row.int(COUNT)?).unwrap_or(0);
            match row.int(delivery_header::COL_PROCESSED)? {
                0 => unprocessed += count,
                _ => processed += count,
            }
        }
        Ok((unprocessed, processed))
    }

    fn note_numbers(&self, query: Query) -> ErpResult<Vec<DeliveryNoteNo>> {
        let query = query
            .fields([delivery_header::COL_DELIVERY_NOTE_NO])
            .order_by(format!("{} DESC", delivery_header::COL_RECORD_NO));
        self.run(query)?
            .iter()
            .map(|r| r.uint(delivery_header::COL_DELIVERY_NOTE_NO).map(DeliveryNoteNo::new))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softbridge_infra::testing::{InMemoryTextResolver, ScriptedExecutor};
    use softbridge_infra::{ErpConfig, StaticReferenceResolver, Value};

    type TestDeliveries<'a> =
        Deliveries<&'a ScriptedExecutor, InMemoryTextResolver, StaticReferenceResolver>;

    fn deliveries(exec: &ScriptedExecutor) -> TestDeliveries<'_> {
        Deliveries::new(
            exec,
            InMemoryTextResolver::default(),
            StaticReferenceResolver::default(),
            &ErpConfig::default(),
        )
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn header(record_no: u32, note: u32) -> Row {
        Row::new("ALK00")
            .with("satznr", record_no)
            .with("auftragsnr", 1163764)
            .with("ALK_lieferschein", day(2010, 12, 21))
            .with("rechnungsempfaenger", 17200)
            .with("warenempfaenger", 17200)
            .with("lager", 1)
            .with("kommibelegnr", 99)
            .with("lieferscheinnr", note)
    }

    #[test]
    fn for_order_filters_live_notes_of_the_order() {
        let exec = ScriptedExecutor::empty();
        deliveries(&exec)
            .for_order("SO1163764".parse().unwrap(), true)
            .unwrap();
        assert_eq!(
            exec.queries()[0].condition.as_deref(),
            Some("LKLFSN<>0 AND LKSTAT<>'X' AND LKAUFS = '1163764'")
        );
    }

    #[test]
    fn get_delivery_note_returns_single_note() {
        let exec = ScriptedExecutor::new(|q| match q.primary_table() {
            "ALK00" => Ok(vec![header(1, 4173969)]),
            _ => Ok(vec![]),
        });
        let note = deliveries(&exec)
            .get_delivery_note("SL4173969".parse().unwrap(), true)
            .unwrap()
            .unwrap();
        assert_eq!(note.delivery_note_no, Some(DeliveryNoteNo::new(4173969)));
        let q = &exec.queries()[0];
        assert_eq!(q.limit, Some(1));
        assert!(q.condition.as_deref().unwrap().ends_with("LKLFSN = '4173969'"));
    }

    #[test]
    fn get_delivery_note_missing_is_none() {
        let exec = ScriptedExecutor::empty();
        let note = deliveries(&exec)
            .get_delivery_note(DeliveryNoteNo::new(1), false)
            .unwrap();
        assert_eq!(note, None);
    }

    #[test]
    fn get_delivery_note_rejects_ambiguous_numbers() {
        // A backend ignoring the limit must not make us pick one at random.
        let exec = ScriptedExecutor::new(|q| match q.primary_table() {
            "ALK00" => Ok(vec![header(1, 7), header(2, 7)]),
            _ => Ok(vec![]),
        });
        let err = deliveries(&exec)
            .get_delivery_note(DeliveryNoteNo::new(7), true)
            .unwrap_err();
        assert!(err.is_consistency());
    }

    #[test]
    fn for_picking_order_is_none_until_shipped() {
        let exec = ScriptedExecutor::empty();
        let note = deliveries(&exec)
            .for_picking_order("KA99".parse().unwrap(), true)
            .unwrap();
        assert_eq!(note, None);
        assert!(
            exec.queries()[0]
                .condition
                .as_deref()
                .unwrap()
                .ends_with("LKKBNR = '99'")
        );
    }

    #[test]
    fn changed_after_uses_erp_date_encoding() {
        let exec = ScriptedExecutor::new(|_| {
            Ok(vec![
                Row::new("ALK00").with("LKLFSN", 4176141),
                Row::new("ALK00").with("LKLFSN", 4173969),
            ])
        });
        let notes = deliveries(&exec)
            .changed_after(day(2010, 12, 1), Some(10))
            .unwrap();
        assert_eq!(
            notes,
            vec![DeliveryNoteNo::new(4176141), DeliveryNoteNo::new(4173969)]
        );
        let q = &exec.queries()[0];
        assert_eq!(
            q.condition.as_deref(),
            Some("LKLFSN<>0 AND LKSTAT<>'X' AND (LKDTER>1101201 OR LKDTAE>=1101201)")
        );
        assert_eq!(q.fields, vec!["LKLFSN"]);
        assert_eq!(q.ordering, vec!["LKSANK DESC"]);
        assert_eq!(q.limit, Some(10));
    }

    #[test]
    fn new_delivery_notes_bypass_the_cache() {
        let exec = ScriptedExecutor::empty();
        deliveries(&exec).new_delivery_notes(None).unwrap();
        let q = &exec.queries()[0];
        assert_eq!(q.caching_ttl, Some(Duration::ZERO));
        assert_eq!(q.limit, Some(DEFAULT_NEW_LIMIT));
        assert_eq!(
            q.condition.as_deref(),
            Some("LKSTAT<>'X' AND LKKZ02=0 AND LKLFSN<>0")
        );
    }

    #[test]
    fn mark_processed_updates_unprocessed_header() {
        let exec = ScriptedExecutor::empty().with_update_count(1);
        let affected = deliveries(&exec)
            .mark_processed("SL4173969".parse().unwrap())
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(
            exec.updates(),
            vec![(
                "ALK00".to_string(),
                "LKLFSN='4173969' AND LKSTAT<>'X' AND LKKZ02=0".to_string()
            )]
        );
    }

    fn outflow_row() -> Row {
        Row::new("ALN00")
            .with("auftragsnr", 1163764)
            .with("lieferscheinnr", 0)
            .with("ALN_lieferscheinnr", 4173969)
            .with("menge_fakturierung", 12)
            .with("art", "")
            .with("artnr", "14600/03")
            .with("warenempfaenger", 17200)
            .with("rechnungsempfaenger", 17300)
            .with("setartikel", 1)
            .with("wert", 123.45)
            .with("auftrags_position", 2)
            .with("kommibeleg_position", 1)
            .with("ALK_lieferschein_date", day(2010, 12, 21))
            .with("ALN_anliefer_date", Value::Null)
            .with("anliefer_date", day(2010, 12, 20))
            .with("versand_date", day(2010, 12, 21))
            .with("AAK_erfassung_date", day(2010, 12, 15))
    }

    #[test]
    fn warehouse_outflow_computes_durations() {
        let exec = ScriptedExecutor::new(|_| Ok(vec![outflow_row()]));
        let records = deliveries(&exec)
            .warehouse_outflow(day(2010, 12, 21))
            .unwrap();
        let r = &records[0];
        assert_eq!(r.delivery_note_no, DeliveryNoteNo::new(4173969));
        assert_eq!(r.value_cents, 12345);
        assert!(r.set_article);
        assert_eq!(r.goods_recipient, CustomerNo::new(17200));
        assert_eq!(r.customer_no, CustomerNo::new(17300));
        assert_eq!(r.lead_time_hours, Some(5 * 24));
        assert_eq!(r.throughput_hours, Some(6 * 24));
        assert_eq!(r.punctuality_hours, Some(24));

        let q = &exec.queries()[0];
        assert_eq!(q.primary_table(), "ALN00");
        assert!(q.condition.as_deref().unwrap().ends_with("LNDTLF='1101221'"));
        assert_eq!(q.joins.len(), 2);
    }

    #[test]
    fn warehouse_outflow_without_dates_has_no_durations() {
        let exec = ScriptedExecutor::new(|_| {
            Ok(vec![
                outflow_row()
                    .with("anliefer_date", Value::Null)
                    .with("versand_date", Value::Null),
            ])
        });
        let r = deliveries(&exec)
            .warehouse_outflow(day(2010, 12, 21))
            .unwrap()
            .remove(0);
        assert_eq!(r.lead_time_hours, None);
        assert_eq!(r.punctuality_hours, None);
        assert_eq!(r.throughput_hours, None);
    }

    #[test]
    fn processing_statistics_groups_by_marker() {
        let exec = ScriptedExecutor::new(|_| {
            Ok(vec![
                Row::new("ALK00").with("LKKZ02", 0).with("COUNT(*)", 3),
                Row::new("ALK00").with("LKKZ02", 1).with("COUNT(*)", 4711),
            ])
        });
        assert_eq!(deliveries(&exec).processing_statistics().unwrap(), (3, 4711));
        assert_eq!(exec.queries()[0].grouping, vec!["LKKZ02"]);
    }
}
