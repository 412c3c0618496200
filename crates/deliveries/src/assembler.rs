//! Query orchestration for document assembly.

use std::time::Duration;

use softbridge_core::ErpResult;
use softbridge_infra::schema::{customer, delivery_header, delivery_position, order_address, order_header};
use softbridge_infra::sql::{all_of, in_list};
use softbridge_infra::{ErpConfig, Query, QueryExecutor, ReferenceResolver, Row, TextResolver};

use crate::document::{DeliveryDocument, DocumentKind};
use crate::pipeline::DocumentIndex;

/// Keys per enrichment query; keeps `IN (...)` lists within backend limits.
pub const BATCH_SIZE: usize = 50;

/// What to assemble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRequest {
    /// Combined with `AND`.
    pub conditions: Vec<String>,
    pub limit: Option<usize>,
    /// Skip positions, addresses and texts.
    pub header_only: bool,
    pub kind: DocumentKind,
}

impl AssemblyRequest {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            conditions: Vec::new(),
            limit: None,
            header_only: false,
            kind,
        }
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.extend(conditions.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn header_only(mut self, header_only: bool) -> Self {
        self.header_only = header_only;
        self
    }
}

/// Delivery note and picking document access.
///
/// Owns (or borrows, via the blanket impls) the three external collaborators.
#[derive(Debug)]
pub struct Deliveries<E, T, R> {
    pub(crate) executor: E,
    texts: T,
    refs: R,
    pub(crate) caching_ttl: Duration,
    pub(crate) client_tag: String,
}

impl<E, T, R> Deliveries<E, T, R>
where
    E: QueryExecutor,
    T: TextResolver,
    R: ReferenceResolver,
{
    pub fn new(executor: E, texts: T, refs: R, config: &ErpConfig) -> Self {
        Self {
            executor,
            texts,
            refs,
            caching_ttl: config.caching_ttl,
            client_tag: config.client_tag_for("deliveries"),
        }
    }

    pub(crate) fn run(&self, query: Query) -> ErpResult<Vec<Row>> {
        let query = query.tagged(self.client_tag.clone());
        tracing::debug!(
            table = query.primary_table(),
            condition = ?query.condition,
            limit = ?query.limit,
            "delivery query"
        );
        self.executor.query(&query)
    }

    /// Assemble documents matching `request`.
    ///
    /// Fails with `Consistency` when a header or position carries the file
    /// maintenance flag or a header has no date; such failures are never
    /// turned into partial results.
    pub fn assemble(&self, request: &AssemblyRequest) -> ErpResult<Vec<DeliveryDocument>> {
        let mut header_query = Query::table(delivery_header::TABLE)
            .order_by(format!("{} DESC", delivery_header::COL_RECORD_NO))
            .limit(request.limit)
            .join(customer::TABLE, delivery_header::COL_CUSTOMER_NO, customer::COL_CUSTOMER_NO)
            .join(order_header::TABLE, delivery_header::COL_ORDER_NO, order_header::COL_ORDER_NO)
            .cache_for(self.caching_ttl);
        if !request.conditions.is_empty() {
            header_query = header_query.condition(all_of(&request.conditions));
        }

        let rows = self.run(header_query)?;
        let mut index = DocumentIndex::from_header_rows(&rows, &self.refs)?;
        tracing::debug!(headers = index.len(), kind = ?request.kind, "indexed document headers");

        if request.header_only || index.is_empty() {
            index.dedup_delivery_addresses();
            return Ok(index.into_documents());
        }

        let texts = self.texts.resolve_texts(&index.order_numbers())?;

        for batch in index.batches(BATCH_SIZE) {
            let orders: Vec<_> = batch
                .iter()
                .filter_map(|k| index.order_for_key(*k))
                .map(|o| o.value())
                .collect();

            let addresses = self.run(
                Query::tables([order_address::TABLE, order_header::TABLE])
                    .condition(format!(
                        "{kind}=1 AND {nr} IN ({orders}) AND {nr}={order}",
                        kind = order_address::COL_KIND,
                        nr = order_address::COL_ORDER_NO,
                        orders = in_list(&orders),
                        order = order_header::COL_ORDER_NO,
                    ))
                    .cache_for(self.caching_ttl),
            )?;
            for row in &addresses {
                index.merge_delivery_address(row, &self.refs)?;
            }

            let positions = self.run(
                Query::table(delivery_position::TABLE)
                    .condition(format!(
                        "{}<>'X' AND {} IN ({})",
                        delivery_position::COL_STATUS,
                        delivery_position::COL_HEADER_RECORD_NO,
                        in_list(&batch)
                    ))
                    .cache_for(self.caching_ttl),
            )?;
            for row in &positions {
                index.merge_position(row, request.kind, &texts, &self.refs)?;
            }
            tracing::debug!(
                headers = batch.len(),
                addresses = addresses.len(),
                positions = positions.len(),
                "enriched batch"
            );
        }

        index.merge_texts(&texts);
        index.dedup_delivery_addresses();
        Ok(index.into_documents())
    }
}
