//! Query description and the executor contract.

use std::sync::Arc;
use std::time::Duration;

use softbridge_core::ErpResult;

use crate::row::Row;

/// Inner join of an additional table: `table ON left = right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub left: String,
    pub right: String,
}

impl Join {
    pub fn new(table: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            left: left.into(),
            right: right.into(),
        }
    }
}

/// A read against one or more ERP tables.
///
/// This is a description only; SQL generation and execution belong to the
/// [`QueryExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub tables: Vec<String>,
    /// Requested columns; empty means the table's default field set.
    pub fields: Vec<String>,
    pub condition: Option<String>,
    pub joins: Vec<Join>,
    pub ordering: Vec<String>,
    pub limit: Option<usize>,
    pub grouping: Vec<String>,
    /// How long the executor may serve this result from its cache.
    pub caching_ttl: Option<Duration>,
    /// Identifies the calling component in backend logs.
    pub client_tag: Option<String>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self::tables([table])
    }

    pub fn tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn join(
        mut self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.joins.push(Join::new(table, left, right));
        self
    }

    pub fn order_by(mut self, ordering: impl Into<String>) -> Self {
        self.ordering.push(ordering.into());
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.grouping.push(field.into());
        self
    }

    /// Allow the executor to cache the result for `ttl`. A zero TTL disables caching.
    pub fn cache_for(mut self, ttl: Duration) -> Self {
        self.caching_ttl = Some(ttl);
        self
    }

    pub fn tagged(mut self, client_tag: impl Into<String>) -> Self {
        self.client_tag = Some(client_tag.into());
        self
    }

    /// First table of the FROM list.
    pub fn primary_table(&self) -> &str {
        self.tables.first().map(String::as_str).unwrap_or_default()
    }
}

/// Read and mutation capability of the ERP backend.
///
/// Implementations must return rows in the order the backend produced them.
pub trait QueryExecutor: Send + Sync {
    fn query(&self, query: &Query) -> ErpResult<Vec<Row>>;

    /// Flag the rows of `table` matching `condition`; returns the affected row count.
    fn update(&self, table: &str, condition: &str, client_tag: Option<&str>) -> ErpResult<u64>;
}

impl<E> QueryExecutor for Arc<E>
where
    E: QueryExecutor + ?Sized,
{
    fn query(&self, query: &Query) -> ErpResult<Vec<Row>> {
        (**self).query(query)
    }

    fn update(&self, table: &str, condition: &str, client_tag: Option<&str>) -> ErpResult<u64> {
        (**self).update(table, condition, client_tag)
    }
}

impl<E> QueryExecutor for &E
where
    E: QueryExecutor + ?Sized,
{
    fn query(&self, query: &Query) -> ErpResult<Vec<Row>> {
        (**self).query(query)
    }

    fn update(&self, table: &str, condition: &str, client_tag: Option<&str>) -> ErpResult<u64> {
        (**self).update(table, condition, client_tag)
    }
}
