//! In-memory collaborators for tests/dev.
//!
//! Not a query engine: the scripted executor hands every [`Query`] to a
//! closure which decides what rows to return, and records what was asked.

use std::sync::Mutex;

use softbridge_core::{ErpError, ErpResult, OrderNo};

use crate::query::{Query, QueryExecutor};
use crate::row::Row;
use crate::texts::{OrderTexts, TextResolver};

type Script = dyn Fn(&Query) -> ErpResult<Vec<Row>> + Send + Sync;

/// Executor answering queries from a closure.
pub struct ScriptedExecutor {
    script: Box<Script>,
    queries: Mutex<Vec<Query>>,
    updates: Mutex<Vec<(String, String)>>,
    update_count: u64,
}

impl ScriptedExecutor {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&Query) -> ErpResult<Vec<Row>> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            queries: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            update_count: 1,
        }
    }

    /// An executor that returns no rows for any query.
    pub fn empty() -> Self {
        Self::new(|_| Ok(Vec::new()))
    }

    /// Row count reported by every `update`.
    pub fn with_update_count(mut self, count: u64) -> Self {
        self.update_count = count;
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// Queries received so far against `table` (as primary table).
    pub fn queries_on(&self, table: &str) -> Vec<Query> {
        self.queries()
            .into_iter()
            .filter(|q| q.primary_table() == table)
            .collect()
    }

    /// `(table, condition)` of every update received so far.
    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl core::fmt::Debug for ScriptedExecutor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptedExecutor")
            .field("queries", &self.queries().len())
            .field("updates", &self.updates().len())
            .finish()
    }
}

impl QueryExecutor for ScriptedExecutor {
    fn query(&self, query: &Query) -> ErpResult<Vec<Row>> {
        self.queries
            .lock()
            .map_err(|_| ErpError::backend("scripted executor poisoned"))?
            .push(query.clone());
        (self.script)(query)
    }

    fn update(&self, table: &str, condition: &str, _client_tag: Option<&str>) -> ErpResult<u64> {
        self.updates
            .lock()
            .map_err(|_| ErpError::backend("scripted executor poisoned"))?
            .push((table.to_string(), condition.to_string()));
        Ok(self.update_count)
    }
}

/// Values of `column IN (...)` within a condition, if present.
///
/// Scripts use this to answer batched lookups with exactly the requested keys.
pub fn in_list_values(condition: &str, column: &str) -> Vec<String> {
    let needle = format!("{column} IN (");
    let Some(start) = condition.find(&needle) else {
        return Vec::new();
    };
    let rest = &condition[start + needle.len()..];
    let Some(end) = rest.find(')') else {
        return Vec::new();
    };
    rest[..end]
        .split(',')
        .map(|v| v.trim().trim_matches('\'').to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Text resolver serving a fixed [`OrderTexts`] and recording requests.
#[derive(Debug, Default)]
pub struct InMemoryTextResolver {
    texts: OrderTexts,
    requests: Mutex<Vec<Vec<OrderNo>>>,
}

impl InMemoryTextResolver {
    pub fn new(texts: OrderTexts) -> Self {
        Self {
            texts,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Order lists passed to `resolve_texts`, in call order.
    pub fn requests(&self) -> Vec<Vec<OrderNo>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl TextResolver for InMemoryTextResolver {
    fn resolve_texts(&self, orders: &[OrderNo]) -> ErpResult<OrderTexts> {
        self.requests
            .lock()
            .map_err(|_| ErpError::backend("text resolver poisoned"))?
            .push(orders.to_vec());
        Ok(self.texts.restricted_to(orders))
    }
}
