//! Configuration loading and representation.

use std::time::Duration;

use softbridge_core::{ErpError, ErpResult, HandlerDirectory};

use crate::reference::StaticReferenceResolver;

/// Twelve hours: ERP documents rarely change once written.
pub const DEFAULT_CACHING_TTL: Duration = Duration::from_secs(60 * 60 * 12);

pub const DEFAULT_CLIENT_TAG: &str = "softbridge";

/// Settings shared by all ERP access components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpConfig {
    /// TTL passed to the executor for cacheable document queries.
    pub caching_ttl: Duration,
    /// Prefix for the client tag sent with every query (`<prefix>.<component>`).
    pub client_tag: String,
    /// Staff code → name directory.
    pub handlers: HandlerDirectory,
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            caching_ttl: DEFAULT_CACHING_TTL,
            client_tag: DEFAULT_CLIENT_TAG.to_string(),
            handlers: HandlerDirectory::default(),
        }
    }
}

impl ErpConfig {
    /// Load from process environment:
    ///
    /// - `ERP_CACHE_TTL_SECS` (default 43200)
    /// - `ERP_CLIENT_TAG` (default `softbridge`)
    /// - `ERP_HANDLERS_FILE`: JSON object replacing the built-in handler directory
    pub fn from_env() -> ErpResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests inject a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ErpResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("ERP_CACHE_TTL_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ErpError::config(format!("ERP_CACHE_TTL_SECS={raw:?}: {e}")))?;
            config.caching_ttl = Duration::from_secs(secs);
        }

        if let Some(tag) = lookup("ERP_CLIENT_TAG").filter(|t| !t.trim().is_empty()) {
            config.client_tag = tag.trim().to_string();
        }

        if let Some(path) = lookup("ERP_HANDLERS_FILE") {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| ErpError::config(format!("ERP_HANDLERS_FILE={path}: {e}")))?;
            config.handlers = HandlerDirectory::from_json_str(&raw)?;
            tracing::debug!(path = %path, entries = config.handlers.len(), "loaded handler directory");
        }

        Ok(config)
    }

    /// Client tag for one component, e.g. `softbridge.deliveries`.
    pub fn client_tag_for(&self, component: &str) -> String {
        format!("{}.{}", self.client_tag, component)
    }

    /// Reference resolver backed by this configuration's tables.
    pub fn reference_resolver(&self) -> StaticReferenceResolver {
        StaticReferenceResolver::new(self.handlers.clone())
    }
}
