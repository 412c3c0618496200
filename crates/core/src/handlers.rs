//! Handler directory: ERP user codes mapped to display names.
//!
//! The ERP records staff (account managers on customers, last writers on order
//! positions) by short login codes. The mapping is configuration, injected where
//! needed so tests can substitute their own table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ErpError, ErpResult};

/// Code → display name mapping for ERP staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerDirectory {
    entries: BTreeMap<String, String>,
}

impl HandlerDirectory {
    /// An empty directory (every lookup misses).
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The directory shipped with the crate.
    pub fn builtin() -> Self {
        [
            ("verkauf", "Verkaufsinnendienst"),
            ("bbonrath", "Birgit Bonrath"),
            ("cgiermann", "Carsten Giermann"),
            ("ngerloff", "Nadine Gerloff"),
            ("ajames", "Andrea James"),
            ("alangen", "Anja Langen"),
            ("cblumberg", "Claudia Blumberg"),
            ("cgerlach", "Christoph Gerlach"),
            ("dgrossmann", "Dirk Grossmann"),
            ("export", "Export"),
            ("falin", "Fuesun Alin"),
            ("jtiszekker", "Juergen Tiszekker"),
            ("jwestpahl", "Jutta Westphal"),
            ("kschulze", "Katrin Schulze"),
        ]
        .into_iter()
        .collect()
    }

    /// Parse a directory from a JSON object of `code: name` pairs.
    pub fn from_json_str(raw: &str) -> ErpResult<Self> {
        serde_json::from_str(raw).map_err(|e| ErpError::config(format!("handler directory: {e}")))
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.entries.insert(code.into(), name.into());
    }

    /// Look up a display name. Codes are matched after trimming the fixed-width padding.
    pub fn resolve(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HandlerDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<C: Into<String>, N: Into<String>> FromIterator<(C, N)> for HandlerDirectory {
    fn from_iter<I: IntoIterator<Item = (C, N)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(c, n)| (c.into(), n.into()))
                .collect(),
        }
    }
}
