//! Infrastructure layer: the seams to the ERP query backend.
//!
//! Query execution, text resolution and reference lookups are provided by the
//! surrounding system; this crate defines their contracts, the row model they
//! return, SQL helpers, configuration, and in-memory doubles for tests/dev.

pub mod config;
pub mod query;
pub mod reference;
pub mod row;
pub mod schema;
pub mod sql;
pub mod testing;
pub mod texts;

pub use config::ErpConfig;
pub use query::{Join, Query, QueryExecutor};
pub use reference::{ReferenceResolver, StaticReferenceResolver};
pub use row::{Row, Value};
pub use texts::{OrderTexts, TextResolver};
