//! Customer master data and alternate delivery addresses.
//!
//! Raw ERP rows are normalized into [`Customer`] records; lookups go through
//! an injected [`QueryExecutor`](softbridge_infra::QueryExecutor).

pub mod customer;
pub mod lookup;

pub use customer::{Customer, customer_from_row};
pub use lookup::CustomerDirectory;
