//! `softbridge-core`: foundation types shared by the ERP access crates.
//!
//! This crate contains **pure** primitives (no query execution, no IO).

pub mod error;
pub mod handlers;
pub mod id;

pub use error::{ErpError, ErpResult};
pub use handlers::HandlerDirectory;
pub use id::{CustomerNo, DeliveryNoteNo, OrderNo, PickingNo, RecipientId, WarehouseNo};
