//! Delivery notes and picking documents.
//!
//! Header rows are joined with customer and order data, then enriched in
//! batches with delivery addresses, positions and texts. The merge steps live
//! in [`pipeline`] and are pure; [`Deliveries`] issues the queries.

pub mod assembler;
pub mod document;
pub mod notes;
pub mod picking;
pub mod pipeline;

pub use assembler::{AssemblyRequest, BATCH_SIZE, Deliveries};
pub use document::{
    AddressLines, DeliveryAddress, DeliveryDocument, DocumentKind, Position, PositionKey,
};
pub use notes::OutflowRecord;
pub use pipeline::DocumentIndex;
