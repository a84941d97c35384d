//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters translate between domain types and the document store's wire
//! representation. They contain no business logic.

pub mod store;
