//! # reqtrace-core
//!
//! Core types for the reqtrace traceability ledger.
//!
//! This crate defines the foundational types used across all other reqtrace
//! crates:
//! - [`LinkRecord`] — the atomic unit stored by the ledger
//! - [`LinkEndpoint`] — one side of a link: weak entity reference + optional
//!   pinned version
//! - [`LinkType`], [`LinkStatus`], [`LinkSide`] — closed enumerations
//! - [`EntityRecord`], [`TopologyEdge`], [`EntityCatalog`] — host-supplied
//!   snapshots of the external model
//! - Error hierarchy ([`CoreError`])

pub mod entity;
pub mod error;
pub mod link;

pub use entity::{EntityCatalog, EntityRecord, TopologyEdge};
pub use error::{CoreError, Result};
pub use link::{EntityId, LinkEndpoint, LinkMetadata, LinkRecord, LinkSide, LinkStatus, LinkType};
