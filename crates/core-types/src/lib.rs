//! # Atlas Core Types
//!
//! The Layer 0 crate of the workspace: the entity snapshots served by the
//! travel-agency REST API, plus the small shared vocabulary (reporting
//! periods, timestamp parsing) that every other layer builds on.
//!
//! ## Architectural Principles
//!
//! - **Externally owned data:** every entity here is a read-only snapshot
//!   of a record owned by the upstream API. Nothing in this workspace ever
//!   mutates one; downstream crates only derive summaries from them.
//! - **No dependencies upward:** this crate knows nothing about HTTP,
//!   caching, or the analytics pipeline.

pub mod entities;
pub mod enums;
pub mod error;
pub mod time;

// Re-export the core types to provide a clean public API.
pub use entities::{Hotel, Invoice, Package, Place, User, Voucher};
pub use enums::Period;
pub use error::CoreError;
pub use time::parse_timestamp;
