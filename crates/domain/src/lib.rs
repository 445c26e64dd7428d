//! # homelink-domain
//!
//! Pure domain model for the homelink device simulator.
//!
//! ## Responsibilities
//! - Define **Devices** (switches, doors, sensors) and the status/value
//!   invariant that keeps them consistent
//! - Own the **Device Registry** — the canonical in-memory collection of
//!   device records, with deterministic per-property generation
//! - Define **Properties** (estates whose devices the simulator manages)
//! - Define the **wire protocol** message shapes exchanged with clients
//! - Define error conventions and typed identifiers
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.

pub mod device;
pub mod error;
pub mod id;
pub mod property;
pub mod protocol;
pub mod registry;
