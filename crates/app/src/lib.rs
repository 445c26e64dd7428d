//! # homelink-app
//!
//! Application core for the homelink device simulator.
//!
//! ## Responsibilities
//! - [`hub::DeviceHub`] — the connection registry, the fanout broadcaster,
//!   and the per-message session dispatch
//! - [`perturb::SensorSimulator`] — the periodic loop that drifts sensor
//!   values to simulate live telemetry
//!
//! ## Dependency rule
//! Depends on `homelink-domain` only. Transports (WebSocket, HTTP) live in
//! adapter crates and talk to this crate through [`hub::DeviceHub`].

pub mod hub;
pub mod perturb;
