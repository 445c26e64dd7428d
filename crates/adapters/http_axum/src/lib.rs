//! # homelink-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **REST JSON API** for programmatic access
//!   (`/api/health`, `/api/auth/login`, `/api/properties`, …)
//! - Map HTTP requests into hub and registry reads (driving adapter)
//! - Map results into JSON responses with express-style error bodies
//!   (`{"error": "..."}`)
//!
//! Device control and live updates are not served here; those go through
//! the WebSocket adapter. This surface is read-only apart from login.
//!
//! ## Dependency rule
//! Depends on `homelink-app` (the hub) and `homelink-domain` (types used in
//! response mapping). Never leaks axum types into the domain.

pub mod api;
pub mod router;
pub mod state;
