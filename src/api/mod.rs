//! API Module
//!
//! HTTP handlers and routing for the petition server REST API.
//!
//! # Endpoints
//! - `POST /api/petition/sign` - Record a signature
//! - `GET /api/petition/signatures/count` - Signature count
//! - `GET /api/petition/signatures` - All signatures
//! - `POST /api/donation/track` - Record a donation
//! - `GET /api/donation/total` - Donation total, count and average
//! - `GET /api/donation/list` - All donations
//! - `GET /api/stats` - Campaign aggregates
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
