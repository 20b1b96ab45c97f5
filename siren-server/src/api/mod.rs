//! HTTP API handlers for siren
//!
//! - `POST /api/chiron/audio-output`: free-text intake
//! - `GET /api/siren/db/{department}`, `DELETE /api/siren/db/{id}`,
//!   `POST /api/siren/db`: stored cases
//! - `GET /health`

pub mod cases;
pub mod health;
pub mod intake;

pub use cases::case_routes;
pub use health::health_routes;
pub use intake::intake_routes;
