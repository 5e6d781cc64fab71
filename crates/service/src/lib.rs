//! CarMarket Pro price service
//!
//! HTTP surface and configuration for the car price prediction service.
//! The binary in `main.rs` wires these together with the artifacts.

pub mod api;
pub mod config;

pub use api::{create_router, AppState};
pub use config::ServiceConfig;
