//! QPortfolio backend library
//!
//! Request validation, schema mapping to the quantum optimizer, synthetic
//! analytics and the axum router that exposes them.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mapper;
pub mod middleware;
pub mod models;
pub mod synth;
pub mod validate;

pub use api::{router, AppState};
pub use config::AppConfig;
pub use error::{ApiError, ErrorKind};
