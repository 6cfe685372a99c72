//! Synthetic analytics.
//!
//! Placeholder data for the dashboard when no optimizer is configured and for
//! the demo endpoints that never had a live backend. Values are tuned to look
//! plausible, not to be statistically meaningful.

pub mod compare;
pub mod demo;
pub mod evolution;
pub mod mock;
pub mod rng;
pub mod stress;

/// Round to one decimal, as the dashboard displays it.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
