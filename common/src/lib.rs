//! Shared building blocks for the Pi Buddy workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location capture, HTTP status helpers
//! - **models**: Pure wire data exchanged with the game backend
//! - **pi-core**: Business logic operating on models
//! - **pi-buddy**: Terminal application wiring everything together

pub mod error;
pub mod http_status;

pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;

#[cfg(test)]
mod tests;
