//! Flight records over HTTP.
//!
//! Each endpoint validates (writes only), issues exactly one parameterized
//! statement against the `planes` table, and shapes the JSON response.
//!
//! ## Domain
//!
//! - [`FlightRecord`] — One stored flight arrival
//! - [`Draft`] — A write payload that passed field validation
//! - [`Violation`] — A single failed field constraint
//!
//! ## Storage
//!
//! - [`Hangar`] — Storage collaborator, implemented for the PostgreSQL client
//!
//! ## Errors
//!
//! - [`ApiError`] — Validation (400), not found (404), storage (500)
//! - [`StorageError`] — Driver failure carried to the client verbatim
//!
//! ## Routes
//!
//! - [`routes`] — Mounts every endpoint onto an actix-web application
mod draft;
mod error;
mod handlers;
mod loose;
mod record;
mod repository;

#[cfg(test)]
mod memory;

pub use draft::*;
pub use error::*;
pub use handlers::*;
pub use record::*;
pub use repository::*;
