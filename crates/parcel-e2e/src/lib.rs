//! parcel-e2e: API polling and synchronization core for Parcel Perform
//! end-to-end tests
//!
//! The tracking backend is eventually consistent: a shipment created or
//! updated through the public API becomes visible in search, status, and
//! event reads some time later. This crate gives test code the waits that
//! bridge that gap - a generic fixed-interval predicate poller plus
//! per-resource adapters for shipments, the parcel-overview search
//! service, and return requests.
//!
//! # Example
//!
//! ```ignore
//! use parcel_e2e::api::{ShipmentRef, ShipmentsApi};
//! use parcel_e2e::config::Endpoints;
//! use parcel_e2e::{ApiClient, ShipmentStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoints = Endpoints::from_env()?;
//!     let http = ApiClient::new()?;
//!     let shipments = ShipmentsApi::new(&http, &endpoints, &access_token);
//!
//!     // Strict wait: raises a descriptive error if the status never lands.
//!     let shipment = ShipmentRef::by_id("480213");
//!     shipments
//!         .wait_for_status(&shipment, ShipmentStatus::Active)
//!         .await?;
//!
//!     // Lenient wait: the test asserts on the boolean.
//!     let delivered = shipments
//!         .wait_for_property(&shipment, "data.status", &"delivered".into())
//!         .await?;
//!     assert!(delivered);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
mod error;
pub mod http;
pub mod json;
pub mod model;
pub mod policy;
pub mod wait;

// Re-export error types
pub use error::{Error, Result};

// Re-export the HTTP capability shared by the adapters
pub use http::ApiClient;

// Re-export the domain vocabulary
pub use model::{OrgInfo, ShipmentStatus, TrackingEvent};

// Re-export the poller surface
pub use wait::{CancellationToken, PollResult, WaitSpec};
