// API adapters for the backend services the suite synchronizes against

pub mod authenticator;
pub mod overview;
pub mod returns;
pub mod shipments;

pub use authenticator::{AuthenticatorApi, User};
pub use overview::OverviewApi;
pub use returns::ReturnsApi;
pub use shipments::{PublicApiVersion, ShipmentRef, ShipmentsApi};
