// Domain model - wire-contract enums and organization context
//
// Status and event strings are wire values the backend matches on, not
// display text. Do not re-case them; two casing conventions are in play
// (see the overview vs public-api status waits) and both are load-bearing.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a tracked shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Created,
    Pending,
    InTransit,
    Delivered,
    Cancelled,
    Failed,
    Active,
}

impl ShipmentStatus {
    /// Canonical backend status string.
    pub fn pp_status(&self) -> &'static str {
        match self {
            ShipmentStatus::Created => "created",
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
            ShipmentStatus::Failed => "failed",
            ShipmentStatus::Active => "active",
        }
    }
}

/// Tracking events in the order and delivery phases of the shipment
/// lifecycle. The variant names are the backend event keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingEvent {
    /// Order created
    A10,
    /// Order confirmed
    A20,
    /// Order cancelled
    A30,
    /// Order completed
    A40,
    /// Delivery scheduled
    D10,
    /// Delivery completed
    D20,
    /// Delivery cancelled
    D30,
    /// Delivery rescheduled
    D40,
}

impl TrackingEvent {
    /// Unique event identifier matched against `event_key` in responses.
    pub fn event_key(&self) -> &'static str {
        match self {
            TrackingEvent::A10 => "A10",
            TrackingEvent::A20 => "A20",
            TrackingEvent::A30 => "A30",
            TrackingEvent::A40 => "A40",
            TrackingEvent::D10 => "D10",
            TrackingEvent::D20 => "D20",
            TrackingEvent::D30 => "D30",
            TrackingEvent::D40 => "D40",
        }
    }

    /// Internal transformer event code.
    pub fn event_raw(&self) -> String {
        format!("TRANSFORMER_{}", self.event_key())
    }

    /// Customer-facing event name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TrackingEvent::A10 => "Order created",
            TrackingEvent::A20 => "Order confirmed",
            TrackingEvent::A30 => "Order cancelled",
            TrackingEvent::A40 => "Order completed",
            TrackingEvent::D10 => "Delivery scheduled",
            TrackingEvent::D20 => "Delivery completed",
            TrackingEvent::D30 => "Delivery cancelled",
            TrackingEvent::D40 => "Delivery rescheduled",
        }
    }

    /// Human readable phase name, keyed by the first letter of the event.
    pub fn phase_name(&self) -> &'static str {
        match self {
            TrackingEvent::A10 | TrackingEvent::A20 | TrackingEvent::A30 | TrackingEvent::A40 => {
                "Order Events"
            }
            TrackingEvent::D10 | TrackingEvent::D20 | TrackingEvent::D30 | TrackingEvent::D40 => {
                "Delivery Events"
            }
        }
    }
}

/// Organization context resolved from the authenticator service.
///
/// Passed explicitly into return-request waits; there is intentionally no
/// process-wide cached instance, so concurrently running tests cannot
/// observe each other's organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgInfo {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}
