// Wait policies - named duration presets shared across call sites
//
// Call sites select these by name and CI pass/fail thresholds depend on
// the magnitudes, so treat the values as part of the suite's contract.

use std::time::Duration;

use crate::wait::WaitSpec;

/// Brief settle delay for fast UI/API transitions.
pub const SHORT_WAIT: Duration = Duration::from_secs(2);

/// Interval between poll attempts everywhere a wait retries.
pub const MEDIUM_WAIT: Duration = Duration::from_secs(5);

/// Budget for a freshly created shipment to appear in search.
pub const WAIT_FOR_SHIPMENT: Duration = Duration::from_secs(30);

/// Budget for a shipment status transition to land in the database.
pub const WAIT_FOR_SHIPMENT_STATUS: Duration = Duration::from_secs(100);

/// Budget for an updated shipment property to become readable.
pub const WAIT_FOR_SHIPMENT_PROPERTY: Duration = Duration::from_secs(100);

/// Budget for a submitted return request to become searchable.
pub const WAIT_FOR_RETURN_REQUEST_SUBMITTED: Duration = Duration::from_secs(60);

/// Preset for shipment appearance/disappearance waits.
pub fn shipment() -> WaitSpec {
    WaitSpec::preset(MEDIUM_WAIT, WAIT_FOR_SHIPMENT)
}

/// Preset for shipment status waits.
pub fn shipment_status() -> WaitSpec {
    WaitSpec::preset(MEDIUM_WAIT, WAIT_FOR_SHIPMENT_STATUS)
}

/// Preset for shipment property and event waits.
pub fn shipment_property() -> WaitSpec {
    WaitSpec::preset(MEDIUM_WAIT, WAIT_FOR_SHIPMENT_PROPERTY)
}

/// Preset for return-request submission waits.
pub fn return_request() -> WaitSpec {
    WaitSpec::preset(MEDIUM_WAIT, WAIT_FOR_RETURN_REQUEST_SUBMITTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_magnitudes() {
        assert_eq!(shipment().timeout(), Duration::from_secs(30));
        assert_eq!(shipment_status().timeout(), Duration::from_secs(100));
        assert_eq!(shipment_property().timeout(), Duration::from_secs(100));
        assert_eq!(return_request().timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_presets_poll_at_medium_wait() {
        for spec in [
            shipment(),
            shipment_status(),
            shipment_property(),
            return_request(),
        ] {
            assert_eq!(spec.interval(), MEDIUM_WAIT);
        }
    }
}
