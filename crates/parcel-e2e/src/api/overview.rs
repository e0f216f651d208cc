// Parcel overview (OS Reading) adapter - shipment search and the waits
// built on top of it
//
// Search is the only read this service exposes to the suite; existence,
// status, and property waits all poll it. Search responses carry a
// `count` plus a `data` array of shipment rows.

use serde_json::Value;

use crate::config::Endpoints;
use crate::error::Result;
use crate::http::ApiClient;
use crate::json;
use crate::model::ShipmentStatus;
use crate::policy;
use crate::wait::{self, CancellationToken, PollResult, WaitSpec};

/// Adapter for the parcel-overview search API, authenticated with a
/// private (portal) token.
pub struct OverviewApi<'a> {
    http: &'a ApiClient,
    endpoints: &'a Endpoints,
    token: &'a str,
    cancel: CancellationToken,
}

impl<'a> OverviewApi<'a> {
    pub fn new(http: &'a ApiClient, endpoints: &'a Endpoints, token: &'a str) -> Self {
        Self {
            http,
            endpoints,
            token,
            cancel: CancellationToken::new(),
        }
    }

    /// Ties every wait issued through this adapter to `cancel`, so a
    /// runner-level timeout can abort in-flight polls.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Searches shipments for an organization. `search` narrows by
    /// free-text value; `quantity` of zero leaves the result size to the
    /// backend default.
    pub async fn search_shipments(
        &self,
        org_slug: &str,
        search: Option<&str>,
        quantity: u32,
    ) -> Result<Value> {
        let mut body = serde_json::json!({ "accept_pending_parcel": true });
        if let Some(value) = search {
            body["search_string"] = Value::from(value);
        }
        if quantity > 0 {
            body["quantity"] = Value::from(quantity);
        }

        let url = self
            .endpoints
            .os_reading
            .join(&format!("api/v1/parcel-overview/shipments/{org_slug}/"))?;
        self.http
            .post_json(url, self.token, &body)
            .await
            .map_err(|e| e.context("failed to search shipments"))
    }

    /// Single-result search used by all the polling operations.
    pub async fn search_single(&self, org_slug: &str, search: Option<&str>) -> Result<Value> {
        self.search_shipments(org_slug, search, 1).await
    }

    /// Primary key of the first shipment matching `search`.
    pub async fn shipment_pk(&self, org_slug: &str, search: &str) -> Result<u64> {
        let data = self.search_single(org_slug, Some(search)).await?;
        json::lookup(&data, "data[0].id")
            .and_then(json::coerce_u64)
            .ok_or_else(|| crate::error::Error::MissingField {
                path: "data[0].id".into(),
                context: format!("shipment search '{search}'"),
            })
    }

    async fn search_count(&self, org_slug: &str, search: &str) -> Result<u64> {
        let data = self.search_single(org_slug, Some(search)).await?;
        Ok(json::lookup(&data, "count")
            .and_then(json::coerce_u64)
            .unwrap_or(0))
    }

    /// Waits until a shipment matching `search` shows up.
    ///
    /// If the budget runs out, the whole poll restarts from scratch, up to
    /// three total attempts, before failing; see [`wait::OUTER_ATTEMPTS`].
    pub async fn wait_for_shipment_available_with_spec(
        &self,
        org_slug: &str,
        search: &str,
        spec: WaitSpec,
    ) -> Result<()> {
        tracing::debug!("Waiting for shipment with value [{search}]...");
        wait::poll_with_reattempts(
            wait::OUTER_ATTEMPTS,
            &spec,
            &self.cancel,
            || async move { self.search_count(org_slug, search).await },
            |count| *count > 0,
            |_| {
                format!(
                    "FAILED TO WAIT FOR SHIPMENT TO BE DISPLAYED\n\
                     - Org Slug: {org_slug}\n\
                     - Shipment: {search}\n\
                     - Timeout: {} (seconds)",
                    spec.timeout_secs()
                )
            },
        )
        .await?;
        tracing::debug!("Shipment with keyword '{search}' is found!");
        Ok(())
    }

    pub async fn wait_for_shipment_available(&self, org_slug: &str, search: &str) -> Result<()> {
        self.wait_for_shipment_available_with_spec(org_slug, search, policy::shipment())
            .await
    }

    /// Waits until no shipment matches `search` anymore.
    pub async fn wait_for_shipment_unavailable_with_spec(
        &self,
        org_slug: &str,
        search: &str,
        spec: WaitSpec,
    ) -> Result<()> {
        tracing::debug!("Waiting for shipment with value [{search}] to disappear...");
        wait::poll_strict(
            &spec,
            &self.cancel,
            || async move { self.search_count(org_slug, search).await },
            |count| *count < 1,
            |_| {
                format!(
                    "FAILED TO WAIT FOR SHIPMENT TO BE DISAPPEARED\n\
                     - Org Slug: {org_slug}\n\
                     - Shipment: {search}\n\
                     - Timeout: {} (seconds)",
                    spec.timeout_secs()
                )
            },
        )
        .await?;
        tracing::debug!("Shipment with keyword '{search}' is NOT found!");
        Ok(())
    }

    pub async fn wait_for_shipment_unavailable(&self, org_slug: &str, search: &str) -> Result<()> {
        self.wait_for_shipment_unavailable_with_spec(org_slug, search, policy::shipment())
            .await
    }

    /// Waits for a shipment to appear or disappear depending on
    /// `available`.
    pub async fn wait_for_shipment_with_spec(
        &self,
        org_slug: &str,
        search: &str,
        spec: WaitSpec,
        available: bool,
    ) -> Result<()> {
        if available {
            self.wait_for_shipment_available_with_spec(org_slug, search, spec)
                .await
        } else {
            self.wait_for_shipment_unavailable_with_spec(org_slug, search, spec)
                .await
        }
    }

    pub async fn wait_for_shipment(&self, org_slug: &str, search: &str) -> Result<()> {
        self.wait_for_shipment_with_spec(org_slug, search, policy::shipment(), true)
            .await
    }

    /// Waits for a property of the searched shipment to equal (or, with
    /// `to_match` false, to differ from) `expected`. Strict: budget
    /// exhaustion raises with the full diagnostic.
    pub async fn wait_for_searched_property_with_spec(
        &self,
        org_slug: &str,
        search: &str,
        json_path: &str,
        expected: &Value,
        to_match: bool,
        spec: WaitSpec,
    ) -> Result<()> {
        tracing::debug!("Waiting for property [{json_path}] on shipment [{search}]...");
        wait::poll_strict(
            &spec,
            &self.cancel,
            || async move {
                let data = self.search_single(org_slug, Some(search)).await?;
                Ok(json::lookup(&data, json_path)
                    .cloned()
                    .unwrap_or(Value::Null))
            },
            |current: &Value| (current == expected) == to_match,
            |outcome: &PollResult<Value>| {
                let actual = outcome
                    .last_value()
                    .cloned()
                    .unwrap_or(Value::Null);
                format!(
                    "FAILED TO WAIT FOR SHIPMENT PROPERTY\n\
                     - Org: {org_slug}\n\
                     - Shipment: {search}\n\
                     - Details:\n  \
                       + Property: {json_path}\n  \
                       + To be matched: {to_match}\n  \
                       + Actual: {actual}\n  \
                       + Expected: {expected}\n  \
                       + Timeout: {} (seconds)",
                    spec.timeout_secs()
                )
            },
        )
        .await?;
        Ok(())
    }

    pub async fn wait_for_searched_property(
        &self,
        org_slug: &str,
        search: &str,
        json_path: &str,
        expected: &Value,
        to_match: bool,
    ) -> Result<()> {
        self.wait_for_searched_property_with_spec(
            org_slug,
            search,
            json_path,
            expected,
            to_match,
            policy::shipment_property(),
        )
        .await
    }

    /// Waits for the searched shipment's status column.
    ///
    /// This call site compares against the lowercased status string; the
    /// public-API status wait does not lowercase. The divergence is
    /// historical and both sides match what their backend serves.
    pub async fn wait_for_status_with_spec(
        &self,
        org_slug: &str,
        search: &str,
        status: ShipmentStatus,
        to_match: bool,
        spec: WaitSpec,
    ) -> Result<()> {
        let expected = Value::from(status.pp_status().to_lowercase());
        self.wait_for_searched_property_with_spec(
            org_slug,
            search,
            "data[0].shipment_status",
            &expected,
            to_match,
            spec,
        )
        .await
    }

    pub async fn wait_for_status(
        &self,
        org_slug: &str,
        search: &str,
        status: ShipmentStatus,
        to_match: bool,
    ) -> Result<()> {
        self.wait_for_status_with_spec(org_slug, search, status, to_match, policy::shipment_status())
            .await
    }
}
