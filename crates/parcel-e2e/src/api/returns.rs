// Return-request adapter - create and search return tickets, and the
// wait that confirms a submitted request became visible
//
// Creation goes through the public API; search goes through the returns
// service and is scoped to an organization id.

use serde_json::Value;

use crate::config::Endpoints;
use crate::error::Result;
use crate::http::ApiClient;
use crate::json;
use crate::model::OrgInfo;
use crate::policy;
use crate::wait::{self, CancellationToken, WaitSpec};

/// Adapter for return-request operations.
pub struct ReturnsApi<'a> {
    http: &'a ApiClient,
    endpoints: &'a Endpoints,
    token: &'a str,
    cancel: CancellationToken,
}

impl<'a> ReturnsApi<'a> {
    pub fn new(http: &'a ApiClient, endpoints: &'a Endpoints, token: &'a str) -> Self {
        Self {
            http,
            endpoints,
            token,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Submits a return request through the public API.
    pub async fn create_return_request(&self, payload: &Value) -> Result<Value> {
        let url = self.endpoints.public_api.join("v5/return/")?;
        self.http.post_json(url, self.token, payload).await
    }

    /// Searches return tickets for an organization by free-text value.
    pub async fn search_return_request_single(
        &self,
        org: &OrgInfo,
        search: &str,
    ) -> Result<Value> {
        let url = self
            .endpoints
            .returns
            .join(&format!("api/v1/parcel-perform/return-ticket/{}/", org.id))?;
        let body = serde_json::json!({ "search_string": search });
        self.http
            .post_json(url, self.token, &body)
            .await
            .map_err(|e| e.context("failed to search return request"))
    }

    async fn search_count(&self, org: &OrgInfo, search: &str) -> Result<u64> {
        let data = self.search_return_request_single(org, search).await?;
        Ok(json::lookup(&data, "count")
            .and_then(json::coerce_u64)
            .unwrap_or(0))
    }

    /// Waits until a submitted return request shows up in search.
    ///
    /// Shares the restart-the-whole-budget behavior of the shipment
    /// availability wait: up to three full timeout windows.
    pub async fn wait_for_return_request_with_spec(
        &self,
        org: &OrgInfo,
        search: &str,
        spec: WaitSpec,
    ) -> Result<()> {
        tracing::debug!("Waiting for return request with value [{search}]...");
        wait::poll_with_reattempts(
            wait::OUTER_ATTEMPTS,
            &spec,
            &self.cancel,
            || async move { self.search_count(org, search).await },
            |count| *count > 0,
            |_| {
                format!(
                    "FAILED TO WAIT FOR RETURN REQUEST TO BE DISPLAYED\n\
                     - Org ID: {}\n\
                     - Return Request: {search}\n\
                     - Timeout: {} (seconds)",
                    org.id,
                    spec.timeout_secs()
                )
            },
        )
        .await?;
        tracing::debug!("Return request with keyword '{search}' is found!");
        Ok(())
    }

    pub async fn wait_for_return_request(&self, org: &OrgInfo, search: &str) -> Result<()> {
        self.wait_for_return_request_with_spec(org, search, policy::return_request())
            .await
    }
}
