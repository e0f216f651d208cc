// Public API shipment adapter - create/update/retrieve plus the waits
// that synchronize tests with shipment state
//
// Retrieval is keyed by shipment id and/or uuid; the reference type keeps
// that pairing honest instead of threading sentinel strings around.

use serde_json::Value;

use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::json;
use crate::model::ShipmentStatus;
use crate::policy;
use crate::wait::{self, CancellationToken, PollResult, WaitSpec};

/// Public API versions the suite exercises.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicApiVersion {
    V5_0_0,
    V5_2_0,
    V5_2_1,
}

impl PublicApiVersion {
    /// URL path segment for this version.
    pub fn path(&self) -> &'static str {
        match self {
            PublicApiVersion::V5_0_0 => "v5",
            PublicApiVersion::V5_2_0 => "v5-2-0",
            PublicApiVersion::V5_2_1 => "v5-2-1",
        }
    }
}

/// Identifies a shipment by id, uuid, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentRef {
    id: Option<String>,
    uuid: Option<String>,
}

impl ShipmentRef {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            uuid: None,
        }
    }

    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: Some(uuid.into()),
        }
    }

    pub fn new(id: Option<String>, uuid: Option<String>) -> Self {
        Self { id, uuid }
    }

    /// Query parameters for the details/update endpoints. A reference with
    /// neither identifier is a configuration error, surfaced before any
    /// request goes out.
    fn query_pairs(&self) -> Result<Vec<(&'static str, &str)>> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.id {
            pairs.push(("shipment_id", id.as_str()));
        }
        if let Some(uuid) = &self.uuid {
            pairs.push(("shipment_uuid", uuid.as_str()));
        }
        if pairs.is_empty() {
            return Err(Error::InvalidArgument(
                "a shipment id or uuid is required".into(),
            ));
        }
        Ok(pairs)
    }

    /// Validates that at least one identifier is present.
    pub fn validate(&self) -> Result<()> {
        self.query_pairs().map(drop)
    }

    /// Identifier text for wait diagnostics.
    pub fn describe(&self) -> String {
        match (&self.id, &self.uuid) {
            (Some(id), Some(uuid)) => format!("id {id} / uuid {uuid}"),
            (Some(id), None) => format!("id {id}"),
            (None, Some(uuid)) => format!("uuid {uuid}"),
            (None, None) => "<unidentified>".into(),
        }
    }
}

/// Adapter for the public shipment API, authenticated with an OAuth
/// access token.
pub struct ShipmentsApi<'a> {
    http: &'a ApiClient,
    endpoints: &'a Endpoints,
    token: &'a str,
    cancel: CancellationToken,
}

impl<'a> ShipmentsApi<'a> {
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

    /// Creates a shipment.
    pub async fn create(&self, body: &Value) -> Result<Value> {
        let url = self.endpoints.public_api.join("v5/shipment/")?;
        self.http.post_json(url, self.token, body).await
    }

    /// Updates a shipment through a specific API version.
    pub async fn update_with_version(
        &self,
        shipment: &ShipmentRef,
        body: &Value,
        version: PublicApiVersion,
    ) -> Result<Value> {
        let mut url = self
            .endpoints
            .public_api
            .join(&format!("{}/shipment/update/", version.path()))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in shipment.query_pairs()? {
                query.append_pair(key, value);
            }
        }
        self.http.post_json(url, self.token, body).await
    }

    /// Updates a shipment using the default API version.
    pub async fn update(&self, shipment: &ShipmentRef, body: &Value) -> Result<Value> {
        self.update_with_version(shipment, body, PublicApiVersion::V5_0_0)
            .await
    }

    /// Retrieves shipment details by id and/or uuid.
    pub async fn retrieve(&self, shipment: &ShipmentRef) -> Result<Value> {
        let mut url = self.endpoints.public_api.join("v5/shipment/details/")?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in shipment.query_pairs()? {
                query.append_pair(key, value);
            }
        }
        self.http.get_json(url, self.token).await
    }

    /// The uuid of a shipment known by id.
    pub async fn shipment_uuid(&self, shipment_id: &str) -> Result<String> {
        let data = self.retrieve(&ShipmentRef::by_id(shipment_id)).await?;
        json::lookup(&data, "data.shipment_uuid")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::MissingField {
                path: "data.shipment_uuid".into(),
                context: format!("shipment {shipment_id}"),
            })
    }

    /// Lists shipments matching a raw query string.
    pub async fn list(&self, query: &str) -> Result<Value> {
        let mut url = self.endpoints.public_api.join("v5/shipment/list/")?;
        url.set_query(Some(query));
        self.http.get_json(url, self.token).await
    }

    /// Tracks a shipment through a specific API version.
    pub async fn track_with_version(
        &self,
        body: &Value,
        version: PublicApiVersion,
    ) -> Result<Value> {
        let url = self
            .endpoints
            .public_api
            .join(&format!("{}/shipment/track/", version.path()))?;
        self.http.post_json(url, self.token, body).await
    }

    /// Tracks a shipment using the version the tracking endpoint ships on.
    pub async fn track(&self, body: &Value) -> Result<Value> {
        self.track_with_version(body, PublicApiVersion::V5_2_0).await
    }

    async fn current_value(&self, shipment: &ShipmentRef, json_path: &str) -> Result<Value> {
        let data = self.retrieve(shipment).await?;
        Ok(json::lookup(&data, json_path)
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// One-shot check of a shipment property.
    pub async fn is_property(
        &self,
        shipment: &ShipmentRef,
        json_path: &str,
        expected: &Value,
    ) -> Result<bool> {
        Ok(&self.current_value(shipment, json_path).await? == expected)
    }

    /// Waits for `data.status` to reach `status` (or, with `to_match`
    /// false, to leave it). Strict: the timeout error names the shipment,
    /// both statuses, and the budget.
    ///
    /// Unlike the overview wait, the expected value is compared exactly as
    /// the status enum renders it. See the note on casing there.
    pub async fn wait_for_status_with_spec(
        &self,
        shipment: &ShipmentRef,
        status: ShipmentStatus,
        to_match: bool,
        spec: WaitSpec,
    ) -> Result<()> {
        shipment.validate()?;
        let expected = status.pp_status();
        wait::poll_strict(
            &spec,
            &self.cancel,
            || async move { self.current_value(shipment, "data.status").await },
            |current: &Value| (current.as_str() == Some(expected)) == to_match,
            |outcome: &PollResult<Value>| {
                let actual = outcome.last_value().cloned().unwrap_or(Value::Null);
                format!(
                    "Shipment status is not updated on DB after {} seconds!\n\
                     - Shipment: {}\n\
                     - Property: data.status\n\
                     - To be matched: {to_match}\n\
                     - Expected: {expected}\n\
                     - Actual: {actual}",
                    spec.timeout_secs(),
                    shipment.describe(),
                )
            },
        )
        .await?;
        Ok(())
    }

    pub async fn wait_for_status(
        &self,
        shipment: &ShipmentRef,
        status: ShipmentStatus,
    ) -> Result<()> {
        self.wait_for_status_with_spec(shipment, status, true, policy::shipment_status())
            .await
    }

    /// Waits for a shipment property to equal (or, with `to_match` false,
    /// to differ from) `expected`. Lenient: budget exhaustion yields
    /// `false` and the caller decides.
    pub async fn wait_for_property_with_spec(
        &self,
        shipment: &ShipmentRef,
        json_path: &str,
        expected: &Value,
        to_match: bool,
        spec: WaitSpec,
    ) -> Result<bool> {
        shipment.validate()?;
        wait::poll_lenient(
            &spec,
            &self.cancel,
            || async move { self.current_value(shipment, json_path).await },
            |current: &Value| (current == expected) == to_match,
        )
        .await
    }

    pub async fn wait_for_property(
        &self,
        shipment: &ShipmentRef,
        json_path: &str,
        expected: &Value,
    ) -> Result<bool> {
        self.wait_for_property_with_spec(
            shipment,
            json_path,
            expected,
            true,
            policy::shipment_property(),
        )
        .await
    }

    /// One-shot check for a tracking event in the shipment's history.
    pub async fn is_event_updated(&self, shipment: &ShipmentRef, event_key: &str) -> Result<bool> {
        let data = self.retrieve(shipment).await?;
        Ok(has_event(&data, event_key))
    }

    /// Waits for a tracking event to land in `data.all_events`. Lenient.
    pub async fn wait_for_event_updated_with_spec(
        &self,
        shipment: &ShipmentRef,
        event_key: &str,
        spec: WaitSpec,
    ) -> Result<bool> {
        shipment.validate()?;
        wait::poll_lenient(
            &spec,
            &self.cancel,
            || async move {
                let data = self.retrieve(shipment).await?;
                Ok(has_event(&data, event_key))
            },
            |found| *found,
        )
        .await
    }

    pub async fn wait_for_event_updated(
        &self,
        shipment: &ShipmentRef,
        event_key: &str,
    ) -> Result<bool> {
        self.wait_for_event_updated_with_spec(shipment, event_key, policy::shipment_property())
            .await
    }

    /// Waits for a property of the shipment list to equal `expected`.
    /// Lenient, and a failing list fetch counts as "not yet true".
    pub async fn wait_for_list_property_with_spec(
        &self,
        query: &str,
        json_path: &str,
        expected: &Value,
        spec: WaitSpec,
    ) -> Result<bool> {
        wait::poll_lenient(
            &spec,
            &self.cancel,
            || async move {
                let data = self.list(query).await?;
                Ok(json::lookup(&data, json_path)
                    .cloned()
                    .unwrap_or(Value::Null))
            },
            |current: &Value| current == expected,
        )
        .await
    }

    pub async fn wait_for_list_property(
        &self,
        query: &str,
        json_path: &str,
        expected: &Value,
    ) -> Result<bool> {
        self.wait_for_list_property_with_spec(query, json_path, expected, policy::shipment_property())
            .await
    }
}

/// Whether any entry of `data.all_events` carries the given event key.
fn has_event(data: &Value, event_key: &str) -> bool {
    json::lookup(data, "data.all_events")
        .and_then(Value::as_array)
        .is_some_and(|events| {
            events
                .iter()
                .any(|event| event.get("event_key").and_then(Value::as_str) == Some(event_key))
        })
}
