// HTTP - shared JSON client for the API adapters
//
// One thin wrapper over reqwest: bearer-authenticated GET/POST returning
// parsed JSON bodies. A non-2xx answer is an error distinct from transport
// failure so adapters can tell "backend said no" from "backend unreachable".

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::REQUEST_TIMEOUT;
use crate::error::{Error, Result};

/// JSON request capability shared by all API adapters.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    /// Sends a bearer-authenticated GET and parses the JSON body.
    pub async fn get_json(&self, url: Url, token: &str) -> Result<Value> {
        let response = self.http.get(url.clone()).bearer_auth(token).send().await?;
        Self::json_body(url, response).await
    }

    /// Sends a bearer-authenticated POST with a JSON body.
    pub async fn post_json(&self, url: Url, token: &str, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(url.clone())
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::json_body(url, response).await
    }

    /// POST without authentication, used by the token-acquisition flow.
    pub async fn post_json_unauthenticated(&self, url: Url, body: &Value) -> Result<Value> {
        let response = self.http.post(url.clone()).json(body).send().await?;
        Self::json_body(url, response).await
    }

    async fn json_body(url: Url, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}
