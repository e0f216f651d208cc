// Authenticator adapter - portal login and organization context
//
// Organization info is resolved on demand and handed back as a plain
// value. Callers thread it into return-request waits explicitly; nothing
// here is cached process-wide.

use serde_json::Value;

use crate::config::{self, Endpoints};
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::json;
use crate::model::OrgInfo;

/// Portal user credentials.
#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
    pub password: String,
}

/// Adapter for the authenticator and portal authentication services.
pub struct AuthenticatorApi<'a> {
    http: &'a ApiClient,
    endpoints: &'a Endpoints,
}

impl<'a> AuthenticatorApi<'a> {
    pub fn new(http: &'a ApiClient, endpoints: &'a Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Authenticates a portal user and returns the access token.
    pub async fn authenticate(&self, user: &User) -> Result<String> {
        let body = serde_json::json!({
            "username": user.email,
            "password": user.password,
            "client_id": config::decode_credential(config::PP_CLIENT_ID)?,
            "client_secret": config::decode_credential(config::PP_CLIENT_SECRET)?,
        });
        let url = self
            .endpoints
            .portal
            .join("pp-portal-api/v1/authentication/authenticate-with-usn-pwd/")?;

        let data = self
            .http
            .post_json_unauthenticated(url, &body)
            .await
            .map_err(|e| e.context("failed to authenticate user"))?;
        json::lookup(&data, "data.access_token")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::MissingField {
                path: "data.access_token".into(),
                context: "portal authentication".into(),
            })
    }

    /// Account profile of the authenticated user, including its
    /// organization memberships.
    pub async fn profile(&self, token: &str) -> Result<Value> {
        let url = self.endpoints.authenticator.join("api/account/profile/")?;
        self.http.get_json(url, token).await
    }

    /// Slug of the organization named `org_name` in the user's profile.
    pub async fn org_slug(&self, token: &str, org_name: &str) -> Result<String> {
        let profile = self.profile(token).await?;
        let organizations = json::lookup(&profile, "data.organizations")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::MissingField {
                path: "data.organizations".into(),
                context: "account profile".into(),
            })?;

        organizations
            .iter()
            .filter_map(|entry| entry.get("organization"))
            .find(|org| org.get("name").and_then(Value::as_str) == Some(org_name))
            .and_then(|org| org.get("pp_slug").and_then(Value::as_str))
            .map(str::to_owned)
            .ok_or_else(|| Error::MissingField {
                path: format!("organization '{org_name}'"),
                context: "account profile".into(),
            })
    }

    /// Organization details by slug.
    pub async fn organization(&self, token: &str, org_slug: &str) -> Result<Value> {
        let url = self
            .endpoints
            .authenticator
            .join(&format!("api/organization/{org_slug}/"))?;
        self.http.get_json(url, token).await
    }

    /// Resolves the full organization context by name, including the API
    /// credentials when the backend provides them.
    pub async fn org_info(&self, token: &str, org_name: &str) -> Result<OrgInfo> {
        let slug = self.org_slug(token, org_name).await?;
        let data = self.organization(token, &slug).await?;

        let id = json::lookup(&data, "data.id")
            .and_then(json::coerce_u64)
            .ok_or_else(|| Error::MissingField {
                path: "data.id".into(),
                context: format!("organization '{slug}'"),
            })?;
        let name = json::lookup(&data, "data.name")
            .and_then(Value::as_str)
            .unwrap_or(org_name)
            .to_owned();

        let credential = |field: &str| {
            json::lookup(&data, &format!("data.credentials.0.{field}"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        Ok(OrgInfo {
            id,
            slug,
            name,
            client_id: credential("api_client_id"),
            client_secret: credential("api_client_secret"),
        })
    }
}
