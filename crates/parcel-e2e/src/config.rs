// Configuration - target environment, endpoint resolution, and credentials
//
// Test runs target one of two deployments selected by the ENVIRONMENT
// variable. Endpoint bases are plain URLs so integration tests can point
// every service at a local mock backend.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Per-request timeout applied by the shared HTTP client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base64-encoded OAuth client id used by the portal authentication flow.
pub const PP_CLIENT_ID: &str = "YlpRMjB1UVVSbHlYbEkxQlBkODhVM25vSnBia2w5SmVJVnBaemppWg==";

/// Base64-encoded OAuth client secret paired with [`PP_CLIENT_ID`].
pub const PP_CLIENT_SECRET: &str = "cVE1U1FseFFQV0tnaE9DcVdaZUE5NHFseHoxUzNWeWFUamw2UHR3N1FOekxyQmRGcmh1Z25XQVNtWk5IUUt5MVI3NXcxajg5Z3VzYlBVd0RLdGlYTHBQRzdIaUZNV0hadkY2Qnp6NTJYVEdrZUZvZnhGODI0blZRYTRxNnNUV2g=";

/// Deployment the suite runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Apollo,
    Bruno,
}

impl Environment {
    /// Reads `ENVIRONMENT`, defaulting to apollo (the CI default).
    pub fn from_env() -> Self {
        match env::var("ENVIRONMENT").as_deref() {
            Ok("bruno") => Environment::Bruno,
            _ => Environment::Apollo,
        }
    }

    /// Hostname prefix shared by the API services of this deployment.
    pub fn prefix(&self) -> &'static str {
        match self {
            Environment::Apollo => "apollo-",
            Environment::Bruno => "bruno-",
        }
    }
}

/// Base URLs of the backend services consumed by the suite.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub public_api: Url,
    pub os_reading: Url,
    pub authenticator: Url,
    pub portal: Url,
    pub returns: Url,
}

impl Endpoints {
    /// Resolves the service URLs for the given deployment.
    pub fn for_environment(environment: Environment) -> Result<Self> {
        let prefix = environment.prefix();
        // The portal is the one service that does not follow the prefix
        // pattern on apollo.
        let portal = match environment {
            Environment::Apollo => "https://apollo-k8s.parcelperform.com/".to_string(),
            Environment::Bruno => "https://bruno.parcelperform.com/".to_string(),
        };

        Ok(Self {
            public_api: Url::parse(&format!("https://{prefix}api.parcelperform.com/"))?,
            os_reading: Url::parse(&format!("https://{prefix}os-reading.parcelperform.com/"))?,
            authenticator: Url::parse(&format!(
                "https://{prefix}authenticator.parcelperform.com/"
            ))?,
            portal: Url::parse(&portal)?,
            returns: Url::parse(&format!("https://{prefix}return.parcelperform.com/"))?,
        })
    }

    /// Resolves the service URLs from the ENVIRONMENT variable.
    pub fn from_env() -> Result<Self> {
        Self::for_environment(Environment::from_env())
    }
}

/// Decodes a base64 credential constant into its plaintext form.
pub fn decode_credential(encoded: &str) -> Result<String> {
    use base64::Engine;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| Error::InvalidArgument(format!("invalid base64 credential: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidArgument(format!("credential is not valid UTF-8: {e}")))
}
