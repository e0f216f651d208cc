// Integration tests for organization-context resolution against the
// mock authenticator service.

mod common;

use parcel_e2e::api::AuthenticatorApi;
use parcel_e2e::{ApiClient, Error};
use test_server::{BackendScript, TestBackend};

const TOKEN: &str = "private-test-token";

#[tokio::test]
async fn test_org_info_resolves_by_name() {
    common::init_tracing();
    let backend = TestBackend::start(BackendScript::default()).await;
    let endpoints = backend.endpoints();
    let http = ApiClient::new().unwrap();
    let api = AuthenticatorApi::new(&http, &endpoints);

    let org = api.org_info(TOKEN, "QA Regression").await.unwrap();
    assert_eq!(org.id, 3107);
    assert_eq!(org.slug, "qa-regression");
    assert_eq!(org.name, "QA Regression");
    assert_eq!(org.client_id.as_deref(), Some("qa-client"));
    assert_eq!(org.client_secret.as_deref(), Some("qa-secret"));
    backend.shutdown();
}

#[tokio::test]
async fn test_org_slug_for_unknown_name_is_an_error() {
    common::init_tracing();
    let backend = TestBackend::start(BackendScript::default()).await;
    let endpoints = backend.endpoints();
    let http = ApiClient::new().unwrap();
    let api = AuthenticatorApi::new(&http, &endpoints);

    let result = api.org_slug(TOKEN, "Nonexistent Org").await;
    assert!(matches!(result, Err(Error::MissingField { .. })));
    backend.shutdown();
}

#[tokio::test]
async fn test_org_info_is_a_plain_value() {
    common::init_tracing();
    let backend = TestBackend::start(BackendScript::default()).await;
    let endpoints = backend.endpoints();
    let http = ApiClient::new().unwrap();
    let api = AuthenticatorApi::new(&http, &endpoints);

    // Two resolutions are independent values; nothing is cached
    // process-wide, so concurrent tests cannot observe each other's org.
    let first = api.org_info(TOKEN, "QA Regression").await.unwrap();
    let second = api.org_info(TOKEN, "QA Smoke").await.unwrap();
    assert_eq!(first.slug, "qa-regression");
    assert_eq!(second.slug, "qa-smoke");
    backend.shutdown();
}
