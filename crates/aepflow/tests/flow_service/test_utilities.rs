use aepflow::{AccessToken, Credentials, FlowServiceClient, PlatformConfig};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::Value;

pub const TOKEN_PATH: &str = "/ims/token/v3";
pub const FLOWS_PATH: &str = "/data/foundation/flowservice/flows";
pub const TARGETS_PATH: &str = "/data/foundation/flowservice/targetConnections";

pub fn test_credentials() -> Credentials {
    Credentials {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        ims_org_id: "TESTORG@AdobeOrg".to_string(),
        scopes: vec![
            "openid".to_string(),
            "AdobeID".to_string(),
            "read_organizations".to_string(),
        ],
        sandbox: "dev".to_string(),
    }
}

pub fn config_for(server: &ServerGuard) -> PlatformConfig {
    PlatformConfig::new(format!("{}{TOKEN_PATH}", server.url()), server.url(), None)
        .expect("mock server URL is valid")
}

/// Client talking to `server` with a fixed token, skipping the IMS exchange.
pub fn client_for(server: &ServerGuard) -> FlowServiceClient {
    FlowServiceClient::new(
        reqwest::Client::new(),
        &config_for(server),
        &test_credentials(),
        &AccessToken::new("T"),
    )
    .expect("client builds")
}

/// Token endpoint answering with `{"access_token": token}`.
pub async fn mock_token_ok(server: &mut ServerGuard, token: &str) -> Mock {
    server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"access_token":"{token}","token_type":"bearer","expires_in":86399}}"#
        ))
        .create_async()
        .await
}

/// Header matchers every authenticated platform call must satisfy.
pub fn platform_header_matchers(mock: Mock, token: &str) -> Mock {
    mock.match_header("authorization", format!("Bearer {token}").as_str())
        .match_header("x-api-key", "test-client")
        .match_header("x-gw-ims-org-id", "TESTORG@AdobeOrg")
        .match_header("x-sandbox-name", "dev")
        .match_header("content-type", "application/json")
}

pub async fn mock_json(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    query: Matcher,
    status: usize,
    body: Value,
) -> Mock {
    server
        .mock(method, path)
        .match_query(query)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}
