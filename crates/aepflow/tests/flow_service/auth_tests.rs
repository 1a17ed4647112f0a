use super::test_utilities::*;
use aepflow::{AepError, Authenticator, connect};
use mockito::{Matcher, Server};

#[test_log::test(tokio::test)]
async fn test_token_is_returned_verbatim() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", TOKEN_PATH)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            Matcher::UrlEncoded("client_id".into(), "test-client".into()),
            Matcher::UrlEncoded("client_secret".into(), "test-secret".into()),
            Matcher::UrlEncoded("scope".into(), "openid,AdobeID,read_organizations".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token": "T"}"#)
        .create_async()
        .await;

    let config = config_for(&server);
    let token = Authenticator::new(reqwest::Client::new(), config.token_url.clone())
        .get_access_token(&test_credentials())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(token.as_str(), "T");
}

#[test_log::test(tokio::test)]
async fn test_rejected_credentials_carry_the_body() {
    let mut server = Server::new_async().await;
    let body =
        r#"{"error":"invalid_client","error_description":"invalid client_secret parameter"}"#;
    let _mock = server
        .mock("POST", TOKEN_PATH)
        .with_status(401)
        .with_body(body)
        .create_async()
        .await;

    let config = config_for(&server);
    let err = Authenticator::new(reqwest::Client::new(), config.token_url.clone())
        .get_access_token(&test_credentials())
        .await
        .unwrap_err();

    match err {
        AepError::Authentication { status, body: got } => {
            assert_eq!(status, 401);
            assert_eq!(got, body);
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_missing_access_token_is_a_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"token_type": "bearer"}"#)
        .create_async()
        .await;

    let config = config_for(&server);
    let err = Authenticator::new(reqwest::Client::new(), config.token_url.clone())
        .get_access_token(&test_credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, AepError::Decode { .. }), "got {err:?}");
}

#[test_log::test(tokio::test)]
async fn test_failed_authentication_sends_no_platform_request() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", TOKEN_PATH)
        .with_status(401)
        .with_body("unauthorized")
        .create_async()
        .await;
    let platform = server
        .mock("POST", Matcher::Regex("^/data/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let err = connect(&config_for(&server), &test_credentials())
        .await
        .err()
        .expect("authentication must fail");

    assert!(err.is_authentication());
    platform.assert_async().await;
}

#[test_log::test(tokio::test)]
async fn test_connect_uses_fresh_token_on_platform_calls() {
    let mut server = Server::new_async().await;
    let token = mock_token_ok(&mut server, "fresh-token").await;
    let flows = platform_header_matchers(server.mock("GET", FLOWS_PATH), "fresh-token")
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .create_async()
        .await;

    let client = connect(&config_for(&server), &test_credentials()).await.unwrap();
    let listed = client.list_flows().await.unwrap();

    token.assert_async().await;
    flows.assert_async().await;
    assert!(listed.is_empty());
}
