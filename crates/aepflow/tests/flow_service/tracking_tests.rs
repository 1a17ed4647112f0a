use super::test_utilities::*;
use aepflow::{FlowDatasetMatch, connect, track_flows};
use mockito::{Matcher, Server};
use serde_json::json;
use std::collections::HashSet;

fn desired(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test_log::test(tokio::test)]
async fn test_track_flows_end_to_end() {
    let mut server = Server::new_async().await;
    let _token = mock_token_ok(&mut server, "T").await;
    let _flows = mock_json(
        &mut server,
        "GET",
        FLOWS_PATH,
        Matcher::Any,
        200,
        json!({"items": [
            {"id": "f1", "name": "F1", "targetConnectionIds": ["t1"]},
            {"id": "f0", "name": "no-target"}
        ]}),
    )
    .await;
    let path = format!("{TARGETS_PATH}/t1");
    let target = platform_header_matchers(server.mock("GET", path.as_str()), "T")
        .with_status(200)
        .with_body(
            json!({"id": "t1", "params": {"dataSetId": "d1", "dataSetName": "DS1"}}).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = connect(&config_for(&server), &test_credentials()).await.unwrap();
    let report = track_flows(&client, &desired(&["d1"])).await.unwrap();

    target.assert_async().await;
    assert_eq!(report.flows_scanned, 2);
    assert_eq!(
        report.matches,
        vec![FlowDatasetMatch {
            flow_name: "F1".to_string(),
            target_connection_id: "t1".to_string(),
            dataset_id: "d1".to_string(),
            dataset_name: "DS1".to_string(),
        }]
    );

    let none = track_flows(&client, &desired(&["d2"])).await.unwrap();
    assert!(none.matches.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_track_flows_reports_failed_lookup() {
    let mut server = Server::new_async().await;
    let _flows = mock_json(
        &mut server,
        "GET",
        FLOWS_PATH,
        Matcher::Any,
        200,
        json!({"items": [{"name": "F1", "targetConnectionIds": ["gone", "t2"]}]}),
    )
    .await;
    let _gone = mock_json(
        &mut server,
        "GET",
        &format!("{TARGETS_PATH}/gone"),
        Matcher::Any,
        404,
        json!({"message": "not found"}),
    )
    .await;
    let _t2 = mock_json(
        &mut server,
        "GET",
        &format!("{TARGETS_PATH}/t2"),
        Matcher::Any,
        200,
        json!({"params": {"dataSetId": "d2", "dataSetName": "DS2"}}),
    )
    .await;

    let report = track_flows(&client_for(&server), &desired(&["d2"])).await.unwrap();

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    let failure = failures[0];
    assert_eq!(failure.target_connection_id, "gone");
    assert_eq!(failure.error.status(), Some(404));
    assert_eq!(failure.error.body(), Some(r#"{"message":"not found"}"#));
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].dataset_name, "DS2");
    assert!(report.lookups[0].is_err());
    assert!(report.lookups[1].is_ok());
}
