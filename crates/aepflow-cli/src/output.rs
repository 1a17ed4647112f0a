//! Console rendering for command results

use aepflow::AepError;
use aepflow::tracking::FlowTracking;
use aepflow::types::CreatedResource;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write;

pub fn render_created(kind: &str, created: &CreatedResource) -> String {
    match &created.id {
        Some(id) => format!("{kind} created successfully! ID: {id}"),
        None => format!(
            "{kind} created, but the response carried no ID: {}",
            created.to_json()
        ),
    }
}

/// Full server response, for commands that echo it back.
pub fn render_response(created: &CreatedResource) -> String {
    let json = created.to_json();
    let pretty = serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string());
    format!("Response: {pretty}")
}

/// Remote failures print the raw body so the server's own message is visible.
pub fn render_remote_failure(action: &str, err: &AepError) -> String {
    match (err.status(), err.body()) {
        (Some(status), Some(body)) => {
            format!("Error while trying to {action} (status {status}):\n{body}")
        }
        _ => format!("Error while trying to {action}: {err}"),
    }
}

pub fn render_auth_failure(err: &AepError) -> String {
    match err.body() {
        Some(body) => format!("Failed to generate access token.\n{body}"),
        None => format!("Failed to generate access token.\n{err}"),
    }
}

pub fn render_desired_ids(ids: &HashSet<String>) -> String {
    let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("Dataset IDs provided: {}", sorted.join(", "))
}

pub fn render_tracking(report: &FlowTracking) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Flows returned by the API: {}", report.flows_scanned);

    for lookup in &report.lookups {
        match lookup {
            Ok(found) => {
                let _ = writeln!(
                    out,
                    "Data returned for target connection {} (flow {}): {}",
                    found.target_connection_id,
                    found.flow_name,
                    compact(&found.detail.raw)
                );
            }
            Err(failed) => {
                let status = failed
                    .error
                    .status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "no response".to_string());
                let _ = writeln!(
                    out,
                    "Failed to fetch target connection {} (flow {}): {}",
                    failed.target_connection_id, failed.flow_name, status
                );
                match failed.error.body() {
                    Some(body) => {
                        let _ = writeln!(out, "{body}");
                    }
                    None => {
                        let _ = writeln!(out, "{}", failed.error);
                    }
                }
            }
        }
    }

    if report.matches.is_empty() {
        let _ = writeln!(out, "No data flow matches the provided dataset IDs.");
        return out;
    }

    let _ = writeln!(out, "\nFiltered results:");
    for m in &report.matches {
        let _ = writeln!(out, "Flow Name: {}", m.flow_name);
        let _ = writeln!(out, "Target Connection ID: {}", m.target_connection_id);
        let _ = writeln!(out, "Dataset ID: {}", m.dataset_id);
        let _ = writeln!(out, "Dataset Name: {}", m.dataset_name);
        let _ = writeln!(out);
    }
    out
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
