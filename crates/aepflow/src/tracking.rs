//! Reconciliation of existing flows against a set of target dataset ids.
//!
//! The scan is a plain nested loop: every flow, every target connection of
//! that flow, one sequential lookup each. Lookups are not deduplicated
//! across flows.

use crate::error::AepError;
use crate::types::{FlowSummary, TargetConnectionDetail};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Read side of the flow service used by [`track_flows`].
#[async_trait]
pub trait FlowCatalog: Send + Sync {
    async fn list_flows(&self) -> Result<Vec<FlowSummary>, AepError>;
    async fn get_target_connection(&self, id: &str) -> Result<TargetConnectionDetail, AepError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDatasetMatch {
    pub flow_name: String,
    pub target_connection_id: String,
    pub dataset_id: String,
    pub dataset_name: String,
}

#[derive(Debug)]
pub struct TargetLookupFailure {
    pub flow_name: String,
    pub target_connection_id: String,
    pub error: AepError,
}

#[derive(Debug, Clone)]
pub struct TargetLookup {
    pub flow_name: String,
    pub target_connection_id: String,
    pub detail: TargetConnectionDetail,
}

#[derive(Debug, Default)]
pub struct FlowTracking {
    pub flows_scanned: usize,
    /// One entry per target connection requested, in scan order.
    pub lookups: Vec<Result<TargetLookup, TargetLookupFailure>>,
    pub matches: Vec<FlowDatasetMatch>,
}

impl FlowTracking {
    pub fn failures(&self) -> impl Iterator<Item = &TargetLookupFailure> {
        self.lookups.iter().filter_map(|lookup| lookup.as_ref().err())
    }
}

/// Find flows whose target connections write into one of `desired_dataset_ids`.
///
/// A failure to list flows aborts the scan. A failed target lookup is
/// recorded and the scan moves on to the next target.
pub async fn track_flows<C: FlowCatalog + ?Sized>(
    catalog: &C,
    desired_dataset_ids: &HashSet<String>,
) -> Result<FlowTracking, AepError> {
    let flows = catalog.list_flows().await?;
    let mut report = FlowTracking {
        flows_scanned: flows.len(),
        ..FlowTracking::default()
    };

    for flow in &flows {
        let Some(target_ids) = &flow.target_connection_ids else {
            debug!(flow = %flow.name, "flow has no target connections");
            continue;
        };

        for target_id in target_ids {
            let detail = match catalog.get_target_connection(target_id).await {
                Ok(detail) => detail,
                Err(error) => {
                    warn!(
                        flow = %flow.name,
                        target = %target_id,
                        %error,
                        "target connection lookup failed"
                    );
                    report.lookups.push(Err(TargetLookupFailure {
                        flow_name: flow.name.clone(),
                        target_connection_id: target_id.clone(),
                        error,
                    }));
                    continue;
                }
            };

            if let Some((dataset_id, dataset_name)) = detail.dataset()
                && desired_dataset_ids.contains(dataset_id)
            {
                report.matches.push(FlowDatasetMatch {
                    flow_name: flow.name.clone(),
                    target_connection_id: target_id.clone(),
                    dataset_id: dataset_id.to_string(),
                    dataset_name: dataset_name.to_string(),
                });
            }

            report.lookups.push(Ok(TargetLookup {
                flow_name: flow.name.clone(),
                target_connection_id: target_id.clone(),
                detail,
            }));
        }
    }

    debug!(
        flows = report.flows_scanned,
        matches = report.matches.len(),
        failures = report.failures().count(),
        "flow tracking finished"
    );
    Ok(report)
}
