//! Flow-service request payloads and response models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const BIGQUERY_SOURCE_SPEC_ID: &str = "3c9b37f8-13a6-43d8-bad3-b863b941fedd";
pub const DATA_LAKE_TARGET_SPEC_ID: &str = "c604ff05-7f1a-43c0-8e18-33bf874cb11c";
pub const BIGQUERY_TO_DATA_LAKE_FLOW_SPEC_ID: &str = "14518937-270c-4525-bdec-c2ba7cce3860";
pub const SPEC_VERSION: &str = "1.0";
pub const XDM_FULL_SCHEMA_VERSION: &str = "application/vnd.adobe.xed-full+json;version=1";

pub const DEFAULT_SOURCE_DESCRIPTION: &str = "BigQuery Source Connection";
pub const DEFAULT_TARGET_DESCRIPTION: &str = "Target Connection";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecRef {
    pub id: String,
    pub version: String,
}

impl SpecRef {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            version: SPEC_VERSION.to_string(),
        }
    }
}

// =============================================================================
// SOURCE CONNECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConnectionRequest {
    pub name: String,
    pub base_connection_id: String,
    pub description: String,
    pub data: SourceData,
    pub params: SourceParams,
    pub connection_spec: SpecRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceData {
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceParams {
    pub table_name: String,
    pub columns: Value,
}

impl SourceConnectionRequest {
    /// Tabular BigQuery source reading `table_name` through an existing base connection.
    pub fn bigquery(
        name: impl Into<String>,
        base_connection_id: impl Into<String>,
        table_name: impl Into<String>,
        columns: Value,
    ) -> Self {
        Self {
            name: name.into(),
            base_connection_id: base_connection_id.into(),
            description: DEFAULT_SOURCE_DESCRIPTION.to_string(),
            data: SourceData {
                format: "tabular".to_string(),
            },
            params: SourceParams {
                table_name: table_name.into(),
                columns,
            },
            connection_spec: SpecRef::new(BIGQUERY_SOURCE_SPEC_ID),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// =============================================================================
// TARGET CONNECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConnectionRequest {
    pub name: String,
    pub description: String,
    pub data: TargetData,
    pub params: TargetParams,
    pub connection_spec: SpecRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetData {
    pub schema: SchemaRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaRef {
    pub id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetParams {
    pub data_set_id: String,
}

impl TargetConnectionRequest {
    /// Data lake target writing into `dataset_id`, validated against `schema_id`.
    pub fn data_lake(
        name: impl Into<String>,
        dataset_id: impl Into<String>,
        schema_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_TARGET_DESCRIPTION.to_string(),
            data: TargetData {
                schema: SchemaRef {
                    id: schema_id.into(),
                    version: XDM_FULL_SCHEMA_VERSION.to_string(),
                },
            },
            params: TargetParams {
                data_set_id: dataset_id.into(),
            },
            connection_spec: SpecRef::new(DATA_LAKE_TARGET_SPEC_ID),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// =============================================================================
// MAPPING SETS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSetRequest {
    pub version: u32,
    pub xdm_schema: String,
    pub xdm_version: String,
    pub mappings: Value,
}

impl MappingSetRequest {
    pub fn new(schema_id: impl Into<String>, mappings: Value) -> Self {
        Self {
            version: 0,
            xdm_schema: schema_id.into(),
            xdm_version: "1.0".to_string(),
            mappings,
        }
    }
}

// =============================================================================
// DATA FLOWS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Once,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaColumn {
    pub name: String,
    pub date_format: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Unix seconds.
    pub start_time: i64,
    pub frequency: Frequency,
    pub interval: u32,
    pub backfill: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", content = "params")]
pub enum Transformation {
    Copy {
        #[serde(rename = "deltaColumn")]
        delta_column: DeltaColumn,
    },
    Mapping {
        #[serde(rename = "mappingId")]
        mapping_id: String,
        #[serde(rename = "mappingVersion")]
        mapping_version: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlowRequest {
    pub name: String,
    pub description: String,
    pub flow_spec: SpecRef,
    pub source_connection_ids: Vec<String>,
    pub target_connection_ids: Vec<String>,
    pub transformations: Vec<Transformation>,
    pub schedule_params: Schedule,
}

/// Everything a data flow needs apart from its start time.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFlowDefinition {
    pub name: String,
    pub description: String,
    pub source_connection_id: String,
    pub target_connection_id: String,
    pub mapping_id: String,
    pub delta_column: DeltaColumn,
    pub frequency: Frequency,
    pub interval: u32,
    pub backfill: bool,
}

impl DataFlowRequest {
    /// Copy incremental rows by the delta column, then apply mapping version 0.
    pub fn scheduled(definition: DataFlowDefinition, start_time: i64) -> Self {
        Self {
            name: definition.name,
            description: definition.description,
            flow_spec: SpecRef::new(BIGQUERY_TO_DATA_LAKE_FLOW_SPEC_ID),
            source_connection_ids: vec![definition.source_connection_id],
            target_connection_ids: vec![definition.target_connection_id],
            transformations: vec![
                Transformation::Copy {
                    delta_column: definition.delta_column,
                },
                Transformation::Mapping {
                    mapping_id: definition.mapping_id,
                    mapping_version: 0,
                },
            ],
            schedule_params: Schedule {
                start_time,
                frequency: definition.frequency,
                interval: definition.interval,
                backfill: definition.backfill,
            },
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Body returned by every create call. Unknown fields are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedResource {
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreatedResource {
    /// The complete response as the server sent it.
    pub fn to_json(&self) -> Value {
        let mut object = self.extra.clone();
        if let Some(id) = &self.id {
            object.insert("id".to_string(), Value::String(id.clone()));
        }
        Value::Object(object)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_connection_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowPage {
    #[serde(default)]
    pub items: Vec<FlowSummary>,
    #[serde(default, rename = "_links")]
    pub links: Option<PageLinks>,
}

impl FlowPage {
    pub fn next_href(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.next.as_ref())
            .map(|n| n.href.as_str())
            .filter(|h| !h.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConnectionParams {
    #[serde(default)]
    pub data_set_id: Option<String>,
    #[serde(default)]
    pub data_set_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetConnectionDetail {
    pub params: TargetConnectionParams,
    pub raw: Value,
}

impl TargetConnectionDetail {
    pub fn from_json(raw: Value) -> Self {
        let params = raw
            .get("params")
            .cloned()
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        Self { params, raw }
    }

    /// Dataset id and name, when the connection carries both.
    pub fn dataset(&self) -> Option<(&str, &str)> {
        match (&self.params.data_set_id, &self.params.data_set_name) {
            (Some(id), Some(name)) => Some((id.as_str(), name.as_str())),
            _ => None,
        }
    }
}
