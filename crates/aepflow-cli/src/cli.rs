//! Command-line surface of `aep-cli`

use aepflow::config::{Credentials, DEFAULT_PLATFORM_URL, DEFAULT_TOKEN_URL, split_csv};
use aepflow::schedule::DEFAULT_START_OFFSET_MINUTES;
use aepflow::types::Frequency;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "aep-cli")]
#[command(about = "Create and track Experience Platform flow-service resources")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub endpoints: EndpointArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// IMS token endpoint
    #[arg(long, global = true, env = "AEP_IMS_URL", default_value = DEFAULT_TOKEN_URL)]
    pub ims_url: String,
    /// Platform API base URL
    #[arg(long, global = true, env = "AEP_PLATFORM_URL", default_value = DEFAULT_PLATFORM_URL)]
    pub platform_url: String,
    /// Per-request timeout; requests wait indefinitely when unset
    #[arg(long, global = true, env = "AEP_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a BigQuery source connection
    CreateSource(CreateSourceArgs),
    /// Create a data lake target connection
    CreateTarget(CreateTargetArgs),
    /// Create a mapping set
    CreateMapping(CreateMappingArgs),
    /// Create a scheduled data flow
    CreateDataflow(CreateDataflowArgs),
    /// Show flows whose target connections write into the given datasets
    TrackFlows(TrackFlowsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Client ID (API key)
    #[arg(long)]
    pub client_id: String,
    #[arg(long)]
    pub client_secret: String,
    #[arg(long)]
    pub ims_org_id: String,
    /// Comma-separated scopes
    #[arg(long)]
    pub scopes: String,
    /// Sandbox name, e.g. "prod" or "dev"
    #[arg(long)]
    pub sandbox: String,
}

impl CredentialArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            ims_org_id: self.ims_org_id.clone(),
            scopes: split_csv(&self.scopes),
            sandbox: self.sandbox.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateSourceArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
    #[arg(long)]
    pub name: String,
    /// BigQuery table, e.g. "dataset.table"
    #[arg(long)]
    pub table_name: String,
    #[arg(long)]
    pub base_connection_id: String,
    /// Column definitions as a JSON array
    #[arg(long, value_parser = parse_json_list)]
    pub columns: Value,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateTargetArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub dataset_id: String,
    /// XDM schema of the target dataset
    #[arg(long)]
    pub schema_id: String,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateMappingArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
    #[arg(long)]
    pub schema_id: String,
    /// Mappings as a JSON array
    #[arg(long, value_parser = parse_json_list)]
    pub mappings: Value,
}

#[derive(Args, Debug)]
pub struct CreateDataflowArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub source_id: String,
    #[arg(long)]
    pub target_id: String,
    #[arg(long)]
    pub mapping_id: String,
    /// Minutes from now until the first run
    #[arg(long, default_value_t = DEFAULT_START_OFFSET_MINUTES, allow_negative_numbers = true)]
    pub start_time_minutes: i64,
    #[arg(long, value_enum, ignore_case = true)]
    pub frequency: FrequencyArg,
    #[arg(long)]
    pub interval: u32,
    #[arg(long)]
    pub delta_column: String,
    /// Date format of the delta column
    #[arg(long)]
    pub date_format: String,
    /// Timezone of the delta column
    #[arg(long)]
    pub timezone: String,
    /// Load historical data on the first run
    #[arg(long, action = ArgAction::Set, required = true)]
    pub backfill: bool,
}

#[derive(Args, Debug)]
pub struct TrackFlowsArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
    /// Comma-separated dataset IDs to look for
    #[arg(long)]
    pub dataset_ids: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyArg {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Once,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Minute => Frequency::Minute,
            FrequencyArg::Hour => Frequency::Hour,
            FrequencyArg::Day => Frequency::Day,
            FrequencyArg::Week => Frequency::Week,
            FrequencyArg::Month => Frequency::Month,
            FrequencyArg::Once => Frequency::Once,
        }
    }
}

fn parse_json_list(raw: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Array(_)) => Ok(value),
        Ok(_) => Err("expected a JSON array".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}
