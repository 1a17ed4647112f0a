//! Command handlers
//!
//! Each handler authenticates once, builds its payload and issues its
//! request(s). Remote failures are printed inline and the command still
//! counts as run; authentication and transport failures abort with exit 1.

use crate::cli::*;
use crate::output;
use aepflow::config::{PlatformConfig, split_csv};
use aepflow::schedule::future_timestamp;
use aepflow::types::*;
use aepflow::{AepError, FlowServiceClient, connect, track_flows};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Run a parsed command line and return the process exit code.
pub async fn run(cli: Cli) -> u8 {
    match execute(cli).await {
        Ok(()) => EXIT_OK,
        Err(err) if err.is_authentication() => {
            println!("{}", output::render_auth_failure(&err));
            EXIT_FAILURE
        }
        Err(err) => {
            println!("Error: {err}");
            EXIT_FAILURE
        }
    }
}

pub async fn execute(cli: Cli) -> Result<(), AepError> {
    let config = platform_config(&cli.endpoints)?;
    debug!(?config, "resolved platform configuration");

    match cli.command {
        Commands::CreateSource(args) => create_source_command(&config, args).await,
        Commands::CreateTarget(args) => create_target_command(&config, args).await,
        Commands::CreateMapping(args) => create_mapping_command(&config, args).await,
        Commands::CreateDataflow(args) => create_dataflow_command(&config, args).await,
        Commands::TrackFlows(args) => track_flows_command(&config, args).await,
    }
}

pub fn platform_config(endpoints: &EndpointArgs) -> Result<PlatformConfig, AepError> {
    PlatformConfig::new(
        endpoints.ims_url.clone(),
        endpoints.platform_url.clone(),
        endpoints.timeout_secs.map(Duration::from_secs),
    )
}

async fn authenticated_client(
    config: &PlatformConfig,
    credentials: &CredentialArgs,
) -> Result<FlowServiceClient, AepError> {
    connect(config, &credentials.credentials()).await
}

/// Print the remote failure inline and carry on; anything else propagates.
fn print_or_propagate<T>(
    result: Result<T, AepError>,
    action: &str,
    on_success: impl FnOnce(T),
) -> Result<(), AepError> {
    match result {
        Ok(value) => {
            on_success(value);
            Ok(())
        }
        Err(err @ AepError::Remote { .. }) => {
            println!("{}", output::render_remote_failure(action, &err));
            Ok(())
        }
        Err(err) => Err(err),
    }
}

// =============================================================================
// CREATE COMMANDS
// =============================================================================

pub async fn create_source_command(
    config: &PlatformConfig,
    args: CreateSourceArgs,
) -> Result<(), AepError> {
    let client = authenticated_client(config, &args.credentials).await?;

    let mut payload = SourceConnectionRequest::bigquery(
        args.name,
        args.base_connection_id,
        args.table_name,
        args.columns,
    );
    if let Some(description) = args.description {
        payload = payload.with_description(description);
    }

    print_or_propagate(
        client.create_source_connection(&payload).await,
        "create source connection",
        |created| println!("{}", output::render_response(&created)),
    )
}

pub async fn create_target_command(
    config: &PlatformConfig,
    args: CreateTargetArgs,
) -> Result<(), AepError> {
    let client = authenticated_client(config, &args.credentials).await?;

    let mut payload =
        TargetConnectionRequest::data_lake(args.name, args.dataset_id, args.schema_id);
    if let Some(description) = args.description {
        payload = payload.with_description(description);
    }

    print_or_propagate(
        client.create_target_connection(&payload).await,
        "create target connection",
        |created| println!("{}", output::render_created("Target connection", &created)),
    )
}

pub async fn create_mapping_command(
    config: &PlatformConfig,
    args: CreateMappingArgs,
) -> Result<(), AepError> {
    let client = authenticated_client(config, &args.credentials).await?;
    let payload = MappingSetRequest::new(args.schema_id, args.mappings);

    print_or_propagate(
        client.create_mapping_set(&payload).await,
        "create mapping",
        |created| println!("{}", output::render_created("Mapping", &created)),
    )
}

pub async fn create_dataflow_command(
    config: &PlatformConfig,
    args: CreateDataflowArgs,
) -> Result<(), AepError> {
    let client = authenticated_client(config, &args.credentials).await?;

    let definition = DataFlowDefinition {
        name: args.name,
        description: args.description,
        source_connection_id: args.source_id,
        target_connection_id: args.target_id,
        mapping_id: args.mapping_id,
        delta_column: DeltaColumn {
            name: args.delta_column,
            date_format: args.date_format,
            timezone: args.timezone,
        },
        frequency: args.frequency.into(),
        interval: args.interval,
        backfill: args.backfill,
    };
    let start_time = future_timestamp(args.start_time_minutes);
    debug!(
        start_time = start_time,
        offset_minutes = args.start_time_minutes,
        "computed flow start time"
    );
    let payload = DataFlowRequest::scheduled(definition, start_time);

    print_or_propagate(
        client.create_data_flow(&payload).await,
        "create data flow",
        |created| println!("{}", output::render_created("Data flow", &created)),
    )
}

// =============================================================================
// TRACKING
// =============================================================================

pub async fn track_flows_command(
    config: &PlatformConfig,
    args: TrackFlowsArgs,
) -> Result<(), AepError> {
    let client = authenticated_client(config, &args.credentials).await?;

    let desired: HashSet<String> = split_csv(&args.dataset_ids).into_iter().collect();
    println!("{}", output::render_desired_ids(&desired));

    print_or_propagate(
        track_flows(&client, &desired).await,
        "fetch flows",
        |report| print!("{}", output::render_tracking(&report)),
    )
}
