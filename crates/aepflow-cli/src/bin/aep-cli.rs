//! Experience Platform flow-service CLI binary

use aepflow_cli::{Cli, run};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    aepflow::telemetry::init();
    let cli = Cli::parse();
    ExitCode::from(run(cli).await)
}
