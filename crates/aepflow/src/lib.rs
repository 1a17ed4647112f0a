//! Client for the Experience Platform flow service.
//!
//! Authenticates with OAuth2 client credentials, then creates source
//! connections, target connections, mapping sets and scheduled data flows,
//! and reconciles existing flows against target datasets.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod schedule;
pub mod telemetry;
pub mod tracking;
pub mod types;

pub use auth::{AccessToken, Authenticator};
pub use client::FlowServiceClient;
pub use config::{Credentials, PlatformConfig};
pub use error::AepError;
pub use tracking::{FlowCatalog, FlowDatasetMatch, FlowTracking, track_flows};

/// Authenticate once and build a flow-service client for the credentials.
///
/// This is the sequence every command starts with: no request reaches the
/// flow service unless the token exchange succeeded.
pub async fn connect(
    config: &PlatformConfig,
    credentials: &Credentials,
) -> Result<FlowServiceClient, AepError> {
    let http = config.http_client()?;
    let token = Authenticator::new(http.clone(), config.token_url.clone())
        .get_access_token(credentials)
        .await?;
    FlowServiceClient::new(http, config, credentials, &token)
}
