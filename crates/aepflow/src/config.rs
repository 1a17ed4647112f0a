//! Endpoint configuration and per-invocation credentials.

use crate::error::AepError;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TOKEN_URL: &str = "https://ims-na1.adobelogin.com/ims/token/v3";
pub const DEFAULT_PLATFORM_URL: &str = "https://platform.adobe.io";

/// Where the client sends requests and how long it waits for them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub token_url: String,
    pub platform_url: String,
    /// `None` means requests may block indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            platform_url: DEFAULT_PLATFORM_URL.to_string(),
            timeout: None,
        }
    }
}

impl PlatformConfig {
    pub fn new(
        token_url: impl Into<String>,
        platform_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, AepError> {
        let token_url = token_url.into();
        let platform_url = platform_url.into().trim_end_matches('/').to_string();
        check_http_url("token URL", &token_url)?;
        check_http_url("platform URL", &platform_url)?;
        Ok(Self {
            token_url,
            platform_url,
            timeout,
        })
    }

    /// Build the shared HTTP client honouring the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, AepError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn check_http_url(what: &str, url: &str) -> Result<(), AepError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AepError::InvalidInput(format!(
            "{what} must start with http:// or https://, got '{url}'"
        )))
    }
}

/// Long-lived credentials of a technical account plus the sandbox to act in.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub ims_org_id: String,
    pub scopes: Vec<String>,
    pub sandbox: String,
}

impl Credentials {
    /// Scopes in the comma-joined form the token endpoint expects.
    pub fn scope_param(&self) -> String {
        self.scopes.join(",")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("ims_org_id", &self.ims_org_id)
            .field("scopes", &self.scopes)
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
