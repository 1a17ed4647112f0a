//! OAuth2 client-credentials exchange against the IMS token endpoint.

use crate::config::Credentials;
use crate::error::AepError;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, error};

/// Short-lived bearer token. Never cached between invocations.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct Authenticator {
    http: reqwest::Client,
    token_url: String,
}

impl Authenticator {
    pub fn new(http: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            http,
            token_url: token_url.into(),
        }
    }

    /// Exchange the credentials for a bearer token.
    ///
    /// A non-2xx answer yields [`AepError::Authentication`] carrying the raw body.
    pub async fn get_access_token(
        &self,
        credentials: &Credentials,
    ) -> Result<AccessToken, AepError> {
        let scope = credentials.scope_param();
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        debug!(
            url = %self.token_url,
            client_id = %credentials.client_id,
            "requesting access token"
        );

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), "access token request rejected");
            return Err(AepError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AepError::decode("token response", e))?;
        Ok(AccessToken(parsed.access_token))
    }
}
