//! Flow Service HTTP client
//!
//! One method per platform resource. Every request is authenticated with the
//! bearer token plus the organization and sandbox headers, and any non-2xx
//! answer is surfaced as [`AepError::Remote`] with the body left untouched.

use crate::auth::AccessToken;
use crate::config::{Credentials, PlatformConfig};
use crate::error::AepError;
use crate::tracking::FlowCatalog;
use crate::types::*;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, info};

pub const FLOW_SERVICE_PATH: &str = "/data/foundation/flowservice";
pub const MAPPING_SETS_PATH: &str = "/data/foundation/conversion/mappingSets";

pub struct FlowServiceClient {
    http: reqwest::Client,
    platform_url: String,
    headers: HeaderMap,
}

impl FlowServiceClient {
    pub fn new(
        http: reqwest::Client,
        config: &PlatformConfig,
        credentials: &Credentials,
        token: &AccessToken,
    ) -> Result<Self, AepError> {
        Ok(Self {
            http,
            platform_url: config.platform_url.trim_end_matches('/').to_string(),
            headers: platform_headers(credentials, token)?,
        })
    }

    pub fn flow_service_url(&self, resource: &str) -> String {
        format!("{}{}/{}", self.platform_url, FLOW_SERVICE_PATH, resource)
    }

    pub fn mapping_sets_url(&self) -> String {
        format!("{}{}", self.platform_url, MAPPING_SETS_PATH)
    }

    // =========================================================================
    // CREATE OPERATIONS
    // =========================================================================

    pub async fn create_source_connection(
        &self,
        payload: &SourceConnectionRequest,
    ) -> Result<CreatedResource, AepError> {
        self.create(&self.flow_service_url("sourceConnections"), payload, "source connection")
            .await
    }

    pub async fn create_target_connection(
        &self,
        payload: &TargetConnectionRequest,
    ) -> Result<CreatedResource, AepError> {
        self.create(&self.flow_service_url("targetConnections"), payload, "target connection")
            .await
    }

    pub async fn create_mapping_set(
        &self,
        payload: &MappingSetRequest,
    ) -> Result<CreatedResource, AepError> {
        self.create(&self.mapping_sets_url(), payload, "mapping set").await
    }

    pub async fn create_data_flow(
        &self,
        payload: &DataFlowRequest,
    ) -> Result<CreatedResource, AepError> {
        self.create(&self.flow_service_url("flows"), payload, "data flow").await
    }

    async fn create<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        kind: &str,
    ) -> Result<CreatedResource, AepError> {
        let request = self.request(Method::POST, url).json(payload);
        let created: CreatedResource = self.fetch(request, url, kind).await?;
        info!(kind = %kind, id = created.id.as_deref().unwrap_or("<none>"), "created resource");
        Ok(created)
    }

    // =========================================================================
    // READ OPERATIONS
    // =========================================================================

    /// Fetch a single page of flows from `url`.
    pub async fn list_flows_page(&self, url: &str) -> Result<FlowPage, AepError> {
        self.fetch(self.request(Method::GET, url), url, "flow list").await
    }

    /// Every flow visible in the sandbox, following `_links.next` across pages.
    pub async fn list_flows(&self) -> Result<Vec<FlowSummary>, AepError> {
        let mut url = self.flow_service_url("flows");
        let mut visited = HashSet::new();
        let mut flows = Vec::new();

        loop {
            visited.insert(url.clone());
            let page = self.list_flows_page(&url).await?;
            flows.extend(page.items.iter().cloned());

            let Some(href) = page.next_href() else {
                break;
            };
            let next = self.resolve_page_link(href);
            if visited.contains(&next) {
                debug!(url = %next, "next page already visited, stopping");
                break;
            }
            url = next;
        }

        debug!(count = flows.len(), pages = visited.len(), "listed flows");
        Ok(flows)
    }

    pub async fn get_target_connection(
        &self,
        id: &str,
    ) -> Result<TargetConnectionDetail, AepError> {
        let url = format!(
            "{}/{}",
            self.flow_service_url("targetConnections"),
            urlencoding::encode(id)
        );
        let raw: serde_json::Value = self
            .fetch(self.request(Method::GET, &url), &url, "target connection")
            .await?;
        Ok(TargetConnectionDetail::from_json(raw))
    }

    /// Resolve a pagination href returned by the service into an absolute URL.
    pub fn resolve_page_link(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with("/data/") {
            format!("{}{}", self.platform_url, href)
        } else if href.starts_with('/') {
            format!("{}{}{}", self.platform_url, FLOW_SERVICE_PATH, href)
        } else if href.starts_with('?') {
            format!("{}{}", self.flow_service_url("flows"), href)
        } else {
            format!("{}{}/{}", self.platform_url, FLOW_SERVICE_PATH, href)
        }
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url).headers(self.headers.clone())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
        kind: &str,
    ) -> Result<T, AepError> {
        debug!(url = %url, kind = %kind, "sending flow service request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "flow service request failed");
            return Err(AepError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AepError::decode(format!("{kind} response"), e))
    }
}

#[async_trait]
impl FlowCatalog for FlowServiceClient {
    async fn list_flows(&self) -> Result<Vec<FlowSummary>, AepError> {
        FlowServiceClient::list_flows(self).await
    }

    async fn get_target_connection(&self, id: &str) -> Result<TargetConnectionDetail, AepError> {
        FlowServiceClient::get_target_connection(self, id).await
    }
}

/// Headers every flow-service call must carry.
pub fn platform_headers(
    credentials: &Credentials,
    token: &AccessToken,
) -> Result<HeaderMap, AepError> {
    let mut headers = HeaderMap::new();
    let mut bearer = header_value("Authorization", &format!("Bearer {}", token.as_str()))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(
        HeaderName::from_static("x-api-key"),
        header_value("x-api-key", &credentials.client_id)?,
    );
    headers.insert(
        HeaderName::from_static("x-gw-ims-org-id"),
        header_value("x-gw-ims-org-id", &credentials.ims_org_id)?,
    );
    headers.insert(
        HeaderName::from_static("x-sandbox-name"),
        header_value("x-sandbox-name", &credentials.sandbox)?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, AepError> {
    HeaderValue::from_str(value).map_err(|_| {
        AepError::InvalidInput(format!(
            "{name} contains characters not allowed in a header"
        ))
    })
}
