//! Typed Rust client for the Typesense Cloud cluster management API.
//!
//! Covers the subset needed to manage a cluster's lifecycle:
//! clusters (create, get, update, terminate).

mod types;

pub use reqwest::StatusCode;
pub use types::*;

pub const DEFAULT_BASE_URL: &str = "https://cloud.typesense.org/api/v1";

const API_KEY_HEADER: &str = "X-TYPESENSE-CLOUD-MANAGEMENT-API-KEY";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("typesense cloud request failed")]
    Request(#[from] reqwest::Error),

    #[error("typesense cloud {endpoint} returned {status}: {body}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("typesense cloud {endpoint} rejected the request: {message}")]
    Rejected {
        endpoint: &'static str,
        message: String,
    },
}

impl Error {
    /// True when the control plane answered 404 for the addressed cluster.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the Typesense Cloud cluster management REST API.
#[derive(Clone)]
pub struct TypesenseCloudClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl TypesenseCloudClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different control plane (proxies, test servers).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(resp: reqwest::Response, endpoint: &'static str) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api { endpoint, status, body });
        }
        Ok(resp)
    }

    // ── Clusters ─────────────────────────────────────────────────────

    pub async fn create_cluster(&self, req: &CreateClusterRequest) -> Result<Cluster> {
        let resp = self
            .http
            .post(self.url("/clusters"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(req)
            .send()
            .await?;

        let created: CreateClusterResponse = Self::check(resp, "create cluster").await?.json().await?;

        match created {
            CreateClusterResponse {
                success: true,
                cluster: Some(cluster),
                ..
            } => Ok(cluster),
            CreateClusterResponse { message, .. } => Err(Error::Rejected {
                endpoint: "create cluster",
                message: message.unwrap_or_else(|| "no cluster in response".into()),
            }),
        }
    }

    pub async fn get_cluster(&self, cluster_id: &str) -> Result<Cluster> {
        let resp = self
            .http
            .get(self.url(&format!("/clusters/{cluster_id}")))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Self::check(resp, "get cluster")
            .await?
            .json()
            .await
            .map_err(Error::from)
    }

    pub async fn update_cluster(&self, cluster_id: &str, req: &UpdateClusterRequest) -> Result<()> {
        let resp = self
            .http
            .patch(self.url(&format!("/clusters/{cluster_id}")))
            .header(API_KEY_HEADER, &self.api_key)
            .json(req)
            .send()
            .await?;

        Self::check(resp, "update cluster").await?;
        Ok(())
    }

    pub async fn terminate_cluster(&self, cluster_id: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.url(&format!("/clusters/{cluster_id}/terminate")))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Self::check(resp, "terminate cluster").await?;
        Ok(())
    }
}
