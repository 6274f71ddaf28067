use serde::{Deserialize, Serialize};

// ── Cluster types ────────────────────────────────────────────────────

/// Body of `POST /clusters`.
///
/// `search_delivery_network` is assigned by the control plane and cannot be
/// chosen at creation time, so it has no field here.
#[derive(Debug, Clone, Serialize)]
pub struct CreateClusterRequest {
    pub memory: String,
    pub vcpu: String,
    pub regions: Vec<String>,
    pub high_availability: String,
    pub high_performance_disk: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub auto_upgrade_capacity: bool,
}

/// Body of `PATCH /clusters/{id}`. Only name and capacity auto-upgrade can
/// change on a live cluster.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateClusterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub auto_upgrade_capacity: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub memory: String,
    pub vcpu: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub high_availability: String,
    #[serde(default)]
    pub high_performance_disk: String,
    #[serde(default)]
    pub search_delivery_network: String,
    #[serde(default)]
    pub load_balancing: String,
    #[serde(default)]
    pub typesense_server_version: String,
    #[serde(default)]
    pub auto_upgrade_capacity: bool,
    pub status: String,
}

impl Cluster {
    /// The control plane lists regions in priority order; the first one is
    /// where the cluster was requested.
    pub fn primary_region(&self) -> Option<&str> {
        self.regions.first().map(String::as_str)
    }

    pub fn is_provisioning(&self) -> bool {
        self.status == STATUS_PROVISIONING
    }
}

pub const STATUS_PROVISIONING: &str = "provisioning";

/// Envelope returned by `POST /clusters`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateClusterResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub cluster: Option<Cluster>,
}

fn default_success() -> bool {
    true
}
