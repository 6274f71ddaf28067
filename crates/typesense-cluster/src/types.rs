use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typesense_cloud_api::{Cluster, CreateClusterRequest, UpdateClusterRequest};

use crate::{Error, Result};

/// Control-plane cluster identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub String);

impl ClusterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ClusterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ClusterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The control plane's `"yes"` / `"no"` toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(Error::InvalidConfig(format!("expected \"yes\" or \"no\", got {other:?}"))),
        }
    }
}

/// What the user declared for a cluster.
///
/// `memory`, `vcpu` and `region` are fixed once the cluster exists. So are the
/// two toggles: they are only sent at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredConfig {
    pub memory: String,
    pub vcpu: String,
    pub region: String,
    #[serde(default)]
    pub high_availability: YesNo,
    #[serde(default)]
    pub high_performance_disk: YesNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub auto_upgrade_capacity: bool,
}

impl DesiredConfig {
    pub fn new(memory: impl Into<String>, vcpu: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            memory: memory.into(),
            vcpu: vcpu.into(),
            region: region.into(),
            high_availability: YesNo::No,
            high_performance_disk: YesNo::No,
            name: None,
            auto_upgrade_capacity: false,
        }
    }

    pub fn create_request(&self) -> CreateClusterRequest {
        CreateClusterRequest {
            memory: self.memory.clone(),
            vcpu: self.vcpu.clone(),
            regions: vec![self.region.clone()],
            high_availability: self.high_availability.as_str().into(),
            high_performance_disk: self.high_performance_disk.as_str().into(),
            name: self.name.clone(),
            auto_upgrade_capacity: self.auto_upgrade_capacity,
        }
    }

    /// The in-place subset. Sizing and placement never leave through here.
    pub fn update_request(&self) -> UpdateClusterRequest {
        UpdateClusterRequest {
            name: self.name.clone(),
            auto_upgrade_capacity: self.auto_upgrade_capacity,
        }
    }
}

/// Flattened cluster record, as handed to the host for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    pub id: ClusterId,
    pub name: String,
    pub memory: String,
    pub vcpu: String,
    pub high_performance_disk: String,
    pub typesense_server_version: String,
    pub high_availability: String,
    pub search_delivery_network: String,
    pub load_balancing: String,
    pub region: String,
    pub auto_upgrade_capacity: bool,
    pub status: String,
}

impl ClusterState {
    pub fn from_cluster(cluster: Cluster) -> Result<Self> {
        let Some(region) = cluster.primary_region().map(str::to_string) else {
            return Err(Error::MalformedRecord {
                id: ClusterId(cluster.id),
                reason: "record lists no regions".into(),
            });
        };

        Ok(Self {
            id: ClusterId(cluster.id),
            name: cluster.name,
            memory: cluster.memory,
            vcpu: cluster.vcpu,
            high_performance_disk: cluster.high_performance_disk,
            typesense_server_version: cluster.typesense_server_version,
            high_availability: cluster.high_availability,
            search_delivery_network: cluster.search_delivery_network,
            load_balancing: cluster.load_balancing,
            region,
            auto_upgrade_capacity: cluster.auto_upgrade_capacity,
            status: cluster.status,
        })
    }
}
