//! Domain types for skiff deployments.
//!
//! Task-definition documents are treated as opaque bundles except for
//! the fields the rollout actually reads or rewrites. Everything is
//! serializable to/from JSON so documents survive a fetch → mutate →
//! register round trip without losing fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

// ── Image reference ────────────────────────────────────────────────

/// A container image reference: repository plus tag.
///
/// Renders as `repository:tag`, the form task definitions store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub repository: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

// ── Deployment request ─────────────────────────────────────────────

/// Everything a single rollout run needs, constructed once from
/// caller-supplied configuration and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Cluster to deploy to.
    pub cluster: String,
    /// Image repository to pull from.
    pub repository: String,
    /// Tag to deploy, usually a short git SHA. Defaults to `latest`.
    pub tag: String,
    /// Region the cluster lives in.
    pub region: String,
    /// Application (service) names, in rollout order. The first entry
    /// is the exemplar whose task definition seeds the new revision.
    pub apps: Vec<String>,
    /// Dump fetched and to-be-registered documents.
    pub debug: bool,
}

impl DeploymentRequest {
    /// Check that every required field is present before any network
    /// call is made.
    pub fn validate(&self) -> DeployResult<()> {
        if self.cluster.is_empty() {
            return Err(DeployError::Validation("cluster name is required".into()));
        }
        if self.region.is_empty() {
            return Err(DeployError::Validation("region is required".into()));
        }
        if self.apps.is_empty() {
            return Err(DeployError::Validation(
                "at least one application name is required".into(),
            ));
        }
        if self.repository.is_empty() {
            return Err(DeployError::Validation("image repository is required".into()));
        }
        if self.tag.is_empty() {
            return Err(DeployError::Validation("image tag is required".into()));
        }
        Ok(())
    }

    /// The image reference this rollout deploys.
    pub fn image(&self) -> ImageRef {
        ImageRef::new(self.repository.clone(), self.tag.clone())
    }
}

// ── Service descriptor ─────────────────────────────────────────────

/// A service as described by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Service name as registered on the cluster.
    pub name: String,
    /// ARN of the owning cluster.
    pub cluster_arn: String,
    /// Reference to the task definition the service currently runs.
    pub task_definition: String,
    /// Number of tasks the service is configured to keep running.
    pub desired_count: i64,
}

// ── Task definition documents ──────────────────────────────────────

/// One container definition inside a task definition.
///
/// Only the image field is ever rewritten; every other field rides
/// along untouched in `rest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub image: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// A fetched task-definition document. Immutable once fetched; the
/// mutator produces a fresh [`MutatedDefinition`] from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionSnapshot {
    pub family: String,
    pub container_definitions: Vec<ContainerDefinition>,
    /// Volume definitions, passed through opaquely.
    #[serde(default)]
    pub volumes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default)]
    pub requires_compatibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_role_arn: Option<String>,
}

/// The document submitted for registration: a snapshot's fields with
/// the deploy target's image replaced. Produced only by
/// [`crate::mutate::mutate_image`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutatedDefinition {
    pub family: String,
    pub container_definitions: Vec<ContainerDefinition>,
    #[serde(default)]
    pub volumes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default)]
    pub requires_compatibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_role_arn: Option<String>,
}

/// A newly registered, immutable task-definition revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredRevision {
    pub family: String,
    /// Monotonically increasing within the family.
    pub revision: i64,
    /// Globally unique identifier for this revision.
    pub arn: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DeploymentRequest {
        DeploymentRequest {
            cluster: "prod".to_string(),
            repository: "acme/app".to_string(),
            tag: "abc123".to_string(),
            region: "us-east-1".to_string(),
            apps: vec!["web".to_string(), "worker".to_string()],
            debug: false,
        }
    }

    #[test]
    fn image_ref_renders_repo_colon_tag() {
        assert_eq!(request().image().to_string(), "acme/app:abc123");
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn empty_cluster_rejected() {
        let mut req = request();
        req.cluster.clear();
        assert!(matches!(req.validate(), Err(crate::DeployError::Validation(_))));
    }

    #[test]
    fn empty_apps_rejected() {
        let mut req = request();
        req.apps.clear();
        assert!(matches!(req.validate(), Err(crate::DeployError::Validation(_))));
    }

    #[test]
    fn empty_tag_rejected() {
        let mut req = request();
        req.tag.clear();
        assert!(matches!(req.validate(), Err(crate::DeployError::Validation(_))));
    }

    #[test]
    fn container_definition_preserves_unknown_fields() {
        let json = serde_json::json!({
            "image": "acme/app:old",
            "name": "app",
            "cpu": 256,
            "portMappings": [{"containerPort": 8080}],
        });
        let def: ContainerDefinition = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(def.image, "acme/app:old");
        assert_eq!(serde_json::to_value(&def).unwrap(), json);
    }

    #[test]
    fn snapshot_roundtrips_with_optional_fields_absent() {
        let json = serde_json::json!({
            "family": "app-family",
            "containerDefinitions": [{"image": "acme/app:old"}],
        });
        let snap: TaskDefinitionSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snap.family, "app-family");
        assert!(snap.network_mode.is_none());
        assert!(snap.volumes.is_empty());
    }
}
