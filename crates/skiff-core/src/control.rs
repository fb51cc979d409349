//! The control-plane seam.
//!
//! The rollout core drives exactly four control-plane operations,
//! abstracted behind [`ControlPlane`] so the sequencing logic can be
//! exercised against an in-memory fake. Implementations report only
//! transport and API-level failures; semantic checks (not-found,
//! identity guard, empty-container precondition) live in the core
//! components.

use async_trait::async_trait;

use crate::types::{
    MutatedDefinition, RegisteredRevision, ServiceDescriptor, TaskDefinitionSnapshot,
};

/// The four operations a rollout consumes from the orchestration
/// control plane.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Describe a named service on a cluster. An empty vec means the
    /// service does not exist; the caller decides what that means.
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> anyhow::Result<Vec<ServiceDescriptor>>;

    /// Fetch the full task-definition document for a reference
    /// (family, family:revision, or ARN).
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> anyhow::Result<TaskDefinitionSnapshot>;

    /// Register a new task-definition revision. Additive: previous
    /// revisions remain intact and addressable.
    async fn register_task_definition(
        &self,
        definition: &MutatedDefinition,
    ) -> anyhow::Result<RegisteredRevision>;

    /// Point a service at a task-definition revision with the given
    /// desired task count.
    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        desired_count: i64,
        task_definition: &str,
    ) -> anyhow::Result<()>;
}
