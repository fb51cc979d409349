//! New-revision registration.

use tracing::debug;

use crate::control::ControlPlane;
use crate::error::{DeployError, DeployResult};
use crate::types::{MutatedDefinition, RegisteredRevision};

/// Submit the mutated document; the control plane allocates a new
/// revision number and ARN. Registration is additive: the previous
/// revision stays intact and addressable, and from the caller's view
/// either a new revision exists afterwards or none was created.
pub async fn register_task_definition<C: ControlPlane + ?Sized>(
    control: &C,
    definition: &MutatedDefinition,
) -> DeployResult<RegisteredRevision> {
    let revision = control
        .register_task_definition(definition)
        .await
        .map_err(|e| {
            DeployError::upstream(
                format!("register-task-definition for family {}", definition.family),
                e,
            )
        })?;

    debug!(
        family = %revision.family,
        revision = revision.revision,
        arn = %revision.arn,
        "registered task definition"
    );
    Ok(revision)
}
