//! Task-definition retrieval.

use tracing::debug;

use crate::control::ControlPlane;
use crate::error::{DeployError, DeployResult};
use crate::types::TaskDefinitionSnapshot;

/// Fetch the full task-definition document for a reference.
///
/// No shape validation happens here; the mutator enforces the
/// at-least-one-container precondition.
pub async fn fetch_task_definition<C: ControlPlane + ?Sized>(
    control: &C,
    reference: &str,
) -> DeployResult<TaskDefinitionSnapshot> {
    let snapshot = control
        .describe_task_definition(reference)
        .await
        .map_err(|e| DeployError::upstream(format!("describe-task-definition for {reference}"), e))?;

    debug!(
        family = %snapshot.family,
        containers = snapshot.container_definitions.len(),
        "fetched task definition"
    );
    Ok(snapshot)
}
