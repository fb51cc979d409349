//! Pure image replacement on a fetched task definition.

use crate::error::{DeployError, DeployResult};
use crate::types::{ImageRef, MutatedDefinition, TaskDefinitionSnapshot};

/// Produce the register-input document: a structural copy of the
/// snapshot with only the first container's image replaced.
///
/// The system deploys a single designated container per family. When a
/// family has more than one container, the rest pass through
/// unchanged; only the first is retargeted. That is a deliberate
/// limitation, not an oversight.
///
/// Pure and deterministic: no I/O, same inputs always yield the same
/// output. An empty container list is a fatal precondition violation.
pub fn mutate_image(
    snapshot: &TaskDefinitionSnapshot,
    image: &ImageRef,
) -> DeployResult<MutatedDefinition> {
    if snapshot.container_definitions.is_empty() {
        return Err(DeployError::NoContainers {
            family: snapshot.family.clone(),
        });
    }

    let mut containers = snapshot.container_definitions.clone();
    containers[0].image = image.to_string();

    Ok(MutatedDefinition {
        family: snapshot.family.clone(),
        container_definitions: containers,
        volumes: snapshot.volumes.clone(),
        network_mode: snapshot.network_mode.clone(),
        task_role_arn: snapshot.task_role_arn.clone(),
        cpu: snapshot.cpu.clone(),
        memory: snapshot.memory.clone(),
        requires_compatibilities: snapshot.requires_compatibilities.clone(),
        execution_role_arn: snapshot.execution_role_arn.clone(),
    })
}
