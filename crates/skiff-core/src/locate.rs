//! Service lookup with identity guard.

use tracing::debug;

use crate::control::ControlPlane;
use crate::error::{DeployError, DeployResult};
use crate::types::ServiceDescriptor;

/// Resolve a named service on a cluster to its descriptor.
///
/// Fails with [`DeployError::ServiceNotFound`] when the control plane
/// reports no matching service, and with
/// [`DeployError::ServiceMismatch`] when it answers with a service
/// whose name differs from the request — a control plane that resolves
/// to a first-available or fuzzy match must not silently redirect the
/// rollout.
pub async fn locate_service<C: ControlPlane + ?Sized>(
    control: &C,
    cluster: &str,
    service: &str,
) -> DeployResult<ServiceDescriptor> {
    let services = control
        .describe_service(cluster, service)
        .await
        .map_err(|e| {
            DeployError::upstream(format!("describe-service for {service} on {cluster}"), e)
        })?;

    let Some(found) = services.into_iter().next() else {
        return Err(DeployError::ServiceNotFound {
            cluster: cluster.to_string(),
            service: service.to_string(),
        });
    };

    if found.name != service {
        return Err(DeployError::ServiceMismatch {
            requested: service.to_string(),
            found: found.name,
        });
    }

    debug!(
        service = %found.name,
        cluster_arn = %found.cluster_arn,
        desired_count = found.desired_count,
        "located service"
    );
    Ok(found)
}
