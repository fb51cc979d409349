//! Rollout coordinator — drives the deployment sequence.
//!
//! One run moves through a fixed sequence of phases: validate the
//! request, locate the exemplar service, fetch its task definition,
//! mutate the image, register the new revision, then point every named
//! application at that revision in input order. There is no branching
//! beyond failure short-circuiting, no retries, and no compensation:
//! services updated before a failure stay on the new revision.

use tracing::{info, warn};

use crate::control::ControlPlane;
use crate::error::{DeployError, DeployResult};
use crate::fetch::fetch_task_definition;
use crate::locate::locate_service;
use crate::mutate::mutate_image;
use crate::register::register_task_definition;
use crate::types::{
    DeploymentRequest, MutatedDefinition, RegisteredRevision, TaskDefinitionSnapshot,
};

/// Current phase of a rollout run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloutPhase {
    /// Checking the request before any network call.
    Validating,
    /// Looking up the exemplar service.
    LocatingExemplar,
    /// Fetching the exemplar's task definition.
    Fetching,
    /// Rewriting the container image.
    Mutating,
    /// Registering the new revision.
    Registering,
    /// Updating application N of M to the new revision.
    UpdatingServices { current: usize, total: usize },
    /// Every application points at the new revision.
    Done,
    /// Aborted at the first error.
    Failed,
}

/// Progress notifications emitted as the run advances. The core does
/// no console I/O; the caller decides what to show.
#[derive(Debug, Clone)]
pub enum RolloutEvent {
    ExemplarLocated {
        service: String,
        cluster_arn: String,
        desired_count: i64,
    },
    /// Carries the fetched document so callers can dump it in debug
    /// mode.
    DefinitionFetched { snapshot: TaskDefinitionSnapshot },
    /// Carries the about-to-be-registered document.
    DefinitionMutated { definition: MutatedDefinition },
    RevisionRegistered { revision: RegisteredRevision },
    ServiceUpdated { service: String, arn: String },
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RolloutOutcome {
    /// The revision every service now points at.
    pub revision: RegisteredRevision,
    /// The exemplar's desired count, applied to every service.
    pub desired_count: i64,
    /// Services updated, in rollout order.
    pub updated: Vec<String>,
}

/// Drives one deployment end to end against a control plane.
pub struct RolloutCoordinator<'a, C: ControlPlane + ?Sized> {
    control: &'a C,
    phase: RolloutPhase,
}

impl<'a, C: ControlPlane + ?Sized> RolloutCoordinator<'a, C> {
    pub fn new(control: &'a C) -> Self {
        Self {
            control,
            phase: RolloutPhase::Validating,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &RolloutPhase {
        &self.phase
    }

    /// Run the rollout.
    ///
    /// `exemplar` names the service whose task definition and desired
    /// count template the whole cohort; callers normally pass
    /// `request.apps[0]`, which also puts the exemplar itself in the
    /// update sequence. On the first failed service update the run
    /// aborts with services updated so far left on the new revision.
    pub async fn run(
        &mut self,
        request: &DeploymentRequest,
        exemplar: &str,
        mut on_event: impl FnMut(RolloutEvent),
    ) -> DeployResult<RolloutOutcome> {
        match self.drive(request, exemplar, &mut on_event).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.phase = RolloutPhase::Failed;
                warn!(error = %err, "rollout failed");
                Err(err)
            }
        }
    }

    async fn drive(
        &mut self,
        request: &DeploymentRequest,
        exemplar: &str,
        on_event: &mut impl FnMut(RolloutEvent),
    ) -> DeployResult<RolloutOutcome> {
        self.phase = RolloutPhase::Validating;
        request.validate()?;

        let image = request.image();
        info!(
            cluster = %request.cluster,
            image = %image,
            apps = request.apps.len(),
            "starting rollout"
        );

        self.phase = RolloutPhase::LocatingExemplar;
        let service = locate_service(self.control, &request.cluster, exemplar).await?;
        on_event(RolloutEvent::ExemplarLocated {
            service: service.name.clone(),
            cluster_arn: service.cluster_arn.clone(),
            desired_count: service.desired_count,
        });

        self.phase = RolloutPhase::Fetching;
        let snapshot = fetch_task_definition(self.control, &service.task_definition).await?;
        on_event(RolloutEvent::DefinitionFetched {
            snapshot: snapshot.clone(),
        });

        self.phase = RolloutPhase::Mutating;
        let mutated = mutate_image(&snapshot, &image)?;
        on_event(RolloutEvent::DefinitionMutated {
            definition: mutated.clone(),
        });

        self.phase = RolloutPhase::Registering;
        let revision = register_task_definition(self.control, &mutated).await?;
        info!(
            family = %revision.family,
            revision = revision.revision,
            "registered new revision"
        );
        on_event(RolloutEvent::RevisionRegistered {
            revision: revision.clone(),
        });

        // Every app, in input order, never deduplicated. The exemplar's
        // desired count applies to the whole cohort.
        let total = request.apps.len();
        let mut updated = Vec::with_capacity(total);
        for (i, app) in request.apps.iter().enumerate() {
            self.phase = RolloutPhase::UpdatingServices {
                current: i + 1,
                total,
            };
            self.control
                .update_service(&request.cluster, app, service.desired_count, &revision.arn)
                .await
                .map_err(|e| {
                    DeployError::upstream(
                        format!(
                            "update-service for {app} on {cluster} as {arn}",
                            cluster = request.cluster,
                            arn = revision.arn,
                        ),
                        e,
                    )
                })?;
            info!(service = %app, arn = %revision.arn, "updated service");
            on_event(RolloutEvent::ServiceUpdated {
                service: app.clone(),
                arn: revision.arn.clone(),
            });
            updated.push(app.clone());
        }

        self.phase = RolloutPhase::Done;
        info!(updated = updated.len(), "rollout complete");
        Ok(RolloutOutcome {
            revision,
            desired_count: service.desired_count,
            updated,
        })
    }
}
