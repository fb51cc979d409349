//! skiff-core — rolling image-update deployments for service fleets
//! that share one task-definition family.
//!
//! Given a cluster, a target image, and an ordered list of application
//! names, skiff fetches the task definition of an exemplar service,
//! produces a new revision with the container image swapped, registers
//! it, and points every named service at the new revision while
//! preserving the exemplar's desired task count.
//!
//! # Components
//!
//! - **`types`** — Request, descriptor, and task-definition documents
//! - **`error`** — `DeployError` taxonomy
//! - **`control`** — The `ControlPlane` trait (four operations)
//! - **`locate`** — Exemplar service lookup with identity guard
//! - **`fetch`** — Task-definition retrieval
//! - **`mutate`** — Pure image replacement on the first container
//! - **`register`** — New-revision registration
//! - **`coordinator`** — Rollout state machine (locate → fetch →
//!   mutate → register → update each service in order)

pub mod control;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod locate;
pub mod mutate;
pub mod register;
pub mod types;

pub use control::ControlPlane;
pub use coordinator::{RolloutCoordinator, RolloutEvent, RolloutOutcome, RolloutPhase};
pub use error::{DeployError, DeployResult};
pub use fetch::fetch_task_definition;
pub use locate::locate_service;
pub use mutate::mutate_image;
pub use register::register_task_definition;
pub use types::{
    ContainerDefinition, DeploymentRequest, ImageRef, MutatedDefinition, RegisteredRevision,
    ServiceDescriptor, TaskDefinitionSnapshot,
};
