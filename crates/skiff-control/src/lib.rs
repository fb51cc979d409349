//! skiff-control — JSON-over-HTTP control-plane client.
//!
//! Implements `skiff_core::ControlPlane` against a control-plane
//! endpoint exposing the four deployment operations as JSON POSTs
//! under `/v1/`:
//!
//! ```text
//! POST /v1/describe-service          {cluster, service}
//! POST /v1/describe-task-definition  {taskDefinition}
//! POST /v1/register-task-definition  {family, containerDefinitions, ...}
//! POST /v1/update-service            {cluster, service, desiredCount, taskDefinition}
//! ```
//!
//! Transport only: semantic checks (not-found, identity guard) belong
//! to the core components.

pub mod client;
pub mod wire;

pub use client::HttpControlPlane;
