//! Wire types for the control-plane JSON API.
//!
//! Field names are camelCase on the wire. Task-definition documents
//! reuse the core types directly since those already round-trip
//! unknown container fields.

use serde::{Deserialize, Serialize};

use skiff_core::{RegisteredRevision, ServiceDescriptor, TaskDefinitionSnapshot};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeServiceRequest<'a> {
    pub cluster: &'a str,
    pub service: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeServiceResponse {
    /// Zero entries when the service does not exist on the cluster.
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTaskDefinitionRequest<'a> {
    pub task_definition: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTaskDefinitionResponse {
    pub task_definition: TaskDefinitionSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTaskDefinitionResponse {
    pub task_definition: RegisteredRevision,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest<'a> {
    pub cluster: &'a str,
    pub service: &'a str,
    pub desired_count: i64,
    pub task_definition: &'a str,
}
