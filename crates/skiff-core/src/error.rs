//! Deployment error types.
//!
//! Every error is fatal to the run: nothing is retried and nothing is
//! rolled back. The coordinator surfaces the first error encountered
//! with enough context to name the failing step and subject; only the
//! binary turns a terminal error into a process exit.

use thiserror::Error;

/// Errors that can occur during a rollout run.
#[derive(Debug, Error)]
pub enum DeployError {
    /// A required input was missing or empty. Detected before any
    /// network call.
    #[error("invalid deployment request: {0}")]
    Validation(String),

    #[error("no service {service} found on cluster {cluster}")]
    ServiceNotFound { cluster: String, service: String },

    /// The control plane answered the lookup with a different service
    /// than the one requested.
    #[error("looked up service {requested} but control plane returned {found}")]
    ServiceMismatch { requested: String, found: String },

    /// The fetched task definition has no container definitions, so
    /// there is nothing to retarget.
    #[error("task definition family {family} has no container definitions")]
    NoContainers { family: String },

    /// A transport or API-level failure from the control plane.
    #[error("{step} failed: {source}")]
    Upstream {
        /// Which operation and subject failed, e.g.
        /// `describe-service for web on prod`.
        step: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DeployError {
    /// Wrap a control-plane failure with step context.
    pub fn upstream(step: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Upstream {
            step: step.into(),
            source,
        }
    }
}

pub type DeployResult<T> = Result<T, DeployError>;
