//! HTTP client for the control-plane API.
//!
//! Each call opens a TCP connection, performs an http1 handshake, and
//! drives the connection in a background task while the request is in
//! flight. The whole exchange sits behind a single timeout; there are
//! no retries here, by contract every failure is fatal to the run.

use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use skiff_core::{
    ControlPlane, MutatedDefinition, RegisteredRevision, ServiceDescriptor,
    TaskDefinitionSnapshot,
};

use crate::wire::{
    DescribeServiceRequest, DescribeServiceResponse, DescribeTaskDefinitionRequest,
    DescribeTaskDefinitionResponse, RegisterTaskDefinitionResponse, UpdateServiceRequest,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-over-HTTP implementation of [`ControlPlane`].
pub struct HttpControlPlane {
    /// `host:port` the TCP connection targets.
    authority: String,
    timeout: Duration,
}

impl HttpControlPlane {
    /// Build a client for an endpoint like
    /// `http://controlplane.us-east-1.internal:7070`.
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let uri: http::Uri = endpoint
            .parse()
            .with_context(|| format!("invalid control-plane endpoint {endpoint}"))?;
        if let Some(scheme) = uri.scheme_str() {
            if scheme != "http" {
                bail!("control-plane endpoint must be http, got {scheme}");
            }
        }
        let authority = uri
            .authority()
            .with_context(|| format!("control-plane endpoint {endpoint} has no host"))?
            .to_string();
        Ok(Self { authority, timeout })
    }

    /// Conventional endpoint for a region.
    pub fn regional_endpoint(region: &str) -> String {
        format!("http://controlplane.{region}.internal:7070")
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &impl Serialize,
    ) -> anyhow::Result<T> {
        let body = serde_json::to_vec(request).context("serialize request")?;
        let bytes = tokio::time::timeout(self.timeout, self.exchange(path, body))
            .await
            .with_context(|| format!("POST {path} timed out"))??;
        serde_json::from_slice(&bytes).with_context(|| format!("decode response from {path}"))
    }

    async fn exchange(&self, path: &str, body: Vec<u8>) -> anyhow::Result<Bytes> {
        let stream = tokio::net::TcpStream::connect(&self.authority)
            .await
            .with_context(|| format!("connect to control plane at {}", self.authority))?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .context("http handshake with control plane")?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("POST")
            .uri(path)
            .header("host", &self.authority)
            .header("content-type", "application/json")
            .header("user-agent", "skiff/0.1")
            .body(http_body_util::Full::new(Bytes::from(body)))
            .context("build request")?;

        debug!(%path, authority = %self.authority, "control-plane request");
        let resp = sender
            .send_request(req)
            .await
            .with_context(|| format!("POST {path}"))?;

        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .with_context(|| format!("read response from {path}"))?
            .to_bytes();

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            bail!("control plane returned {status} for {path}: {text}");
        }
        Ok(bytes)
    }
}

#[async_trait]
impl ControlPlane for HttpControlPlane {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> anyhow::Result<Vec<ServiceDescriptor>> {
        let resp: DescribeServiceResponse = self
            .post(
                "/v1/describe-service",
                &DescribeServiceRequest { cluster, service },
            )
            .await?;
        Ok(resp.services)
    }

    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> anyhow::Result<TaskDefinitionSnapshot> {
        let resp: DescribeTaskDefinitionResponse = self
            .post(
                "/v1/describe-task-definition",
                &DescribeTaskDefinitionRequest {
                    task_definition: reference,
                },
            )
            .await?;
        Ok(resp.task_definition)
    }

    async fn register_task_definition(
        &self,
        definition: &MutatedDefinition,
    ) -> anyhow::Result<RegisteredRevision> {
        let resp: RegisterTaskDefinitionResponse = self
            .post("/v1/register-task-definition", definition)
            .await?;
        Ok(resp.task_definition)
    }

    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        desired_count: i64,
        task_definition: &str,
    ) -> anyhow::Result<()> {
        // The ack body is an empty JSON object.
        let _: serde_json::Value = self
            .post(
                "/v1/update-service",
                &UpdateServiceRequest {
                    cluster,
                    service,
                    desired_count,
                    task_definition,
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_endpoint_authority() {
        let client = HttpControlPlane::new("http://controlplane.us-east-1.internal:7070").unwrap();
        assert_eq!(client.authority, "controlplane.us-east-1.internal:7070");
    }

    #[test]
    fn rejects_https_endpoint() {
        assert!(HttpControlPlane::new("https://example.com").is_err());
    }

    #[test]
    fn regional_endpoint_embeds_region() {
        assert_eq!(
            HttpControlPlane::regional_endpoint("eu-west-2"),
            "http://controlplane.eu-west-2.internal:7070"
        );
    }
}
