//! HTTP submission.
//!
//! `QuillClient` owns the endpoint, the API key, and a reqwest client. It
//! submits plain JSON when a request carries no inline uploads, multipart
//! otherwise. Timeout and retry policy belong to the caller; nothing here
//! retries.

use anyhow::{anyhow, bail, Result};
use reqwest::multipart;
use serde_json::Value;
use tracing::debug;

use quill_core::payload::PacketPayload;

use crate::request::{create_packet_request, GraphqlRequest, MultipartPlan};

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://graphql.useanvil.com";

/// Authenticated client for the signing service.
#[derive(Debug, Clone)]
pub struct QuillClient {
    endpoint: String,
    api_key: String,
    http: reqwest::Client,
}

impl QuillClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a packet-creation request and return its response block.
    pub async fn create_packet(
        &self,
        payload: &PacketPayload,
        response_selection: Option<&str>,
    ) -> Result<Value> {
        let request = create_packet_request(payload, response_selection)?;
        let data = self.execute(request).await?;
        data.get("createEtchPacket")
            .cloned()
            .ok_or_else(|| anyhow!("response carries no createEtchPacket block"))
    }

    /// Execute an arbitrary operation and return the response `data` block.
    pub async fn execute(&self, request: GraphqlRequest) -> Result<Value> {
        let plan = MultipartPlan::for_request(&request)?;
        debug!(
            multipart = plan.is_multipart(),
            parts = plan.parts.len(),
            "submitting operation"
        );

        let response = if plan.is_multipart() {
            let mut form = multipart::Form::new()
                .text("operations", serde_json::to_string(&plan.operations)?)
                .text("map", serde_json::to_string(&plan.file_map)?);
            for part in plan.parts {
                let mut piece = multipart::Part::bytes(part.bytes).file_name(part.filename);
                if let Some(ct) = part.content_type {
                    piece = piece.mime_str(&ct)?;
                }
                form = form.part(part.map_key, piece);
            }
            self.http
                .post(&self.endpoint)
                .basic_auth(&self.api_key, None::<&str>)
                .multipart(form)
                .send()
                .await?
        } else {
            self.http
                .post(&self.endpoint)
                .basic_auth(&self.api_key, None::<&str>)
                .json(&plan.operations)
                .send()
                .await?
        };

        let status = response.status();
        if !status.is_success() {
            bail!("http error: {status}");
        }

        let body: Value = response.json().await?;
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages: Vec<&str> = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect();
                bail!("operation rejected: {}", messages.join("; "));
            }
        }

        body.get("data")
            .cloned()
            .ok_or_else(|| anyhow!("response carries no data block"))
    }
}
