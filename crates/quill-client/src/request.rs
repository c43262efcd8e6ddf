//! Wire request assembly.
//!
//! A packet payload serializes into the operation's variables. Inline
//! uploads additionally travel as binary multipart parts: each part is keyed
//! in a file-map by the path of the variables slot it replaces, and the slot
//! itself is nulled, per the common multipart convention for query-based
//! APIs.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use serde_json::{json, Value};

use quill_core::payload::PacketPayload;
use quill_core::query;

/// A ready-to-serialize operation: document text plus variables.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

/// Build the packet-creation operation for a materialized payload.
pub fn create_packet_request(
    payload: &PacketPayload,
    response_selection: Option<&str>,
) -> Result<GraphqlRequest> {
    Ok(GraphqlRequest {
        query: query::mutation_document(response_selection),
        variables: serde_json::to_value(payload)?,
    })
}

/// One out-of-band binary part lifted from the variables.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Key this part is sent under; the file-map resolves it to a path.
    pub map_key: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The full multipart layout for one request.
///
/// When `parts` is empty the request has no inline uploads and can be sent
/// as plain JSON.
#[derive(Debug, Clone)]
pub struct MultipartPlan {
    /// `{"query": .., "variables": ..}` with lifted file slots nulled.
    pub operations: Value,
    /// Part key -> paths into the variables structure.
    pub file_map: BTreeMap<String, Vec<String>>,
    pub parts: Vec<FilePart>,
}

impl MultipartPlan {
    /// Walk `variables.files[*].file` and lift every inline upload out of the
    /// JSON body. Reference attachments have no `file` block and pass
    /// through untouched.
    pub fn for_request(request: &GraphqlRequest) -> Result<Self> {
        let mut operations = json!({
            "query": request.query,
            "variables": request.variables,
        });
        let mut file_map = BTreeMap::new();
        let mut parts: Vec<FilePart> = Vec::new();

        let files = operations
            .get_mut("variables")
            .and_then(|v| v.get_mut("files"))
            .and_then(Value::as_array_mut);

        if let Some(files) = files {
            for (i, entry) in files.iter_mut().enumerate() {
                let Some(inline) = entry.get_mut("file") else {
                    continue;
                };
                let (Some(data), Some(filename)) = (
                    inline.get("data").and_then(Value::as_str),
                    inline.get("filename").and_then(Value::as_str),
                ) else {
                    continue;
                };

                let bytes = BASE64
                    .decode(data)
                    .map_err(|e| anyhow!("attachment {i} carries invalid base64: {e}"))?;
                let filename = filename.to_string();
                let content_type = inline
                    .get("mimetype")
                    .and_then(Value::as_str)
                    .map(str::to_string);

                let map_key = (parts.len() + 1).to_string();
                file_map.insert(map_key.clone(), vec![format!("variables.files.{i}.file")]);
                parts.push(FilePart {
                    map_key,
                    filename,
                    content_type,
                    bytes,
                });
                *inline = Value::Null;
            }
        }

        Ok(Self {
            operations,
            file_map,
            parts,
        })
    }

    pub fn is_multipart(&self) -> bool {
        !self.parts.is_empty()
    }
}
