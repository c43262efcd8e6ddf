//! Attachment model.
//!
//! An attachment is a document carrying signable field definitions. Its
//! content source is one of:
//! - an inline upload: base64-encoded bytes plus filename and content type
//! - a reference to a file already uploaded to the service
//!
//! Adding an attachment to a packet is bookkeeping only. Inline bytes are
//! transmitted when the request itself is issued, by the transport layer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Position and size of a signable region, in PDF points. `x`/`y` locate the
/// top-left corner of the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A signable field definition inside an attachment: kind, page, geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignableField {
    pub id: String,

    /// Field kind as the service names it ("signature", "signatureInitial",
    /// "signatureDate", ...). Left open: the service adds kinds over time.
    #[serde(rename = "type")]
    pub kind: String,

    /// Zero-based page index.
    #[serde(alias = "page_num")]
    pub page_num: u32,

    pub rect: FieldRect,
}

/// Base64-encoded file content wrapped for upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InlineFile {
    /// Base64 of the raw bytes.
    pub data: String,

    /// Filename shown to signers when they download the finished packet.
    pub filename: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

impl InlineFile {
    /// Wrap raw bytes, encoding them for transport.
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            data: BASE64.encode(bytes),
            filename: filename.into(),
            mimetype: None,
        }
    }

    /// Wrap already-encoded content.
    pub fn from_base64(filename: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            mimetype: None,
        }
    }

    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }
}

/// A new document to upload, with its signable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentUpload {
    pub id: String,

    /// Title shown to signers.
    pub title: String,

    pub file: InlineFile,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SignableField>,
}

/// A reference to a file the service already holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CastReference {
    pub id: String,

    /// Service-side id of the uploaded file.
    #[serde(rename = "castEid", alias = "cast_eid")]
    pub cast_eid: String,
}

/// An uploadable file or a reference to one, plus its field annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attachment {
    Upload(DocumentUpload),
    CastReference(CastReference),
}

impl Attachment {
    /// The id other packet entities reference this attachment by.
    pub fn id(&self) -> &str {
        match self {
            Self::Upload(u) => &u.id,
            Self::CastReference(r) => &r.id,
        }
    }
}

impl From<DocumentUpload> for Attachment {
    fn from(u: DocumentUpload) -> Self {
        Self::Upload(u)
    }
}

impl From<CastReference> for Attachment {
    fn from(r: CastReference) -> Self {
        Self::CastReference(r)
    }
}
