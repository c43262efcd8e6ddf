//! Packet assembly.
//!
//! `PacketBuilder` is the stateful core of the crate. It accumulates signers
//! and attachments, applies defaults (ids, routing order, content type),
//! validates cross-references between fill payloads and attachments, and
//! materializes an immutable `PacketPayload` snapshot for transport.
//!
//! The builder stays open after materialization: it may be mutated and
//! re-materialized any number of times. There is no close/finalize state.
//!
//! Single-owner, single-threaded: mutation goes through `&mut self` and no
//! internal synchronization is provided. The routing-order default is a
//! read-then-write sequence; concurrent use requires external locking.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{QuillError, QuillResult};
use crate::ident::{IdSource, RandomIdSource};
use crate::mime;
use crate::model::attachment::Attachment;
use crate::model::signer::Signer;
use crate::payload::{EnableEmails, FillData, PacketPayload};
use crate::prefix;

/// Construction-time fields for `PacketBuilder`.
///
/// Deserializable from caller mappings: wire-style camelCase and snake_case
/// keys are both accepted, unknown keys are rejected. `name` is mandatory
/// unless a complete `payload` is supplied out-of-band.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PacketOptions {
    pub name: Option<String>,

    #[serde(alias = "signature_email_subject")]
    pub signature_email_subject: Option<String>,

    #[serde(alias = "signature_email_body")]
    pub signature_email_body: Option<String>,

    #[serde(alias = "signature_page_options")]
    pub signature_page_options: Option<Value>,

    #[serde(alias = "signature_provider")]
    pub signature_provider: Option<String>,

    /// Signers seeded as-is, without the defaulting `add_signer` applies.
    pub signers: Vec<Signer>,

    /// Attachments seeded as-is, without content-type inference.
    #[serde(alias = "attachments")]
    pub files: Vec<Attachment>,

    /// Prefill data keyed by attachment id; consistency is checked lazily at
    /// materialization.
    #[serde(alias = "file_payloads")]
    pub file_payloads: BTreeMap<String, Value>,

    #[serde(alias = "is_draft")]
    pub is_draft: bool,

    #[serde(alias = "is_test")]
    pub is_test: bool,

    #[serde(alias = "webhook_url", alias = "webhookURL")]
    pub webhook_url: Option<String>,

    #[serde(alias = "reply_to_name")]
    pub reply_to_name: Option<String>,

    #[serde(alias = "reply_to_email")]
    pub reply_to_email: Option<String>,

    #[serde(alias = "merge_pdfs", alias = "mergePDFs")]
    pub merge_pdfs: Option<bool>,

    #[serde(alias = "enable_emails")]
    pub enable_emails: Option<EnableEmails>,

    #[serde(alias = "create_cast_templates_from_uploads")]
    pub create_cast_templates_from_uploads: Option<bool>,

    #[serde(alias = "duplicate_casts")]
    pub duplicate_casts: Option<bool>,

    /// A complete pre-built payload. When present, `materialize` returns it
    /// unchanged and ignores builder state.
    pub payload: Option<PacketPayload>,
}

impl Default for PacketOptions {
    fn default() -> Self {
        Self {
            name: None,
            signature_email_subject: None,
            signature_email_body: None,
            signature_page_options: None,
            signature_provider: None,
            signers: Vec::new(),
            files: Vec::new(),
            file_payloads: BTreeMap::new(),
            is_draft: false,
            is_test: true,
            webhook_url: None,
            reply_to_name: None,
            reply_to_email: None,
            merge_pdfs: None,
            enable_emails: None,
            create_cast_templates_from_uploads: None,
            duplicate_casts: None,
            payload: None,
        }
    }
}

impl PacketOptions {
    /// Options with only the mandatory name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Accepted input shapes for `add_signer`: a structured `Signer` or a raw
/// mapping, normalized at the operation's entry.
#[derive(Debug, Clone)]
pub enum SignerInput {
    Structured(Signer),
    Mapping(Value),
}

impl From<Signer> for SignerInput {
    fn from(s: Signer) -> Self {
        Self::Structured(s)
    }
}

impl From<Value> for SignerInput {
    fn from(v: Value) -> Self {
        Self::Mapping(v)
    }
}

impl SignerInput {
    fn into_signer(self) -> QuillResult<Signer> {
        match self {
            Self::Structured(s) => Ok(s),
            Self::Mapping(v) => serde_json::from_value(v)
                .map_err(|e| QuillError::validation(format!("signer mapping is invalid: {e}"))),
        }
    }
}

/// Accepted input shapes for `add_attachment`.
#[derive(Debug, Clone)]
pub enum AttachmentInput {
    Structured(Attachment),
    Mapping(Value),
}

impl From<Attachment> for AttachmentInput {
    fn from(a: Attachment) -> Self {
        Self::Structured(a)
    }
}

impl From<crate::model::attachment::DocumentUpload> for AttachmentInput {
    fn from(u: crate::model::attachment::DocumentUpload) -> Self {
        Self::Structured(Attachment::Upload(u))
    }
}

impl From<crate::model::attachment::CastReference> for AttachmentInput {
    fn from(r: crate::model::attachment::CastReference) -> Self {
        Self::Structured(Attachment::CastReference(r))
    }
}

impl From<Value> for AttachmentInput {
    fn from(v: Value) -> Self {
        Self::Mapping(v)
    }
}

impl AttachmentInput {
    fn into_attachment(self) -> QuillResult<Attachment> {
        match self {
            Self::Structured(a) => Ok(a),
            Self::Mapping(v) => serde_json::from_value(v).map_err(|e| {
                QuillError::validation(format!("attachment mapping is invalid: {e}"))
            }),
        }
    }
}

/// Stateful builder for one packet-creation request.
#[derive(Debug)]
pub struct PacketBuilder {
    name: Option<String>,
    signature_email_subject: Option<String>,
    signature_email_body: Option<String>,
    signature_page_options: Option<Value>,
    signature_provider: Option<String>,
    is_draft: bool,
    is_test: bool,
    webhook_url: Option<String>,
    reply_to_name: Option<String>,
    reply_to_email: Option<String>,
    merge_pdfs: Option<bool>,
    enable_emails: Option<EnableEmails>,
    create_cast_templates_from_uploads: Option<bool>,
    duplicate_casts: Option<bool>,
    signers: Vec<Signer>,
    files: Vec<Attachment>,
    fill_payloads: BTreeMap<String, Value>,
    payload: Option<PacketPayload>,
    ids: Box<dyn IdSource>,
}

impl PacketBuilder {
    /// Build from explicit options.
    ///
    /// Fails with a configuration error when both `name` and a pre-built
    /// `payload` are absent.
    pub fn new(options: PacketOptions) -> QuillResult<Self> {
        if options.name.is_none() && options.payload.is_none() {
            return Err(QuillError::configuration(
                "`name` is required when no pre-built payload is supplied",
            ));
        }

        Ok(Self {
            name: options.name,
            signature_email_subject: options.signature_email_subject,
            signature_email_body: options.signature_email_body,
            signature_page_options: options.signature_page_options,
            signature_provider: options.signature_provider,
            is_draft: options.is_draft,
            is_test: options.is_test,
            webhook_url: options.webhook_url,
            reply_to_name: options.reply_to_name,
            reply_to_email: options.reply_to_email,
            merge_pdfs: options.merge_pdfs,
            enable_emails: options.enable_emails,
            create_cast_templates_from_uploads: options.create_cast_templates_from_uploads,
            duplicate_casts: options.duplicate_casts,
            signers: options.signers,
            files: options.files,
            fill_payloads: options.file_payloads,
            payload: options.payload,
            ids: Box::new(RandomIdSource),
        })
    }

    /// Build with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            signature_email_subject: None,
            signature_email_body: None,
            signature_page_options: None,
            signature_provider: None,
            is_draft: false,
            is_test: true,
            webhook_url: None,
            reply_to_name: None,
            reply_to_email: None,
            merge_pdfs: None,
            enable_emails: None,
            create_cast_templates_from_uploads: None,
            duplicate_casts: None,
            signers: Vec::new(),
            files: Vec::new(),
            fill_payloads: BTreeMap::new(),
            payload: None,
            ids: Box::new(RandomIdSource),
        }
    }

    /// Replace the id source. Tests use this to pin down id assignment.
    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Alternate constructor from a raw mapping.
    ///
    /// Applies `new` using every key except `signers` and
    /// `files`/`attachments`, then routes each listed signer and attachment
    /// through `add_signer`/`add_attachment` so per-entity validation and
    /// defaulting still fire. Any underlying error is wrapped into a single
    /// validation-class error carrying the cause.
    pub fn from_mapping(mapping: Value) -> QuillResult<Self> {
        let mut map = match mapping {
            Value::Object(m) => m,
            other => {
                return Err(QuillError::validation(format!(
                    "packet mapping must be an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let signers = map.remove("signers");
        // The attachment list travels under either key; `files` wins when a
        // caller supplies both.
        let attachments = map.remove("attachments");
        let files = map.remove("files").or(attachments);

        let options: PacketOptions = serde_json::from_value(Value::Object(map)).map_err(|e| {
            QuillError::import(
                "packet mapping is not a valid packet",
                QuillError::validation(e.to_string()),
            )
        })?;

        let mut builder =
            Self::new(options).map_err(|e| QuillError::import("packet mapping is incomplete", e))?;

        for (key, entries) in [("signers", signers), ("files", files)] {
            let Some(list) = entries else { continue };
            let list = match list {
                Value::Array(entries) => entries,
                other => {
                    return Err(QuillError::validation(format!(
                        "`{key}` must be a list, got {}",
                        json_kind(&other)
                    )))
                }
            };
            for (i, entry) in list.into_iter().enumerate() {
                let result = if key == "signers" {
                    builder.add_signer(entry)
                } else {
                    builder.add_attachment(entry)
                };
                result.map_err(|e| QuillError::import(format!("{key}[{i}] was rejected"), e))?;
            }
        }

        Ok(builder)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.files
    }

    pub fn fill_payloads(&self) -> &BTreeMap<String, Value> {
        &self.fill_payloads
    }

    /// Add a signer, normalizing raw mappings first.
    ///
    /// A signer without an id gets one from the id source; a signer without a
    /// routing order is placed after every signer already present
    /// (`max(existing) + 1`, starting at 1). Insertion order is otherwise
    /// preserved. On failure the signer list is untouched.
    pub fn add_signer(&mut self, signer: impl Into<SignerInput>) -> QuillResult<()> {
        let mut signer = signer.into().into_signer()?;

        if signer.id.is_none() {
            signer.id = Some(self.ids.new_id(prefix::SIGNER));
        }
        if signer.routing_order.is_none() {
            let next = self
                .signers
                .iter()
                .map(|s| s.routing_order.unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 1;
            signer.routing_order = Some(next);
        }

        self.signers.push(signer);
        Ok(())
    }

    /// Add an attachment, normalizing raw mappings first.
    ///
    /// An inline upload without a content type gets one inferred from its
    /// filename extension before it is appended; an unresolvable extension
    /// leaves the content type unset. Bookkeeping only: bytes are transmitted
    /// when the request is issued, not here.
    pub fn add_attachment(&mut self, attachment: impl Into<AttachmentInput>) -> QuillResult<()> {
        let mut attachment = attachment.into().into_attachment()?;

        if let Attachment::Upload(upload) = &mut attachment {
            if upload.file.mimetype.is_none() {
                upload.file.mimetype = mime::infer_content_type(&upload.file.filename);
            }
        }

        self.files.push(attachment);
        Ok(())
    }

    /// Associate prefill data with an attachment already in the packet.
    ///
    /// Inserts or overwrites the entry. Fails, without mutating the map, when
    /// the id does not match any current attachment.
    pub fn add_fill_payload(
        &mut self,
        attachment_id: impl Into<String>,
        data: Value,
    ) -> QuillResult<()> {
        let attachment_id = attachment_id.into();
        if !self.files.iter().any(|f| f.id() == attachment_id) {
            return Err(QuillError::validation(format!(
                "'{attachment_id}' has not been added as an attachment; add the file before its fill payload"
            )));
        }
        self.fill_payloads.insert(attachment_id, data);
        Ok(())
    }

    /// Re-validate every fill payload key against the current attachment list
    /// and return the map unchanged.
    ///
    /// The check is deliberately late: payloads may be inserted before state
    /// settles, and only materialization requires consistency.
    pub fn resolve_fill_payloads(&self) -> QuillResult<BTreeMap<String, Value>> {
        for key in self.fill_payloads.keys() {
            if !self.files.iter().any(|f| f.id() == key.as_str()) {
                return Err(QuillError::validation(format!(
                    "fill payload '{key}' does not match any attachment; add that file or remove its payload before materializing"
                )));
            }
        }
        Ok(self.fill_payloads.clone())
    }

    /// Materialize the wire payload.
    ///
    /// A pre-supplied payload is returned unchanged. Otherwise the builder
    /// requires a name, resolves fill payloads, and assembles a deep-copy
    /// snapshot: later mutation of this builder never alters a payload that
    /// was already returned. Read-only with respect to builder state.
    pub fn materialize(&self) -> QuillResult<PacketPayload> {
        if let Some(payload) = &self.payload {
            return Ok(payload.clone());
        }

        let name = self
            .name
            .clone()
            .ok_or_else(|| QuillError::configuration("`name` is required to materialize a packet"))?;

        let payloads = self.resolve_fill_payloads()?;

        Ok(PacketPayload {
            name,
            is_draft: self.is_draft,
            is_test: self.is_test,
            signers: self.signers.clone(),
            files: self.files.clone(),
            data: FillData { payloads },
            signature_email_subject: self.signature_email_subject.clone(),
            signature_email_body: self.signature_email_body.clone(),
            signature_page_options: self
                .signature_page_options
                .clone()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            signature_provider: self.signature_provider.clone(),
            webhook_url: self.webhook_url.clone(),
            reply_to_name: self.reply_to_name.clone(),
            reply_to_email: self.reply_to_email.clone(),
            merge_pdfs: self.merge_pdfs,
            enable_emails: self.enable_emails.clone(),
            create_cast_templates_from_uploads: self.create_cast_templates_from_uploads,
            duplicate_casts: self.duplicate_casts,
        })
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::SequenceIdSource;
    use crate::model::attachment::{CastReference, DocumentUpload, InlineFile};
    use serde_json::json;

    fn upload(id: &str, filename: &str) -> DocumentUpload {
        DocumentUpload {
            id: id.to_string(),
            title: format!("Sign {id}"),
            file: InlineFile::from_bytes(filename, b"%PDF-1.4"),
            fields: vec![],
        }
    }

    #[test]
    fn construction_requires_name_or_payload() {
        let err = PacketBuilder::new(PacketOptions::default()).unwrap_err();
        assert!(err.is_configuration());

        assert!(PacketBuilder::new(PacketOptions::named("Packet")).is_ok());
    }

    #[test]
    fn default_routing_orders_are_strictly_increasing_from_one() {
        let mut b = PacketBuilder::named("Packet").with_id_source(SequenceIdSource::new());
        for i in 0..3 {
            b.add_signer(Signer::email(format!("S{i}"), format!("s{i}@example.com")))
                .unwrap();
        }
        let orders: Vec<u32> = b.signers().iter().filter_map(|s| s.routing_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(b.signers()[0].id.as_deref(), Some("signer-1"));
    }

    #[test]
    fn explicit_routing_order_is_preserved_and_advances_the_default() {
        let mut b = PacketBuilder::named("Packet");
        let mut first = Signer::email("A", "a@example.com");
        first.routing_order = Some(7);
        b.add_signer(first).unwrap();
        b.add_signer(Signer::email("B", "b@example.com")).unwrap();

        assert_eq!(b.signers()[0].routing_order, Some(7));
        assert_eq!(b.signers()[1].routing_order, Some(8));
    }

    #[test]
    fn bad_signer_mapping_leaves_list_untouched() {
        let mut b = PacketBuilder::named("Packet");
        let err = b
            .add_signer(json!({"name": "A", "signer_type": "fax"}))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(b.signers().is_empty());
    }

    #[test]
    fn attachment_content_type_is_inferred_once() {
        let mut b = PacketBuilder::named("Packet");
        b.add_attachment(upload("fileA", "report.pdf")).unwrap();
        b.add_attachment(
            Attachment::Upload(DocumentUpload {
                file: InlineFile::from_bytes("weird.qqq", b"??").with_mimetype("application/x-custom"),
                ..upload("fileB", "weird.qqq")
            }),
        )
        .unwrap();

        let Attachment::Upload(a) = &b.attachments()[0] else {
            panic!("expected upload")
        };
        assert_eq!(a.file.mimetype.as_deref(), Some("application/pdf"));

        // An existing content type is never clobbered.
        let Attachment::Upload(custom) = &b.attachments()[1] else {
            panic!("expected upload")
        };
        assert_eq!(custom.file.mimetype.as_deref(), Some("application/x-custom"));
    }

    #[test]
    fn unresolvable_extension_leaves_content_type_unset() {
        let mut b = PacketBuilder::named("Packet");
        b.add_attachment(upload("fileA", "mystery.qqq")).unwrap();
        let Attachment::Upload(a) = &b.attachments()[0] else {
            panic!("expected upload")
        };
        assert!(a.file.mimetype.is_none());
    }

    #[test]
    fn fill_payload_requires_known_attachment() {
        let mut b = PacketBuilder::named("Packet");
        b.add_attachment(upload("a", "a.pdf")).unwrap();
        b.add_attachment(upload("b", "b.pdf")).unwrap();

        b.add_fill_payload("a", json!({"field1": "value"})).unwrap();
        let err = b.add_fill_payload("c", json!({})).unwrap_err();
        assert!(err.is_validation());
        assert!(!b.fill_payloads().contains_key("c"));

        let payload = b.materialize().unwrap();
        assert_eq!(payload.data.payloads["a"], json!({"field1": "value"}));
    }

    #[test]
    fn materialize_is_idempotent_on_an_unmodified_builder() {
        let mut b = PacketBuilder::named("Packet").with_id_source(SequenceIdSource::new());
        b.add_signer(Signer::email("A", "a@example.com")).unwrap();
        b.add_attachment(upload("fileA", "a.pdf")).unwrap();

        let first = b.materialize().unwrap();
        let second = b.materialize().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_is_independent_of_later_mutation() {
        let mut b = PacketBuilder::named("Packet");
        b.add_attachment(upload("fileA", "a.pdf")).unwrap();
        let snapshot = b.materialize().unwrap();

        b.add_signer(Signer::email("Late", "late@example.com")).unwrap();
        b.add_attachment(CastReference {
            id: "templ".to_string(),
            cast_eid: "cast123".to_string(),
        })
        .unwrap();

        assert!(snapshot.signers.is_empty());
        assert_eq!(snapshot.files.len(), 1);
        assert_eq!(b.materialize().unwrap().files.len(), 2);
    }

    #[test]
    fn prebuilt_payload_passes_through_unchanged() {
        let payload = passthrough_payload();
        let mut b = PacketBuilder::new(PacketOptions {
            payload: Some(payload.clone()),
            ..PacketOptions::default()
        })
        .unwrap();
        b.add_signer(Signer::email("Ignored", "i@example.com")).unwrap();

        assert_eq!(b.materialize().unwrap(), payload);
    }

    #[test]
    fn from_mapping_replays_entities_through_validation() {
        let b = PacketBuilder::from_mapping(json!({
            "name": "Packet",
            "signature_email_subject": "Please sign",
            "is_draft": true,
            "signers": [
                {"name": "A", "email": "a@example.com", "signer_type": "embedded"},
                {"name": "B", "email": "b@example.com"}
            ],
            "files": [
                {"id": "fileA", "title": "Form", "file": {"data": "aGk=", "filename": "form.pdf"}}
            ]
        }))
        .unwrap();

        assert_eq!(b.signers().len(), 2);
        assert_eq!(b.signers()[0].routing_order, Some(1));
        assert_eq!(b.signers()[1].routing_order, Some(2));
        assert!(b.signers().iter().all(|s| s.id.is_some()));

        let Attachment::Upload(a) = &b.attachments()[0] else {
            panic!("expected upload")
        };
        assert_eq!(a.file.mimetype.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn from_mapping_accepts_attachments_key() {
        let b = PacketBuilder::from_mapping(json!({
            "name": "Packet",
            "attachments": [{"id": "t", "cast_eid": "cast1"}]
        }))
        .unwrap();
        assert_eq!(b.attachments()[0].id(), "t");
    }

    #[test]
    fn from_mapping_wraps_nested_errors() {
        let err = PacketBuilder::from_mapping(json!({
            "name": "Packet",
            "signers": [{"name": "A", "signer_type": "fax"}]
        }))
        .unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, QuillError::Import { .. }));
    }

    #[test]
    fn from_mapping_rejects_unknown_keys_and_missing_name() {
        let err = PacketBuilder::from_mapping(json!({"name": "P", "bogus": 1})).unwrap_err();
        assert!(err.is_validation());

        let err = PacketBuilder::from_mapping(json!({"is_test": false})).unwrap_err();
        assert!(matches!(err, QuillError::Import { .. }));
    }

    fn passthrough_payload() -> PacketPayload {
        serde_json::from_value(json!({"name": "prebuilt"})).unwrap()
    }
}
