//! Wire-ready packet payload.
//!
//! `PacketPayload` is the immutable snapshot `PacketBuilder::materialize`
//! produces: it owns deep copies of the signer and attachment lists, so later
//! builder mutation cannot alter a payload that was already returned. The
//! transport serializes it as the request's variables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::attachment::Attachment;
use crate::model::signer::Signer;

/// Per-signer email toggles: one switch for everyone, or an explicit list of
/// signer ids to email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnableEmails {
    All(bool),
    Signers(Vec<String>),
}

/// Auxiliary data block carrying prefill payloads keyed by attachment id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FillData {
    #[serde(default)]
    pub payloads: BTreeMap<String, Value>,
}

fn default_true() -> bool {
    true
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The complete packet-creation request variables.
///
/// Wire names follow the service's conventions, including the
/// non-plain-camelCase `webhookURL` and `mergePDFs`. Snake-case aliases are
/// accepted on deserialization so caller-supplied payload mappings
/// round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketPayload {
    pub name: String,

    #[serde(default, alias = "is_draft")]
    pub is_draft: bool,

    #[serde(default = "default_true", alias = "is_test")]
    pub is_test: bool,

    #[serde(default)]
    pub signers: Vec<Signer>,

    #[serde(default, alias = "attachments")]
    pub files: Vec<Attachment>,

    /// Prefill data for attachments, wrapped as the request's auxiliary
    /// data block.
    #[serde(default)]
    pub data: FillData,

    #[serde(alias = "signature_email_subject", skip_serializing_if = "Option::is_none")]
    pub signature_email_subject: Option<String>,

    #[serde(alias = "signature_email_body", skip_serializing_if = "Option::is_none")]
    pub signature_email_body: Option<String>,

    /// Free-form page options passed through to the service.
    #[serde(default = "empty_object", alias = "signature_page_options")]
    pub signature_page_options: Value,

    #[serde(alias = "signature_provider", skip_serializing_if = "Option::is_none")]
    pub signature_provider: Option<String>,

    #[serde(
        rename = "webhookURL",
        alias = "webhookUrl",
        alias = "webhook_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_url: Option<String>,

    #[serde(alias = "reply_to_name", skip_serializing_if = "Option::is_none")]
    pub reply_to_name: Option<String>,

    #[serde(alias = "reply_to_email", skip_serializing_if = "Option::is_none")]
    pub reply_to_email: Option<String>,

    #[serde(
        rename = "mergePDFs",
        alias = "mergePdfs",
        alias = "merge_pdfs",
        skip_serializing_if = "Option::is_none"
    )]
    pub merge_pdfs: Option<bool>,

    #[serde(alias = "enable_emails", skip_serializing_if = "Option::is_none")]
    pub enable_emails: Option<EnableEmails>,

    #[serde(
        alias = "create_cast_templates_from_uploads",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_cast_templates_from_uploads: Option<bool>,

    #[serde(alias = "duplicate_casts", skip_serializing_if = "Option::is_none")]
    pub duplicate_casts: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_for_irregular_fields() {
        let p = PacketPayload {
            name: "Packet".to_string(),
            is_draft: false,
            is_test: true,
            signers: vec![],
            files: vec![],
            data: FillData::default(),
            signature_email_subject: None,
            signature_email_body: None,
            signature_page_options: empty_object(),
            signature_provider: None,
            webhook_url: Some("https://example.com/hook".to_string()),
            reply_to_name: None,
            reply_to_email: None,
            merge_pdfs: Some(true),
            enable_emails: None,
            create_cast_templates_from_uploads: None,
            duplicate_casts: None,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["webhookURL"], "https://example.com/hook");
        assert_eq!(v["mergePDFs"], true);
        assert_eq!(v["isTest"], true);
        assert_eq!(v["data"]["payloads"], json!({}));
    }

    #[test]
    fn deserialize_defaults_and_aliases() {
        let p: PacketPayload = serde_json::from_value(json!({
            "name": "Packet",
            "webhook_url": "https://example.com/hook",
            "merge_pdfs": false
        }))
        .unwrap();
        assert!(p.is_test);
        assert!(!p.is_draft);
        assert_eq!(p.webhook_url.as_deref(), Some("https://example.com/hook"));
        assert_eq!(p.merge_pdfs, Some(false));
        assert_eq!(p.signature_page_options, json!({}));
    }

    #[test]
    fn enable_emails_accepts_bool_or_list() {
        let a: EnableEmails = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(a, EnableEmails::All(true));
        let b: EnableEmails = serde_json::from_value(json!(["signer-1"])).unwrap();
        assert_eq!(b, EnableEmails::Signers(vec!["signer-1".to_string()]));
    }
}
