//! Signer model.
//!
//! A signer is one signing party: identity (name, email, or an external
//! alias), a routing position in the signing sequence, a kind tag restricted
//! to embedded/email, and the ordered field assignments pointing into
//! attachments.

use serde::{Deserialize, Serialize};

use crate::errors::{QuillError, QuillResult};

/// How a signer participates in the flow.
///
/// `Email` signers are contacted by the service; `Embedded` signers sign
/// inside the caller's own UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerKind {
    Embedded,
    #[default]
    Email,
}

impl SignerKind {
    pub fn parse(s: &str) -> QuillResult<Self> {
        match s {
            "embedded" => Ok(Self::Embedded),
            "email" => Ok(Self::Email),
            _ => Err(QuillError::validation(format!(
                "signer kind must be 'embedded' or 'email', got '{s}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Email => "email",
        }
    }
}

/// How a signature is collected from the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    Draw,
    Text,
}

/// One field assignment: a signable field inside a specific attachment,
/// assigned to this signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignerField {
    #[serde(alias = "file_id")]
    pub file_id: String,
    #[serde(alias = "field_id")]
    pub field_id: String,
}

/// A signing party and the fields assigned to them.
///
/// `id` and `routing_order` may be left unset; the packet builder assigns
/// them on insertion. Once set, an id is never reassigned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Signer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// External alias for the signer, when the caller tracks identity itself.
    #[serde(alias = "alias_id", skip_serializing_if = "Option::is_none")]
    pub alias_id: Option<String>,

    /// Position in the signing sequence. Ties are broken by list position on
    /// the service side; the builder only ever assigns strictly increasing
    /// values.
    #[serde(alias = "routing_order", skip_serializing_if = "Option::is_none")]
    pub routing_order: Option<u32>,

    #[serde(rename = "signerType", alias = "signer_type")]
    pub kind: SignerKind,

    pub fields: Vec<SignerField>,

    #[serde(alias = "signature_mode", skip_serializing_if = "Option::is_none")]
    pub signature_mode: Option<SignatureMode>,

    /// Require the signer to click each field rather than accepting the
    /// document in one action.
    #[serde(alias = "accept_each_field", skip_serializing_if = "Option::is_none")]
    pub accept_each_field: Option<bool>,

    /// Where the signer lands after completing their action.
    #[serde(alias = "redirect_url", skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl Signer {
    /// A minimal email signer with no field assignments yet.
    pub fn email(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            kind: SignerKind::Email,
            ..Self::default()
        }
    }

    pub fn with_field(mut self, file_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        self.fields.push(SignerField {
            file_id: file_id.into(),
            field_id: field_id.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_parse_round_trip() {
        assert_eq!(SignerKind::parse("embedded").unwrap(), SignerKind::Embedded);
        assert_eq!(SignerKind::parse("email").unwrap().as_str(), "email");
        assert!(SignerKind::parse("fax").unwrap_err().is_validation());
    }

    #[test]
    fn mapping_accepts_snake_case_aliases() {
        let s: Signer = serde_json::from_value(json!({
            "name": "Jackie",
            "email": "jackie@example.com",
            "signer_type": "embedded",
            "routing_order": 3,
            "fields": [{"file_id": "fileA", "field_id": "sign1"}]
        }))
        .unwrap();
        assert_eq!(s.kind, SignerKind::Embedded);
        assert_eq!(s.routing_order, Some(3));
        assert_eq!(s.fields[0].file_id, "fileA");
    }

    #[test]
    fn mapping_defaults_kind_to_email() {
        let s: Signer = serde_json::from_value(json!({"name": "A"})).unwrap();
        assert_eq!(s.kind, SignerKind::Email);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let r = serde_json::from_value::<Signer>(json!({"signerType": "carrier-pigeon"}));
        assert!(r.is_err());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let s = Signer::email("A", "a@example.com").with_field("f", "sig");
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["signerType"], "email");
        assert_eq!(v["fields"][0]["fileId"], "f");
        assert!(v.get("routingOrder").is_none());
    }
}
