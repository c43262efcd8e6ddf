//! quill data models.
//!
//! Strongly-typed representations of the entities a packet carries:
//! signers (with their field assignments) and attachments (inline uploads or
//! references to already-uploaded files).
//!
//! Notes on serde:
//! - Wire names are the signing service's camelCase convention, with explicit
//!   renames where the service deviates from plain camelCase (`signerType`,
//!   `castEid`).
//! - Deserialization additionally accepts snake_case aliases so raw-mapping
//!   imports round-trip caller dictionaries unchanged.
//! - Unknown keys in entity mappings are rejected; the builder surfaces them
//!   as validation errors.

pub mod attachment;
pub mod signer;

pub use attachment::{Attachment, CastReference, DocumentUpload, FieldRect, InlineFile, SignableField};
pub use signer::{SignatureMode, Signer, SignerField, SignerKind};
