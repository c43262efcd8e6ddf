//! quill-core
//!
//! Core primitives for quill:
//! - Signer and attachment models for e-signature packets
//! - The stateful `PacketBuilder` (defaulting, cross-reference validation)
//! - Wire payload materialization (`PacketPayload`)
//! - Packet-creation query template with a substitutable response selection
//!
//! The core crate performs no network or filesystem I/O. File bytes are
//! assumed resident in memory or referenced by id; transmission belongs to
//! `quill-client`. Anything nondeterministic (id generation) is injectable
//! via the `IdSource` trait.

pub mod errors;
pub mod ident;
pub mod mime;
pub mod model;
pub mod packet;
pub mod payload;
pub mod query;

pub use crate::errors::{QuillError, QuillResult};

/// Identifier prefixes used when the builder assigns ids.
pub mod prefix {
    pub const SIGNER: &str = "signer";
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::ident::{IdSource, RandomIdSource, SequenceIdSource};
    pub use crate::model::attachment::{
        Attachment, CastReference, DocumentUpload, FieldRect, InlineFile, SignableField,
    };
    pub use crate::model::signer::{SignatureMode, Signer, SignerField, SignerKind};
    pub use crate::packet::{AttachmentInput, PacketBuilder, PacketOptions, SignerInput};
    pub use crate::payload::{EnableEmails, FillData, PacketPayload};
    pub use crate::{QuillError, QuillResult};
}
