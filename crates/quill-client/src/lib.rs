//! quill-client
//!
//! Transport boundary for quill packets. This crate:
//! - assembles the wire operation (query document + serialized variables)
//! - lifts inline attachment bytes into out-of-band multipart parts, keyed by
//!   a file-map of paths into the variables structure
//! - submits the request over HTTP, authenticating with the caller's API key
//!
//! Request assembly is separated from submission: `MultipartPlan` can be
//! built and inspected without any network configured, in the same spirit as
//! building instructions without a transport.

pub mod client;
pub mod request;

pub use client::{QuillClient, DEFAULT_ENDPOINT};
pub use request::{create_packet_request, FilePart, GraphqlRequest, MultipartPlan};
