//! Packet-creation query template.
//!
//! The request document is fixed text with exactly one substitution point:
//! the response selection. The document itself is full of literal braces, so
//! substitution is positional on a non-brace placeholder token rather than
//! brace-based templating. No parsing of the document happens here; this is
//! purely textual assembly consumed by the transport.

/// Placeholder token the response selection replaces. Chosen so it can never
/// collide with the document's literal braces.
const RESPONSE_SELECTION_SLOT: &str = "--response-selection--";

/// Default response selection: packet identity plus the nested document-group
/// block with its file and signer status details. Callers may substitute
/// their own selection.
pub const DEFAULT_RESPONSE_SELECTION: &str = "\
{
  eid
  name
  detailsURL
  documentGroup {
    eid
    status
    files
    signers {
      eid
      aliasId
      routingOrder
      name
      email
      status
      signActionType
    }
  }
}";

const CREATE_PACKET_MUTATION: &str = "\
mutation CreateEtchPacket (
    $name: String,
    $files: [EtchFile!],
    $isDraft: Boolean,
    $isTest: Boolean,
    $mergePDFs: Boolean,
    $signatureEmailSubject: String,
    $signatureEmailBody: String,
    $signatureProvider: String,
    $signaturePageOptions: JSON,
    $signers: [JSON!],
    $webhookURL: String,
    $replyToName: String,
    $replyToEmail: String,
    $data: JSON,
    $enableEmails: JSON,
    $createCastTemplatesFromUploads: Boolean,
    $duplicateCasts: Boolean=false,
  ) {
    createEtchPacket (
      name: $name,
      files: $files,
      isDraft: $isDraft,
      isTest: $isTest,
      mergePDFs: $mergePDFs,
      signatureEmailSubject: $signatureEmailSubject,
      signatureEmailBody: $signatureEmailBody,
      signatureProvider: $signatureProvider,
      signaturePageOptions: $signaturePageOptions,
      signers: $signers,
      webhookURL: $webhookURL,
      replyToName: $replyToName,
      replyToEmail: $replyToEmail,
      data: $data,
      enableEmails: $enableEmails,
      createCastTemplatesFromUploads: $createCastTemplatesFromUploads,
      duplicateCasts: $duplicateCasts
    )
        --response-selection--
  }
";

/// The packet-creation document with the given response selection spliced in
/// (the default selection when `None`).
pub fn mutation_document(response_selection: Option<&str>) -> String {
    CREATE_PACKET_MUTATION.replace(
        RESPONSE_SELECTION_SLOT,
        response_selection.unwrap_or(DEFAULT_RESPONSE_SELECTION),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_is_spliced_in() {
        let doc = mutation_document(None);
        assert!(doc.contains("createEtchPacket ("));
        assert!(doc.contains("detailsURL"));
        assert!(doc.contains("signActionType"));
        assert!(!doc.contains(RESPONSE_SELECTION_SLOT));
    }

    #[test]
    fn custom_selection_replaces_only_the_slot() {
        let doc = mutation_document(Some("{ eid }"));
        assert!(doc.contains("{ eid }"));
        assert!(!doc.contains("signActionType"));
        // Literal braces of the document survive substitution untouched.
        assert_eq!(doc.matches("mutation CreateEtchPacket").count(), 1);
        assert!(doc.contains("duplicateCasts: $duplicateCasts"));
    }
}
