use anyhow::Result;
use tracing::debug;

use quill_core::model::attachment::Attachment;
use quill_core::packet::PacketBuilder;

use crate::args::Cli;
use crate::io::input;
use crate::output;

pub async fn run(
    cli: &Cli,
    input_arg: &str,
    send: bool,
    response_selection: Option<&str>,
) -> Result<()> {
    let mapping = input::read_json(input_arg)?;
    let builder = PacketBuilder::from_mapping(mapping)?;

    for attachment in builder.attachments() {
        if let Attachment::Upload(upload) = attachment {
            debug!(
                id = %upload.id,
                mimetype = upload.file.mimetype.as_deref().unwrap_or("unset"),
                "attachment content type"
            );
        }
    }

    let payload = builder.materialize()?;

    let selection = match response_selection {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    if send {
        let client = super::client(cli)?;
        let res = client.create_packet(&payload, selection.as_deref()).await?;
        output::print_labeled("packet created", &res)
    } else {
        output::print_labeled("assembled payload", &payload)
    }
}
