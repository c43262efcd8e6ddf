use anyhow::{anyhow, Result};
use quill_client::QuillClient;

use crate::args::{Cli, Command};

mod create_packet;
mod gql_query;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command.clone() {
        Command::CreatePacket {
            input,
            send,
            response_selection,
        } => create_packet::run(&cli, &input, send, response_selection.as_deref()).await,
        Command::GqlQuery { query, variables } => {
            gql_query::run(&cli, &query, variables.as_deref()).await
        }
    }
}

pub(crate) fn client(cli: &Cli) -> Result<QuillClient> {
    let key = match &cli.api_key {
        Some(k) => k.clone(),
        None => std::env::var("QUILL_API_KEY")
            .map_err(|_| anyhow!("no API key: pass --api-key or set QUILL_API_KEY"))?,
    };
    Ok(match &cli.endpoint {
        Some(endpoint) => QuillClient::with_endpoint(key, endpoint),
        None => QuillClient::new(key),
    })
}
