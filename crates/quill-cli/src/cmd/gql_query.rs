use anyhow::Result;
use serde_json::Value;

use quill_client::GraphqlRequest;

use crate::args::Cli;
use crate::output;

pub async fn run(cli: &Cli, query: &str, variables: Option<&str>) -> Result<()> {
    let variables: Value = match variables {
        Some(raw) => serde_json::from_str(raw)?,
        None => Value::Object(serde_json::Map::new()),
    };

    let client = super::client(cli)?;
    let data = client
        .execute(GraphqlRequest {
            query: query.to_string(),
            variables,
        })
        .await?;

    output::print(&data)
}
