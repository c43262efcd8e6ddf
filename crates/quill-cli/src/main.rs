use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod io;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = args::Cli::parse();
    output::init(cli.json);

    cmd::dispatch(cli).await
}
