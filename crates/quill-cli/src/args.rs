use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "quill", version, about = "quill CLI")]
pub struct Cli {
    /// Emit compact JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// API key; falls back to the QUILL_API_KEY environment variable.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Service endpoint override.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Assemble a packet from a JSON mapping and print or send it.
    CreatePacket {
        /// Input path, or '-' for stdin.
        input: String,

        /// Submit the packet instead of printing the assembled payload.
        #[arg(long)]
        send: bool,

        /// File holding a custom response selection fragment.
        #[arg(long)]
        response_selection: Option<String>,
    },

    /// Run a raw operation against the service.
    GqlQuery {
        /// Operation document.
        #[arg(short = 'q', long)]
        query: String,

        /// JSON-encoded variables.
        #[arg(short = 'v', long)]
        variables: Option<String>,
    },
}
