use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "liftbook")]
#[command(about = "Terminal workout journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the configured journal service
    Run,
    /// Run in dev mode with local in-memory data
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
    /// Remember the journal author without opening the UI
    SetAuthor {
        /// Author name; stored lowercased
        name: String,
    },
}
