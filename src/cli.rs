use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "job-board", about = "Job marketplace API server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (the default when no command is given)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,
}
