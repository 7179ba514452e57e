use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notez")]
#[command(about = "Turn lecture files into searchable study notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Act as this user (overrides NOTEZ_OWNER and the config file)
    #[arg(long, global = true)]
    pub owner: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a note from files and/or typed text
    #[command(alias = "n")]
    Add {
        /// Files to ingest
        files: Vec<PathBuf>,

        /// Note title (suggested from the file names when omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Text to put before the ingested content
        #[arg(long)]
        text: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Ingest files and show the resulting draft without saving it
    Preview {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// List notes
    #[command(alias = "ls")]
    List {
        /// Search term (title, content or tags)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// View a note
    #[command(alias = "v")]
    View {
        /// Index from `list`, or an id prefix
        selector: String,

        /// Print the stored markup instead of rendering it
        #[arg(long)]
        raw: bool,
    },

    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Index from `list`, or an id prefix
        selector: String,
    },

    /// Render a markdown file (or stdin) to HTML
    Render {
        file: Option<PathBuf>,
    },
}
