use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gridforge", version, about = "Find minimal integer grids satisfying a constraint document")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve a document and print the minimal grid
    Solve {
        /// Path to the constraint document
        file: PathBuf,

        /// Configuration file (TOML, or YAML by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Solver time limit in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Treat A[1][1] as the top-left cell
        #[arg(long)]
        one_based: bool,
    },

    /// Parse a document and print it in canonical form
    Parse {
        /// Path to the constraint document
        file: PathBuf,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },
}
