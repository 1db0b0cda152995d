mod copy;
mod fields;
mod header;
mod logging;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use ffv::io::WordSize;

use crate::copy::exec_copy;
use crate::fields::exec_fields;
use crate::header::exec_header;
use crate::logging::init_logging;

#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Width of every word in the file, in bytes.
    #[arg(short, long, global = true, default_value = "8")]
    word_size: WordSize,

    /// Log every layout decision and field offset.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Print the named items of the fixed length header.
    Header {
        file: PathBuf,

        /// Include items that are unset.
        #[arg(short, long)]
        all: bool,
    },
    /// List the LOOKUP entries and the shape of their payloads.
    Fields {
        file: PathBuf,

        /// Decode every payload, reporting fields that cannot be read.
        #[arg(short, long)]
        decode: bool,
    },
    /// Rewrite a file through the writer, decoding every payload.
    Copy { file: PathBuf, output: PathBuf },
}

impl Commands {
    fn file_path(&self) -> &PathBuf {
        match self {
            Commands::Header { file, .. }
            | Commands::Fields { file, .. }
            | Commands::Copy { file, .. } => file,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = cli.command.file_path();
    if !std::fs::exists(path)? {
        Cli::command()
            .error(
                clap::error::ErrorKind::Io,
                format!("File '{}' does not exist.", path.display()),
            )
            .exit()
    }

    match cli.command {
        Commands::Header { file, all } => exec_header(file, cli.word_size, all)?,
        Commands::Fields { file, decode } => exec_fields(file, cli.word_size, decode)?,
        Commands::Copy { file, output } => exec_copy(file, output, cli.word_size)?,
    };

    Ok(())
}
