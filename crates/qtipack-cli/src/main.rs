//! qtipack CLI — compile JSON question banks into QTI 2.1 content packages.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::PackageFlags;

#[derive(Parser)]
#[command(
    name = "qtipack",
    version,
    about = "Compile multiple-answer question banks into QTI 2.1 packages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a zip package from a question bank
    Build {
        /// Path to the JSON question bank
        #[arg(long)]
        bank: PathBuf,

        /// Archive to write (default: from config, else qtipack-package.zip)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the build summary as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        flags: PackageFlags,
    },

    /// Check a question bank without writing a package
    Validate {
        /// Path to the JSON question bank
        #[arg(long)]
        bank: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        flags: PackageFlags,
    },

    /// Create a starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qtipack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            bank,
            output,
            config,
            json,
            flags,
        } => commands::build::execute(bank, output, config, json, flags),
        Commands::Validate {
            bank,
            config,
            flags,
        } => commands::validate::execute(bank, config, flags),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
