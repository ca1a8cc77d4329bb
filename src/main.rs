#![forbid(unsafe_code)]

mod config;
mod logging;
mod pak;
mod ui;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{PackConfig, DEFAULT_LEVEL};

#[derive(Debug, Parser)]
#[command(
    name = "pakker",
    version,
    about = "Packs files and prepends them with \"Pak\\x1b\". Files that do not compress are copied."
)]
struct Cli {
    /// Log every per-file decision.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Input file, folder, or wildcard pattern (`?`, `*` in the last segment).
    source: String,
    /// Output file or folder. No wildcards.
    destination: String,
    /// Recurse into subfolders; output folders are created as needed.
    #[arg(short, long, default_value_t = false)]
    recursive: bool,
    /// Test file dates; skip a file when its output is newer.
    #[arg(short = 't', long, default_value_t = false)]
    test_dates: bool,
    /// File of names to exclude. Entries are name prefixes without a path.
    #[arg(short, long)]
    exceptions: Option<PathBuf>,
}

impl RunArgs {
    fn config(&self, verbose: bool) -> PackConfig {
        PackConfig {
            recursive: self.recursive,
            test_dates: self.test_dates,
            verbose,
            exceptions: self.exceptions.clone(),
            ..PackConfig::default()
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pack matching files into the output file or folder.
    Pack {
        #[command(flatten)]
        run: RunArgs,
        /// Zstd level (1..=22).
        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        level: i32,
    },

    /// Restore packed files; unpacked files are copied.
    Unpack {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Show whether each matching file is packed.
    List {
        source: String,
        #[arg(short, long, default_value_t = false)]
        recursive: bool,
    },

    /// Check that every matching packed file decodes.
    Verify {
        source: String,
        #[arg(short, long, default_value_t = false)]
        recursive: bool,
    },

    /// Interactive wizard for a pack run (terminal).
    Ui,
}

fn run(cli: Cli) -> pak::PakResult<()> {
    let verbose = cli.verbose;
    match cli.cmd {
        Command::Pack { run, level } => {
            let config = run.config(verbose).with_level(level);
            pak::pack(&run.source, &run.destination, &config).map(|_| ())
        }
        Command::Unpack { run } => {
            let config = run.config(verbose);
            pak::unpack(&run.source, &run.destination, &config).map(|_| ())
        }
        Command::List { source, recursive } => {
            let config = PackConfig {
                recursive,
                verbose,
                ..PackConfig::default()
            };
            pak::list(&source, &config)
        }
        Command::Verify { source, recursive } => {
            let config = PackConfig {
                recursive,
                verbose,
                ..PackConfig::default()
            };
            pak::verify(&source, &config)
        }
        Command::Ui => ui::run(verbose),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
