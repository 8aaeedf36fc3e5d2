use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stringsync_cli::{
    config::{DEFAULT_CONFIG_FILE, FileConfig, Overrides, Settings},
    dump::{DumpFrom, run_dump_command},
    sync::{Direction, SyncOptions, run_sync_command},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Project directory holding the `<locale>.lproj` folders
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Workbook directory holding one CSV file per sheet
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    /// Credentials file: `<accountId> <spreadsheetId>` on one line
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Log every file read and written
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy project sources into the workbook, merging with what the sheets hold.
    Push {
        /// Only copy this source (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,
    },

    /// Copy workbook sheets into the project.
    Pull {
        /// Only copy this source (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Only update keys already present in project files, keeping comments and layout
        #[arg(long)]
        update_existing: bool,
    },

    /// Print sources as JSON.
    Dump {
        /// Storage to read from
        #[arg(long, value_enum)]
        from: DumpFrom,

        /// Only print this source (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    let file = FileConfig::load(&args.config)?;
    let settings = Settings::resolve(
        file,
        Overrides {
            project: args.project,
            workbook: args.workbook,
            credentials: args.credentials,
        },
    )?;

    match args.commands {
        Commands::Push { sources } => run_sync_command(
            &settings,
            SyncOptions {
                direction: Direction::Push,
                sources,
                update_existing: false,
            },
        ),
        Commands::Pull {
            sources,
            update_existing,
        } => run_sync_command(
            &settings,
            SyncOptions {
                direction: Direction::Pull,
                sources,
                update_existing,
            },
        ),
        Commands::Dump { from, sources } => run_dump_command(&settings, from, sources),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
