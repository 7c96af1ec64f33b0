mod banner;
mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, RunFlags};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jrw",
    about = "Build Docker images and run test suites for jRetireWise",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from jrw.yaml or .git/)
    #[arg(long, global = true, env = "JRW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Print the planned commands without running them
    #[arg(long, global = true, short = 'n')]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build Docker images: local, k8s, or all (default: all)
    Build {
        /// One of: local, k8s, all
        #[arg(allow_hyphen_values = true)]
        target: Option<String>,

        /// Anything after the target is ignored
        #[arg(hide = true)]
        extra: Vec<String>,
    },

    /// Run unit and integration tests, optionally followed by e2e tests
    Test {
        /// Bring up the compose environment and run end-to-end tests afterwards
        #[arg(long)]
        e2e: bool,
    },

    /// Inspect and validate jrw.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let flags = RunFlags {
        json: cli.json,
        dry_run: cli.dry_run,
    };

    let result = match cli.command {
        Commands::Build { target, extra } => {
            if !extra.is_empty() {
                tracing::debug!(?extra, "ignoring extra build arguments");
            }
            cmd::build::run(&root, target.as_deref(), flags)
        }
        Commands::Test { e2e } => cmd::test::run(&root, e2e, flags),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
