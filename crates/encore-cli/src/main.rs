mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "encore",
    about = "Newsletter dashboard: engagement metrics, artist discovery and the storyteller demo",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, global = true, env = "ENCORE_ROOT")]
    root: Option<PathBuf>,

    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        /// Port to listen on (defaults to server.port)
        #[arg(long)]
        port: Option<u16>,
        /// Open the dashboard endpoint in a browser
        #[arg(long)]
        open: bool,
    },

    /// Run the storyteller generation demo in the terminal
    Demo {
        /// Step duration multiplier (defaults to demo.speed)
        #[arg(long)]
        speed: Option<f64>,
    },

    /// Engagement totals over recently sent issues
    Metrics {
        /// Window in days (defaults to analytics.default_window_days)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Discovery roster, filtered and sorted
    Artists {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// confidence, growth, listeners or recent
        #[arg(long)]
        sort: Option<String>,
    },

    /// Subscriber list with status counts
    Subscribers {
        #[arg(long)]
        status: Option<String>,
    },

    /// The fixed newsletter lineup and headline totals
    Genres,

    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
        Commands::Demo { speed } => cmd::demo::run(&root, speed, cli.json),
        Commands::Metrics { days } => cmd::metrics::run(&root, days, cli.json),
        Commands::Artists {
            genre,
            status,
            sort,
        } => cmd::artists::run(&root, genre, status, sort, cli.json),
        Commands::Subscribers { status } => cmd::subscribers::run(&root, status, cli.json),
        Commands::Genres => cmd::genres::run(cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
