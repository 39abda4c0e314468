//! CLI entry point for the Disney movies pipeline.
//!
//! Three subcommands run the stages in order: `download` copies the source
//! CSVs, `clean` normalizes them, and `eda` merges the cleaned tables and
//! renders the charts.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use disney_eda::config::{Sources, StagePaths};
use disney_eda::render::{ImageFormat, PlottersRenderer};
use disney_eda::{clean, eda, fetch};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "disney_eda")]
#[command(about = "Download, clean and chart the Disney movies dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the five source tables (URLs or local paths)
    Download(PathArgs),
    /// Clean the raw tables and write them to the output directory
    Clean(PathArgs),
    /// Merge the cleaned tables and render the charts
    Eda {
        #[command(flatten)]
        paths: PathArgs,

        /// Image format for the charts
        #[arg(long, default_value = "png", value_parser = ["png", "svg"])]
        format: String,
    },
}

#[derive(Args)]
struct PathArgs {
    #[arg(long, value_name = "PATH")]
    disney_characters: String,

    #[arg(long, value_name = "PATH")]
    disney_director: String,

    #[arg(long, value_name = "PATH")]
    disney_movies_total_gross: String,

    #[arg(long = "disney-revenue-1991-2016", value_name = "PATH")]
    disney_revenue: String,

    #[arg(long, value_name = "PATH")]
    disney_voice_actors: String,

    /// Directory the stage writes into
    #[arg(long, value_name = "DIR")]
    out_dir: PathBuf,
}

impl From<PathArgs> for StagePaths {
    fn from(args: PathArgs) -> Self {
        StagePaths {
            sources: Sources {
                characters: args.disney_characters,
                director: args.disney_director,
                movies_total_gross: args.disney_movies_total_gross,
                revenue: args.disney_revenue,
                voice_actors: args.disney_voice_actors,
            },
            out_dir: args.out_dir,
        }
    }
}

fn env_filter(var: &str, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(var)
        .from_env_lossy()
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/disney_eda.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("disney_eda.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", LevelFilter::INFO));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = ?e, "Stage failed");
        eprintln!("{}", Cli::command().render_usage());
        drop(file_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Download(args) => fetch::download(&args.into()).await?,
        Commands::Clean(args) => clean::run(&args.into())?,
        Commands::Eda { paths, format } => {
            let format: ImageFormat = format.parse()?;
            eda::run(&paths.into(), format, &PlottersRenderer::default())?;
        }
    }
    Ok(())
}
