//! Marksheet server and batch CLI
//!
//! `serve` runs a small HTTP front end: upload a roster spreadsheet, get back
//! a zip of one PDF marksheet per student. `generate` runs the same batch
//! offline against a file on disk.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::{Args, Parser, Subcommand};
use marksheet_core::MarksheetConfig;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod generate;
mod state;

use api::{handle_health, handle_index, handle_upload};
use state::AppState;

/// Command-line interface for the marksheet tool
#[derive(Parser, Debug)]
#[command(name = "marksheet")]
#[command(about = "Generate student marksheet PDFs from a spreadsheet roster")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the upload server
    Serve(ServeArgs),
    /// Generate marksheets from a roster on disk
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Where uploaded rosters are stored
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Where generated marksheets and archives are written
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,

    /// TOML file with subjects, grading and layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Background template image (PNG), overrides the config
    #[arg(long)]
    template: Option<PathBuf>,

    /// Largest accepted upload in megabytes
    #[arg(long, default_value = "16")]
    max_upload_mb: usize,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Roster spreadsheet (xlsx, xls, ods)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for the PDFs
    #[arg(short, long)]
    pub output: PathBuf,

    /// TOML file with subjects, grading and layout
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Background template image (PNG), overrides the config
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Skip zipping the generated documents
    #[arg(long)]
    pub no_archive: bool,
}

/// Load the configuration file if one is given, then apply a template override
pub fn load_config(
    config: Option<&Path>,
    template: Option<PathBuf>,
) -> anyhow::Result<MarksheetConfig> {
    let mut loaded = match config {
        Some(path) => MarksheetConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MarksheetConfig::default(),
    };
    if let Some(template) = template {
        loaded.template_image = template;
    }
    Ok(loaded)
}

/// Router with every route and middleware layer
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/upload", post(handle_upload))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Generate(args) => generate::run(args),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.template)?;
    let state = AppState::new(config, args.upload_dir, args.output_dir)?;

    info!(
        template = %state.config.template_image.display(),
        subjects = state.config.subjects.len(),
        "Template loaded"
    );

    let app = router(state, args.max_upload_mb * 1024 * 1024);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Upload limit: {} MB", args.max_upload_mb);

    axum::serve(listener, app).await?;

    Ok(())
}
