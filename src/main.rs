use blog_bootstrap::bootstrap::{provision, serve};
use blog_bootstrap::config::Config;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "blog-bootstrap")]
#[command(about = "Provision and serve the blog application", long_about = None)]
struct Cli {
    /// Optional TOML file merged beneath the environment
    #[arg(short, long, env = "BLOG_CONFIG", default_value = "blog.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and seed the admin account
    Provision,
    /// Ensure the schema and serve HTTP on 0.0.0.0:$PORT
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        host = %cfg.host,
        port = ?cfg.port,
        loglevel = %cfg.loglevel,
        admin_username = %cfg.admin_username
    );

    let result = match cli.command {
        Commands::Provision => provision(&cfg).await.map(|_| ()),
        Commands::Serve => serve(&cfg).await,
    };
    if let Err(e) = &result {
        error!(error = %e, "bootstrap step failed");
    }
    result?;
    Ok(())
}
