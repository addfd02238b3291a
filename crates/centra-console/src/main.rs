//! Centra console backend
//!
//! Serves console requests over NDJSON on stdin/stdout, plus admin commands.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use centra_console::auth::hash_password;
use centra_console::ipc::{self, ConsoleBackend};
use centra_console::storage::{ConsoleDatabase, ProfileFields};
use centra_console::telemetry::MockTelemetry;
use centra_core::ConsoleConfig;

#[derive(Parser, Debug)]
#[command(name = "centra-console")]
#[command(version, about = "Centra operator console backend")]
struct Args {
    /// Directory holding db-config.json, bot-config.json and vds-config.json.
    #[arg(long, env = "CENTRA_CONFIG_DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set.
    #[arg(long, env = "CENTRA_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve console requests over stdin/stdout (default).
    Serve,

    /// Create an operator account.
    AddUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Rank tier; 8 and above is shown as Project Director.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        rank: i64,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Write default config files if they do not exist yet.
    InitConfig,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Store every VDS sample handed out in the vds_metrics table.
    #[arg(long, env = "CENTRA_PERSIST_VDS_SAMPLES", global = true)]
    persist_vds_samples: bool,

    /// Maximum queued requests before callers wait.
    #[arg(long, default_value_t = 64, global = true)]
    channel_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = &args.log_level;
    centra_core::tracing_init::init_tracing(
        &format!("centra_console={level},centra_core={level}"),
        args.log_json,
    );

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => centra_core::config::default_config_dir()
            .context("Cannot determine data directory; pass --config-dir")?,
    };
    let config = ConsoleConfig::load_or_init(&config_dir)?;

    match args.command {
        None | Some(Command::Serve) => serve(config, args.serve).await,
        Some(Command::AddUser {
            username,
            password,
            rank,
            email,
            phone,
        }) => {
            add_user(
                &config,
                &username,
                &password,
                rank,
                ProfileFields {
                    email: email.as_deref(),
                    phone: phone.as_deref(),
                    profile_image: None,
                },
            )
            .await
        }
        Some(Command::InitConfig) => {
            print_config_dir(&config_dir);
            Ok(())
        }
    }
}

async fn serve(config: ConsoleConfig, args: ServeArgs) -> anyhow::Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        db = %config.database.path.display(),
        "Starting centra-console"
    );

    if !config.bot.is_configured() {
        warn!("Bot credentials are not configured; bot status is simulated");
    }
    if !config.vds.is_configured() {
        warn!(host = %config.vds.host, "VDS access is not configured; metrics are simulated");
    }

    let db = ConsoleDatabase::open(&config.database)
        .await
        .context("Failed to open console database")?;

    let backend =
        ConsoleBackend::new(db, MockTelemetry).with_sample_persistence(args.persist_vds_samples);
    let (handle, backend_task) = ipc::spawn(backend, args.channel_capacity);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    ipc::bridge::serve(handle, stdin, tokio::io::stdout()).await?;

    backend_task.await?;
    info!("Console backend exited");
    Ok(())
}

async fn add_user(
    config: &ConsoleConfig,
    username: &str,
    password: &str,
    rank: i64,
    profile: ProfileFields<'_>,
) -> anyhow::Result<()> {
    let db = ConsoleDatabase::open(&config.database)
        .await
        .context("Failed to open console database")?;

    let hash = hash_password(password)?;
    let user = db
        .create_user(username, &hash, rank, profile)
        .await
        .with_context(|| format!("Failed to create user '{username}'"))?;

    info!(user_id = user.id, "User created");
    print_user_created(user.id, &user.username, &user.rank_title());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_user_created(id: i64, username: &str, title: &str) {
    println!("Created user {username} (id {id}, {title})");
}

#[allow(clippy::print_stdout)]
fn print_config_dir(dir: &std::path::Path) {
    println!("Config files are in {}", dir.display());
}
