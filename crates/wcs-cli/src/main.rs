//! WCS command-line tool - config dump and file management tasks

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wcs_client::{ApiResponse, Config, Fmgr, FmgrOptions};

#[derive(Parser, Debug)]
#[command(name = "wcs")]
#[command(about = "Command-line client for WCS object storage file management")]
#[command(version)]
struct Args {
    /// Config file to load
    #[arg(short, long, env = "WCS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, env = "WCS_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective configuration
    DumpConfig,
    /// Move files
    Move(TaskArgs),
    /// Copy files
    Copy(TaskArgs),
    /// Fetch remote resources into storage
    Fetch {
        #[command(flatten)]
        task: TaskArgs,
        /// Overwrite existing files
        #[arg(long)]
        force: Option<String>,
    },
    /// Delete files
    Delete(TaskArgs),
    /// Delete an m3u8 playlist and its segments
    DeleteM3u8(TaskArgs),
    /// Delete everything under a prefix
    DeletePrefix {
        /// Raw request body
        #[arg(long)]
        body: String,
    },
    /// Show the state of a submitted task
    Status {
        persistent_id: String,
    },
}

#[derive(ClapArgs, Debug)]
struct TaskArgs {
    /// Operation list
    #[arg(long)]
    fops: String,

    /// Callback URL for task completion
    #[arg(long)]
    notify_url: Option<String>,

    /// Notify per file (1) or once per task (0)
    #[arg(long)]
    separate: Option<String>,
}

impl TaskArgs {
    fn options(&self) -> FmgrOptions {
        FmgrOptions {
            notify_url: self.notify_url.clone(),
            separate: self.separate.clone(),
            force: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("wcs={},wcs_client={}", log_level, log_level).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // An unreadable config file ends the process
    let config = match Config::instance(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) if e.is_config_read() => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(path) = &args.config {
        tracing::debug!("Using config file {}", path.display());
    }

    let response = match args.command {
        Command::DumpConfig => {
            config.dump_to(std::io::stdout().lock())?;
            return Ok(());
        }
        Command::Move(task) => fmgr(config)?.fmgr_move(&task.fops, task.options()).await?,
        Command::Copy(task) => fmgr(config)?.fmgr_copy(&task.fops, task.options()).await?,
        Command::Fetch { task, force } => {
            let options = FmgrOptions { force, ..task.options() };
            fmgr(config)?.fmgr_fetch(&task.fops, options).await?
        }
        Command::Delete(task) => fmgr(config)?.fmgr_delete(&task.fops, task.options()).await?,
        Command::DeleteM3u8(task) => fmgr(config)?.m3u8_delete(&task.fops, task.options()).await?,
        Command::DeletePrefix { body } => fmgr(config)?.prefix_delete(&body).await?,
        Command::Status { persistent_id } => fmgr(config)?.status(&persistent_id).await?,
    };

    print!("{}", render_response(&response));
    Ok(())
}

fn fmgr(config: &Config) -> anyhow::Result<Fmgr> {
    Ok(Fmgr::from_config(config)?)
}

/// Status code line followed by the body
fn render_response(response: &ApiResponse) -> String {
    format!("{}\n{}\n", response.status, response.body)
}
