use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qinfang::booking::{build_chunks, places, BookingClient};
use qinfang::config::AppConfig;
use qinfang::coordinator::{BatchCoordinator, BookingEvent};
use qinfang::scheduler::Scheduler;

#[derive(Parser)]
#[command(
    name = "qinfang",
    version,
    about = "Scheduled practice-room booking sniper for a university facility portal",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Arm the scheduler and run the booking batch
    Run {
        /// Config file path
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Fire immediately, ignoring the configured target time
        #[arg(long)]
        now: bool,
    },

    /// Validate the config and print the chunk plan without booking
    Check {
        /// Config file path
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// List all bookable rooms
    Places,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { config, now } => run(&config, now).await,
        Commands::Check { config } => check(&config),
        Commands::Places => {
            for name in places::place_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "qinfang=debug" } else { "qinfang=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(config_path: &PathBuf, now: bool) -> Result<()> {
    let cfg = AppConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let run_cfg = cfg.run_config()?;
    let chunks = build_chunks(&cfg.requests)?;
    if chunks.is_empty() {
        bail!("no bookable chunks in {}", config_path.display());
    }
    tracing::info!("{} chunk(s) queued", chunks.len());

    let client = BookingClient::new(run_cfg)?;
    let coordinator = Arc::new(BatchCoordinator::new(client));

    let (done_tx, mut done_rx) = tokio::sync::oneshot::channel();
    let mut scheduler = Scheduler::new();
    let worker = Arc::clone(&coordinator);
    scheduler.schedule(&cfg.target_time, now || cfg.start_immediately, move || async move {
        let mut events = worker.spawn(chunks);
        while let Some(event) = events.recv().await {
            match event {
                BookingEvent::Log(line) => println!("{line}"),
                BookingEvent::Popup { level, message } => println!("[{level}] {message}"),
                BookingEvent::Finished => {
                    println!("全部预定结束");
                    break;
                }
            }
        }
        let _ = done_tx.send(());
    })?;

    let latch = scheduler.latch();
    tokio::select! {
        _ = &mut done_rx => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted, stopping batch");
            coordinator.stop();
            scheduler.cancel();
            if latch.is_started() {
                // Loops exit within one backoff interval; wait for the
                // finished signal so the summary still prints.
                let _ = tokio::time::timeout(Duration::from_secs(10), &mut done_rx).await;
            }
        }
    }

    Ok(())
}

fn check(config_path: &PathBuf) -> Result<()> {
    let cfg = AppConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    cfg.run_config()?;
    let chunks = build_chunks(&cfg.requests)?;

    for chunk in &chunks {
        let known = places::facility_id(&chunk.place).is_some();
        let marker = if known { "  " } else { "!!" };
        println!("{marker} {chunk}");
        if !known {
            tracing::warn!("unknown place {:?}: booking would retry forever", chunk.place);
        }
    }

    match Scheduler::delay_until(&cfg.target_time) {
        Ok(delay) if cfg.start_immediately => {
            println!("start: immediately (target {} ignored, {delay:?} away)", cfg.target_time)
        }
        Ok(delay) => println!("start: {} (in {delay:?})", cfg.target_time),
        Err(e) => bail!(e),
    }
    println!("{} chunk(s) ready", chunks.len());
    Ok(())
}
