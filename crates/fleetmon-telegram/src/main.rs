//! Fleetmon binary.
//!
//! Start the monitor with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p fleetmon-telegram -- --config fleet.json
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

use fleetmon_adapters::{power_control_for, status_source_for, MessagingSink, PowerControl};
use fleetmon_models::{ChatTarget, ProcessMeta};
use fleetmon_runtime::{
    CommandLoop, FleetCache, FleetPoller, FleetRuntime, Notifier, PollTarget,
};
use fleetmon_telegram::{load_fleet_file, TelegramCommandSource, TelegramError, TelegramSink};

/// Fleetmon - 3D printer fleet monitor with Telegram notifications
#[derive(Parser, Debug)]
#[command(name = "fleetmon")]
#[command(about = "Monitor a fleet of 3D printers and report via Telegram")]
struct Args {
    /// Path to the fleet file (JSON)
    #[arg(short, long, default_value = "fleet.json")]
    config: PathBuf,

    /// Poll interval override in seconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "fleetmon_telegram=info,fleetmon_runtime=info,fleetmon_adapters=info,teloxide=warn",
        1 => "fleetmon_telegram=debug,fleetmon_runtime=debug,fleetmon_adapters=debug,teloxide=info",
        2 => "fleetmon_telegram=trace,fleetmon_runtime=trace,fleetmon_adapters=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load the fleet definition
    let fleet_file = load_fleet_file(&args.config)?;
    let mut config = fleet_file.fleet_config();
    if let Some(secs) = args.interval {
        config = config.with_poll_interval(Duration::from_secs(secs));
    }

    let token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| TelegramError::NoToken)?;
    let chat_id = fleet_file
        .chat_id
        .or_else(|| {
            std::env::var("TELEGRAM_CHAT_ID")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .ok_or(TelegramError::NoChat)?;

    let printers = Arc::new(fleet_file.printers);
    let cache = Arc::new(FleetCache::new(printers.iter().map(|p| p.name.clone())));
    let meta = Arc::new(ProcessMeta::collect(env!("CARGO_PKG_VERSION"), &printers));

    // Build per-printer adapters
    let mut targets = Vec::new();
    let mut plugs: HashMap<String, Box<dyn PowerControl>> = HashMap::new();
    for printer in printers.iter() {
        let source = status_source_for(printer, config.adapter_timeout)?;
        targets.push(PollTarget::new(printer.clone(), source));

        if let Some(plug) = power_control_for(printer)? {
            plugs.insert(printer.name.clone(), plug);
        }
    }

    // Telegram transport
    let bot = Bot::new(token);
    let sink: Arc<dyn MessagingSink> = Arc::new(TelegramSink::new(bot.clone()));
    let command_source = TelegramCommandSource::new(bot, config.inbound_poll_timeout);

    let mut runtime = FleetRuntime::new(config.clone());

    let poller = FleetPoller::new(
        targets,
        Arc::clone(&cache),
        &config,
        runtime.shutdown_receiver(),
    );
    let command_loop = CommandLoop::new(
        Box::new(command_source),
        Arc::clone(&sink),
        Arc::clone(&cache),
        Arc::clone(&printers),
        plugs,
        Arc::clone(&meta),
        runtime.shutdown_receiver(),
    );
    let notifier = Notifier::new(Arc::clone(&sink), ChatTarget(chat_id));

    println!("\n🖨️ Fleetmon v{}", meta.version);
    println!("   Printers: {}", meta.printer_count);
    println!(
        "   Poll interval: {}s",
        config.poll_interval.as_secs()
    );
    println!("\n   Press Ctrl+C to stop\n");

    runtime.start(
        poller,
        command_loop,
        notifier,
        Arc::clone(&printers),
        Arc::clone(&cache),
        Arc::clone(&meta),
    )?;

    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await?;

    Ok(())
}
