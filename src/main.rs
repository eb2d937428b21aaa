/// Betting Monitor: esports listings watcher
///
/// Co dělá:
///   1. Každých `check_interval` sekund stáhne DuelBits + Pinnacle (LoL, CS)
///   2. Klasifikuje ligu / turnaj každého zápasu
///   3. Nové zápasy (dedup podle MatchId) pošle jako digest na Telegram / email
///
/// Konfigurace: config.json (nebo $BETTING_MONITOR_CONFIG), tajné klíče přes .env
///
/// Spuštění:
///   cargo run --bin betting-monitor

use anyhow::Result;
use dotenv::dotenv;
use esports_monitor::config::DEFAULT_CONFIG_PATH;
use esports_monitor::{
    forward_interrupts, AppConfig, DuelbitsAdapter, HttpFetcher, Monitor, PageFetcher, PinnacleAdapter,
};
use logger::EventLogger;
use std::env;
use std::fs::File;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    // Single instance lock
    let lock_file_path = env::temp_dir().join("betting_monitor.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => guard,
        Err(_) => {
            warn!("Another instance of betting-monitor is already running! Exiting.");
            return Ok(());
        }
    };

    let config_path = env::var("BETTING_MONITOR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = AppConfig::load_or_create(&config_path)?;
    config.apply_env();

    let categories = config.categories();
    let interval = config.check_interval();

    let mut platforms = Vec::new();
    if config.duelbits_enabled {
        platforms.push("DuelBits");
    }
    if config.pinnacle_enabled {
        platforms.push("Pinnacle");
    }

    info!("=== Betting Monitor ===");
    info!("Config: {}", config_path);
    info!(
        "Categories: {}",
        categories.iter().map(|c| c.slug()).collect::<Vec<_>>().join(", ")
    );
    info!("Check interval: {}s", interval.as_secs());
    info!("Platforms: {}", if platforms.is_empty() { "none".to_string() } else { platforms.join(", ") });
    info!("Logs: ./logs/");

    if categories.is_empty() {
        warn!("No valid monitored categories, cycles will be empty");
    }

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new()?);
    let mut monitor = Monitor::new(categories, EventLogger::new("logs"), interval);

    if config.duelbits_enabled {
        monitor = monitor.with_adapter(Box::new(DuelbitsAdapter::new(fetcher.clone())?));
    }
    if config.pinnacle_enabled {
        monitor = monitor.with_adapter(Box::new(PinnacleAdapter::new(fetcher.clone())?));
    }
    if monitor.adapter_count() == 0 {
        warn!("Both platforms disabled, nothing will be scraped");
    }

    for sink in notifier::build_sinks(&config.notification_methods) {
        monitor = monitor.with_sink(sink);
    }
    info!("Channels: {:?}", monitor.sink_names());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if forward_interrupts(tokio::signal::ctrl_c, shutdown_tx).await {
            std::process::exit(130);
        }
    });

    monitor.run(shutdown_rx).await;
    info!("Bye.");
    Ok(())
}
