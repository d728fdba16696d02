use market_sim::EngineConfig;
use std::time::Duration;
use ticker_runner::{MarketSession, SessionConfig};

fn print_help() {
    eprintln!(
        r#"Ticker - simulated market price feed

USAGE:
    ticker [OPTIONS]

OPTIONS:
    --config <PATH>       Load engine configuration from JSON file
    --duration <SECS>     Close the market after SECS seconds (default: run until Ctrl-C)
    --help                Print this help message

ENVIRONMENT VARIABLES:
    TICK_INTERVAL_MS      Tick interval in milliseconds (default: 250)
    WALK_SEED             Seed for the price walk RNG
    RUST_LOG              Log level filter (default: info)

EXAMPLES:
    # Run with defaults until Ctrl-C
    ticker

    # Run for 30 seconds with every price move logged
    RUST_LOG=debug ticker --duration 30

    # Reproducible run from a config file
    WALK_SEED=42 ticker --config market.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut duration: Option<Duration> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--duration" | "-d" => {
                i += 1;
                let secs = args.get(i).and_then(|s| s.parse::<u64>().ok());
                match secs {
                    Some(secs) => duration = Some(Duration::from_secs(secs)),
                    None => {
                        eprintln!("Error: --duration requires a whole number of seconds");
                        std::process::exit(1);
                    }
                }
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let engine = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            EngineConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            EngineConfig::default()
        }
    };

    let config = SessionConfig {
        engine,
        duration,
        ..Default::default()
    }
    .apply_env(|name| std::env::var(name).ok())?;

    log::info!(
        "Tick interval: {}ms, walk: {:?}",
        config.engine.tick_interval_ms,
        config.engine.walk.kind
    );

    let session = MarketSession::start(config)?;
    let report = session
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    log::info!(
        "Session finished: {} passes, {} dropped, {} price changes",
        report.stats.passes,
        report.stats.dropped,
        report.tape.price_changes
    );
    for stock in &report.final_stocks {
        log::info!(
            "  {} {} (open {}, low {}, high {}, change {})",
            stock.symbol,
            stock.price,
            stock.day_open,
            stock.day_low,
            stock.day_high,
            stock.change
        );
    }

    Ok(())
}
