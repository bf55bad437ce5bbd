use chrono::{DateTime, Utc};
use confluence_runner::{InMemoryMarket, MarketDataSet, RebalanceHarness, RecordingSink, RunnerError};
use confluence_strategy::{AllocationEngine, StrategyConfig};

fn print_help() {
    eprintln!(
        r#"Confluence - multi-factor allocation engine

USAGE:
    confluence <STRATEGY.json> <MARKET.json> [AS_OF]

ARGUMENTS:
    STRATEGY.json       Strategy configuration
    MARKET.json         Market data (bars, insider filings, ownership,
                        sentiment, ratios, stress readings)
    AS_OF               RFC 3339 timestamp of the interval to run
                        (default: latest bar in MARKET.json)

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    confluence strategy.json market.json
    RUST_LOG=debug confluence strategy.json market.json 2024-06-03T20:00:00Z
"#
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }
    if args.len() < 2 || args.len() > 3 {
        print_help();
        std::process::exit(1);
    }

    log::info!("Loading strategy from: {}", args[0]);
    let config = StrategyConfig::from_file(&args[0])?;
    log::info!("Strategy: {} ({} instruments)", config.name, config.universe.len());

    log::info!("Loading market data from: {}", args[1]);
    let data = MarketDataSet::from_file(&args[1])?;

    let as_of = match args.get(2) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| RunnerError::InvalidTimestamp(raw.clone()))?,
        None => data.latest_bar_time().ok_or(RunnerError::NoMarketData)?,
    };

    let engine = AllocationEngine::new(config).map_err(RunnerError::from)?;
    let market = InMemoryMarket::new(data);
    let harness = RebalanceHarness::new(engine, market.clone(), market);

    let mut sink = RecordingSink::new();
    let report = harness.run_once(as_of, &mut sink);

    for (id, outcome) in &report.outcomes {
        log::info!("  {}: {:?} -> {}", id, outcome.verdict, outcome.weight);
    }
    log::info!(
        "Invested {} / cash {} (regime {:?})",
        report.allocation.total(),
        report.allocation.cash(),
        report.regime
    );

    println!("{}", serde_json::to_string_pretty(&report.allocation)?);
    Ok(())
}
