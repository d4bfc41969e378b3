//! dataset-runner: headless generator for the synthetic merchant dataset.
//!
//! Usage:
//!   dataset-runner --seed 42 --count 1000 --db merchants.db
//!   dataset-runner --config generator.json --as-of 2024-06-30
//!   dataset-runner --count 200 --json

use anyhow::Result;
use chrono::NaiveDate;
use paysynth_core::{
    config::GeneratorConfig,
    engine::{new_run_id, Dataset, GeneratorEngine},
    store::DatasetStore,
};
use std::env;

#[derive(serde::Serialize)]
struct RunSummary {
    run_id: String,
    seed: u64,
    as_of: String,
    merchants: i64,
    feature_rows: usize,
    transactions: i64,
    interactions: i64,
    loans: i64,
    status_mix: Vec<(String, i64)>,
    qr_rate: f64,
    soundbox_rate: f64,
    swipe_rate: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let as_of = match arg_value(&args, "--as-of") {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("--as-of '{s}': {e}"))?,
        None => chrono::Local::now().date_naive(),
    };
    let mut config = match arg_value(&args, "--config") {
        Some(path) => GeneratorConfig::load(path, as_of)?,
        None => GeneratorConfig::with_as_of(as_of),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.merchant_count = parse_arg(&args, "--count", config.merchant_count);
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let json_mode = args.iter().any(|a| a == "--json");

    if !json_mode {
        println!("Merchant dataset generator");
        println!("  seed:      {}", config.seed);
        println!("  count:     {}", config.merchant_count);
        println!("  as_of:     {}", config.as_of);
        println!("  db:        {db}");
        println!();
    }

    let (engine, store, run_id) = start_run(config, db)?;
    let dataset = engine.run()?;
    dataset.persist(&store, &run_id)?;
    log::info!("run {run_id} complete: {} merchants", dataset.merchants.len());

    if json_mode {
        let summary = build_summary(&store, &run_id, &engine.config, &dataset)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&store, &run_id, &dataset)?;
    }
    Ok(())
}

/// Validate the config, then open the store and record the run.
/// Bad catalogs and windows fail before the database is touched.
fn start_run(config: GeneratorConfig, db: &str) -> Result<(GeneratorEngine, DatasetStore, String)> {
    let engine = GeneratorEngine::new(config)?;

    let store = DatasetStore::open(db)?;
    store.migrate()?;

    let run_id = new_run_id();
    let cfg = &engine.config;
    store.insert_run(&run_id, cfg.seed, cfg.merchant_count, cfg.as_of, env!("CARGO_PKG_VERSION"))?;
    Ok((engine, store, run_id))
}

fn build_summary(
    store: &DatasetStore,
    run_id: &str,
    config: &GeneratorConfig,
    dataset: &Dataset,
) -> Result<RunSummary> {
    let (qr_rate, soundbox_rate, swipe_rate) = store.adoption_rates(run_id)?;
    Ok(RunSummary {
        run_id: run_id.to_string(),
        seed: config.seed,
        as_of: config.as_of.to_string(),
        merchants: store.merchant_count(run_id)?,
        feature_rows: dataset.feature_usage.len(),
        transactions: store.txn_count(run_id)?,
        interactions: store.interaction_count(run_id)?,
        loans: store.loan_count(run_id)?,
        status_mix: store.status_counts(run_id)?,
        qr_rate,
        soundbox_rate,
        swipe_rate,
    })
}

fn print_summary(store: &DatasetStore, run_id: &str, dataset: &Dataset) -> Result<()> {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {run_id}");
    println!("  merchants:      {}", store.merchant_count(run_id)?);
    println!("  feature rows:   {}", dataset.feature_usage.len());
    println!("  transactions:   {}", store.txn_count(run_id)?);
    println!("  interactions:   {}", store.interaction_count(run_id)?);
    println!("  loans:          {}", store.loan_count(run_id)?);

    println!();
    println!("=== STATUS MIX ===");
    for (status, count) in store.status_counts(run_id)? {
        println!("  {status:<10} {count}");
    }

    let (qr, soundbox, swipe) = store.adoption_rates(run_id)?;
    println!();
    println!("=== ADOPTION ===");
    println!("  QR displayed:   {:.1}%", qr * 100.0);
    println!("  Soundbox:       {:.1}%", soundbox * 100.0);
    println!("  Swipe machine:  {:.1}%", swipe * 100.0);

    println!();
    println!("=== PAYMENT METHODS ===");
    for (method, count) in store.payment_method_counts(run_id)? {
        println!("  {method:<14} {count}");
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
