//! Cooccur command-line driver
//!
//! Loads liked-movie histories, reuses or recomputes association rules, and
//! prints recommendations for the first few users.
//!
//! # Pipeline
//!
//! - **Ingestion**: ratings + metadata CSVs into per-user histories
//! - **Mining**: frequent itemsets and rules, skipped when the stored rules
//!   were computed with the current thresholds
//! - **Recommendation**: history-based and last-item-based top N

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cooccur::ingest::{self, UserHistories};
use cooccur::mining::{PatternMiner, RuleGenerator, TransactionSet};
use cooccur::store::StoredRule;
use cooccur::{Config, MiningConfig, Recommender, RuleStore, Thresholds};

fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("═══════════════════════════════════════════════════════════════");
    info!("  Cooccur Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════════════════════════");

    if let Err(err) = run() {
        report_failure(&err);
        return Err(err);
    }

    Ok(())
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    info!("Configuration loaded and validated");

    info!("Loading and grouping ratings...");
    let histories = ingest::load_histories(&config.data)?;

    let thresholds = Thresholds::from_config(&config);
    let store = RuleStore::new(&config.store.rules_path);

    let rules = match store.load_fresh(&thresholds)? {
        Some(rules) => rules,
        None => {
            info!("Mining patterns...");
            let rules = mine_rules(&config.mining, &histories)?;
            store.save(&rules, &thresholds)?;
            rules
        }
    };

    let recommender = Recommender::new(rules);
    print_report(&config, &histories, &recommender);

    Ok(())
}

fn report_failure(err: &anyhow::Error) {
    match err.chain().find_map(|e| e.downcast_ref::<cooccur::Error>()) {
        Some(cause) if cause.is_error_level() => {
            error!(code = cause.error_code(), "Run failed: {:#}", err)
        }
        Some(cause) => warn!(code = cause.error_code(), "Run stopped: {:#}", err),
        None => error!("Run failed: {:#}", err),
    }
}

/// Initialize structured logging with tracing
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cooccur=info,cooccur_engine=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .init();
}

/// Run discovery and rule generation over every user history
fn mine_rules(config: &MiningConfig, histories: &UserHistories) -> anyhow::Result<Vec<StoredRule>> {
    let transactions = TransactionSet::from_histories(
        histories
            .iter()
            .map(|(user, titles)| (*user, titles.iter().cloned())),
    );

    let (frequent, mut metrics) = PatternMiner::new(*config)
        .discover_with_metrics(&transactions)
        .context("frequent itemset discovery failed")?;

    let (rules, generation) = RuleGenerator::new(*config)
        .generate_with_metrics(&frequent, &transactions)
        .context("rule generation failed")?;

    metrics.merge_generation(&generation);
    metrics.log_summary();

    Ok(rules)
}

fn print_report(config: &Config, histories: &UserHistories, recommender: &Recommender<String>) {
    let separator = "-".repeat(80);
    let titles = |recs: Vec<cooccur::Recommendation<String>>| -> Vec<String> {
        recs.into_iter().map(|r| r.item).collect()
    };

    println!("{}", separator);
    println!("{0} RESULTS {0}", "-".repeat(35));
    println!(
        "Minimum support: {:.0} %",
        config.mining.min_support() * 100.0
    );
    println!(
        "Minimum confidence: {:.0} %",
        config.mining.min_confidence() * 100.0
    );
    println!("Rules available: {}", recommender.rules().len());
    println!("{}", separator);

    for (user, history) in histories.iter().take(config.recommendation.demo_users) {
        let Some(last) = history.last() else {
            continue;
        };

        let by_history =
            recommender.recommend_from_history(history, config.recommendation.top_n_history);
        let by_last =
            recommender.recommend_from_last_item(last, history, config.recommendation.top_n_last);

        println!("User {}", user);
        println!("Liked movies: {:?}", history);
        println!("Last liked movie: {}", last);
        println!("Recommended from history: {:?}", titles(by_history));
        println!("Recommended from last movie: {:?}", titles(by_last));
        println!("{}", separator);
    }
}
