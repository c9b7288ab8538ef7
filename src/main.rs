//! Strategy Migrator
//!
//! Run with: cargo run -- discover
//!           cargo run -- generate --template script/batchs/template.json

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use console::style;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strategy_migrator::artifact::{
    self, DEFAULT_BATCH_DIR, DEFAULT_BATCH_PREFIX, DEFAULT_POOL_LIST,
};
use strategy_migrator::audit::RewardDistributorAudit;
use strategy_migrator::batch::{chunk, BatchTemplate, MigrationBatchBuilder};
use strategy_migrator::chain::RpcChainReader;
use strategy_migrator::discovery::PoolDiscovery;
use strategy_migrator::Config;

#[derive(Parser)]
#[command(name = "migrator", version, about = "Move Curve pools to the new locker strategy")]
struct Cli {
    /// TOML configuration file (environment and .env otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Snapshot the registry and write the pools to migrate
    Discover {
        #[arg(long, default_value = DEFAULT_POOL_LIST)]
        out: PathBuf,
    },
    /// Build multisig batches from a pool list (no RPC access)
    Generate {
        #[arg(long, default_value = DEFAULT_POOL_LIST)]
        pools: PathBuf,
        /// Transaction-builder document to copy into every batch
        #[arg(long)]
        template: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_BATCH_DIR)]
        out_dir: PathBuf,
        #[arg(long, default_value = DEFAULT_BATCH_PREFIX)]
        prefix: String,
    },
    /// List extra reward tokens not yet distributed by the new strategy
    AuditRewards {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🔀 STRATEGY MIGRATOR - Curve Locker").cyan().bold()
    );
    println!(
        "{}",
        style("    Discover | Generate | Audit").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    Ok(config)
}

async fn discover(config: &Config, out: PathBuf) -> Result<()> {
    let settings = config.discovery_settings()?;
    let reader = RpcChainReader::connect(&config.rpc_url, config.rpc_timeout()?)?;

    println!("{}", style("Reading gauge registry...").blue());
    let start = Instant::now();
    let report = PoolDiscovery::new(&reader, settings).run().await?;
    info!("Registry scanned in {:?}", start.elapsed());

    artifact::write_pool_list(&out, &report.descriptors)?;

    println!();
    println!("  {}", report.summary());
    println!(
        "  {} {}",
        style("✓").green(),
        style(format!("{} pools written to {}", report.descriptors.len(), out.display())).green()
    );
    Ok(())
}

fn generate(
    config: &Config,
    pools: PathBuf,
    template: Option<PathBuf>,
    out_dir: PathBuf,
    prefix: String,
) -> Result<()> {
    let ctx = config.migration_context()?;
    let batch_size = config.batch_size()?;

    let descriptors = artifact::read_pool_list(&pools)?;
    info!("Loaded {} pools from {}", descriptors.len(), pools.display());
    if descriptors.is_empty() {
        warn!("Pool list is empty: no transactions or batch files will be generated");
    }

    let template = match template {
        Some(path) => BatchTemplate::from_file(path)?,
        None => BatchTemplate::minimal(),
    };

    let transactions = MigrationBatchBuilder::new(ctx)?.build(&descriptors)?;
    let batches = chunk(&transactions, batch_size, &template)?;
    let written = artifact::write_batches(&out_dir, &prefix, &batches)?;

    println!();
    println!(
        "  {} transactions in {} batches of at most {}",
        transactions.len(),
        batches.len(),
        batch_size
    );
    for path in &written {
        println!("  {} {}", style("✓").green(), path.display());
    }
    Ok(())
}

async fn audit_rewards(config: &Config, out: Option<PathBuf>) -> Result<()> {
    let settings = config.audit_settings()?;
    let reader = RpcChainReader::connect(&config.rpc_url, config.rpc_timeout()?)?;

    println!("{}", style("Auditing reward distributors...").blue());
    let mismatches = RewardDistributorAudit::new(&reader, settings).run().await?;

    if mismatches.is_empty() {
        println!("  {} every extra reward is distributed by the new strategy", style("✓").green());
    }
    for m in &mismatches {
        println!(
            "  {} gauge {} token {} distributor {}",
            style("✗").red(),
            m.gauge,
            m.reward_token,
            m.distributor
        );
    }

    if let Some(out) = out {
        artifact::write_json(&out, &mismatches)?;
        info!("Wrote {} entries to {}", mismatches.len(), out.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strategy_migrator=info".parse()?)
                .add_directive("migrator=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    print_banner();

    let config = load_config(cli.config.as_ref())?;
    config.print_summary();
    println!();

    let outcome = match cli.command {
        Command::Discover { out } => discover(&config, out).await,
        Command::Generate {
            pools,
            template,
            out_dir,
            prefix,
        } => generate(&config, pools, template, out_dir, prefix),
        Command::AuditRewards { out } => audit_rewards(&config, out).await,
    };

    if let Err(e) = &outcome {
        error!("Migration step failed: {}", e);
    }
    outcome
}
