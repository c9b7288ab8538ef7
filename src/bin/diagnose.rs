//! Diagnostic tool - Check migration settings before a run
//!
//! Run with: cargo run --bin diagnose

use std::env;

use strategy_migrator::Config;

/// Keep the first `head` and last `tail` characters of long values
fn shorten(value: &str, head: usize, tail: usize) -> String {
    let count = value.chars().count();
    if count <= head + tail + 5 {
        return value.to_string();
    }
    let start: String = value.chars().take(head).collect();
    let end: String = value.chars().skip(count - tail).collect();
    format!("{}...{}", start, end)
}

fn main() {
    println!("🔍 MIGRATOR DIAGNOSTIC CHECK\n");

    // Load .env
    dotenvy::dotenv().ok();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let checks = [
        ("RPC_TIMEOUT_SECS", "30", "Seconds before an eth_call is abandoned"),
        ("DISCOVERY_CONCURRENCY", "1", "Registry entries read at once"),
        ("BATCH_SIZE", "25", "Transactions per batch file"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let marker = if env::var(key).is_err() { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    let rpc = env::var("RPC_URL").unwrap_or_else(|_| "NOT SET (public endpoint)".to_string());
    println!("  RPC_URL: {}", shorten(&rpc, 30, 15));

    println!("\n═══════════════════════════════════════════════════");
    println!("                     CONTRACTS                      ");
    println!("═══════════════════════════════════════════════════\n");

    let contracts = [
        "CONTROLLER_ADDRESS",
        "OLD_STRATEGY_ADDRESS",
        "NEW_STRATEGY_ADDRESS",
        "LOCKER_ADDRESS",
        "VOTER_ADDRESS",
        "DEPOSITOR_ADDRESS",
        "REWARD_TOKEN_ADDRESS",
        "GOVERNANCE_TOKEN_ADDRESS",
    ];
    for key in contracts {
        let status = if env::var(key).is_ok() { "✅ Set" } else { "❌ Not set" };
        println!("  {:<26} {}", format!("{}:", key), status);
    }

    let blacklisted = env::var("BLACKLIST")
        .map(|s| s.split(',').filter(|e| !e.trim().is_empty()).count())
        .unwrap_or(0);
    println!("\n  BLACKLIST: {} addresses", blacklisted);
    if blacklisted == 0 {
        println!("  ⚠️  No test addresses: pools funded only by tests will be migrated");
    }

    println!("\n═══════════════════════════════════════════════════");
    println!("                     STATUS                         ");
    println!("═══════════════════════════════════════════════════\n");

    match Config::from_env().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => {
            println!("  ✅ Ready for discover and generate");
            if config.governance_token.is_none() {
                println!("  ⚠️  GOVERNANCE_TOKEN_ADDRESS not set: the audit will check every reward");
            }
        }
        Err(e) => {
            println!("  ❌ {}: {}", e.kind(), e);
        }
    }

    println!("\n✅ Diagnostic complete!\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_counts_characters() {
        let url = format!("https://{}.example/v2/{}", "ü".repeat(40), "ключ".repeat(10));
        let shown = shorten(&url, 30, 15);

        assert!(shown.starts_with("https://üüü"));
        assert!(shown.ends_with("ключключключ"));
        assert_eq!(shown.chars().count(), 30 + 3 + 15);
    }

    #[test]
    fn test_short_values_unchanged() {
        assert_eq!(shorten("http://localhost:8545", 30, 15), "http://localhost:8545");
    }
}
