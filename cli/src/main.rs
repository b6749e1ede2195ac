//! Stakebook CLI - previews and records staking settlements from exported offer data.
//!
//! Usage:
//!   stakebook preview offers.yaml
//!   stakebook record offers.json --strict
//!   stakebook quote --buy-in 1000 --percentage 20 --markup 1.1
//!   stakebook ledger offers.yaml --json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use stakebook_cli::{
    input::{validate_offers, SettlementFile},
    render::{ledger_table, preview_table},
    Config, ValidatedConfig,
};
use stakebook_execution::{
    calculate_investment_amount, format_currency, preview_batch, record_batch, BackerLedger,
    OfferSettlement,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Settle backing offers and report staker payouts")]
struct Args {
    /// YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured log level.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Reject invalid or oversold offers instead of passing them through.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project payouts for every offer in a settlement file.
    Preview {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Emit the payout records to persist for every offer.
    Record { file: PathBuf },
    /// Price a slice of action.
    Quote {
        #[arg(long)]
        buy_in: f64,
        #[arg(long)]
        percentage: f64,
        /// Total cost multiplier, e.g. 1.1 for a 10% markup.
        #[arg(long, default_value = "1.0")]
        markup: f64,
    },
    /// Aggregate settled payouts per backer.
    Ledger {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    buy_in_amount: f64,
    percentage: f64,
    markup_factor: f64,
    amount: f64,
    formatted: String,
}

fn load_config(args: &Args) -> Result<ValidatedConfig> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if args.strict {
        config.strict = true;
    }
    Ok(config.validate()?)
}

fn init_tracing(config: &ValidatedConfig) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_offers(path: &Path, strict: bool) -> Result<Vec<OfferSettlement>> {
    let offers = SettlementFile::load(path)?
        .into_settlements()
        .with_context(|| format!("failed to adapt rows in {}", path.display()))?;
    if strict {
        validate_offers(&offers)?;
    }
    info!(offers = offers.len(), path = %path.display(), strict, "loaded settlement file");
    Ok(offers)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args).context("invalid configuration")?;
    init_tracing(&config);

    match &args.command {
        Command::Preview { file, json } => {
            let offers = load_offers(file, config.strict)?;
            let previews = preview_batch(&offers);
            for preview in previews.iter().filter(|p| p.results.is_oversold()) {
                warn!(offer_id = %preview.offer_id, "offer oversold");
            }
            if *json {
                print_json(&previews)?;
            } else {
                print!("{}", preview_table(&previews, &config.currency));
            }
        }
        Command::Record { file } => {
            let offers = load_offers(file, config.strict)?;
            print_json(&record_batch(&offers))?;
        }
        Command::Quote {
            buy_in,
            percentage,
            markup,
        } => {
            let amount = calculate_investment_amount(*buy_in, *percentage, *markup);
            print_json(&Quote {
                buy_in_amount: *buy_in,
                percentage: *percentage,
                markup_factor: *markup,
                amount,
                formatted: format_currency(amount, &config.currency),
            })?;
        }
        Command::Ledger { file, json } => {
            let offers = load_offers(file, config.strict)?;
            let mut ledger = BackerLedger::new();
            for (offer, settled) in offers.iter().zip(record_batch(&offers)) {
                ledger.add_settlement(&offer.offer_id, &offer.investments, &settled.records);
            }
            let summaries = ledger.summaries();
            if *json {
                print_json(&summaries)?;
            } else {
                print!("{}", ledger_table(&summaries, &config.currency));
            }
        }
    }
    Ok(())
}
