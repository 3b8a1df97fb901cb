//! Protection Engine CLI
//!
//! Command-line interface for resolving quotes and browsing the injury
//! payout catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use protection_engine::quote::format_eur;
use protection_engine::{QuoteEngine, SmokerStatus};

#[derive(Parser)]
#[command(name = "protection_engine", version, about = "Smart Protection quoting engine")]
struct Cli {
    /// Load rate sheet and injury catalog CSVs from this directory
    /// instead of the built-in reference data
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the annual premium for one parameter combination
    Quote {
        /// Age of the insured (ages above the top bracket clamp to it)
        #[arg(long)]
        age: u8,

        /// Insured capital in EUR
        #[arg(long)]
        capital: u32,

        /// Policy term in years
        #[arg(long)]
        duration: u16,

        /// Smoker rates
        #[arg(long)]
        smoker: bool,

        /// Emit the quote as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the injury payout catalog, optionally filtered
    Injuries {
        /// Free-text filter on category or description
        query: Option<String>,
    },

    /// Print the full premium grid
    Ratesheet,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let engine = match &cli.data_dir {
        Some(dir) => QuoteEngine::from_csv_path(dir)?,
        None => QuoteEngine::new(),
    };

    match cli.command {
        Command::Quote {
            age,
            capital,
            duration,
            smoker,
            json,
        } => {
            let quote = engine.quote(age, smoker, capital, duration);
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                print_quote(&quote);
            }
        }
        Command::Injuries { query } => {
            let hits = engine.search_injuries(query.as_deref().unwrap_or(""));
            if hits.is_empty() {
                println!("Nessuna lesione trovata.");
            }
            for record in hits {
                println!(
                    "{:>3}  {:<20} {:<65} {:>10}  livello {}",
                    record.id,
                    record.category,
                    record.description,
                    format_eur(record.amount),
                    record.level,
                );
            }
        }
        Command::Ratesheet => print_ratesheet(&engine),
    }

    Ok(())
}

fn print_quote(quote: &protection_engine::Quote) {
    println!(
        "Quote: age {}, {}, capital {}, {} years",
        quote.age,
        match quote.smoker {
            SmokerStatus::Smoker => "smoker",
            SmokerStatus::NonSmoker => "non-smoker",
        },
        format_eur(quote.capital as f64),
        quote.duration,
    );

    match (quote.annual_premium, quote.daily_cost, &quote.daily_band) {
        (Some(annual), Some(daily), Some(band)) => {
            println!("  Annual premium: {}", format_eur(annual));
            println!("  Daily cost:     {daily:.2} € ({band})");
        }
        _ => println!("  Combinazione non disponibile"),
    }
}

fn print_ratesheet(engine: &QuoteEngine) {
    let rates = &engine.tariff().rates;
    let durations = rates.durations();

    for capital in rates.capitals() {
        for smoker in [SmokerStatus::NonSmoker, SmokerStatus::Smoker] {
            let Some(brackets) = rates.brackets(capital, smoker) else {
                continue;
            };

            println!("\nCapital {} ({:?})", format_eur(capital as f64), smoker);
            print!("{:>5}", "Age");
            for duration in durations {
                print!(" {duration:>9}y");
            }
            println!();

            for bracket in brackets {
                print!("{:>5}", bracket.age());
                for &duration in durations {
                    match bracket.premium(duration) {
                        Some(premium) => print!(" {premium:>9.0} "),
                        None => print!(" {:>9} ", "-"),
                    }
                }
                println!();
            }
        }
    }
}
