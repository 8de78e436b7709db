use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{IncomeExpenseReport, LedgerService};
use crate::domain::format_amount;
use crate::io::Exporter;

/// Billbook - monthly bill log summaries
#[derive(Parser)]
#[command(name = "billbook")]
#[command(about = "Summarize the income and expense tables of a markdown bill log")]
#[command(version)]
pub struct Cli {
    /// JSON file overriding the ledger markers, delimiters and labels
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Income vs expense summary of a ledger
    Summary {
        /// Markdown ledger file
        ledger: PathBuf,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export the parsed ledger records
    Records {
        /// Markdown ledger file
        ledger: PathBuf,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
    pub fn init_tracing(&self) {
        let default_level = if self.verbose { "billbook=debug" } else { "billbook=info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    pub fn run(self) -> Result<()> {
        let service = LedgerService::load(self.config.as_deref())?;

        match self.command {
            Commands::Summary { ledger, format } => {
                let report = service
                    .income_expense_report(&ledger)
                    .with_context(|| format!("Failed to summarize {}", ledger.display()))?;
                print_report(&report, &format)?;
            }

            Commands::Records {
                ledger,
                format,
                output,
            } => {
                let sections = service
                    .parse_file(&ledger)
                    .with_context(|| format!("Failed to parse {}", ledger.display()))?;
                let exporter = Exporter::new(&sections);

                let writer: Box<dyn Write> = match output {
                    Some(path) => Box::new(BufWriter::new(
                        File::create(&path)
                            .with_context(|| format!("Cannot create {}", path.display()))?,
                    )),
                    None => Box::new(io::stdout().lock()),
                };

                let count = match format.as_str() {
                    "csv" => exporter.export_records_csv(writer)?,
                    "json" => exporter.export_records_json(writer)?,
                    other => bail!("Unknown format '{}'. Use csv or json", other),
                };
                eprintln!("Exported {} records", count);
            }
        }

        Ok(())
    }
}

fn print_report(report: &IncomeExpenseReport, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(io::stdout().lock());
            writer.write_record(["type", "category", "amount"])?;
            writer.write_record(["net", "", format_amount(report.net).as_str()])?;
            writer.write_record(["expense", "", format_amount(report.total_expense).as_str()])?;
            for cat in &report.expense_categories {
                let total = format_amount(cat.total);
                writer.write_record(["expense", cat.category.as_str(), total.as_str()])?;
            }
            writer.write_record(["income", "", format_amount(report.total_income).as_str()])?;
            for cat in &report.income_categories {
                let total = format_amount(cat.total);
                writer.write_record(["income", cat.category.as_str(), total.as_str()])?;
            }
            writer.flush()?;
        }
        "table" => {
            println!("Income vs Expense Summary");
            println!("Source: {}", report.source);
            println!("{}", "=".repeat(40));
            println!("{:<20} {:>19}", "Net", format_amount(report.net));
            println!("{}", "-".repeat(40));
            println!("{:<20} {:>19}", "Total Expense", format_amount(report.total_expense));
            for cat in &report.expense_categories {
                println!(
                    "  {:<18} {:>12} ({:>5.1}%)",
                    truncate(&cat.category, 18),
                    format_amount(cat.total),
                    cat.percentage
                );
            }
            println!("{}", "-".repeat(40));
            println!("{:<20} {:>19}", "Total Income", format_amount(report.total_income));
            for cat in &report.income_categories {
                println!(
                    "  {:<18} {:>12} ({:>5.1}%)",
                    truncate(&cat.category, 18),
                    format_amount(cat.total),
                    cat.percentage
                );
            }
            println!("{}", "-".repeat(40));
        }
        other => bail!("Unknown format '{}'. Use table, json or csv", other),
    }

    Ok(())
}

/// Shorten to `max_len` characters, ending in "..." when cut.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("food", 18), "food");
        assert_eq!(truncate("a very long category name", 10), "a very ...");
        // character based, safe on multi-byte text
        assert_eq!(truncate("日常餐饮消费支出", 5), "日常...");
    }

    #[test]
    fn test_cli_parses_summary() {
        let cli = Cli::try_parse_from(["billbook", "summary", "march.md", "--format", "json"])
            .unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Summary { ledger, format } => {
                assert_eq!(ledger, PathBuf::from("march.md"));
                assert_eq!(format, "json");
            }
            _ => panic!("expected summary"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "billbook", "records", "march.md", "-v", "--config", "fmt.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("fmt.json")));
        assert!(matches!(
            cli.command,
            Commands::Records { ref format, output: None, .. } if format == "csv"
        ));
    }

    #[test]
    fn test_unknown_report_format() {
        let report = IncomeExpenseReport {
            source: "x".into(),
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            net: Decimal::ZERO,
            income_categories: vec![],
            expense_categories: vec![],
        };
        assert!(print_report(&report, "xml").is_err());
    }
}
