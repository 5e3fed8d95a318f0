use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::config::Config;
use crate::db::Database;
use crate::input;
use crate::ledger::{Ledger, MonthSummary};
use crate::models::{format_month, sort_keys, MonthKey};
use crate::report;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(
    args: &[String],
    db: &mut Database,
    mut ledger: Ledger,
    config: &Config,
) -> Result<()> {
    let rest: Vec<&str> = args[2..].iter().map(String::as_str).collect();
    match args[1].as_str() {
        "add" | "a" => cli_add(&rest, db, &mut ledger),
        "open" => cli_open(&rest, db, &mut ledger),
        "summary" | "s" => cli_summary(&rest, &ledger),
        "months" => cli_months(&ledger),
        "report" => cli_report(&rest, &ledger, config),
        "report-all" => cli_report_all(&ledger, config),
        "report-period" => cli_report_period(&rest, &ledger, config),
        "export" => cli_export(&rest, &ledger, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("cashbook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Cashbook - monthly cash-flow ledger");
    println!();
    println!("Usage: cashbook [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  add [Month-year] <entry|exit> <amount> [date] <description>");
    println!("                                      Record a movement (date defaults to today)");
    println!("  open [Month-year]                   Start a month from the previous balance");
    println!("                                      (default: the month after the latest)");
    println!("  summary [Month-year...]             Print month summaries (default: latest)");
    println!("  months                              List recorded months");
    println!("  report <Month-year>                 Write the report for one month");
    println!("  report-all                          Write a report for every month");
    println!("  report-period <year> <from> <to>    Write a consolidated period report");
    println!("  export [path]                       Export movements to CSV");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Amounts accept ',' or '.' (45,90). Dates are dd/mm/yyyy or yyyy-mm-dd.");
    println!("Months are written Janeiro-2024 ... Dezembro-2024.");
}

fn cli_add(args: &[&str], db: &mut Database, ledger: &mut Ledger) -> Result<()> {
    let today = Local::now().date_naive();
    let movement = input::parse_movement(args, today)?.record_into(ledger)?;
    db.save_ledger(ledger)?;

    let key = MonthKey::from_date(movement.date());
    println!(
        "Recorded {} of {} on {} in {key}",
        movement.kind().as_str(),
        format_amount(movement.amount()),
        movement.date().format("%d/%m/%Y"),
    );
    let summary = ledger.summarize_month(&key)?;
    println!("  Closing balance: {}", format_amount(summary.closing_balance));
    Ok(())
}

fn cli_open(args: &[&str], db: &mut Database, ledger: &mut Ledger) -> Result<()> {
    let key = match args {
        [] => next_month_to_open(ledger, Local::now().date_naive()),
        [text] => MonthKey::parse(text)?,
        _ => anyhow::bail!("Usage: cashbook open [Month-year]"),
    };
    let existed = ledger.get(&key).is_some();
    let opening = ledger.ensure_month(key.year(), key.month())?.opening_balance();
    if existed {
        println!("{key} already exists (opening {})", format_amount(opening));
    } else {
        db.save_ledger(ledger)?;
        println!("{key} opened at {}", format_amount(opening));
    }
    Ok(())
}

/// The month after the latest recorded one, or the current month for an
/// empty ledger.
pub(crate) fn next_month_to_open(ledger: &Ledger, today: NaiveDate) -> MonthKey {
    match ledger.keys().last() {
        Some(latest) => latest.successor(),
        None => MonthKey::from_date(today),
    }
}

fn cli_summary(args: &[&str], ledger: &Ledger) -> Result<()> {
    let keys = if args.is_empty() {
        match ledger.keys().last() {
            Some(key) => vec![*key],
            None => {
                println!("The ledger is empty");
                return Ok(());
            }
        }
    } else {
        sort_keys(args)?
    };
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_summary(&ledger.summarize_month(key)?);
    }
    Ok(())
}

fn print_summary(summary: &MonthSummary) {
    println!("Cashbook - {}", summary.key);
    println!("{}", "─".repeat(40));
    println!("  Opening:    {}", format_amount(summary.opening_balance));
    println!("  Entries:    {}", format_amount(summary.total_entries));
    println!("  Exits:      {}", format_amount(summary.total_exits));
    println!("  Closing:    {}", format_amount(summary.closing_balance));
    println!("  Movements:  {}", summary.movements.len());

    if !summary.movements.is_empty() {
        println!();
        for m in &summary.movements {
            println!(
                "  {}  {:<5}  {:<30} {:>16}",
                m.date().format("%d/%m/%Y"),
                m.kind().label(),
                truncate(m.description(), 30),
                format_amount(m.signed_amount()),
            );
        }
    }
}

fn cli_months(ledger: &Ledger) -> Result<()> {
    if ledger.is_empty() {
        println!("The ledger is empty");
        return Ok(());
    }

    println!(
        "{:<16} {:>16} {:>16} {:>16} {:>16}",
        "Month", "Opening", "Entries", "Exits", "Closing"
    );
    println!("{}", "─".repeat(84));
    for summary in ledger.summaries() {
        println!(
            "{:<16} {:>16} {:>16} {:>16} {:>16}",
            summary.key.to_string(),
            format_amount(summary.opening_balance),
            format_amount(summary.total_entries),
            format_amount(summary.total_exits),
            format_amount(summary.closing_balance),
        );
    }
    Ok(())
}

fn cli_report(args: &[&str], ledger: &Ledger, config: &Config) -> Result<()> {
    let [text] = args else {
        anyhow::bail!("Usage: cashbook report <Month-year>");
    };
    let key = MonthKey::parse(text)?;
    let path = report::render_month(ledger, &key, &config.reports_dir)?;
    println!("Report written to {}", path.display());
    Ok(())
}

fn cli_report_all(ledger: &Ledger, config: &Config) -> Result<()> {
    let paths = report::render_all(ledger, &config.reports_dir)?;
    if paths.is_empty() {
        println!("No months to render");
    }
    for path in &paths {
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn cli_report_period(args: &[&str], ledger: &Ledger, config: &Config) -> Result<()> {
    let (year, from, to) = input::parse_period(args)?;
    let path = report::render_period(ledger, year, from, to, &config.reports_dir)?;
    println!(
        "Report for {} to {} written to {}",
        format_month(year, from)?,
        format_month(year, to)?,
        path.display()
    );
    Ok(())
}

fn cli_export(args: &[&str], ledger: &Ledger, config: &Config) -> Result<()> {
    let path = args
        .first()
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| config.reports_dir.join("movements.csv"));

    let count = report::export_csv(ledger, &path)?;
    if count == 0 {
        println!("No movements recorded; wrote an empty file to {}", path.display());
    } else {
        println!("Exported {count} movements to {}", path.display());
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
