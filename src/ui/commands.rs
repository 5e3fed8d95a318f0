use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, PeriodRequest, Screen};
use crate::db::Database;
use crate::input;
use crate::models::MonthKey;
use crate::report;
use crate::ui::util::format_amount;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Cashbook", cmd_quit, r);
    register_command!("quit", "Quit Cashbook", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Record a movement (e.g. :add [Janeiro-2024] entry 1000 10/01/2024 salary)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Record a movement (e.g. :a exit 45,90 pharmacy)",
        cmd_add,
        r
    );
    register_command!(
        "month",
        "Show a month (e.g. :month Março-2024)",
        cmd_month,
        r
    );
    register_command!("m", "Show a month (e.g. :m Março-2024)", cmd_month, r);
    register_command!(
        "open",
        "Start a month from the previous balance (default: the next one)",
        cmd_open,
        r
    );
    register_command!(
        "period",
        "Show a period (e.g. :period 2024 1 3)",
        cmd_period,
        r
    );
    register_command!("p", "Show a period (e.g. :p 2024 1 3)", cmd_period, r);
    register_command!("months", "Go to Months", cmd_months, r);
    register_command!(
        "report",
        "Render the selected month (or :report Março-2024)",
        cmd_report,
        r
    );
    register_command!("report-all", "Render every month", cmd_report_all, r);
    register_command!(
        "report-period",
        "Render a period (e.g. :report-period 2024 1 6)",
        cmd_report_period,
        r
    );
    register_command!(
        "export",
        "Export movements to CSV (e.g. :export ~/movements.csv)",
        cmd_export,
        r
    );
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);

    r
});

/// Run a `:` command. Failures end up in the status bar; they never stop
/// the TUI.
pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return;
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, db) {
            app.set_status(format!("Error: {e:#}"));
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn words(args: &str) -> Vec<&str> {
    args.split_whitespace().collect()
}

fn period_request(args: &str) -> anyhow::Result<PeriodRequest> {
    let (year, month_from, month_to) = input::parse_period(&words(args))?;
    Ok(PeriodRequest {
        year,
        month_from,
        month_to,
    })
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parsed = input::parse_movement(&words(args), app.today)?;
    let movement = app.record(parsed, db)?;
    app.set_status(format!(
        "Recorded {} of {} on {} in {}",
        movement.kind().as_str(),
        format_amount(movement.amount()),
        movement.date().format("%d/%m/%Y"),
        MonthKey::from_date(movement.date()),
    ));
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let key = MonthKey::parse(args)?;
    if !app.select_month(&key) {
        anyhow::bail!("Month {key} has no record yet (use :open {key} to start it)");
    }
    app.screen = Screen::Months;
    app.set_status(format!("Showing {key}"));
    Ok(())
}

fn cmd_open(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let key = if args.is_empty() {
        crate::run::cli::next_month_to_open(&app.ledger, app.today)
    } else {
        MonthKey::parse(args)?
    };
    app.open_month(key, db)?;
    app.screen = Screen::Months;
    if let Some(summary) = &app.selected {
        let opening = format_amount(summary.opening_balance);
        app.set_status(format!("{key} opened at {opening}"));
    }
    Ok(())
}

fn cmd_period(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let request = period_request(args)?;
    app.show_period(request)?;
    if let Some(period) = &app.period {
        let msg = format!("Period {}: {} month(s)", period.label(), period.months.len());
        app.set_status(msg);
    }
    Ok(())
}

fn cmd_months(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Months;
    Ok(())
}

fn cmd_report(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let key = if args.is_empty() {
        app.selected_key()
            .ok_or_else(|| anyhow::anyhow!("No month selected"))?
    } else {
        MonthKey::parse(args)?
    };
    let path = report::render_month(&app.ledger, &key, &app.reports_dir)?;
    app.set_status(format!("Report written to {}", path.display()));
    Ok(())
}

fn cmd_report_all(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let paths = report::render_all(&app.ledger, &app.reports_dir)?;
    if paths.is_empty() {
        app.set_status("No months to render");
    } else {
        app.set_status(format!(
            "{} report(s) written to {}",
            paths.len(),
            app.reports_dir.display()
        ));
    }
    Ok(())
}

fn cmd_report_period(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let req = period_request(args)?;
    let path = report::render_period(
        &app.ledger,
        req.year,
        req.month_from,
        req.month_to,
        &app.reports_dir,
    )?;
    app.set_status(format!("Report written to {}", path.display()));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        app.reports_dir.join("movements.csv")
    } else {
        PathBuf::from(crate::run::cli::shellexpand(args))
    };
    let count = report::export_csv(&app.ledger, &path)?;
    app.set_status(format!("Exported {count} movements to {}", path.display()));
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.next_month();
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.prev_month();
    Ok(())
}
