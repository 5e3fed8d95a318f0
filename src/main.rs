mod config;
mod db;
mod error;
mod input;
mod ledger;
mod logging;
mod models;
mod report;
mod run;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::resolve()?;
    logging::init(&config.log_path)?;

    let mut db = db::Database::open(&config.db_path)?;
    let ledger = db.load_ledger();
    tracing::info!(
        months = ledger.len(),
        db = %config.db_path.display(),
        "ledger loaded"
    );

    match args.len() {
        1 => run::as_tui(&mut db, ledger, &config),
        2.. => run::as_cli(&args, &mut db, ledger, &config),
        _ => {
            eprintln!("Usage: cashbook [command]");
            Ok(())
        }
    }
}
