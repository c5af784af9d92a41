mod config;
mod export;
mod ledger;
mod models;
mod run;
mod session;
mod store;
mod util;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = run::Invocation::parse(&args)?;
    let config = config::Config::resolve(invocation.db.as_deref())?;
    init_logging(&config.log_filter);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if invocation.demo {
        // demo runs never touch the database file
        let mut storage = store::MemoryStorage::new();
        return run::as_cli(&invocation, &mut storage, &mut out);
    }
    let mut storage = store::SqliteStorage::open(&config.db_path)?;
    run::as_cli(&invocation, &mut storage, &mut out)
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
#[path = "util_tests.rs"]
mod util_tests;
