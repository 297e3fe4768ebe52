use addrfix::repair::repair_file;
use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) fixed source/destination paths ───────────────────────────
    let input = Path::new("products.csv");
    let output = Path::new("products_fixed.csv");

    // ─── 3) run the single repair pass ───────────────────────────────
    let start = Instant::now();
    let summary = repair_file(input, output)?;
    info!(
        rows = summary.rows,
        merged = summary.merged,
        continuations = summary.continuations,
        dropped = summary.dropped,
        elapsed = ?start.elapsed(),
        "all done"
    );
    Ok(())
}
