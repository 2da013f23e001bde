//! atlaskv-stats binary
//!
//! Prints the store's native stats followed by the per-namespace table.

use std::io::{self, Write};
use std::path::PathBuf;

use atlaskv_stats::config::TableStyle;
use atlaskv_stats::{report, Config};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Keyspace statistics for an AtlasKV data directory
#[derive(Parser, Debug)]
#[command(name = "atlaskv-stats")]
#[command(about = "Per-namespace key/value size statistics for an AtlasKV store")]
#[command(version)]
struct Args {
    /// Data directory of the store
    #[arg(default_value = "./data")]
    data_dir: PathBuf,

    /// Draw the table with ASCII borders
    #[arg(long)]
    ascii: bool,

    /// Ignore unflushed writes in wal.log
    #[arg(long)]
    skip_wal: bool,

    /// Do not verify SSTable checksums
    #[arg(long)]
    no_verify: bool,
}

fn main() {
    // Logs go to stderr; stdout carries only the report.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,atlaskv_stats=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .replay_wal(!args.skip_wal)
        .verify_checksums(!args.no_verify)
        .table_style(if args.ascii {
            TableStyle::Ascii
        } else {
            TableStyle::Utf8
        })
        .build();

    tracing::debug!(?config, "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = report::run(&config, &mut out) {
        let _ = out.flush();
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
