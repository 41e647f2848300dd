//! Stub Regeneration Binary
//!
//! Rebuilds `src/proto/prometheus.rs` from the remote storage schema.

use remotecheck::stubgen::{self, DEFAULT_INCLUDE, DEFAULT_OUT_DIR, DEFAULT_PROTO};
use remotecheck::telemetry;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Regenerate the Prometheus remote storage protocol stub
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Schema file(s) to compile
    #[arg(long = "proto", default_value = DEFAULT_PROTO)]
    protos: Vec<PathBuf>,

    /// Include directories for imports
    #[arg(long = "include", default_value = DEFAULT_INCLUDE)]
    includes: Vec<PathBuf>,

    /// Output directory
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_for_component("regenerate-stub", &args.log_level)?;

    let written = stubgen::regenerate(&args.protos, &args.includes, &args.out)?;
    for path in &written {
        println!("{}", path.display());
    }
    info!(files = written.len(), "Stub regeneration complete");
    Ok(())
}
