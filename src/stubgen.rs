//! Protocol stub regeneration
//!
//! Compiles the remote storage `.proto` schema in-process with `protox` (no
//! `protoc` needed) and renders Rust types with `prost-build`. Output is a
//! pure function of the schema, so regenerating an unchanged schema
//! reproduces the checked-in stub byte for byte.

use crate::{Error, Result};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_PROTO: &str = "proto/remote.proto";
pub const DEFAULT_INCLUDE: &str = "proto";
pub const DEFAULT_OUT_DIR: &str = "src/proto";

/// Regenerate Rust types for `protos` into `out_dir`.
///
/// Returns the written files, one per protobuf package, sorted.
pub fn regenerate<P, I>(protos: &[P], includes: &[I], out_dir: &Path) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    I: AsRef<Path>,
{
    if protos.is_empty() {
        return Err(Error::Schema("no .proto files given".to_string()));
    }

    let fds = protox::compile(protos, includes).map_err(|e| Error::Schema(e.to_string()))?;

    let packages: BTreeSet<String> = fds
        .file
        .iter()
        .map(|file| match file.package() {
            "" => "_".to_string(),
            package => package.to_string(),
        })
        .collect();

    std::fs::create_dir_all(out_dir)?;
    prost_build::Config::new()
        .out_dir(out_dir)
        .compile_fds(fds)?;

    let written: Vec<PathBuf> = packages
        .into_iter()
        .map(|package| out_dir.join(format!("{package}.rs")))
        .collect();
    for path in &written {
        info!(path = %path.display(), "Wrote protocol stub");
    }
    Ok(written)
}
