//! Writes `manifest.json` for an artifact directory.
//!
//! The manifest binds the model, scaler and feature schema by SHA-256 so the
//! application can detect a swapped or edited artifact at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin seal_artifacts -- [artifact_dir]
//! ```
//!
//! Without an argument, `CARDIOSCAN_ARTIFACT_DIR` (default `models`) is sealed.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use cardioscan::adapters::artifacts::{seal, MANIFEST_FILE};
use cardioscan::config::AppConfig;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dir = match (args.next(), args.next()) {
        (None, _) => AppConfig::from_env().artifact_dir,
        (Some(dir), None) => PathBuf::from(dir),
        (Some(_), Some(_)) => bail!("Usage: seal_artifacts [artifact_dir]"),
    };

    let manifest = seal(&dir).with_context(|| format!("Failed to seal {dir:?}"))?;
    let path = dir.join(MANIFEST_FILE);

    println!("Sealed {} artifacts in {}", manifest.files.len(), path.display());
    for (file, digest) in &manifest.files {
        println!("  {digest}  {file}");
    }
    Ok(())
}
