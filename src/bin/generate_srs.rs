//! Generate and save a KZG setup.
//!
//! ```text
//! generate_srs [--degree N] [--output PATH] [--config FILE] [--dev]
//! ```
//!
//! Defaults come from `POLYCOMMIT_MAX_DEGREE` / `POLYCOMMIT_SRS` (or the JSON
//! file given with `--config`); flags override them. `--dev` derives `α` from
//! a fixed seed, so the resulting setup is **public** and must never be used
//! outside tests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use polycommit::config::KzgConfig;
use polycommit::srs::bn254_scalar_field;
use polycommit::srs_setup::{save_srs, srs_digest, validate_srs_pairing};
use polycommit::Srs;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let cfg = match parse_flag(&args, "--config") {
        Some(path) => KzgConfig::from_json_file(&path)
            .with_context(|| format!("reading config {path}"))?,
        None => KzgConfig::from_env()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(cfg.log_filter.as_str())
        .with_target(false)
        .compact()
        .init();

    let degree: usize = match parse_flag(&args, "--degree") {
        Some(s) => s.parse().with_context(|| format!("bad --degree {s:?}"))?,
        None => cfg.max_degree,
    };
    let output = parse_flag(&args, "--output")
        .map(PathBuf::from)
        .or(cfg.srs_path)
        .unwrap_or_else(|| PathBuf::from("kzg_srs.bin"));
    let dev = args.iter().any(|a| a == "--dev");

    let field = bn254_scalar_field();
    let srs = if dev {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("⚠️  WARNING: Generating DEVELOPMENT SRS (seed=42, α is PUBLIC)");
        println!("⚠️  Anyone can forge openings against this setup.");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        let mut rng = StdRng::from_seed([42u8; 32]);
        let alpha = field.random_with(&mut rng);
        Srs::from_secret_insecure(&field, degree, true, &alpha)?
    } else {
        Srs::generate(&field, degree)?
    };
    info!(degree, dev, "setup generated");

    validate_srs_pairing(&srs).context("freshly generated SRS failed pairing check")?;
    save_srs(&output, &srs).with_context(|| format!("writing {}", output.display()))?;
    let digest = srs_digest(&srs)?;

    println!("✓ Saved SRS: {}", output.display());
    println!("  max degree: {}", srs.max_degree());
    println!("  G1 powers:  {}", srs.g1_powers().len());
    println!("  G2 powers:  {}", srs.g2_powers().len());
    println!("  digest:     {}", hex::encode(digest));
    Ok(())
}
