//! Commit, open, and verify one polynomial end to end.
//!
//! ```text
//! kzg_demo [--coeffs 3,2,1] [--point 2] [--srs PATH]
//! ```
//!
//! Coefficients are decimal, lowest degree first. Without `--srs` (or
//! `POLYCOMMIT_SRS`) a fresh setup just large enough for the polynomial is
//! generated.

use anyhow::{bail, Context, Result};
use polycommit::config::KzgConfig;
use polycommit::srs::bn254_scalar_field;
use polycommit::srs_setup::{load_and_validate_srs, srs_digest};
use polycommit::{commit, open, verify, wire, FieldElement, GaloisField, Srs};
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

fn parse_coeffs(field: &GaloisField, s: &str) -> Result<Vec<FieldElement>> {
    s.split(',')
        .map(|c| {
            wire::decode_value(field, c).with_context(|| format!("bad coefficient {c:?}"))
        })
        .collect()
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cfg = KzgConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(cfg.log_filter.as_str())
        .with_target(false)
        .compact()
        .init();

    let field = bn254_scalar_field();
    let coeffs = parse_coeffs(
        &field,
        &parse_flag(&args, "--coeffs").unwrap_or_else(|| "3,2,1".into()),
    )?;
    if coeffs.is_empty() {
        bail!("--coeffs must name at least one coefficient");
    }
    let point = wire::decode_value(
        &field,
        &parse_flag(&args, "--point").unwrap_or_else(|| "2".into()),
    )
    .context("bad --point")?;
    let degree = coeffs.len() - 1;

    let srs = match parse_flag(&args, "--srs").map(Into::into).or(cfg.srs_path) {
        Some(path) => load_and_validate_srs(&path, degree)
            .with_context(|| format!("loading SRS from {}", path.display()))?,
        None => Srs::generate(&field, degree.max(1))?,
    };
    info!(
        degree,
        max_degree = srs.max_degree(),
        digest = %hex::encode(srs_digest(&srs)?),
        "setup ready"
    );

    let c = commit::commit(&srs, &coeffs)?;
    let proof = open::open(&srs, &coeffs, &point)?;
    let accepted = verify::verify_proof(&srs, &c, &proof)?;

    let tampered = &proof.value + &field.one();
    let forged = verify::verify(&srs, &c, &point, &tampered, &proof.witness)?;

    println!("commitment : {}", wire::encode_commitment(&c));
    println!("point      : {}", wire::encode_value(&proof.point));
    println!("value      : {}", wire::encode_value(&proof.value));
    println!("witness    : {}", wire::encode_commitment(&proof.witness));
    println!("binary     : {}", hex::encode(wire::encode_binary(&c)));
    println!("verify     : {}", if accepted { "accepted" } else { "REJECTED" });
    println!(
        "tampered   : value {} {}",
        tampered,
        if forged { "ACCEPTED" } else { "rejected" }
    );

    if !accepted || forged {
        bail!("verification behaved unexpectedly");
    }
    Ok(())
}
