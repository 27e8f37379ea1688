//! SRS Persistence, Validation, and Digests
//!
//! Only the **public** part of an [`Srs`] is ever written: the degree, the G1
//! powers and the G2 powers. `α` powers never leave the process, so a loaded
//! setup can commit, open and verify but cannot serve the trapdoor checks.
//!
//! # File Format
//!
//! ```text
//! magic   b"KZGSRS1\0"                       (8 bytes)
//! degree  u64                                 (ark-compressed)
//! g1      Vec<G1Affine>  [α⁰·G₁ … α^{t+1}·G₁]  (ark-compressed)
//! g2      Vec<G2Affine>  [α⁰·G₂ … ]            (ark-compressed)
//! ```
//!
//! # Validation Layers
//!
//! 1. **Format**: magic, then Arkworks deserialization (which also rejects
//!    off-curve and out-of-subgroup points)
//! 2. **Structure**: generators at index 0, enough powers for the degree,
//!    `[α]G₂` not the identity
//! 3. **Pairing** (optional, [`validate_srs_pairing`]): the G1 and G2 powers
//!    agree on the same `α`
//! 4. **Digest** ([`verify_srs_digest`]): compare against a known-good value

#![forbid(unsafe_code)]

use std::path::Path;

use ark_bn254::{Bn254, G1Affine, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use blake3::Hasher;
use tracing::debug;

use crate::srs::Srs;
use crate::KzgError;

/// First eight bytes of every SRS file.
pub const SRS_FILE_MAGIC: &[u8; 8] = b"KZGSRS1\0";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while persisting or validating an SRS.
#[derive(Debug, thiserror::Error)]
pub enum SrsSetupError {
    /// File I/O error (file not found, permissions, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to deserialize SRS from binary format
    #[error("deserialization error: {0}")]
    Deserialize(String),

    /// SRS failed structural validation
    #[error("SRS validation failed: {0}")]
    Validation(String),

    /// Pairing check failed (indicates corrupted or malicious SRS)
    #[error("pairing check failed: {0}")]
    PairingCheck(String),

    /// Setup could not be reassembled from its parts
    #[error(transparent)]
    Kzg(#[from] KzgError),
}

// ============================================================================
// Save / Load
// ============================================================================

/// Serialize the public part of `srs` in the format above.
pub fn encode_srs(srs: &Srs) -> Result<Vec<u8>, SrsSetupError> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(SRS_FILE_MAGIC);
    (srs.max_degree() as u64)
        .serialize_compressed(&mut bytes)
        .map_err(|e| SrsSetupError::Validation(format!("degree serialize: {e}")))?;
    srs.g1_powers()
        .to_vec()
        .serialize_compressed(&mut bytes)
        .map_err(|e| SrsSetupError::Validation(format!("G1 serialize: {e}")))?;
    srs.g2_powers()
        .to_vec()
        .serialize_compressed(&mut bytes)
        .map_err(|e| SrsSetupError::Validation(format!("G2 serialize: {e}")))?;
    Ok(bytes)
}

/// Write `srs` to `path`.
pub fn save_srs(path: impl AsRef<Path>, srs: &Srs) -> Result<(), SrsSetupError> {
    let bytes = encode_srs(srs)?;
    std::fs::write(path.as_ref(), &bytes)?;
    debug!(path = %path.as_ref().display(), bytes = bytes.len(), "saved SRS");
    Ok(())
}

/// Parse and structurally validate an SRS from bytes.
///
/// # Errors
///
/// - [`SrsSetupError::Deserialize`] if the magic or binary format is invalid
/// - [`SrsSetupError::Validation`] if structural checks fail, including a
///   degree below `min_degree`
pub fn decode_srs(bytes: &[u8], min_degree: usize) -> Result<Srs, SrsSetupError> {
    // Layer 1: magic + deserialization
    let mut slice = bytes
        .strip_prefix(SRS_FILE_MAGIC)
        .ok_or_else(|| SrsSetupError::Deserialize("bad magic (not an SRS file)".into()))?;
    let degree = u64::deserialize_compressed(&mut slice)
        .map_err(|e| SrsSetupError::Deserialize(format!("degree: {e}")))?;
    let g1: Vec<G1Affine> = CanonicalDeserialize::deserialize_compressed(&mut slice)
        .map_err(|e| SrsSetupError::Deserialize(format!("G1 SRS: {e}")))?;
    let g2: Vec<G2Affine> = CanonicalDeserialize::deserialize_compressed(&mut slice)
        .map_err(|e| SrsSetupError::Deserialize(format!("G2 SRS: {e}")))?;
    if !slice.is_empty() {
        return Err(SrsSetupError::Deserialize(format!(
            "{} trailing bytes",
            slice.len()
        )));
    }
    let degree = usize::try_from(degree)
        .map_err(|_| SrsSetupError::Validation(format!("degree {degree} exceeds usize")))?;

    // Layer 2: structure
    if degree < min_degree {
        return Err(SrsSetupError::Validation(format!(
            "SRS has degree {degree}, need at least {min_degree}"
        )));
    }
    if degree.checked_add(1).map_or(true, |needed| g1.len() < needed) {
        return Err(SrsSetupError::Validation(format!(
            "SRS claims degree {degree} but holds only {} G1 powers",
            g1.len()
        )));
    }
    if g1.first() != Some(&G1Affine::generator()) {
        return Err(SrsSetupError::Validation(
            "G1 SRS first element is not the generator (possible corruption or wrong curve)".into(),
        ));
    }
    if g2.first() != Some(&G2Affine::generator()) {
        return Err(SrsSetupError::Validation(
            "G2 SRS first element is not the generator".into(),
        ));
    }
    if g2.get(1).map_or(true, |p| p.is_zero()) {
        return Err(SrsSetupError::Validation(
            "α·G₂ is missing or the point at infinity (invalid SRS)".into(),
        ));
    }

    Ok(Srs::from_public_parts(degree, g1, g2)?)
}

/// Load an SRS from `path` and validate its structure.
pub fn load_and_validate_srs(
    path: impl AsRef<Path>,
    min_degree: usize,
) -> Result<Srs, SrsSetupError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let srs = decode_srs(&bytes, min_degree)?;
    debug!(path = %path.display(), max_degree = srs.max_degree(), "loaded SRS");
    Ok(srs)
}

// ============================================================================
// Pairing validation
// ============================================================================

/// Check that the G1 and G2 powers were built from the same `α`.
///
/// Verifies `e([α^{k+1}]G₁, G₂) = e([α^k]G₁, [α]G₂)` at the first and last
/// index, and `e(G₁, [α^k]G₂) = e([α^k]G₁, G₂)` at the last shared index.
pub fn validate_srs_pairing(srs: &Srs) -> Result<(), SrsSetupError> {
    let g1 = srs.g1_powers();
    let g2 = srs.g2_powers();
    if g1.len() < 2 || g2.len() < 2 {
        return Err(SrsSetupError::Validation(
            "need at least 2 G1 and 2 G2 powers for pairing check".into(),
        ));
    }

    let g2_gen = g2[0];
    let tau_g2 = g2[1];
    for k in [0, g1.len() - 2] {
        if Bn254::pairing(g1[k + 1], g2_gen) != Bn254::pairing(g1[k], tau_g2) {
            return Err(SrsSetupError::PairingCheck(format!(
                "G1 powers {k}, {} do not satisfy e(α^(k+1)G₁, G₂) = e(α^k G₁, αG₂)",
                k + 1
            )));
        }
    }

    let last = g1.len().min(g2.len()) - 1;
    if Bn254::pairing(g1[0], g2[last]) != Bn254::pairing(g1[last], g2_gen) {
        return Err(SrsSetupError::PairingCheck(format!(
            "G1/G2 powers disagree at index {last}"
        )));
    }
    Ok(())
}

// ============================================================================
// Digests
// ============================================================================

fn hash_bytes(parts: &[&[u8]]) -> [u8; 32] {
    let mut h = Hasher::new();
    h.update(b"POLYCOMMIT.SRS.v1");
    for p in parts {
        h.update(&((*p).len() as u64).to_be_bytes());
        h.update(p);
    }
    *h.finalize().as_bytes()
}

/// Stable 32-byte digest of the public SRS, for audit logs.
pub fn srs_digest(srs: &Srs) -> Result<[u8; 32], SrsSetupError> {
    let bytes = encode_srs(srs)?;
    Ok(hash_bytes(&[&bytes]))
}

/// Compare the digest of `srs` against a known-good value.
pub fn verify_srs_digest(srs: &Srs, expected: [u8; 32]) -> Result<(), SrsSetupError> {
    let actual = srs_digest(srs)?;
    if actual != expected {
        return Err(SrsSetupError::Validation(format!(
            "SRS digest mismatch:\n  expected: {}\n  actual:   {}\n\
             This indicates wrong SRS file or corruption.",
            hex::encode(expected),
            hex::encode(actual)
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
