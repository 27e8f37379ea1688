//! Wire Encodings for Commitments, Witnesses, and Claimed Values
//!
//! ## Text (compatibility format)
//!
//! ```text
//! point  := x "," y        affine coordinates, decimal, each < Fq modulus
//! ident  := "0,0"          the point at infinity
//! value  := decimal        field value, < field modulus
//! ```
//!
//! The text form carries no curve or field tag; both ends must agree on
//! BN254 out of band.
//!
//! ## Binary
//!
//! ```text
//! b"KZG1" | curve tag (1 = BN254 G1) | ark-compressed G1Affine (32 bytes)
//! ```
//!
//! Every decoder validates before returning: arity, digits, coordinate range,
//! curve membership, subgroup membership. Failures are
//! [`KzgError::MalformedInput`].

#![forbid(unsafe_code)]

use ark_bn254::{Fq, G1Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;

use crate::commit::Commitment;
use crate::field::{FieldElement, GaloisField};
use crate::KzgError;

/// Separator between the two coordinates of a text-encoded point.
pub const POINT_DELIMITER: char = ',';

/// Prefix of every binary-encoded point.
pub const BINARY_MAGIC: &[u8; 4] = b"KZG1";

/// Curve tag for BN254 G1 in the binary encoding.
pub const CURVE_TAG_BN254_G1: u8 = 1;

fn malformed(msg: impl Into<String>) -> KzgError {
    KzgError::MalformedInput(msg.into())
}

fn base_field_modulus() -> BigUint {
    BigUint::from_bytes_le(&Fq::MODULUS.to_bytes_le())
}

fn parse_decimal(s: &str, what: &str) -> Result<BigUint, KzgError> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("{what}: not a decimal integer: {s:?}")));
    }
    s.parse::<BigUint>()
        .map_err(|e| malformed(format!("{what}: {e}")))
}

fn parse_coordinate(s: &str, what: &str) -> Result<Fq, KzgError> {
    let v = parse_decimal(s, what)?;
    if v >= base_field_modulus() {
        return Err(malformed(format!("{what}: coordinate out of range")));
    }
    Ok(Fq::from_le_bytes_mod_order(&v.to_bytes_le()))
}

fn coordinate_text(c: &Fq) -> String {
    BigUint::from_bytes_le(&c.into_bigint().to_bytes_le()).to_string()
}

// ============================================================================
// Text
// ============================================================================

/// `"x,y"` in decimal; the identity is `"0,0"`.
pub fn encode_point(p: &G1Affine) -> String {
    if p.is_zero() {
        return format!("0{POINT_DELIMITER}0");
    }
    format!(
        "{}{POINT_DELIMITER}{}",
        coordinate_text(&p.x),
        coordinate_text(&p.y)
    )
}

/// Parse and validate a text-encoded G1 point.
pub fn decode_point(s: &str) -> Result<G1Affine, KzgError> {
    let parts: Vec<&str> = s.split(POINT_DELIMITER).collect();
    let [xs, ys] = parts.as_slice() else {
        return Err(malformed(format!(
            "point: expected 2 coordinates, got {}",
            parts.len()
        )));
    };
    let x = parse_coordinate(xs, "point.x")?;
    let y = parse_coordinate(ys, "point.y")?;
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::identity());
    }

    let p = G1Affine::new_unchecked(x, y);
    if !p.is_on_curve() {
        return Err(malformed("point: not on BN254 G1"));
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(malformed("point: not in the prime-order subgroup"));
    }
    Ok(p)
}

/// Text encoding of a commitment or witness.
pub fn encode_commitment(c: &Commitment) -> String {
    encode_point(&c.0)
}

/// Decode a text-encoded commitment or witness.
pub fn decode_commitment(s: &str) -> Result<Commitment, KzgError> {
    decode_point(s).map(Commitment)
}

/// Decimal text of a field value.
pub fn encode_value(v: &FieldElement) -> String {
    v.to_string()
}

/// Parse a decimal field value, rejecting anything `>= modulus`.
pub fn decode_value(field: &GaloisField, s: &str) -> Result<FieldElement, KzgError> {
    let v = parse_decimal(s, "value")?;
    if &v >= field.modulus() {
        return Err(malformed("value: out of range for field"));
    }
    Ok(field.element(v))
}

// ============================================================================
// Binary
// ============================================================================

/// Tagged binary encoding (37 bytes).
pub fn encode_binary(c: &Commitment) -> Vec<u8> {
    let mut out = Vec::with_capacity(BINARY_MAGIC.len() + 1 + c.0.compressed_size());
    out.extend_from_slice(BINARY_MAGIC);
    out.push(CURVE_TAG_BN254_G1);
    // infallible: writes into a Vec
    c.0.serialize_compressed(&mut out)
        .expect("serializing into a Vec cannot fail");
    out
}

/// Decode a tagged binary point; checks magic, curve tag, and length.
pub fn decode_binary(bytes: &[u8]) -> Result<Commitment, KzgError> {
    let rest = bytes
        .strip_prefix(BINARY_MAGIC)
        .ok_or_else(|| malformed("binary: bad magic"))?;
    let (&tag, mut body) = rest
        .split_first()
        .ok_or_else(|| malformed("binary: missing curve tag"))?;
    if tag != CURVE_TAG_BN254_G1 {
        return Err(malformed(format!("binary: unsupported curve tag {tag}")));
    }
    let p = G1Affine::deserialize_compressed(&mut body)
        .map_err(|e| malformed(format!("binary: {e}")))?;
    if !body.is_empty() {
        return Err(malformed(format!("binary: {} trailing bytes", body.len())));
    }
    Ok(Commitment(p))
}

// ============================================================================
// Tests
// ============================================================================
