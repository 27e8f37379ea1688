//! Structured Reference String (SRS)
//!
//! The SRS holds powers of a secret scalar `α`:
//!
//! - **G1 powers**: `[α⁰·G₁, α¹·G₁, …, α^{t+1}·G₁]` (`t + 2` points)
//! - **G2 powers**: `[α⁰·G₂, α¹·G₂, …]`; the verifier only reads indices 0 and 1
//! - **α powers** (trusted/debug mode only): the same exponents as field
//!   elements, used by the trapdoor cross-checks in `commit`/`open`
//!
//! `t` is the maximum supported degree: commitments accept at most `t + 1`
//! coefficients even though one extra G1 power is computed.
//!
//! # Security Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SECURITY ASSUMPTION: α is unknown and destroyed            │
//! │                                                             │
//! │  IF attacker knows α:                                       │
//! │    → Can open a commitment to any value at any point        │
//! │    → COMPLETE BREAK of binding                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Srs::generate`] draws `α` from `OsRng` and drops it (and its powers)
//! before returning. [`Srs::from_secret_insecure`] accepts `α` from the
//! caller and keeps its powers; it exists for reproducible tests and the
//! trapdoor cross-checks and must never back a real deployment. This is a
//! single-party simulation, not a multi-party ceremony.

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::OnceLock;

use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInt, BigInteger, PrimeField};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::field::{FieldElement, FieldError, GaloisField};
use crate::KzgError;

// ============================================================================
// BN254 scalar field binding
// ============================================================================

/// The BN254 group order `r` as a big integer.
pub fn bn254_scalar_modulus() -> BigUint {
    BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le())
}

/// Field factory for `Z/rZ`, the only field whose elements may scale curve points.
///
/// Every call shares one modulus allocation, so same-field checks are a
/// pointer comparison in the common case.
pub fn bn254_scalar_field() -> GaloisField {
    static FIELD: OnceLock<GaloisField> = OnceLock::new();
    FIELD
        .get_or_init(|| {
            GaloisField::new(bn254_scalar_modulus()).unwrap_or_else(|e| unreachable!("{e}"))
        })
        .clone()
}

/// Fail with a type mismatch unless `field` is the BN254 scalar field.
pub(crate) fn ensure_curve_field(field: &GaloisField) -> Result<(), KzgError> {
    let r = bn254_scalar_modulus();
    if *field.modulus() == r {
        Ok(())
    } else {
        Err(FieldError::TypeMismatch {
            left: field.modulus().clone(),
            right: r,
        }
        .into())
    }
}

/// Reduce a field element into the curve's scalar field.
///
/// Callers must have checked the modulus with [`ensure_curve_field`].
#[inline]
pub(crate) fn to_scalar(e: &FieldElement) -> Fr {
    Fr::from_le_bytes_mod_order(&e.value().to_bytes_le())
}

/// Number of powers for degree `max_degree`: `max_degree + extra`, checked.
fn power_count(max_degree: usize, extra: usize) -> Result<usize, KzgError> {
    max_degree
        .checked_add(extra)
        .ok_or(KzgError::DegreeOverflow { max_degree })
}

/// `[1, x, x², …, x^{count−1}]` by repeated multiplication.
fn powers_of(x: &FieldElement, count: usize) -> Vec<FieldElement> {
    let mut out = Vec::with_capacity(count);
    let mut cur = x.field().one();
    for _ in 0..count {
        let next = &cur * x;
        out.push(cur);
        cur = next;
    }
    out
}

/// `[e·G]` for every exponent `e`, normalized to affine in one batch.
fn scale_generator<G: CurveGroup>(exponents: &[BigInt<4>]) -> Vec<G::Affine> {
    let gen = G::generator();
    #[cfg(feature = "parallel")]
    let projective: Vec<G> = exponents.par_iter().map(|e| gen.mul_bigint(e)).collect();
    #[cfg(not(feature = "parallel"))]
    let projective: Vec<G> = exponents.iter().map(|e| gen.mul_bigint(e)).collect();
    G::normalize_batch(&projective)
}

// ============================================================================
// SRS
// ============================================================================

/// Public parameters of the scheme, immutable once built.
#[derive(Clone)]
pub struct Srs {
    field: GaloisField,
    max_degree: usize,
    g1_powers: Vec<G1Affine>,
    g2_powers: Vec<G2Affine>,
    alpha_powers: Option<Vec<FieldElement>>,
}

impl fmt::Debug for Srs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Srs")
            .field("max_degree", &self.max_degree)
            .field("g1_powers", &self.g1_powers.len())
            .field("g2_powers", &self.g2_powers.len())
            .field("trapdoor", &self.alpha_powers.is_some())
            .finish()
    }
}

impl Srs {
    /// Production setup for polynomials of degree `<= max_degree`.
    ///
    /// `α` is drawn from the operating system CSPRNG and is not retained.
    ///
    /// # Errors
    /// [`FieldError::TypeMismatch`] if `field` is not the BN254 scalar field.
    pub fn generate(field: &GaloisField, max_degree: usize) -> Result<Self, KzgError> {
        Self::generate_with_rng(field, max_degree, &mut OsRng)
    }

    /// Production setup with a caller-supplied CSPRNG.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        field: &GaloisField,
        max_degree: usize,
        rng: &mut R,
    ) -> Result<Self, KzgError> {
        ensure_curve_field(field)?;
        let alpha = field.random_with(rng);
        let alpha_powers = powers_of(&alpha, power_count(max_degree, 2)?);
        let (g1_powers, g2_powers) = group_powers(&alpha_powers);
        debug!(
            max_degree,
            g1 = g1_powers.len(),
            g2 = g2_powers.len(),
            "generated SRS"
        );
        Ok(Self {
            field: field.clone(),
            max_degree,
            g1_powers,
            g2_powers,
            alpha_powers: None,
        })
    }

    /// **INSECURE** setup from a caller-chosen secret, keeping `α` powers.
    ///
    /// Anyone who knows `alpha` can forge openings. Use only for
    /// reproducible tests and trapdoor cross-checks. With
    /// `include_group_powers = false` only the field powers are computed and
    /// any field is accepted; such a setup can serve `commit_trusted` /
    /// `open_trusted` but not group commitments.
    pub fn from_secret_insecure(
        field: &GaloisField,
        max_degree: usize,
        include_group_powers: bool,
        alpha: &FieldElement,
    ) -> Result<Self, KzgError> {
        field.ensure_contains(alpha)?;
        if include_group_powers {
            ensure_curve_field(field)?;
        }
        warn!(
            max_degree,
            "building SRS from a caller-supplied secret; this setup is NOT secure"
        );

        let alpha_powers = powers_of(alpha, power_count(max_degree, 2)?);
        let (g1_powers, g2_powers) = if include_group_powers {
            group_powers(&alpha_powers)
        } else {
            (Vec::new(), Vec::new())
        };
        Ok(Self {
            field: field.clone(),
            max_degree,
            g1_powers,
            g2_powers,
            alpha_powers: Some(alpha_powers),
        })
    }

    /// Reassemble a setup from its public parts (e.g. after loading from disk).
    ///
    /// # Errors
    /// [`KzgError::SetupTooSmall`] if fewer than `max_degree + 1` G1 powers or
    /// fewer than two G2 powers are supplied.
    pub fn from_public_parts(
        max_degree: usize,
        g1_powers: Vec<G1Affine>,
        g2_powers: Vec<G2Affine>,
    ) -> Result<Self, KzgError> {
        let needed = power_count(max_degree, 1)?;
        if g1_powers.len() < needed {
            return Err(KzgError::SetupTooSmall {
                terms: needed,
                capacity: g1_powers.len(),
            });
        }
        if g2_powers.len() < 2 {
            return Err(KzgError::SetupTooSmall {
                terms: 2,
                capacity: g2_powers.len(),
            });
        }
        Ok(Self {
            field: bn254_scalar_field(),
            max_degree,
            g1_powers,
            g2_powers,
            alpha_powers: None,
        })
    }

    /// Scalar field the setup is defined over.
    #[inline]
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Maximum supported polynomial degree `t`.
    #[inline]
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// `[α^k]G₁` for `k = 0..=t+1` (empty in field-only trusted mode).
    #[inline]
    pub fn g1_powers(&self) -> &[G1Affine] {
        &self.g1_powers
    }

    /// `[α^k]G₂` (empty in field-only trusted mode).
    #[inline]
    pub fn g2_powers(&self) -> &[G2Affine] {
        &self.g2_powers
    }

    /// `α^k` as field elements; `None` unless built by [`Srs::from_secret_insecure`].
    #[inline]
    pub fn alpha_powers(&self) -> Option<&[FieldElement]> {
        self.alpha_powers.as_deref()
    }

    /// Number of coefficients a committed polynomial may have.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_degree.saturating_add(1).min(self.g1_powers.len())
    }

    /// Fail with [`KzgError::SetupTooSmall`] unless `terms` coefficients fit.
    pub fn ensure_supports(&self, terms: usize) -> Result<(), KzgError> {
        if terms > self.capacity() {
            return Err(KzgError::SetupTooSmall {
                terms,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    /// Fail with a type mismatch unless every element belongs to the setup's field.
    pub fn ensure_in_field<'a>(
        &self,
        elements: impl IntoIterator<Item = &'a FieldElement>,
    ) -> Result<(), KzgError> {
        for e in elements {
            self.field.ensure_contains(e)?;
        }
        Ok(())
    }

    /// `[α]G₂`, the only non-generator G2 element the verifier needs.
    pub fn tau_g2(&self) -> Result<G2Affine, KzgError> {
        self.g2_powers
            .get(1)
            .copied()
            .ok_or(KzgError::SetupTooSmall {
                terms: 2,
                capacity: self.g2_powers.len(),
            })
    }

    /// G1 generator (`g1_powers[0]` for a well-formed setup).
    #[inline]
    pub fn g1_generator(&self) -> G1Affine {
        G1Affine::generator()
    }

    /// G2 generator.
    #[inline]
    pub fn g2_generator(&self) -> G2Affine {
        G2Affine::generator()
    }
}

fn group_powers(alpha_powers: &[FieldElement]) -> (Vec<G1Affine>, Vec<G2Affine>) {
    let exponents: Vec<BigInt<4>> = alpha_powers
        .iter()
        .map(|a| to_scalar(a).into_bigint())
        .collect();
    (
        scale_generator::<G1Projective>(&exponents),
        scale_generator::<G2Projective>(&exponents),
    )
}

// ============================================================================
// Tests
// ============================================================================
