//! Commitments — `φ ↦ [φ(α)]G₁`
//!
//! A commitment is the multi-scalar sum `Σ φ_i · [α^i]G₁` over the setup's
//! G1 powers. The map is a group homomorphism:
//!
//! - `commit(f + g) = commit(f) + commit(g)`
//! - `commit(c · f) = c · commit(f)`
//!
//! so terms can be accumulated in any order. With the `parallel` feature,
//! sums of at least [`PARALLEL_MIN_TERMS`] terms are split across the rayon
//! pool and reduced; the affine result is identical to the sequential fold.

#![forbid(unsafe_code)]

use std::ops::{Add, Neg, Sub};

use ark_bn254::{G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::field::FieldElement;
use crate::srs::{ensure_curve_field, to_scalar, Srs};
use crate::KzgError;

/// Minimum number of terms before a sum is fanned out to the rayon pool.
pub const PARALLEL_MIN_TERMS: usize = 32;

/// Commitment to a polynomial (or, as a witness, to a quotient): one G1 point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Commitment(pub G1Affine);

impl Commitment {
    /// Commitment to the zero polynomial (the group identity).
    pub fn identity() -> Self {
        Commitment(G1Affine::identity())
    }

    /// Underlying affine point.
    #[inline]
    pub fn point(&self) -> G1Affine {
        self.0
    }

    /// Scalar action `c · C`, the image of `c · φ`.
    ///
    /// # Errors
    /// Type mismatch if `c` is not a BN254 scalar.
    pub fn scale(&self, c: &FieldElement) -> Result<Commitment, KzgError> {
        ensure_curve_field(&c.field())?;
        Ok(Commitment(
            self.0
                .into_group()
                .mul_bigint(to_scalar(c).into_bigint())
                .into_affine(),
        ))
    }
}

impl Add for Commitment {
    type Output = Commitment;
    fn add(self, rhs: Commitment) -> Commitment {
        Commitment((self.0.into_group() + rhs.0).into_affine())
    }
}

impl Sub for Commitment {
    type Output = Commitment;
    fn sub(self, rhs: Commitment) -> Commitment {
        Commitment((self.0.into_group() - rhs.0).into_affine())
    }
}

impl Neg for Commitment {
    type Output = Commitment;
    fn neg(self) -> Commitment {
        Commitment(-self.0)
    }
}

/// `Σ scalars[i] · bases[i]`; zero scalars are skipped.
pub(crate) fn msm(bases: &[G1Affine], scalars: &[FieldElement]) -> G1Projective {
    let term = |(base, c): (&G1Affine, &FieldElement)| -> G1Projective {
        if c.is_zero() {
            G1Projective::zero()
        } else {
            base.into_group().mul_bigint(to_scalar(c).into_bigint())
        }
    };

    #[cfg(feature = "parallel")]
    {
        if scalars.len() >= PARALLEL_MIN_TERMS {
            trace!(terms = scalars.len(), "parallel msm");
            return bases
                .par_iter()
                .zip(scalars.par_iter())
                .map(term)
                .reduce(G1Projective::zero, |a, b| a + b);
        }
    }

    bases
        .iter()
        .zip(scalars)
        .map(term)
        .fold(G1Projective::zero(), |acc, t| acc + t)
}

/// Commit to `coeffs` (ascending powers).
///
/// # Errors
/// - [`KzgError::SetupTooSmall`] if `coeffs.len() > t + 1`.
/// - Type mismatch if a coefficient is not in the setup's field.
pub fn commit(srs: &Srs, coeffs: &[FieldElement]) -> Result<Commitment, KzgError> {
    srs.ensure_supports(coeffs.len())?;
    srs.ensure_in_field(coeffs)?;
    let bases = &srs.g1_powers()[..coeffs.len()];
    Ok(Commitment(msm(bases, coeffs).into_affine()))
}

/// `φ(α)` in the field, using the retained `α` powers (trusted mode only).
///
/// # Errors
/// [`KzgError::TrapdoorUnavailable`] for a production setup.
pub fn commit_trusted(srs: &Srs, coeffs: &[FieldElement]) -> Result<FieldElement, KzgError> {
    let alphas = srs.alpha_powers().ok_or(KzgError::TrapdoorUnavailable)?;
    let capacity = srs.max_degree().saturating_add(1).min(alphas.len());
    if coeffs.len() > capacity {
        return Err(KzgError::SetupTooSmall {
            terms: coeffs.len(),
            capacity,
        });
    }
    srs.ensure_in_field(coeffs)?;

    Ok(alphas
        .iter()
        .zip(coeffs)
        .fold(srs.field().zero(), |acc, (a, c)| &acc + &(a * c)))
}

// ============================================================================
// Tests
// ============================================================================
