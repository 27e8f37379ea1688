//! Evaluation Proofs (Witnesses)
//!
//! For a committed `φ` and a point `i`, the witness is the commitment to
//!
//! ```text
//! ψ(X) = (φ(X) − φ(i)) / (X − i)
//! ```
//!
//! which is a polynomial because `i` is a root of the numerator.
//!
//! Two constructions return the **same affine point**:
//!
//! - [`open`] (production): evaluate `y = φ(i)`, subtract it from the constant
//!   term, synthetic-divide by `(X − i)` in `O(n)` field operations, then
//!   [`commit`](crate::commit::commit) the quotient.
//! - [`open_direct`] (cross-check): expand `ψ_j = Σ_{k≥j} φ_{k+1} · i^{k−j}`
//!   directly in the group, `O(n²)` scalar multiplications.
//!
//! Openings at different points share nothing mutable; [`open_many`] runs
//! them independently (in parallel with the `parallel` feature).

#![forbid(unsafe_code)]

use std::iter;

use ark_bn254::G1Projective;
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{PrimeField, Zero};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::commit::{commit, Commitment};
use crate::field::FieldElement;
use crate::poly;
use crate::srs::{to_scalar, Srs};
use crate::KzgError;

/// KZG opening of one polynomial at a single point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningProof {
    /// Evaluation point `i`.
    pub point: FieldElement,
    /// Claimed value `φ(i)`; must travel with the witness.
    pub value: FieldElement,
    /// Commitment to `ψ(X) = (φ(X) − φ(i)) / (X − i)`.
    pub witness: Commitment,
}

fn check_inputs(srs: &Srs, coeffs: &[FieldElement], point: &FieldElement) -> Result<(), KzgError> {
    srs.ensure_supports(coeffs.len())?;
    srs.ensure_in_field(coeffs.iter().chain(iter::once(point)))
}

/// `(ψ, φ(i))` where `ψ = (φ − φ(i)) / (X − i)`.
pub fn quotient(
    coeffs: &[FieldElement],
    point: &FieldElement,
) -> Result<(Vec<FieldElement>, FieldElement), KzgError> {
    for c in coeffs {
        point.ensure_same_field(c)?;
    }
    let value = poly::evaluate(point, coeffs);

    let mut shifted = coeffs.to_vec();
    if let Some(c0) = shifted.first_mut() {
        *c0 = &*c0 - &value;
    }
    let (q, remainder) = poly::divide_by_linear(&shifted, point)?;
    debug_assert!(remainder.is_zero(), "φ(X) − φ(i) must vanish at i");
    Ok((q, value))
}

/// Open `coeffs` at `point` via synthetic division (the production path).
///
/// # Errors
/// - [`KzgError::SetupTooSmall`] if the polynomial exceeds the setup degree.
/// - Type mismatch if any input is outside the setup's field.
pub fn open(
    srs: &Srs,
    coeffs: &[FieldElement],
    point: &FieldElement,
) -> Result<OpeningProof, KzgError> {
    check_inputs(srs, coeffs, point)?;
    let (q, value) = quotient(coeffs, point)?;
    let witness = commit(srs, &q)?;
    Ok(OpeningProof {
        point: point.clone(),
        value,
        witness,
    })
}

/// Open by direct double summation in the group, `O(n²)`.
pub fn open_direct(
    srs: &Srs,
    coeffs: &[FieldElement],
    point: &FieldElement,
) -> Result<OpeningProof, KzgError> {
    check_inputs(srs, coeffs, point)?;
    let n = coeffs.len();
    let point_powers: Vec<FieldElement> = iter::successors(Some(srs.field().one()), |p| Some(p * point))
        .take(n)
        .collect();
    let g1 = srs.g1_powers();

    let mut acc = G1Projective::zero();
    for k in 0..n.saturating_sub(1) {
        for j in (0..=k).rev() {
            let s = &point_powers[k - j] * &coeffs[k + 1];
            if s.is_zero() {
                continue;
            }
            acc += g1[j].into_group().mul_bigint(to_scalar(&s).into_bigint());
        }
    }

    Ok(OpeningProof {
        point: point.clone(),
        value: poly::evaluate(point, coeffs),
        witness: Commitment(acc.into_affine()),
    })
}

/// Open one polynomial at many points; each opening is independent.
pub fn open_many(
    srs: &Srs,
    coeffs: &[FieldElement],
    points: &[FieldElement],
) -> Result<Vec<OpeningProof>, KzgError> {
    debug!(points = points.len(), degree = coeffs.len().saturating_sub(1), "batch opening");
    #[cfg(feature = "parallel")]
    let proofs = points.par_iter().map(|p| open(srs, coeffs, p)).collect();
    #[cfg(not(feature = "parallel"))]
    let proofs = points.iter().map(|p| open(srs, coeffs, p)).collect();
    proofs
}

/// `ψ(α)` in the field, using the retained `α` powers (trusted mode only).
///
/// Satisfies `ψ(α) · (α − i) = φ(α) − φ(i)`.
pub fn open_trusted(
    srs: &Srs,
    coeffs: &[FieldElement],
    point: &FieldElement,
) -> Result<FieldElement, KzgError> {
    let alphas = srs.alpha_powers().ok_or(KzgError::TrapdoorUnavailable)?;
    let capacity = srs.max_degree().saturating_add(1).min(alphas.len());
    if coeffs.len() > capacity {
        return Err(KzgError::SetupTooSmall {
            terms: coeffs.len(),
            capacity,
        });
    }
    srs.ensure_in_field(coeffs.iter().chain(iter::once(point)))?;

    let n = coeffs.len();
    let point_powers: Vec<FieldElement> = iter::successors(Some(srs.field().one()), |p| Some(p * point))
        .take(n)
        .collect();

    let mut acc = srs.field().zero();
    for k in 0..n.saturating_sub(1) {
        for j in (0..=k).rev() {
            acc = &acc + &(&alphas[j] * &(&point_powers[k - j] * &coeffs[k + 1]));
        }
    }
    Ok(acc)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::commit_trusted;
    use crate::field::GaloisField;
    use crate::srs::bn254_scalar_field;
    use rand::{rngs::StdRng, SeedableRng};

    fn trusted_setup(t: usize, seed: u64) -> (GaloisField, Srs, StdRng) {
        let f = bn254_scalar_field();
        let mut rng = StdRng::seed_from_u64(seed);
        let alpha = f.random_with(&mut rng);
        let srs = Srs::from_secret_insecure(&f, t, true, &alpha).unwrap();
        (f, srs, rng)
    }

    #[test]
    fn worked_example_quotient_is_x_plus_four() {
        let (f, srs, _) = trusted_setup(3, 1);
        let phi = [f.element(3u8), f.element(2u8), f.element(1u8)];

        let proof = open(&srs, &phi, &f.element(2u8)).unwrap();
        assert_eq!(proof.value, f.element(11u8));
        // (x^2 + 2x - 8) / (x - 2) = x + 4
        let expected = commit(&srs, &[f.element(4u8), f.element(1u8)]).unwrap();
        assert_eq!(proof.witness, expected);
    }

    #[test]
    fn direct_and_synthetic_openings_agree() {
        let (f, srs, mut rng) = trusted_setup(9, 2);
        for len in [1usize, 2, 5, 10] {
            let phi: Vec<_> = (0..len).map(|_| f.random_with(&mut rng)).collect();
            let i = f.random_with(&mut rng);
            let fast = open(&srs, &phi, &i).unwrap();
            let slow = open_direct(&srs, &phi, &i).unwrap();
            assert_eq!(fast, slow);
        }
    }

    #[test]
    fn trapdoor_identity_holds() {
        let (f, srs, mut rng) = trusted_setup(8, 3);
        let phi: Vec<_> = (0..9).map(|_| f.random_with(&mut rng)).collect();
        let i = f.element(3u8);

        let alpha = &srs.alpha_powers().unwrap()[1];
        let psi_alpha = open_trusted(&srs, &phi, &i).unwrap();
        let phi_alpha = commit_trusted(&srs, &phi).unwrap();
        let y = poly::evaluate(&i, &phi);
        assert_eq!(&psi_alpha * &(alpha - &i), &phi_alpha - &y);

        // The group witness is [ψ(α)]G1.
        let w = open(&srs, &phi, &i).unwrap().witness;
        assert_eq!(w, Commitment(srs.g1_generator()).scale(&psi_alpha).unwrap());
    }

    #[test]
    fn constant_polynomial_has_identity_witness() {
        let (f, srs, _) = trusted_setup(2, 4);
        let proof = open(&srs, &[f.element(9u8)], &f.element(5u8)).unwrap();
        assert_eq!(proof.value, f.element(9u8));
        assert_eq!(proof.witness, Commitment::identity());
        assert_eq!(open_direct(&srs, &[f.element(9u8)], &f.element(5u8)).unwrap(), proof);
    }

    #[test]
    fn opening_beyond_setup_degree_fails() {
        let (f, srs, _) = trusted_setup(2, 5);
        let phi = vec![f.one(); 4];
        assert!(matches!(
            open(&srs, &phi, &f.one()),
            Err(KzgError::SetupTooSmall { .. })
        ));
        assert!(matches!(
            open_direct(&srs, &phi, &f.one()),
            Err(KzgError::SetupTooSmall { .. })
        ));
        assert!(matches!(
            open_trusted(&srs, &phi, &f.one()),
            Err(KzgError::SetupTooSmall { .. })
        ));
    }

    #[test]
    fn foreign_point_is_type_mismatch() {
        let (f, srs, _) = trusted_setup(2, 6);
        let g = GaloisField::from_u64(101).unwrap();
        assert!(open(&srs, &[f.one()], &g.one()).unwrap_err().is_type_mismatch());
    }

    #[test]
    fn batch_openings_match_individual_ones() {
        let (f, srs, mut rng) = trusted_setup(6, 7);
        let phi: Vec<_> = (0..7).map(|_| f.random_with(&mut rng)).collect();
        let points: Vec<_> = (0..5).map(|_| f.random_with(&mut rng)).collect();

        let batch = open_many(&srs, &phi, &points).unwrap();
        assert_eq!(batch.len(), points.len());
        for (proof, p) in batch.iter().zip(&points) {
            assert_eq!(proof, &open(&srs, &phi, p).unwrap());
        }
    }
}
