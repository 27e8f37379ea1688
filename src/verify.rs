//! Verification of Evaluation Proofs
//!
//! Given a commitment `C = [φ(α)]G₁`, a point `i`, a claimed value `y` and a
//! witness `W = [ψ(α)]G₁`, accept iff
//!
//! ```text
//! e(W, [α]G₂ − i·G₂) · e(−(C − y·G₁), G₂) = 1
//! ```
//!
//! i.e. `ψ(α)·(α − i) = φ(α) − y` in the exponent. Only `G₂` and `[α]G₂` are
//! read from the setup; the secret is never needed.
//!
//! A failed equation is `Ok(false)`, never an error: a cheating prover or
//! tampered data is an expected outcome. Errors are reserved for inputs that
//! cannot be checked at all (foreign field, missing G2 powers, undecodable
//! wire text).

#![forbid(unsafe_code)]

use ark_bn254::Bn254;
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, Group};
use ark_ff::{One, PrimeField};
use tracing::trace;

use crate::commit::Commitment;
use crate::field::FieldElement;
use crate::open::OpeningProof;
use crate::srs::{to_scalar, Srs};
use crate::wire;
use crate::KzgError;

/// Check `(commitment, point, value, witness)` with one pairing product.
///
/// # Errors
/// - Type mismatch if `point` or `value` is outside the setup's field.
/// - [`KzgError::SetupTooSmall`] if the setup has no `[α]G₂`.
pub fn verify(
    srs: &Srs,
    commitment: &Commitment,
    point: &FieldElement,
    value: &FieldElement,
    witness: &Commitment,
) -> Result<bool, KzgError> {
    srs.ensure_in_field([point, value])?;
    let tau_g2 = srs.tau_g2()?;
    let g1 = srs.g1_generator();
    let g2 = srs.g2_generator();

    // [α − i]G2
    let g2_x_sub_i =
        (tau_g2.into_group() - g2.into_group().mul_bigint(to_scalar(point).into_bigint())).into_affine();
    // −(C − y·G1)
    let g1_phi_sub_y = commitment.0.into_group() - g1.into_group().mul_bigint(to_scalar(value).into_bigint());
    let minus_phi_sub_y = (-g1_phi_sub_y).into_affine();

    let a_all = vec![
        <Bn254 as Pairing>::G1Prepared::from(witness.0),
        <Bn254 as Pairing>::G1Prepared::from(minus_phi_sub_y),
    ];
    let b_all = vec![
        <Bn254 as Pairing>::G2Prepared::from(g2_x_sub_i),
        <Bn254 as Pairing>::G2Prepared::from(g2),
    ];

    let mlo = <Bn254 as Pairing>::multi_miller_loop(a_all, b_all);
    let accepted = <Bn254 as Pairing>::final_exponentiation(mlo).map_or(false, |fe| fe.0.is_one());
    trace!(accepted, "pairing check");
    Ok(accepted)
}

/// [`verify`] for an [`OpeningProof`] produced by `open`.
pub fn verify_proof(
    srs: &Srs,
    commitment: &Commitment,
    proof: &OpeningProof,
) -> Result<bool, KzgError> {
    verify(srs, commitment, &proof.point, &proof.value, &proof.witness)
}

/// Decode text-encoded commitment, value and witness, then [`verify`].
///
/// # Errors
/// [`KzgError::MalformedInput`] if any text fails to decode; no pairing work
/// is done in that case.
pub fn verify_encoded(
    srs: &Srs,
    commitment: &str,
    point: &FieldElement,
    value: &str,
    witness: &str,
) -> Result<bool, KzgError> {
    let commitment = wire::decode_commitment(commitment)?;
    let value = wire::decode_value(srs.field(), value)?;
    let witness = wire::decode_commitment(witness)?;
    verify(srs, &commitment, point, &value, &witness)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::commit;
    use crate::field::GaloisField;
    use crate::open::{open, open_direct};
    use crate::poly;
    use crate::srs::bn254_scalar_field;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(t: usize, seed: u64) -> (GaloisField, Srs, StdRng) {
        let f = bn254_scalar_field();
        let mut rng = StdRng::seed_from_u64(seed);
        let srs = Srs::generate_with_rng(&f, t, &mut rng).unwrap();
        (f, srs, rng)
    }

    #[test]
    fn worked_example_accepts_true_value_only() {
        let f = bn254_scalar_field();
        let srs = Srs::generate(&f, 3).unwrap();
        let phi = [f.element(3u8), f.element(2u8), f.element(1u8)];
        let c = commit(&srs, &phi).unwrap();
        let i = f.element(2u8);

        let proof = open(&srs, &phi, &i).unwrap();
        assert_eq!(proof.value, f.element(11u8));
        assert!(verify(&srs, &c, &i, &f.element(11u8), &proof.witness).unwrap());
        assert!(!verify(&srs, &c, &i, &f.element(12u8), &proof.witness).unwrap());
    }

    #[test]
    fn honest_openings_always_verify() {
        let (f, srs, mut rng) = setup(7, 21);
        for len in [1usize, 3, 8] {
            let phi: Vec<_> = (0..len).map(|_| f.random_with(&mut rng)).collect();
            let c = commit(&srs, &phi).unwrap();
            let i = f.random_with(&mut rng);
            let proof = open(&srs, &phi, &i).unwrap();
            assert_eq!(proof.value, poly::evaluate(&i, &phi));
            assert!(verify_proof(&srs, &c, &proof).unwrap());
            assert!(verify_proof(&srs, &c, &open_direct(&srs, &phi, &i).unwrap()).unwrap());
        }
    }

    #[test]
    fn tampered_value_is_rejected() {
        let (f, srs, mut rng) = setup(5, 22);
        let phi: Vec<_> = (0..6).map(|_| f.random_with(&mut rng)).collect();
        let c = commit(&srs, &phi).unwrap();
        let i = f.random_with(&mut rng);
        let proof = open(&srs, &phi, &i).unwrap();

        let mut delta = f.random_with(&mut rng);
        if delta.is_zero() {
            delta = f.one();
        }
        let forged = &proof.value + &delta;
        assert!(!verify(&srs, &c, &i, &forged, &proof.witness).unwrap());
    }

    #[test]
    fn substituted_witness_is_rejected() {
        let (f, srs, mut rng) = setup(5, 23);
        let phi: Vec<_> = (0..6).map(|_| f.random_with(&mut rng)).collect();
        let other: Vec<_> = (0..6).map(|_| f.random_with(&mut rng)).collect();
        let c = commit(&srs, &phi).unwrap();
        let i = f.random_with(&mut rng);
        let j = f.random_with(&mut rng);
        let proof = open(&srs, &phi, &i).unwrap();

        let foreign_poly = open(&srs, &other, &i).unwrap().witness;
        let foreign_point = open(&srs, &phi, &j).unwrap().witness;
        assert!(!verify(&srs, &c, &i, &proof.value, &foreign_poly).unwrap());
        assert!(!verify(&srs, &c, &i, &proof.value, &foreign_point).unwrap());
        // Right witness, wrong commitment.
        let c_other = commit(&srs, &other).unwrap();
        assert!(!verify(&srs, &c_other, &i, &proof.value, &proof.witness).unwrap());
    }

    #[test]
    fn one_commitment_serves_many_points() {
        let (f, srs, mut rng) = setup(4, 24);
        let phi: Vec<_> = (0..5).map(|_| f.random_with(&mut rng)).collect();
        let c = commit(&srs, &phi).unwrap();
        for k in 0..4u8 {
            let proof = open(&srs, &phi, &f.element(k)).unwrap();
            assert!(verify_proof(&srs, &c, &proof).unwrap());
            // Re-verification is idempotent.
            assert!(verify_proof(&srs, &c, &proof).unwrap());
        }
    }

    #[test]
    fn encoded_inputs_verify_and_malformed_ones_error() {
        let (f, srs, _) = setup(3, 25);
        let phi = [f.element(3u8), f.element(2u8), f.element(1u8)];
        let c = wire::encode_commitment(&commit(&srs, &phi).unwrap());
        let i = f.element(2u8);
        let proof = open(&srs, &phi, &i).unwrap();
        let w = wire::encode_commitment(&proof.witness);
        let y = wire::encode_value(&proof.value);

        assert!(verify_encoded(&srs, &c, &i, &y, &w).unwrap());
        assert!(!verify_encoded(&srs, &c, &i, "12", &w).unwrap());
        assert!(matches!(
            verify_encoded(&srs, "1;2", &i, &y, &w),
            Err(KzgError::MalformedInput(_))
        ));
        assert!(matches!(
            verify_encoded(&srs, &c, &i, &y, "1,1"),
            Err(KzgError::MalformedInput(_))
        ));
    }

    #[test]
    fn foreign_field_inputs_are_type_mismatch() {
        let (f, srs, _) = setup(2, 26);
        let g = GaloisField::from_u64(101).unwrap();
        let c = Commitment::identity();
        assert!(verify(&srs, &c, &g.one(), &f.one(), &c).unwrap_err().is_type_mismatch());
    }

    #[test]
    fn field_only_setup_cannot_verify() {
        let f = bn254_scalar_field();
        let srs = Srs::from_secret_insecure(&f, 2, false, &f.element(3u8)).unwrap();
        let c = Commitment::identity();
        assert!(matches!(
            verify(&srs, &c, &f.one(), &f.one(), &c),
            Err(KzgError::SetupTooSmall { .. })
        ));
    }
}
