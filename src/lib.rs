//! Crate root: public surface, curve aliases, and scheme-wide invariants
//!
//! `polycommit` implements the KZG polynomial commitment scheme
//! (`PolyCommit_DL` of Kate, Zaverucha and Goldberg) over BN254: a trusted
//! setup, a homomorphic commitment to a bounded-degree polynomial, an
//! evaluation proof (witness), and a single-pairing-equation verifier.
//!
//! ## Invariants
//!
//! - **Field & Curve.** Scalars are [`field::FieldElement`]s tagged with their
//!   modulus. Anything that touches the curve requires that modulus to be the
//!   BN254 group order (`ark_bn254::Fr::MODULUS`); group primitives are the
//!   Arkworks ones. We **forbid unsafe** throughout the crate.
//!
//! - **Setup.** An [`Srs`] is built once and then only read. It is passed by
//!   reference into every commit/open/verify call and is `Send + Sync`, so any
//!   number of threads may share it without locking. The production
//!   constructor never retains the secret `α`.
//!
//! - **Commitment.** `commit(φ) = Σ φ_i · [α^i]G₁`. The map is a group
//!   homomorphism, so the sum may be reduced in any order or in parallel.
//!
//! - **Opening.** The witness for point `i` is `commit(ψ)` with
//!   `ψ(X) = (φ(X) − φ(i)) / (X − i)`. The direct (quadratic) and the
//!   synthetic-division (linear) paths return the same affine point.
//!
//! - **Verification.** `e(W, [α − i]G₂) · e(−(C − y·G₁), G₂) = 1`. A failed
//!   check is `Ok(false)`; errors are reserved for malformed or mismatched
//!   inputs.
//!
//! ```
//! use polycommit::{commit, open, verify, srs::bn254_scalar_field, Srs};
//!
//! let f = bn254_scalar_field();
//! let srs = Srs::generate(&f, 3)?;
//! let phi = [f.element(3u8), f.element(2u8), f.element(1u8)];
//!
//! let c = commit::commit(&srs, &phi)?;
//! let proof = open::open(&srs, &phi, &f.element(2u8))?;
//! assert_eq!(proof.value, f.element(11u8));
//! assert!(verify::verify(&srs, &c, &proof.point, &proof.value, &proof.witness)?);
//! # Ok::<(), polycommit::KzgError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Prime-field arithmetic with a runtime modulus.
pub mod field;
/// Dense polynomials: Horner evaluation, long and synthetic division.
pub mod poly;
/// Structured reference string (powers of α in G1/G2) and its generation.
pub mod srs;
/// SRS persistence, validation, and digests.
pub mod srs_setup;
/// Commitments to coefficient vectors.
pub mod commit;
/// Evaluation proofs (witnesses).
pub mod open;
/// Pairing-based verification of evaluation proofs.
pub mod verify;
/// Text and binary encodings for points and field values.
pub mod wire;
/// Configuration shared by the command-line tools.
pub mod config;

// ============================================================================
// Canonical aliases and root-level re-exports
// ============================================================================

/// G1 affine group element used for commitments and witnesses.
pub type G1 = ark_bn254::G1Affine;

/// G2 affine group element used by the verifier.
pub type G2 = ark_bn254::G2Affine;

/// Scalar field of the BN254 groups.
pub type Scalar = ark_bn254::Fr;

pub use crate::commit::Commitment;
pub use crate::field::{FieldElement, FieldError, GaloisField};
pub use crate::open::OpeningProof;
pub use crate::srs::Srs;

/// Errors produced by commitment, opening and verification.
#[derive(Debug, thiserror::Error)]
pub enum KzgError {
    /// Undefined field operation or modulus mismatch (including a field that
    /// does not match the curve's group order).
    #[error(transparent)]
    Field(#[from] FieldError),
    /// The polynomial needs more powers than the setup provides.
    #[error("setup too small: polynomial has {terms} coefficients, setup supports {capacity}")]
    SetupTooSmall {
        /// Number of coefficients (or G2 powers) requested.
        terms: usize,
        /// Number available in the setup.
        capacity: usize,
    },
    /// A persisted group element or field value could not be decoded.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The requested degree does not fit the power count in a `usize`.
    #[error("setup degree {max_degree} is too large")]
    DegreeOverflow {
        /// Degree that was requested (or read from a file).
        max_degree: usize,
    },
    /// A trusted-mode operation was called on a setup without `α` powers.
    #[error("setup carries no trapdoor powers (built without the insecure trusted mode)")]
    TrapdoorUnavailable,
}

impl KzgError {
    /// Whether this is a division-by-zero or other undefined field operation.
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, KzgError::Field(FieldError::DivisionByZero))
    }

    /// Whether this is a modulus/curve mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, KzgError::Field(FieldError::TypeMismatch { .. }))
    }
}
