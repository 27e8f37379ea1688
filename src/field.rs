//! Prime-Field Arithmetic with a Runtime Modulus
//!
//! [`FieldElement`] is an immutable `(value, modulus)` pair with
//! `0 <= value < modulus`; [`GaloisField`] is the factory that owns one
//! modulus and hands out elements, random samples, and roots of unity.
//!
//! ## Invariants
//! - Every element produced by this module is reduced (`value < modulus`).
//! - Elements of different moduli never combine. The operator impls
//!   (`+ - * neg`) **panic** on a mismatch; the `checked_*` methods return
//!   [`FieldError::TypeMismatch`] instead.
//! - `inverse` of zero is [`FieldError::DivisionByZero`]. Inversion uses
//!   Fermat's little theorem, so the modulus must be prime.
//!
//! Commitment-side code converts elements into `ark_bn254::Fr` only after
//! checking that the modulus equals the BN254 group order (see `srs`).

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use num_bigint::{BigUint, RandBigInt};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Errors raised by field construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// No multiplicative inverse exists (the operand is zero).
    #[error("division by zero: element has no multiplicative inverse")]
    DivisionByZero,
    /// Operands belong to fields with different moduli.
    #[error("modulus mismatch: {left} vs {right}")]
    TypeMismatch {
        /// Modulus of the left operand.
        left: BigUint,
        /// Modulus of the right operand.
        right: BigUint,
    },
    /// The modulus cannot define a field (must be at least 2).
    #[error("invalid modulus {0}")]
    InvalidModulus(BigUint),
    /// No subgroup of the requested order exists in the multiplicative group.
    #[error("no primitive root of order {order}: order must be >= 2 and divide modulus - 1")]
    InvalidRootOrder {
        /// Requested multiplicative order.
        order: u64,
    },
}

/// Element of `Z/pZ`, carrying its modulus as a tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement {
    value: BigUint,
    modulus: Arc<BigUint>,
}

impl FieldElement {
    /// Canonical representative in `[0, modulus)`.
    #[inline]
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Modulus this element is tagged with.
    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Factory for the field this element lives in.
    pub fn field(&self) -> GaloisField {
        GaloisField {
            modulus: Arc::clone(&self.modulus),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value.bits() == 0
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.value == BigUint::from(1u8)
    }

    /// Whether `other` carries the same modulus.
    #[inline]
    pub fn same_field(&self, other: &FieldElement) -> bool {
        Arc::ptr_eq(&self.modulus, &other.modulus) || self.modulus == other.modulus
    }

    /// Fail with [`FieldError::TypeMismatch`] unless both operands share a modulus.
    pub fn ensure_same_field(&self, other: &FieldElement) -> Result<(), FieldError> {
        if self.same_field(other) {
            Ok(())
        } else {
            Err(FieldError::TypeMismatch {
                left: (*self.modulus).clone(),
                right: (*other.modulus).clone(),
            })
        }
    }

    fn with_value(&self, value: BigUint) -> FieldElement {
        FieldElement {
            value,
            modulus: Arc::clone(&self.modulus),
        }
    }

    fn add_unchecked(&self, other: &FieldElement) -> FieldElement {
        self.with_value((&self.value + &other.value) % &*self.modulus)
    }

    fn sub_unchecked(&self, other: &FieldElement) -> FieldElement {
        // value + (m - other) stays non-negative without a signed type.
        let lifted = &self.value + &*self.modulus - &other.value;
        self.with_value(lifted % &*self.modulus)
    }

    fn mul_unchecked(&self, other: &FieldElement) -> FieldElement {
        self.with_value((&self.value * &other.value) % &*self.modulus)
    }

    pub fn checked_add(&self, other: &FieldElement) -> Result<FieldElement, FieldError> {
        self.ensure_same_field(other)?;
        Ok(self.add_unchecked(other))
    }

    pub fn checked_sub(&self, other: &FieldElement) -> Result<FieldElement, FieldError> {
        self.ensure_same_field(other)?;
        Ok(self.sub_unchecked(other))
    }

    pub fn checked_mul(&self, other: &FieldElement) -> Result<FieldElement, FieldError> {
        self.ensure_same_field(other)?;
        Ok(self.mul_unchecked(other))
    }

    /// `self / other`, failing on a zero divisor or a modulus mismatch.
    pub fn checked_div(&self, other: &FieldElement) -> Result<FieldElement, FieldError> {
        self.ensure_same_field(other)?;
        Ok(self.mul_unchecked(&other.inverse()?))
    }

    /// Equality that refuses to compare across moduli.
    pub fn try_eq(&self, other: &FieldElement) -> Result<bool, FieldError> {
        self.ensure_same_field(other)?;
        Ok(self.value == other.value)
    }

    /// Multiplicative inverse, `value^(p-2) mod p`.
    pub fn inverse(&self) -> Result<FieldElement, FieldError> {
        if self.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        let exp = &*self.modulus - BigUint::from(2u8);
        Ok(self.with_value(self.value.modpow(&exp, &self.modulus)))
    }

    /// Modular exponentiation by a non-negative exponent.
    pub fn pow(&self, exp: u64) -> FieldElement {
        self.with_value(self.value.modpow(&BigUint::from(exp), &self.modulus))
    }

    /// Exponentiation by a signed exponent; `x^(-e) = (x^-1)^e`.
    pub fn pow_signed(&self, exp: i64) -> Result<FieldElement, FieldError> {
        if exp >= 0 {
            Ok(self.pow(exp as u64))
        } else {
            Ok(self.inverse()?.pow(exp.unsigned_abs()))
        }
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn assert_same_field(a: &FieldElement, b: &FieldElement) {
    if let Err(e) = a.ensure_same_field(b) {
        panic!("{e}");
    }
}

// Operator impls. Mixing moduli is a programming error, so these panic.

impl<'a> Add<&'a FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &'a FieldElement) -> FieldElement {
        assert_same_field(self, rhs);
        self.add_unchecked(rhs)
    }
}

impl Add for FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: FieldElement) -> FieldElement {
        &self + &rhs
    }
}

impl<'a> Sub<&'a FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &'a FieldElement) -> FieldElement {
        assert_same_field(self, rhs);
        self.sub_unchecked(rhs)
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: FieldElement) -> FieldElement {
        &self - &rhs
    }
}

impl<'a> Mul<&'a FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &'a FieldElement) -> FieldElement {
        assert_same_field(self, rhs);
        self.mul_unchecked(rhs)
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: FieldElement) -> FieldElement {
        &self * &rhs
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        if self.is_zero() {
            return self.clone();
        }
        self.with_value(&*self.modulus - &self.value)
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        -&self
    }
}

/// Factory for elements of one prime field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaloisField {
    modulus: Arc<BigUint>,
}

impl GaloisField {
    /// Field of integers modulo `modulus` (caller guarantees primality).
    pub fn new(modulus: BigUint) -> Result<Self, FieldError> {
        if modulus < BigUint::from(2u8) {
            return Err(FieldError::InvalidModulus(modulus));
        }
        Ok(Self {
            modulus: Arc::new(modulus),
        })
    }

    /// Convenience constructor for small test fields.
    pub fn from_u64(modulus: u64) -> Result<Self, FieldError> {
        Self::new(BigUint::from(modulus))
    }

    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Element congruent to `value`.
    pub fn element(&self, value: impl Into<BigUint>) -> FieldElement {
        FieldElement {
            value: value.into() % &*self.modulus,
            modulus: Arc::clone(&self.modulus),
        }
    }

    /// Element congruent to a signed integer.
    pub fn from_i64(&self, value: i64) -> FieldElement {
        let e = self.element(value.unsigned_abs());
        if value < 0 {
            -e
        } else {
            e
        }
    }

    pub fn zero(&self) -> FieldElement {
        self.element(0u8)
    }

    pub fn one(&self) -> FieldElement {
        self.element(1u8)
    }

    /// Whether `e` was produced for this modulus.
    pub fn contains(&self, e: &FieldElement) -> bool {
        Arc::ptr_eq(&self.modulus, &e.modulus) || *self.modulus == *e.modulus
    }

    /// Fail with [`FieldError::TypeMismatch`] unless `e` belongs to this field.
    pub fn ensure_contains(&self, e: &FieldElement) -> Result<(), FieldError> {
        if self.contains(e) {
            Ok(())
        } else {
            Err(FieldError::TypeMismatch {
                left: (*self.modulus).clone(),
                right: e.modulus().clone(),
            })
        }
    }

    /// Uniform element drawn from the operating system CSPRNG.
    pub fn random(&self) -> FieldElement {
        self.random_with(&mut OsRng)
    }

    /// Uniform element drawn from a caller-supplied CSPRNG.
    pub fn random_with<R: RngCore + CryptoRng>(&self, rng: &mut R) -> FieldElement {
        FieldElement {
            value: rng.gen_biguint_below(&self.modulus),
            modulus: Arc::clone(&self.modulus),
        }
    }

    /// Element of multiplicative order `n`.
    ///
    /// Tries `g = x^((p-1)/n)` for `x = 2, 3, …` and returns the first `g`
    /// with `g^(n/q) != 1` for every prime `q | n`, so the order is exactly `n`.
    pub fn primitive_root(&self, n: u64) -> Result<FieldElement, FieldError> {
        let p_minus_1 = &*self.modulus - BigUint::from(1u8);
        let n_big = BigUint::from(n);
        if n < 2 || (&p_minus_1 % &n_big).bits() != 0 {
            return Err(FieldError::InvalidRootOrder { order: n });
        }
        let cofactor = &p_minus_1 / &n_big;
        let maximal_divisors: Vec<BigUint> = prime_factors(n)
            .into_iter()
            .map(|q| BigUint::from(n / q))
            .collect();
        let one = BigUint::from(1u8);

        let mut x = BigUint::from(2u8);
        while x < *self.modulus {
            let g = x.modpow(&cofactor, &self.modulus);
            if maximal_divisors
                .iter()
                .all(|d| g.modpow(d, &self.modulus) != one)
            {
                return Ok(self.element(g));
            }
            x += 1u8;
        }
        Err(FieldError::InvalidRootOrder { order: n })
    }
}

/// Distinct prime factors of `n`, by trial division.
fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut q = 2u64;
    while q.saturating_mul(q) <= n {
        if n % q == 0 {
            out.push(q);
            while n % q == 0 {
                n /= q;
            }
        }
        q += 1;
    }
    if n > 1 {
        out.push(n);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
