//! Dense Polynomials over a [`GaloisField`](crate::field::GaloisField)
//!
//! A polynomial is a coefficient slice in **ascending** power order,
//! `[c_0, c_1, …, c_n]` for `Σ c_i X^i`. Nothing here canonicalizes trailing
//! zeros on input; division trims the remainder (and the divisor) so the loop
//! terminates on the true degree.
//!
//! - `evaluate`: Horner, `O(n)`, total (an empty slice evaluates to zero).
//! - `divide`: classical long division, `(quotient, remainder)`.
//! - `divide_by_linear`: synthetic division by `(X − r)`, the `O(n)` path
//!   used by openings; agrees with `divide(a, [−r, 1])`.

#![forbid(unsafe_code)]

use crate::field::{FieldElement, FieldError};

/// Evaluate `Σ coeffs[i] · point^i` with Horner's rule.
///
/// # Panics
/// If a coefficient's modulus differs from `point`'s.
pub fn evaluate(point: &FieldElement, coeffs: &[FieldElement]) -> FieldElement {
    coeffs
        .iter()
        .rev()
        .fold(point.field().zero(), |acc, c| &(&acc * point) + c)
}

/// Drop trailing zero coefficients.
pub fn trim(mut coeffs: Vec<FieldElement>) -> Vec<FieldElement> {
    while coeffs.last().map_or(false, FieldElement::is_zero) {
        coeffs.pop();
    }
    coeffs
}

fn ensure_all_in(reference: &FieldElement, coeffs: &[FieldElement]) -> Result<(), FieldError> {
    coeffs
        .iter()
        .try_for_each(|c| reference.ensure_same_field(c))
}

/// Long division `dividend = quotient · divisor + remainder`.
///
/// The quotient has `len(dividend) − len(divisor) + 1` slots (after trimming
/// the divisor); the remainder is trimmed, so an exact division returns an
/// empty remainder.
///
/// # Errors
/// - [`FieldError::DivisionByZero`] if the divisor is the zero polynomial.
/// - [`FieldError::TypeMismatch`] if the operands mix moduli.
pub fn divide(
    dividend: &[FieldElement],
    divisor: &[FieldElement],
) -> Result<(Vec<FieldElement>, Vec<FieldElement>), FieldError> {
    let divisor = trim(divisor.to_vec());
    let lead = divisor.last().ok_or(FieldError::DivisionByZero)?;
    ensure_all_in(lead, &divisor)?;
    ensure_all_in(lead, dividend)?;
    let lead_inv = lead.inverse()?;

    let mut remainder = dividend.to_vec();
    if remainder.len() < divisor.len() {
        return Ok((Vec::new(), trim(remainder)));
    }

    let zero = lead.field().zero();
    let mut quotient = vec![zero; remainder.len() - divisor.len() + 1];

    while remainder.len() >= divisor.len() {
        let shift = remainder.len() - divisor.len();
        let term = match remainder.last() {
            Some(top) => top * &lead_inv,
            None => break,
        };
        for (k, d) in divisor.iter().enumerate() {
            let updated = &remainder[shift + k] - &(&term * d);
            remainder[shift + k] = updated;
        }
        quotient[shift] = term;

        // The leading slot is now exactly zero; shrink to the true degree.
        while remainder.last().map_or(false, FieldElement::is_zero) {
            remainder.pop();
        }
    }

    Ok((quotient, remainder))
}

/// Synthetic division by `(X − root)`.
///
/// Returns the quotient (one coefficient shorter than the input) and the
/// remainder, which equals `evaluate(root, coeffs)`. Recurrence, high→low:
/// `b_{k−1} = a_k + root · b_k` with `b_{n−1} = 0`.
pub fn divide_by_linear(
    coeffs: &[FieldElement],
    root: &FieldElement,
) -> Result<(Vec<FieldElement>, FieldElement), FieldError> {
    ensure_all_in(root, coeffs)?;

    let mut out = Vec::with_capacity(coeffs.len());
    let mut acc = root.field().zero();
    for a in coeffs.iter().rev() {
        acc = a + &(root * &acc);
        out.push(acc.clone());
    }

    let remainder = out.pop().unwrap_or(acc);
    out.reverse();
    Ok((out, remainder))
}

/// Coefficient-wise sum; the shorter operand is zero-extended.
pub fn add(f: &[FieldElement], g: &[FieldElement]) -> Result<Vec<FieldElement>, FieldError> {
    let (long, short) = if f.len() >= g.len() { (f, g) } else { (g, f) };
    long.iter()
        .enumerate()
        .map(|(k, a)| match short.get(k) {
            Some(b) => a.checked_add(b),
            None => Ok(a.clone()),
        })
        .collect()
}

/// Multiply every coefficient by `c`.
pub fn scale(f: &[FieldElement], c: &FieldElement) -> Result<Vec<FieldElement>, FieldError> {
    f.iter().map(|a| a.checked_mul(c)).collect()
}

/// Coefficient-wise product of two polynomials (schoolbook).
pub fn mul(f: &[FieldElement], g: &[FieldElement]) -> Result<Vec<FieldElement>, FieldError> {
    let (Some(f0), Some(_)) = (f.first(), g.first()) else {
        return Ok(Vec::new());
    };
    ensure_all_in(f0, f)?;
    ensure_all_in(f0, g)?;

    let mut out = vec![f0.field().zero(); f.len() + g.len() - 1];
    for (i, a) in f.iter().enumerate() {
        for (j, b) in g.iter().enumerate() {
            let updated = &out[i + j] + &(a * b);
            out[i + j] = updated;
        }
    }
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GaloisField;
    use rand::{rngs::StdRng, SeedableRng};

    fn small() -> GaloisField {
        GaloisField::from_u64(101).unwrap()
    }

    fn poly(f: &GaloisField, cs: &[i64]) -> Vec<FieldElement> {
        cs.iter().map(|&c| f.from_i64(c)).collect()
    }

    #[test]
    fn horner_matches_worked_example() {
        let f = crate::srs::bn254_scalar_field();
        // x^2 + 2x + 3 at x = 2
        let phi = poly(&f, &[3, 2, 1]);
        assert_eq!(evaluate(&f.element(2u8), &phi), f.element(11u8));
        assert!(evaluate(&f.element(5u8), &[]).is_zero());
    }

    #[test]
    fn division_identity_holds_at_random_points() {
        let f = crate::srs::bn254_scalar_field();
        let mut rng = StdRng::seed_from_u64(11);
        for (n, d) in [(8usize, 3usize), (5, 5), (12, 1), (3, 4)] {
            let dividend: Vec<_> = (0..n).map(|_| f.random_with(&mut rng)).collect();
            let mut divisor: Vec<_> = (0..d).map(|_| f.random_with(&mut rng)).collect();
            if divisor[d - 1].is_zero() {
                divisor[d - 1] = f.one();
            }

            let (q, r) = divide(&dividend, &divisor).unwrap();
            assert!(r.len() < divisor.len());
            for _ in 0..4 {
                let x = f.random_with(&mut rng);
                let lhs = evaluate(&x, &dividend);
                let rhs = &(&evaluate(&x, &q) * &evaluate(&x, &divisor)) + &evaluate(&x, &r);
                assert_eq!(lhs, rhs);
            }
        }
    }

    #[test]
    fn exact_division_leaves_empty_remainder() {
        let f = small();
        // (x - 2)(x + 3) = x^2 + x - 6
        let (q, r) = divide(&poly(&f, &[-6, 1, 1]), &poly(&f, &[-2, 1])).unwrap();
        assert_eq!(q, poly(&f, &[3, 1]));
        assert!(r.is_empty());
    }

    #[test]
    fn divisor_trailing_zeros_are_ignored() {
        let f = small();
        let (q, r) = divide(&poly(&f, &[-6, 1, 1]), &poly(&f, &[-2, 1, 0, 0])).unwrap();
        assert_eq!(q, poly(&f, &[3, 1]));
        assert!(r.is_empty());
    }

    #[test]
    fn short_dividend_is_all_remainder() {
        let f = small();
        let (q, r) = divide(&poly(&f, &[4, 0]), &poly(&f, &[1, 2, 3])).unwrap();
        assert!(q.is_empty());
        assert_eq!(r, poly(&f, &[4]));
    }

    #[test]
    fn zero_divisor_is_division_by_zero() {
        let f = small();
        assert_eq!(
            divide(&poly(&f, &[1, 2]), &poly(&f, &[0, 0])),
            Err(FieldError::DivisionByZero)
        );
        assert_eq!(divide(&poly(&f, &[1, 2]), &[]), Err(FieldError::DivisionByZero));
    }

    #[test]
    fn mixed_moduli_division_is_type_mismatch() {
        let f = small();
        let g = GaloisField::from_u64(97).unwrap();
        assert!(matches!(
            divide(&poly(&f, &[1, 2]), &poly(&g, &[1, 1])),
            Err(FieldError::TypeMismatch { .. })
        ));
        assert!(divide_by_linear(&poly(&f, &[1, 2]), &g.one()).is_err());
    }

    #[test]
    fn synthetic_division_agrees_with_long_division() {
        let f = crate::srs::bn254_scalar_field();
        let mut rng = StdRng::seed_from_u64(3);
        let a: Vec<_> = (0..9).map(|_| f.random_with(&mut rng)).collect();
        let root = f.random_with(&mut rng);

        let (q_syn, rem) = divide_by_linear(&a, &root).unwrap();
        assert_eq!(rem, evaluate(&root, &a));

        let (q_long, r_long) = divide(&a, &[-&root, f.one()]).unwrap();
        assert_eq!(q_syn, q_long);
        assert_eq!(trim(vec![rem]), r_long);
    }

    #[test]
    fn synthetic_division_of_tiny_inputs() {
        let f = small();
        let (q, r) = divide_by_linear(&[], &f.element(3u8)).unwrap();
        assert!(q.is_empty() && r.is_zero());

        let (q, r) = divide_by_linear(&poly(&f, &[7]), &f.element(3u8)).unwrap();
        assert!(q.is_empty());
        assert_eq!(r, f.element(7u8));
    }

    #[test]
    fn add_scale_mul_are_coefficientwise() {
        let f = small();
        let a = poly(&f, &[1, 2, 3]);
        let b = poly(&f, &[4, 5]);
        assert_eq!(add(&a, &b).unwrap(), poly(&f, &[5, 7, 3]));
        assert_eq!(add(&b, &a).unwrap(), poly(&f, &[5, 7, 3]));
        assert_eq!(scale(&b, &f.element(2u8)).unwrap(), poly(&f, &[8, 10]));
        // (1 + 2x + 3x^2)(4 + 5x) = 4 + 13x + 22x^2 + 15x^3
        assert_eq!(mul(&a, &b).unwrap(), poly(&f, &[4, 13, 22, 15]));
        assert!(mul(&a, &[]).unwrap().is_empty());
    }
}
