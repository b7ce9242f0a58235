//! Shamir sharing over the curve's scalar field
//!
//! The secret is cut into chunks small enough to fit below the curve order.
//! Each chunk value is the constant term of a random polynomial of degree
//! `threshold - 1`; holder `x` receives `f(x)` and the dealer publishes
//! `c_i * G` for every coefficient so holders can check `f(x) * G` against
//! `sum(C_i * x^i)` without learning anything about the chunk.

use crate::curve::{Curve, Point};
use crate::field::{mod_add, mod_inv, mod_mul, mod_neg, mod_sub};
use crate::VssError;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

/// Maximum chunk length in bytes (248 bits, safely below a 256-bit order)
pub const CHUNK_SIZE: usize = 31;

/// Split a secret into consecutive chunks of at most [`CHUNK_SIZE`] bytes
pub fn chunk_secret(secret: &[u8]) -> Vec<&[u8]> {
    secret.chunks(CHUNK_SIZE).collect()
}

/// Interpret a chunk as a big-endian integer, reduced mod `order`
pub fn chunk_to_value(chunk: &[u8], order: &BigUint) -> BigUint {
    let value = BigUint::from_bytes_be(chunk);
    if &value >= order {
        return value % order;
    }
    value
}

/// Minimal big-endian bytes of a value (zero becomes an empty chunk)
pub fn value_to_chunk(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_bytes_be()
}

/// Big-endian bytes of a value left-padded with zeros to `width`
///
/// Values wider than `width` keep their minimal form.
pub fn value_to_chunk_padded(value: &BigUint, width: usize) -> Vec<u8> {
    let bytes = value_to_chunk(value);
    if bytes.len() >= width {
        return bytes;
    }
    let mut padded = vec![0u8; width - bytes.len()];
    padded.extend_from_slice(&bytes);
    padded
}

/// Draw a uniform scalar in `[0, order)` by rejection sampling
pub fn random_scalar<R>(rng: &mut R, order: &BigUint) -> Result<BigUint, VssError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let bits = order.bits() as usize;
    let byte_len = bits.div_ceil(8);
    let excess_bits = byte_len * 8 - bits;
    let mut buf = vec![0u8; byte_len];

    loop {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| VssError::RandomSourceError(e.to_string()))?;
        buf[0] &= 0xff >> excess_bits;

        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < order {
            return Ok(candidate);
        }
    }
}

/// Random polynomial with constant term `secret` and `threshold` coefficients
///
/// `coefficients[0]` is the constant term, `coefficients[threshold - 1]` the
/// highest degree.
pub fn generate_polynomial<R>(
    secret: &BigUint,
    threshold: usize,
    order: &BigUint,
    rng: &mut R,
) -> Result<Vec<BigUint>, VssError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if threshold < 1 {
        return Err(VssError::InvalidThreshold);
    }

    let mut coefficients = Vec::with_capacity(threshold);
    coefficients.push(secret.clone());
    for _ in 1..threshold {
        coefficients.push(random_scalar(rng, order)?);
    }

    Ok(coefficients)
}

/// Evaluate a polynomial at `x` mod `order` (Horner's method)
pub fn evaluate_polynomial(coefficients: &[BigUint], x: u64, order: &BigUint) -> BigUint {
    let x = BigUint::from(x) % order;
    coefficients.iter().rev().fold(BigUint::zero(), |acc, coef| {
        mod_add(&mod_mul(&acc, &x, order), coef, order)
    })
}

/// Commit to every coefficient as `c_i * G`
pub fn generate_commitments<C>(curve: &C, coefficients: &[BigUint]) -> Result<Vec<Point>, VssError>
where
    C: Curve + ?Sized,
{
    coefficients
        .iter()
        .enumerate()
        .map(|(i, coef)| curve.scalar_base_mul(coef).ok_or(VssError::CommitmentError(i)))
        .collect()
}

/// Commitment to `f(x)` derived from the coefficient commitments
///
/// Computes `sum(C_i * x^i)` by Horner accumulation, which equals
/// `f(x) * G` when the share value is honest.
pub fn expected_commitment<C>(curve: &C, commitments: &[Point], x: u8) -> Result<Point, VssError>
where
    C: Curve + ?Sized,
{
    let x = BigUint::from(x);
    let mut acc = Point::Identity;

    for (i, commitment) in commitments.iter().enumerate().rev() {
        let scaled = curve
            .scalar_mul(&acc, &x)
            .ok_or(VssError::CommitmentError(i))?;
        acc = curve
            .add(&scaled, commitment)
            .ok_or(VssError::CommitmentError(i))?;
    }

    Ok(acc)
}

/// Recover `f(0)` from points `(ids[i], values[i])`
///
/// Works for any number of distinct ids, not just exactly `threshold`.
pub fn lagrange_interpolate(
    values: &[BigUint],
    ids: &[u8],
    order: &BigUint,
) -> Result<BigUint, VssError> {
    if values.len() != ids.len() {
        return Err(VssError::MismatchedInputs);
    }
    if values.is_empty() {
        return Err(VssError::NoShares);
    }

    let mut secret = BigUint::zero();

    for (i, (value, &xi)) in values.iter().zip(ids).enumerate() {
        let xi_big = BigUint::from(xi);
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();

        for (j, &xj) in ids.iter().enumerate() {
            if i != j {
                let xj_big = BigUint::from(xj);
                // numerator *= (0 - xj)
                numerator = mod_mul(&numerator, &mod_neg(&xj_big, order), order);
                // denominator *= (xi - xj)
                denominator = mod_mul(&denominator, &mod_sub(&xi_big, &xj_big, order), order);
            }
        }

        let inverse = mod_inv(&denominator, order).ok_or(VssError::NoModularInverse(xi))?;
        let li = mod_mul(&numerator, &inverse, order);
        secret = mod_add(&secret, &mod_mul(value, &li, order), order);
    }

    Ok(secret)
}
