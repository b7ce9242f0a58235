//! Modular arithmetic over prime fields
//!
//! All values are `BigUint`s already reduced into `[0, modulus)`. The scalar
//! field (modulus = curve order) drives polynomials and interpolation; the
//! base field (modulus = p) is only needed to rebuild Y coordinates.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// (a + b) mod m
#[inline]
pub fn mod_add(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// (a - b) mod m
#[inline]
pub fn mod_sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    ((a % m) + m - (b % m)) % m
}

/// (a * b) mod m
#[inline]
pub fn mod_mul(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// -a mod m
#[inline]
pub fn mod_neg(a: &BigUint, m: &BigUint) -> BigUint {
    mod_sub(&BigUint::zero(), a, m)
}

/// Multiplicative inverse of `a` mod `m`, if one exists
pub fn mod_inv(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a = a % m;
    if a.is_zero() {
        return None;
    }
    a.modinv(m)
}

/// Square root of `a` modulo an odd prime `p` (Tonelli-Shanks)
///
/// Returns `None` when `a` is not a quadratic residue. Either root may be
/// returned; callers pick the one they need by parity.
pub fn mod_sqrt(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let a = a % p;
    if a.is_zero() {
        return Some(BigUint::zero());
    }

    let one = BigUint::one();
    let p_minus_one = p - &one;
    let legendre_exp = &p_minus_one >> 1u32;

    // Euler's criterion
    if a.modpow(&legendre_exp, p) != one {
        return None;
    }

    // p = 3 (mod 4): single exponentiation
    if p % 4u32 == BigUint::from(3u32) {
        return Some(a.modpow(&((p + &one) >> 2u32), p));
    }

    // p - 1 = q * 2^s with q odd
    let s = p_minus_one.trailing_zeros()?;
    let q = &p_minus_one >> s;

    let mut z = BigUint::from(2u32);
    while z.modpow(&legendre_exp, p) != p_minus_one {
        z += 1u32;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + &one) >> 1u32), p);

    while t != one {
        // Least i in (0, m) with t^(2^i) = 1
        let mut i = 0u64;
        let mut t2 = t.clone();
        while t2 != one {
            t2 = &t2 * &t2 % p;
            i += 1;
            if i == m {
                return None;
            }
        }

        let b = c.modpow(&(BigUint::one() << (m - i - 1)), p);
        m = i;
        c = &b * &b % p;
        t = t * &c % p;
        r = r * &b % p;
    }

    Some(r)
}
