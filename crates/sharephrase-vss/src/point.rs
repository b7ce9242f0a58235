//! Compressed point encoding
//!
//! Commitments travel as 33 bytes: a parity byte (`0x02` even Y, `0x03` odd
//! Y) followed by X as 32 big-endian bytes. Y is rebuilt from the curve
//! equation `y^2 = x^3 - 3x + b (mod p)`.
//!
//! The point at infinity is written as 33 zero bytes.

use crate::curve::{CurveParams, Point, COORDINATE_LEN};
use crate::field::{mod_add, mod_mul, mod_sqrt, mod_sub};
use crate::VssError;
use num_bigint::BigUint;

/// Length of a compressed point
pub const COMPRESSED_POINT_LEN: usize = 1 + COORDINATE_LEN;

const EVEN_Y: u8 = 0x02;
const ODD_Y: u8 = 0x03;

/// Compress a point to 33 bytes
pub fn compress_point(point: &Point) -> [u8; COMPRESSED_POINT_LEN] {
    let mut result = [0u8; COMPRESSED_POINT_LEN];

    let Point::Affine { x, y } = point else {
        return result;
    };

    let x_bytes = x.to_bytes_be();
    if x_bytes.len() <= COORDINATE_LEN {
        result[COMPRESSED_POINT_LEN - x_bytes.len()..].copy_from_slice(&x_bytes);
    } else {
        // Only the low 32 bytes fit
        result[1..].copy_from_slice(&x_bytes[x_bytes.len() - COORDINATE_LEN..]);
    }

    result[0] = if y.bit(0) { ODD_Y } else { EVEN_Y };
    result
}

/// Rebuild a point from its 33-byte compressed form
pub fn decompress_point(params: &CurveParams, data: &[u8]) -> Result<Point, VssError> {
    if data.len() != COMPRESSED_POINT_LEN {
        return Err(VssError::InvalidLength(data.len()));
    }

    let parity = data[0];
    if parity == 0 && data[1..].iter().all(|&b| b == 0) {
        return Ok(Point::Identity);
    }
    if parity != EVEN_Y && parity != ODD_Y {
        return Err(VssError::InvalidParity(parity));
    }

    let x = BigUint::from_bytes_be(&data[1..]);
    if x >= params.p {
        return Err(VssError::PointNotOnCurve);
    }

    // y^2 = x^3 - 3x + b
    let p = &params.p;
    let x3 = mod_mul(&mod_mul(&x, &x, p), &x, p);
    let three_x = mod_mul(&BigUint::from(3u32), &x, p);
    let y_squared = mod_add(&mod_sub(&x3, &three_x, p), &params.b, p);

    let mut y = mod_sqrt(&y_squared, p).ok_or(VssError::PointNotOnCurve)?;

    if y.bit(0) != (parity == ODD_Y) {
        y = mod_sub(p, &y, p);
    }

    Ok(Point::Affine { x, y })
}
