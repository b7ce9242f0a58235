//! Elliptic curve group used for commitments
//!
//! The sharing code only needs a handful of group operations, so they sit
//! behind the [`Curve`] trait. [`P256`] provides them for NIST P-256 using the
//! `p256` crate; points cross the boundary as plain affine coordinates.

use num_bigint::BigUint;
use p256::elliptic_curve::group::Group;
use p256::elliptic_curve::ff::PrimeField;
use p256::elliptic_curve::sec1::{Coordinates, FromEncodedPoint, ToEncodedPoint};
use p256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};

/// Width of a field element / scalar in bytes
pub const COORDINATE_LEN: usize = 32;

/// A curve point in affine coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Point {
    /// Point at infinity (group identity)
    Identity,
    /// Finite point
    Affine { x: BigUint, y: BigUint },
}

impl Point {
    pub fn is_identity(&self) -> bool {
        matches!(self, Point::Identity)
    }
}

/// Short-Weierstrass parameters `y^2 = x^3 - 3x + b (mod p)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveParams {
    /// Base field prime
    pub p: BigUint,
    /// Order of the base point (scalar field modulus)
    pub order: BigUint,
    /// Curve constant b
    pub b: BigUint,
}

/// Group operations needed by the sharing scheme
///
/// Scalars must already be reduced below `params().order`; implementations
/// return `None` for out-of-range scalars or points they cannot represent.
pub trait Curve: Send + Sync {
    fn params(&self) -> &CurveParams;

    /// k * G
    fn scalar_base_mul(&self, k: &BigUint) -> Option<Point>;

    /// k * P
    fn scalar_mul(&self, point: &Point, k: &BigUint) -> Option<Point>;

    /// P + Q
    fn add(&self, a: &Point, b: &Point) -> Option<Point>;

    fn is_on_curve(&self, point: &Point) -> bool;
}

const P256_P: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

const P256_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84, 0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63, 0x25, 0x51,
];

const P256_B: [u8; 32] = [
    0x5a, 0xc6, 0x35, 0xd8, 0xaa, 0x3a, 0x93, 0xe7, 0xb3, 0xeb, 0xbd, 0x55, 0x76, 0x98, 0x86, 0xbc,
    0x65, 0x1d, 0x06, 0xb0, 0xcc, 0x53, 0xb0, 0xf6, 0x3b, 0xce, 0x3c, 0x3e, 0x27, 0xd2, 0x60, 0x4b,
];

/// NIST P-256 (secp256r1)
#[derive(Debug, Clone)]
pub struct P256 {
    params: CurveParams,
}

impl Default for P256 {
    fn default() -> Self {
        Self::new()
    }
}

impl P256 {
    pub fn new() -> Self {
        Self {
            params: CurveParams {
                p: BigUint::from_bytes_be(&P256_P),
                order: BigUint::from_bytes_be(&P256_ORDER),
                b: BigUint::from_bytes_be(&P256_B),
            },
        }
    }

    fn to_scalar(k: &BigUint) -> Option<Scalar> {
        let bytes = to_field_bytes(k)?;
        Option::from(Scalar::from_repr(bytes))
    }

    fn to_projective(point: &Point) -> Option<ProjectivePoint> {
        match point {
            Point::Identity => Some(ProjectivePoint::identity()),
            Point::Affine { x, y } => {
                let (x, y) = (to_field_bytes(x)?, to_field_bytes(y)?);
                let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
                let affine: Option<AffinePoint> =
                    Option::from(AffinePoint::from_encoded_point(&encoded));
                affine.map(ProjectivePoint::from)
            }
        }
    }

    fn from_projective(point: ProjectivePoint) -> Point {
        let encoded = point.to_affine().to_encoded_point(false);
        match encoded.coordinates() {
            Coordinates::Uncompressed { x, y } => Point::Affine {
                x: BigUint::from_bytes_be(x),
                y: BigUint::from_bytes_be(y),
            },
            // Identity is the only non-uncompressed form an uncompressed encoding yields
            _ => Point::Identity,
        }
    }
}

impl Curve for P256 {
    fn params(&self) -> &CurveParams {
        &self.params
    }

    fn scalar_base_mul(&self, k: &BigUint) -> Option<Point> {
        let k = Self::to_scalar(k)?;
        Some(Self::from_projective(ProjectivePoint::generator() * k))
    }

    fn scalar_mul(&self, point: &Point, k: &BigUint) -> Option<Point> {
        let k = Self::to_scalar(k)?;
        let point = Self::to_projective(point)?;
        Some(Self::from_projective(point * k))
    }

    fn add(&self, a: &Point, b: &Point) -> Option<Point> {
        let a = Self::to_projective(a)?;
        let b = Self::to_projective(b)?;
        Some(Self::from_projective(a + b))
    }

    fn is_on_curve(&self, point: &Point) -> bool {
        Self::to_projective(point).is_some()
    }
}

/// Left-pad a value into a 32-byte big-endian field encoding
fn to_field_bytes(value: &BigUint) -> Option<FieldBytes> {
    let bytes = value.to_bytes_be();
    if bytes.len() > COORDINATE_LEN {
        return None;
    }
    let mut buf = [0u8; COORDINATE_LEN];
    buf[COORDINATE_LEN - bytes.len()..].copy_from_slice(&bytes);
    Some(FieldBytes::from(buf))
}
