//! Binary payloads carried inside share phrases
//!
//! Share data (`key` phrase):
//! `[id:1][chunk_count:1]{[len:1][value:len]}*chunk_count`
//!
//! Metadata (`key_check` phrase, identical for every share of a split):
//! `[threshold:1][chunk_count:1]{point:33}*(threshold*chunk_count)`,
//! commitments ordered chunk by chunk, coefficient by coefficient.

use crate::curve::{CurveParams, Point};
use crate::point::{compress_point, decompress_point, COMPRESSED_POINT_LEN};
use crate::VssError;
use num_bigint::BigUint;
use num_traits::Zero;

/// Length of the `[a:1][b:1]` header both layouts start with
const HEADER_LEN: usize = 2;

/// One holder's id and per-chunk polynomial values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareData {
    pub id: u8,
    pub values: Vec<BigUint>,
}

impl ShareData {
    /// Serialize to the share-data layout
    ///
    /// Each value takes its minimal byte length; zero is written as `len = 0`.
    /// Values must fit in 255 bytes and there must be at most 255 of them,
    /// which holds for anything reduced mod a 256-bit order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.id, self.values.len() as u8];

        for value in &self.values {
            let value_bytes = if value.is_zero() {
                Vec::new()
            } else {
                value.to_bytes_be()
            };
            bytes.push(value_bytes.len() as u8);
            bytes.extend_from_slice(&value_bytes);
        }

        bytes
    }

    /// Deserialize from the share-data layout
    ///
    /// Trailing bytes after the last value are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VssError> {
        if bytes.len() < HEADER_LEN {
            return Err(VssError::InsufficientData);
        }

        let id = bytes[0];
        let chunk_count = bytes[1] as usize;
        let mut values = Vec::with_capacity(chunk_count);
        let mut offset = HEADER_LEN;

        for _ in 0..chunk_count {
            let value_len = *bytes.get(offset).ok_or(VssError::InsufficientLengthByte)? as usize;
            offset += 1;

            let value_bytes = bytes
                .get(offset..offset + value_len)
                .ok_or(VssError::InsufficientValueData)?;
            values.push(BigUint::from_bytes_be(value_bytes));
            offset += value_len;
        }

        Ok(Self { id, values })
    }
}

/// Threshold, chunk count and coefficient commitments shared by one split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub threshold: u8,
    /// `commitments[chunk][coefficient]`
    pub commitments: Vec<Vec<Point>>,
}

impl Metadata {
    pub fn chunk_count(&self) -> usize {
        self.commitments.len()
    }

    /// Exact encoded size for the given header values
    pub fn encoded_len(threshold: usize, chunk_count: usize) -> usize {
        HEADER_LEN + threshold * chunk_count * COMPRESSED_POINT_LEN
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::encoded_len(
            self.threshold as usize,
            self.chunk_count(),
        ));
        bytes.push(self.threshold);
        bytes.push(self.chunk_count() as u8);

        for point in self.commitments.iter().flatten() {
            bytes.extend_from_slice(&compress_point(point));
        }

        bytes
    }

    /// Validate the layout and return `(threshold, chunk_count)` without
    /// decompressing any point
    pub fn read_header(bytes: &[u8]) -> Result<(u8, usize), VssError> {
        if bytes.len() < HEADER_LEN {
            return Err(VssError::InsufficientData);
        }

        let threshold = bytes[0];
        let chunk_count = bytes[1] as usize;
        if threshold == 0 || chunk_count == 0 {
            return Err(VssError::InvalidThresholdOrChunkCount);
        }

        let expected = Self::encoded_len(threshold as usize, chunk_count);
        if bytes.len() != expected {
            return Err(VssError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        Ok((threshold, chunk_count))
    }

    /// Deserialize and decompress every commitment
    pub fn from_bytes(params: &CurveParams, bytes: &[u8]) -> Result<Self, VssError> {
        let (threshold, _) = Self::read_header(bytes)?;

        let commitments = bytes[HEADER_LEN..]
            .chunks_exact(threshold as usize * COMPRESSED_POINT_LEN)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                chunk
                    .chunks_exact(COMPRESSED_POINT_LEN)
                    .map(|data| decompress_point(params, data))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| e.in_chunk(chunk_idx))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            threshold,
            commitments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Curve, P256};

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_share_data_layout() {
        let data = ShareData {
            id: 3,
            values: vec![big(0x0102), big(0), big(0xff)],
        };
        let bytes = data.to_bytes();
        assert_eq!(bytes, vec![3, 3, 2, 0x01, 0x02, 0, 1, 0xff]);
        assert_eq!(ShareData::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn test_share_data_no_chunks() {
        let data = ShareData {
            id: 7,
            values: Vec::new(),
        };
        assert_eq!(data.to_bytes(), vec![7, 0]);
        assert_eq!(ShareData::from_bytes(&[7, 0]).unwrap(), data);
    }

    #[test]
    fn test_share_data_truncated() {
        assert!(matches!(
            ShareData::from_bytes(&[]),
            Err(VssError::InsufficientData)
        ));
        assert!(matches!(
            ShareData::from_bytes(&[1]),
            Err(VssError::InsufficientData)
        ));
        // Claims one chunk but has no length byte
        assert!(matches!(
            ShareData::from_bytes(&[1, 1]),
            Err(VssError::InsufficientLengthByte)
        ));
        // Length byte says 3, only 2 value bytes follow
        assert!(matches!(
            ShareData::from_bytes(&[1, 1, 3, 0xaa, 0xbb]),
            Err(VssError::InsufficientValueData)
        ));
        // Second chunk missing entirely
        assert!(matches!(
            ShareData::from_bytes(&[1, 2, 1, 0xaa]),
            Err(VssError::InsufficientLengthByte)
        ));
    }

    fn sample_metadata(curve: &P256, threshold: u8, chunk_count: usize) -> Metadata {
        let commitments = (0..chunk_count)
            .map(|chunk| {
                (0..threshold as u64)
                    .map(|i| curve.scalar_base_mul(&big(chunk as u64 * 100 + i + 1)).unwrap())
                    .collect()
            })
            .collect();
        Metadata {
            threshold,
            commitments,
        }
    }

    #[test]
    fn test_metadata_roundtrip() {
        let curve = P256::new();
        let metadata = sample_metadata(&curve, 3, 2);
        let bytes = metadata.to_bytes();

        assert_eq!(bytes.len(), 2 + 3 * 2 * 33);
        assert_eq!(&bytes[..2], &[3, 2]);
        // Chunk-major order: first point is chunk 0, coefficient 0
        assert_eq!(
            &bytes[2..35],
            &compress_point(&metadata.commitments[0][0])[..]
        );
        assert_eq!(
            &bytes[2 + 3 * 33..2 + 4 * 33],
            &compress_point(&metadata.commitments[1][0])[..]
        );

        let restored = Metadata::from_bytes(curve.params(), &bytes).unwrap();
        assert_eq!(restored, metadata);
        assert_eq!(restored.chunk_count(), 2);
        assert_eq!(Metadata::read_header(&bytes).unwrap(), (3, 2));
    }

    #[test]
    fn test_metadata_identity_commitment() {
        let curve = P256::new();
        let metadata = Metadata {
            threshold: 2,
            commitments: vec![vec![Point::Identity, curve.scalar_base_mul(&big(9)).unwrap()]],
        };
        let restored = Metadata::from_bytes(curve.params(), &metadata.to_bytes()).unwrap();
        assert_eq!(restored, metadata);
    }

    #[test]
    fn test_metadata_invalid_header() {
        let params = P256::new().params().clone();
        assert!(matches!(
            Metadata::from_bytes(&params, &[1]),
            Err(VssError::InsufficientData)
        ));
        assert!(matches!(
            Metadata::from_bytes(&params, &[0, 1]),
            Err(VssError::InvalidThresholdOrChunkCount)
        ));
        assert!(matches!(
            Metadata::from_bytes(&params, &[1, 0]),
            Err(VssError::InvalidThresholdOrChunkCount)
        ));
    }

    #[test]
    fn test_metadata_size_mismatch() {
        let curve = P256::new();
        let mut bytes = sample_metadata(&curve, 2, 1).to_bytes();
        bytes.push(0);
        match Metadata::from_bytes(curve.params(), &bytes) {
            Err(VssError::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, 68);
                assert_eq!(actual, 69);
            }
            other => panic!("expected SizeMismatch, got {:?}", other),
        }

        bytes.truncate(40);
        assert!(matches!(
            Metadata::from_bytes(curve.params(), &bytes),
            Err(VssError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_metadata_bad_point_reports_chunk() {
        let curve = P256::new();
        let mut bytes = sample_metadata(&curve, 1, 2).to_bytes();
        // Corrupt the parity byte of chunk 1's commitment
        bytes[2 + 33] = 0x05;
        let err = Metadata::from_bytes(curve.params(), &bytes).unwrap_err();
        assert!(matches!(err, VssError::Chunk { index: 1, .. }));
        assert!(matches!(err.root(), VssError::InvalidParity(0x05)));
    }
}
