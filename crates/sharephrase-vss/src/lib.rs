//! Sharephrase VSS
//!
//! Split a secret into N word-phrase shares so that any K of them rebuild it,
//! and let every holder check their own share without learning the secret.
//!
//! # How it works
//!
//! - The secret is cut into chunks of at most 31 bytes
//! - Each chunk becomes the constant term of a random polynomial over the
//!   P-256 scalar field (Shamir sharing)
//! - Every coefficient is committed to as `coefficient * G` (Pedersen/Feldman
//!   style commitments), so a share can be checked against the public
//!   commitments alone
//! - Binary payloads are rendered as BIP-39 words plus one checksum word
//!
//! Each [`Share`] carries two phrases: `key` (this holder's id and polynomial
//! values) and `key_check` (threshold, chunk count and commitments, identical
//! across one split).
//!
//! # Example
//!
//! ```
//! use sharephrase_vss::PedersenVss;
//!
//! let vss = PedersenVss::new();
//!
//! // Split into 3-of-5 shares
//! let shares = vss.split_secret(b"hello", 5, 3).unwrap();
//!
//! // Any holder can check their share
//! assert!(vss.verify_share(&shares[0]).unwrap());
//!
//! // Any 3 shares bring the secret back
//! let recovered = vss.reconstruct_secret(&shares[1..4]).unwrap();
//! assert_eq!(recovered, b"hello");
//! ```

pub mod curve;
pub mod field;
pub mod mnemonic;
pub mod payload;
pub mod point;
pub mod shamir;
pub mod shares;
pub mod vss;

// Re-exports
pub use curve::{Curve, CurveParams, Point, P256};
pub use mnemonic::WordCodec;
pub use shares::{Share, ShareInfo};
pub use vss::PedersenVss;

use thiserror::Error;

/// Largest number of shares a split can produce (share ids are one byte)
pub const MAX_SHARES: usize = 255;

/// Largest secret a split accepts: the chunk count is stored in one byte
pub const MAX_SECRET_LEN: usize = 255 * shamir::CHUNK_SIZE;

#[derive(Error, Debug)]
pub enum VssError {
    // Validation
    #[error("Invalid threshold: need at least 1")]
    InvalidThreshold,
    #[error("Threshold exceeds share count")]
    ThresholdExceedsShares,
    #[error("Share count cannot exceed 255")]
    TooManyShares,
    #[error("Secret cannot be empty")]
    EmptySecret,
    #[error("Secret too long: {actual} bytes, at most {max} allowed")]
    SecretTooLong { max: usize, actual: usize },

    // Word codec
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid word list")]
    InvalidWordList,
    #[error("Unknown word: {0}")]
    UnknownWord(String),
    #[error("Invalid {0} phrase checksum")]
    InvalidChecksum(&'static str),

    // Point codec
    #[error("Invalid compressed point length: {0}")]
    InvalidLength(usize),
    #[error("Invalid parity byte: {0:#04x}")]
    InvalidParity(u8),
    #[error("Point not on curve")]
    PointNotOnCurve,

    // Payload layouts
    #[error("Insufficient share data")]
    InsufficientData,
    #[error("Insufficient value length data")]
    InsufficientLengthByte,
    #[error("Insufficient value data")]
    InsufficientValueData,
    #[error("Invalid threshold or chunk count")]
    InvalidThresholdOrChunkCount,
    #[error("Metadata size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    // Polynomials and commitments
    #[error("Random source failed: {0}")]
    RandomSourceError(String),
    #[error("Failed to generate commitment {0}")]
    CommitmentError(usize),
    #[error("Mismatched share values and ids")]
    MismatchedInputs,
    #[error("No shares provided")]
    NoShares,
    #[error("No modular inverse for share {0}")]
    NoModularInverse(u8),

    // Consistency
    #[error("Insufficient shares: need {needed}, got {got}")]
    InsufficientShares { needed: usize, got: usize },
    #[error("Share has {actual} chunks, metadata expects {expected}")]
    ChunkCountMismatch { expected: usize, actual: usize },
    #[error("Duplicate share id: {0}")]
    DuplicateShareId(u8),
    #[error("Share {0} belongs to a different split")]
    MetadataMismatch(usize),
    #[error("Invalid share text: {0}")]
    InvalidShareText(String),

    // Context
    #[error("Chunk {index}: {source}")]
    Chunk {
        index: usize,
        #[source]
        source: Box<VssError>,
    },
    #[error("Share {index}: {source}")]
    Share {
        index: usize,
        #[source]
        source: Box<VssError>,
    },
}

impl VssError {
    pub(crate) fn in_chunk(self, index: usize) -> Self {
        VssError::Chunk {
            index,
            source: Box::new(self),
        }
    }

    pub(crate) fn in_share(self, index: usize) -> Self {
        VssError::Share {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with chunk/share context stripped
    pub fn root(&self) -> &VssError {
        match self {
            VssError::Chunk { source, .. } | VssError::Share { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Configuration for a split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VssConfig {
    /// Minimum shares needed to reconstruct (K)
    pub threshold: usize,
    /// Total shares to generate (N)
    pub total_shares: usize,
}

impl VssConfig {
    pub fn new(threshold: usize, total_shares: usize) -> Result<Self, VssError> {
        let config = Self {
            threshold,
            total_shares,
        };
        config.validate()?;
        Ok(config)
    }

    /// Common 2-of-3 setup
    pub fn two_of_three() -> Self {
        Self {
            threshold: 2,
            total_shares: 3,
        }
    }

    /// Common 3-of-5 setup
    pub fn three_of_five() -> Self {
        Self {
            threshold: 3,
            total_shares: 5,
        }
    }

    /// Check `1 <= threshold <= total_shares <= 255`
    pub fn validate(&self) -> Result<(), VssError> {
        if self.threshold > self.total_shares {
            return Err(VssError::ThresholdExceedsShares);
        }
        if self.threshold < 1 {
            return Err(VssError::InvalidThreshold);
        }
        if self.total_shares > MAX_SHARES {
            return Err(VssError::TooManyShares);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_presets_are_valid() {
        assert!(VssConfig::two_of_three().validate().is_ok());
        assert!(VssConfig::three_of_five().validate().is_ok());
        assert!(VssConfig::new(1, 1).is_ok());
        assert!(VssConfig::new(255, 255).is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            VssConfig::new(4, 3),
            Err(VssError::ThresholdExceedsShares)
        ));
        assert!(matches!(
            VssConfig::new(0, 3),
            Err(VssError::InvalidThreshold)
        ));
        assert!(matches!(
            VssConfig::new(0, 0),
            Err(VssError::InvalidThreshold)
        ));
        assert!(matches!(VssConfig::new(2, 256), Err(VssError::TooManyShares)));
    }

    #[test]
    fn test_error_root_strips_context() {
        let err = VssError::NoShares.in_chunk(2).in_share(1);
        assert!(matches!(err.root(), VssError::NoShares));
        assert_eq!(err.to_string(), "Share 1: Chunk 2: No shares provided");
    }
}
