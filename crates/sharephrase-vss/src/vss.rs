//! Split, verify and reconstruct
//!
//! [`PedersenVss`] ties the pieces together: Shamir polynomials per chunk,
//! coefficient commitments, the binary payload layouts and the word codec.
//! It holds only the curve and the word list, both fixed at construction, so
//! one instance can serve any number of threads.

use crate::curve::{Curve, P256};
use crate::mnemonic::WordCodec;
use crate::payload::{Metadata, ShareData};
use crate::shamir::{
    chunk_secret, chunk_to_value, evaluate_polynomial, expected_commitment,
    generate_commitments, generate_polynomial, lagrange_interpolate, value_to_chunk,
    value_to_chunk_padded, CHUNK_SIZE,
};
use crate::shares::{Share, ShareInfo};
use crate::{VssConfig, VssError, MAX_SECRET_LEN};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

const KEY_PHRASE: &str = "share";
const KEY_CHECK_PHRASE: &str = "metadata";

/// Pedersen verifiable secret sharing with word-phrase shares
#[derive(Debug, Clone)]
pub struct PedersenVss<C: Curve = P256> {
    curve: C,
    codec: WordCodec,
}

impl PedersenVss<P256> {
    /// P-256 commitments, BIP-39 English words
    pub fn new() -> Self {
        Self::with_parts(P256::new(), WordCodec::bip39_english())
    }
}

impl Default for PedersenVss<P256> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Curve> PedersenVss<C> {
    pub fn with_parts(curve: C, codec: WordCodec) -> Self {
        Self { curve, codec }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn codec(&self) -> &WordCodec {
        &self.codec
    }

    /// Split `secret` into `num_shares` shares, any `threshold` of which
    /// reconstruct it. Randomness comes from the operating system.
    ///
    /// Secrets longer than [`MAX_SECRET_LEN`] are rejected.
    pub fn split_secret(
        &self,
        secret: &[u8],
        num_shares: usize,
        threshold: usize,
    ) -> Result<Vec<Share>, VssError> {
        self.split_secret_with_rng(secret, num_shares, threshold, &mut OsRng)
    }

    /// [`split_secret`](Self::split_secret) with a caller-supplied random source
    pub fn split_secret_with_rng<R>(
        &self,
        secret: &[u8],
        num_shares: usize,
        threshold: usize,
        rng: &mut R,
    ) -> Result<Vec<Share>, VssError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        VssConfig::new(threshold, num_shares)?;
        if secret.is_empty() {
            return Err(VssError::EmptySecret);
        }
        if secret.len() > MAX_SECRET_LEN {
            return Err(VssError::SecretTooLong {
                max: MAX_SECRET_LEN,
                actual: secret.len(),
            });
        }

        let order = &self.curve.params().order;
        let chunks = chunk_secret(secret);

        let mut polynomials = Vec::with_capacity(chunks.len());
        let mut commitments = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            let value = chunk_to_value(chunk, order);
            let coefficients = generate_polynomial(&value, threshold, order, rng)
                .map_err(|e| e.in_chunk(index))?;
            commitments.push(
                generate_commitments(&self.curve, &coefficients).map_err(|e| e.in_chunk(index))?,
            );
            polynomials.push(coefficients);
        }

        let metadata = Metadata {
            threshold: threshold as u8,
            commitments,
        };
        let key_check = self.encode_phrase(&metadata.to_bytes())?;

        let shares = (1..=num_shares)
            .map(|id| {
                let data = ShareData {
                    id: id as u8,
                    values: polynomials
                        .iter()
                        .map(|coefficients| evaluate_polynomial(coefficients, id as u64, order))
                        .collect(),
                };
                Ok(Share::new(
                    self.encode_phrase(&data.to_bytes())?,
                    key_check.clone(),
                ))
            })
            .collect::<Result<Vec<_>, VssError>>()?;

        log::debug!(
            "Split secret into {} shares (threshold {}, {} chunks)",
            num_shares,
            threshold,
            chunks.len()
        );

        Ok(shares)
    }

    /// Check a share against its commitments
    ///
    /// `Ok(false)` means the share decoded fine but does not match the
    /// commitments (forged or corrupted values). An `Err` means the share
    /// could not be evaluated at all.
    pub fn verify_share(&self, share: &Share) -> Result<bool, VssError> {
        let data = self.decode_share_data(share)?;
        let metadata = Metadata::from_bytes(
            self.curve.params(),
            &self.decode_phrase(&share.key_check, KEY_CHECK_PHRASE)?,
        )?;

        if data.values.len() != metadata.chunk_count() {
            return Err(VssError::ChunkCountMismatch {
                expected: metadata.chunk_count(),
                actual: data.values.len(),
            });
        }

        let order = &self.curve.params().order;

        for (index, (value, commitments)) in
            data.values.iter().zip(&metadata.commitments).enumerate()
        {
            if value >= order {
                log::warn!("Share {} chunk {}: value out of range", data.id, index);
                return Ok(false);
            }

            let expected = expected_commitment(&self.curve, commitments, data.id)
                .map_err(|e| e.in_chunk(index))?;
            let actual = self
                .curve
                .scalar_base_mul(value)
                .ok_or(VssError::CommitmentError(0))
                .map_err(|e| e.in_chunk(index))?;

            if expected != actual {
                log::warn!("Share {} chunk {}: commitment mismatch", data.id, index);
                return Ok(false);
            }
        }

        log::debug!("Share {} verified ({} chunks)", data.id, data.values.len());
        Ok(true)
    }

    /// Rebuild the secret from at least `threshold` shares
    ///
    /// Every provided share takes part in the interpolation. Commitments are
    /// not checked here; call [`verify_share`](Self::verify_share) first when
    /// shares may have been tampered with.
    pub fn reconstruct_secret(&self, shares: &[Share]) -> Result<Vec<u8>, VssError> {
        let first = shares.first().ok_or(VssError::NoShares)?;

        let metadata_bytes = self
            .decode_phrase(&first.key_check, KEY_CHECK_PHRASE)
            .map_err(|e| e.in_share(0))?;
        let metadata =
            Metadata::from_bytes(self.curve.params(), &metadata_bytes).map_err(|e| e.in_share(0))?;

        let threshold = metadata.threshold as usize;
        let chunk_count = metadata.chunk_count();
        if shares.len() < threshold {
            return Err(VssError::InsufficientShares {
                needed: threshold,
                got: shares.len(),
            });
        }

        let mut ids = Vec::with_capacity(shares.len());
        let mut share_values = Vec::with_capacity(shares.len());

        for (index, share) in shares.iter().enumerate() {
            let data = self
                .decode_share_data(share)
                .map_err(|e| e.in_share(index))?;

            if index > 0 {
                let other = self
                    .decode_phrase(&share.key_check, KEY_CHECK_PHRASE)
                    .map_err(|e| e.in_share(index))?;
                if other != metadata_bytes {
                    return Err(VssError::MetadataMismatch(index));
                }
            }

            if data.values.len() != chunk_count {
                return Err(VssError::ChunkCountMismatch {
                    expected: chunk_count,
                    actual: data.values.len(),
                }
                .in_share(index));
            }

            ids.push(data.id);
            share_values.push(data.values);
        }

        for (index, id) in ids.iter().enumerate() {
            if ids[..index].contains(id) {
                return Err(VssError::DuplicateShareId(*id));
            }
        }

        let order = &self.curve.params().order;
        let mut secret = Vec::with_capacity(chunk_count * CHUNK_SIZE);

        for index in 0..chunk_count {
            let values: Vec<BigUint> = share_values
                .iter()
                .map(|values| values[index].clone())
                .collect();
            let value =
                lagrange_interpolate(&values, &ids, order).map_err(|e| e.in_chunk(index))?;

            // Every chunk but the last was exactly CHUNK_SIZE bytes
            if index + 1 < chunk_count {
                secret.extend(value_to_chunk_padded(&value, CHUNK_SIZE));
            } else {
                secret.extend(value_to_chunk(&value));
            }
        }

        log::debug!(
            "Reconstructed secret from {} shares ({} chunks)",
            shares.len(),
            chunk_count
        );

        Ok(secret)
    }

    /// Decode a share's id, threshold and chunk count
    ///
    /// Both checksums and both payload layouts are checked, but commitments
    /// are not decompressed.
    pub fn inspect_share(&self, share: &Share) -> Result<ShareInfo, VssError> {
        let data = self.decode_share_data(share)?;
        let (threshold, chunk_count) =
            Metadata::read_header(&self.decode_phrase(&share.key_check, KEY_CHECK_PHRASE)?)?;

        Ok(ShareInfo {
            id: data.id,
            threshold,
            chunk_count,
        })
    }

    /// Bytes to phrase, checksum word appended
    fn encode_phrase(&self, bytes: &[u8]) -> Result<String, VssError> {
        Ok(self.codec.add_checksum(&self.codec.encode(bytes)?))
    }

    /// Phrase to bytes, checksum word verified and stripped
    fn decode_phrase(&self, phrase: &str, which: &'static str) -> Result<Vec<u8>, VssError> {
        let (inner, ok) = self.codec.verify_checksum(phrase);
        if !ok {
            return Err(VssError::InvalidChecksum(which));
        }
        self.codec.decode(&inner)
    }

    fn decode_share_data(&self, share: &Share) -> Result<ShareData, VssError> {
        ShareData::from_bytes(&self.decode_phrase(&share.key, KEY_PHRASE)?)
    }
}
