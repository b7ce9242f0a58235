//! Word-phrase codec
//!
//! Renders binary payloads as phrases by reading the bytes as one big-endian
//! integer and writing it in base N, where N is the word list length and each
//! digit is a word. A trailing checksum word (sum of word indices mod N)
//! catches typos.
//!
//! The checksum is additive only: it detects accidental corruption, not
//! deliberate tampering. Share integrity comes from the commitments.
//!
//! Leading zero bytes are not preserved: `decode` returns the shortest
//! big-endian form of the encoded integer.

use crate::VssError;
use bip39::Language;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;

/// Base-N word codec over an ordered list of unique words
///
/// The lookup table is built once in the constructor and never written
/// afterwards, so a codec can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct WordCodec {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl WordCodec {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, word)| (word.clone(), i))
            .collect();
        Self { words, index }
    }

    /// Codec over the 2048-word BIP-39 English list
    pub fn bip39_english() -> Self {
        Self::new(Language::English.word_list().iter().copied())
    }

    /// Number of words, i.e. the encoding base
    pub fn base(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Index of `word` in the list
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    fn check_word_list(&self) -> Result<(), VssError> {
        if self.words.is_empty() || self.index.is_empty() {
            return Err(VssError::InvalidWordList);
        }
        Ok(())
    }

    /// Encode bytes as a phrase, most significant word first
    pub fn encode(&self, data: &[u8]) -> Result<String, VssError> {
        if data.is_empty() {
            return Err(VssError::EmptyInput);
        }
        self.check_word_list()?;

        let base = BigUint::from(self.base());
        let mut value = BigUint::from_bytes_be(data);
        let mut digits = Vec::new();

        // A single-word list can only spell zero
        if self.base() == 1 && !value.is_zero() {
            return Err(VssError::InvalidWordList);
        }

        while !value.is_zero() {
            let remainder = (&value % &base).to_usize().unwrap_or_default();
            value /= &base;
            digits.push(self.words[remainder].as_str());
        }

        if digits.is_empty() {
            digits.push(self.words[0].as_str());
        }

        digits.reverse();
        Ok(digits.join(" "))
    }

    /// Decode a phrase back to the minimal big-endian bytes of its value
    pub fn decode(&self, phrase: &str) -> Result<Vec<u8>, VssError> {
        if phrase.trim().is_empty() {
            return Err(VssError::EmptyInput);
        }
        self.check_word_list()?;

        let base = BigUint::from(self.base());
        let mut value = BigUint::zero();

        for word in phrase.split_whitespace() {
            let index = self
                .index_of(word)
                .ok_or_else(|| VssError::UnknownWord(word.to_string()))?;
            value = value * &base + index;
        }

        if value.is_zero() {
            return Ok(Vec::new());
        }
        Ok(value.to_bytes_be())
    }

    /// Append a checksum word: (sum of word indices) mod N
    ///
    /// Words missing from the list contribute nothing to the sum.
    pub fn add_checksum(&self, phrase: &str) -> String {
        if phrase.is_empty() || self.words.is_empty() {
            return String::new();
        }

        let checksum = phrase
            .split_whitespace()
            .filter_map(|word| self.index_of(word))
            .fold(0usize, |acc, index| (acc + index) % self.base());

        format!("{} {}", phrase, self.words[checksum])
    }

    /// Split off and check the trailing checksum word
    ///
    /// Returns the phrase without its checksum word and whether the checksum
    /// matched. Phrases with fewer than two words never verify.
    pub fn verify_checksum(&self, phrase: &str) -> (String, bool) {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.len() < 2 {
            return (String::new(), false);
        }

        let (body, checksum_word) = words.split_at(words.len() - 1);
        let inner = body.join(" ");

        let expected = self.add_checksum(&inner);
        let ok = expected
            .split_whitespace()
            .last()
            .is_some_and(|word| word == checksum_word[0]);

        (inner, ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_codec() -> WordCodec {
        WordCodec::new([
            "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "a", "b", "c", "d", "e", "f",
        ])
    }

    #[test]
    fn test_bip39_list_loaded() {
        let codec = WordCodec::bip39_english();
        assert_eq!(codec.base(), 2048);
        assert_eq!(codec.index_of("abandon"), Some(0));
        assert_eq!(codec.index_of("zoo"), Some(2047));
        assert_eq!(codec.index_of("notaword"), None);
    }

    #[test]
    fn test_encode_small_values() {
        let codec = WordCodec::bip39_english();
        assert_eq!(codec.encode(&[0]).unwrap(), "abandon");
        assert_eq!(codec.encode(&[1]).unwrap(), "ability");
        // 2048 = 1 * 2048 + 0
        assert_eq!(codec.encode(&[0x08, 0x00]).unwrap(), "ability abandon");
    }

    #[test]
    fn test_encode_hex_base() {
        let codec = hex_codec();
        assert_eq!(codec.encode(&[0xde, 0xad]).unwrap(), "d e a d");
        assert_eq!(codec.decode("d e a d").unwrap(), vec![0xde, 0xad]);
    }

    #[test]
    fn test_encode_empty_input() {
        let codec = WordCodec::bip39_english();
        assert!(matches!(codec.encode(&[]), Err(VssError::EmptyInput)));
    }

    #[test]
    fn test_empty_word_list() {
        let codec = WordCodec::new(Vec::<String>::new());
        assert!(matches!(codec.encode(&[1]), Err(VssError::InvalidWordList)));
        assert!(matches!(
            codec.decode("anything"),
            Err(VssError::InvalidWordList)
        ));
        assert_eq!(codec.add_checksum("anything"), "");
    }

    #[test]
    fn test_single_word_list() {
        let codec = WordCodec::new(["only"]);
        assert_eq!(codec.encode(&[0]).unwrap(), "only");
        assert!(codec.decode("only").unwrap().is_empty());
        assert!(matches!(codec.encode(&[1]), Err(VssError::InvalidWordList)));
    }

    #[test]
    fn test_two_word_list() {
        let codec = WordCodec::new(["zero", "one"]);
        assert_eq!(codec.encode(&[5]).unwrap(), "one zero one");
        assert_eq!(codec.decode("one zero one").unwrap(), vec![5]);
    }

    #[test]
    fn test_decode_errors() {
        let codec = WordCodec::bip39_english();
        assert!(matches!(codec.decode(""), Err(VssError::EmptyInput)));
        assert!(matches!(codec.decode("  \t\n "), Err(VssError::EmptyInput)));
        match codec.decode("abandon notaword ability") {
            Err(VssError::UnknownWord(word)) => assert_eq!(word, "notaword"),
            other => panic!("expected UnknownWord, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_tolerates_extra_whitespace() {
        let codec = WordCodec::bip39_english();
        let phrase = codec.encode(&[1, 2, 3, 4, 5]).unwrap();
        let spaced = format!("  {}\n", phrase.replace(' ', "   "));
        assert_eq!(codec.decode(&spaced).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_leading_zeros_dropped() {
        let codec = WordCodec::bip39_english();
        let phrase = codec.encode(&[0, 0, 1, 2, 3]).unwrap();
        assert_eq!(codec.decode(&phrase).unwrap(), vec![1, 2, 3]);

        let phrase = codec.encode(&[0, 0, 0, 0]).unwrap();
        assert_eq!(phrase, "abandon");
        assert!(codec.decode(&phrase).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_large_payload() {
        let codec = WordCodec::bip39_english();
        let data: Vec<u8> = (1..=200u8).collect();
        let phrase = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&phrase).unwrap(), data);
    }

    #[test]
    fn test_add_checksum() {
        let codec = WordCodec::bip39_english();
        // indices 1 + 2 + 3 = 6 -> "absorb"
        assert_eq!(
            codec.add_checksum("ability able about"),
            "ability able about absorb"
        );
        assert_eq!(codec.add_checksum(""), "");
        // Sum wraps mod 2048: 2047 + 1 = 0
        assert_eq!(codec.add_checksum("zoo ability"), "zoo ability abandon");
    }

    #[test]
    fn test_checksum_deterministic() {
        let codec = WordCodec::bip39_english();
        let phrase = "abandon ability able about above absent absorb abstract absurd abuse";
        let first = codec.add_checksum(phrase);
        for _ in 0..10 {
            assert_eq!(codec.add_checksum(phrase), first);
        }
    }

    #[test]
    fn test_verify_checksum() {
        let codec = WordCodec::bip39_english();
        let phrase = "abandon ability able about above";
        let with_checksum = codec.add_checksum(phrase);

        let (inner, ok) = codec.verify_checksum(&with_checksum);
        assert!(ok);
        assert_eq!(inner, phrase);

        let (_, ok) = codec.verify_checksum(&format!("{} zoo", phrase));
        assert!(!ok);
    }

    #[test]
    fn test_verify_checksum_too_short() {
        let codec = WordCodec::bip39_english();
        assert_eq!(codec.verify_checksum(""), (String::new(), false));
        assert_eq!(codec.verify_checksum("abandon"), (String::new(), false));
    }

    #[test]
    fn test_verify_checksum_detects_single_word_change() {
        let codec = WordCodec::bip39_english();
        let with_checksum = codec.add_checksum("legal winner thank year wave");
        let corrupted = with_checksum.replacen("winner", "wisdom", 1);
        let (_, ok) = codec.verify_checksum(&corrupted);
        assert!(!ok);
    }

    #[test]
    fn test_codec_shared_across_threads() {
        let codec = std::sync::Arc::new(WordCodec::bip39_english());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let codec = codec.clone();
                std::thread::spawn(move || {
                    let data = [i + 1, i, 0xff];
                    let phrase = codec.encode(&data).unwrap();
                    assert_eq!(codec.decode(&phrase).unwrap(), data);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
