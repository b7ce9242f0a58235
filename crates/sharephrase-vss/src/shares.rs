//! Share value type and its plain-text form
//!
//! A share is two phrases. `key` is specific to one holder; `key_check` is
//! the same for every share of a split. Both end in a checksum word.

use crate::VssError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One holder's share of a split secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Share id and per-chunk values
    pub key: String,
    /// Threshold, chunk count and commitments
    pub key_check: String,
}

impl Share {
    pub fn new(key: impl Into<String>, key_check: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_check: key_check.into(),
        }
    }

    /// Render as two lines: `key`, then `key_check`
    pub fn to_text(&self) -> String {
        format!("{}\n{}", self.key, self.key_check)
    }

    /// Parse the two-line form produced by [`Share::to_text`]
    ///
    /// Blank lines and surrounding whitespace are ignored. Word validity is
    /// not checked here; that happens on verify/reconstruct.
    pub fn from_text(input: &str) -> Result<Self, VssError> {
        let mut lines = input.lines().map(str::trim).filter(|line| !line.is_empty());

        let key = lines
            .next()
            .ok_or_else(|| VssError::InvalidShareText("missing key phrase".into()))?;
        let key_check = lines
            .next()
            .ok_or_else(|| VssError::InvalidShareText("missing key check phrase".into()))?;

        if lines.next().is_some() {
            return Err(VssError::InvalidShareText(
                "expected exactly two phrases".into(),
            ));
        }

        Ok(Self::new(normalize(key), normalize(key_check)))
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Collapse runs of whitespace to single spaces
fn normalize(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What a share says about itself, without any curve arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInfo {
    /// Share id (x coordinate, 1-indexed)
    pub id: u8,
    /// Shares needed for reconstruction
    pub threshold: u8,
    /// Number of 31-byte secret chunks
    pub chunk_count: usize,
}
