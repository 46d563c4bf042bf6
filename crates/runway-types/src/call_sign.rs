//! Aircraft call signs.
//!
//! Call signs are the only key the operator has for an aircraft. Operator
//! input is case-insensitive, so every call sign is stored upper-cased and
//! compared exactly after normalization.

use serde::{Deserialize, Serialize};

/// Number of letters in a generated call sign.
pub const CALL_SIGN_LEN: usize = 4;

/// An upper-cased aircraft identifier such as `QKZA`.
///
/// Generated call signs are always [`CALL_SIGN_LEN`] ASCII letters.
/// Call signs parsed from operator input are only normalized, never
/// rejected: an unknown or oddly shaped token simply fails to match any
/// aircraft.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallSign(String);

impl CallSign {
    /// Create a call sign from raw text, trimming whitespace and
    /// upper-casing it.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Build a call sign from generated letters.
    ///
    /// Bytes outside `A..=Z` are clamped into the alphabet so the result is
    /// always well formed.
    pub fn from_letters(letters: [u8; CALL_SIGN_LEN]) -> Self {
        let text = letters
            .iter()
            .map(|b| char::from(b.to_ascii_uppercase().clamp(b'A', b'Z')))
            .collect();
        Self(text)
    }

    /// Borrow the call sign text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a well-formed generated call sign (four ASCII
    /// letters).
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == CALL_SIGN_LEN && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl core::fmt::Display for CallSign {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallSign {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for CallSign {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
