use std::collections::HashMap;

use crate::error::{ChronoidError, Result};

/// Alphabet lengths must fit a signed 32-bit count.
const MAX_ALPHABET_LEN: usize = i32::MAX as usize;

/// Base-N codec over a caller-supplied ordered set of unique characters.
///
/// The character order defines digit order, so a pre-sorted alphabet plus
/// fixed-width zero-padding makes encoded strings compare in the same order
/// as the integers they encode. Callers that rely on that must check
/// [`Alphabet::retains_sort_order`] explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
    values: HashMap<char, u64>,
    sorted: bool,
    max_encoded_len: usize,
}

impl Alphabet {
    /// Builds a codec from the given characters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAlphabet` if the alphabet has fewer than 2 characters,
    /// more than 2^31 - 1, contains whitespace, or contains duplicates.
    pub fn new(alphabet: &str) -> Result<Self> {
        let chars: Vec<char> = alphabet.chars().collect();

        if chars.len() < 2 {
            return Err(ChronoidError::InvalidAlphabet {
                reason: format!("need at least 2 characters, got {}", chars.len()),
            });
        }
        if chars.len() > MAX_ALPHABET_LEN {
            return Err(ChronoidError::InvalidAlphabet {
                reason: format!("too many characters: {}", chars.len()),
            });
        }

        let mut values = HashMap::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            if c.is_whitespace() {
                return Err(ChronoidError::InvalidAlphabet {
                    reason: format!("whitespace character at position {i}"),
                });
            }
            if values.insert(c, i as u64).is_some() {
                return Err(ChronoidError::InvalidAlphabet {
                    reason: format!("duplicate character '{c}'"),
                });
            }
        }

        let sorted = chars.windows(2).all(|w| w[0] < w[1]);

        let mut codec = Self {
            chars,
            values,
            sorted,
            max_encoded_len: 0,
        };
        // Cache the widest possible encoding up front instead of re-deriving
        // it on every call.
        codec.max_encoded_len = codec.encode(u64::MAX).chars().count();
        Ok(codec)
    }

    /// Number of characters in the alphabet, i.e. the numeral base.
    pub fn radix(&self) -> u64 {
        self.chars.len() as u64
    }

    /// The character encoding the value zero.
    pub fn zero_char(&self) -> char {
        self.chars[0]
    }

    /// Length of the encoding of `u64::MAX`, the widest any encoded value
    /// can get.
    pub const fn max_encoded_len(&self) -> usize {
        self.max_encoded_len
    }

    /// True if the alphabet characters were supplied in ascending order.
    ///
    /// Only then do equal-width encodings compare, as strings, in the same
    /// order as the integers they encode.
    pub const fn retains_sort_order(&self) -> bool {
        self.sorted
    }

    /// Character for the given digit value, or `None` if the value is at or
    /// beyond the radix.
    pub fn char_at(&self, value: u64) -> Option<char> {
        usize::try_from(value)
            .ok()
            .and_then(|i| self.chars.get(i).copied())
    }

    /// Encodes a non-negative integer as base-N alphabet characters, most
    /// significant digit first.
    pub fn encode(&self, value: u64) -> String {
        if value == 0 {
            return self.chars[0].to_string();
        }
        let radix = self.radix();
        let mut digits = Vec::new();
        let mut v = value;
        while v > 0 {
            digits.push(self.chars[(v % radix) as usize]);
            v /= radix;
        }
        digits.reverse();
        digits.into_iter().collect()
    }

    /// Decodes a base-N string back to an integer.
    ///
    /// Leading zero-characters are stripped (keeping at least one).
    ///
    /// # Errors
    ///
    /// Returns `InvalidLength` on empty input, `UnknownCharacter` for any
    /// character outside the alphabet, and `DecodeOverflow` if the value
    /// exceeds `u64::MAX`.
    pub fn decode(&self, encoded: &str) -> Result<u64> {
        if encoded.is_empty() {
            return Err(ChronoidError::InvalidLength {
                len: 0,
                expected: "at least 1 character".to_string(),
            });
        }

        let stripped = encoded.trim_start_matches(self.chars[0]);
        if stripped.is_empty() {
            // Input was all zero-characters.
            return Ok(0);
        }

        let radix = self.radix();
        let mut acc: u64 = 0;
        for c in stripped.chars() {
            let digit = *self
                .values
                .get(&c)
                .ok_or(ChronoidError::UnknownCharacter { ch: c })?;
            acc = acc
                .checked_mul(radix)
                .and_then(|a| a.checked_add(digit))
                .ok_or(ChronoidError::DecodeOverflow)?;
        }
        Ok(acc)
    }

    /// Left-pads `encoded` with the zero-character up to `width`.
    ///
    /// A string already at or beyond `width` is returned unchanged; this
    /// never truncates.
    pub fn pad(&self, encoded: &str, width: usize) -> String {
        let len = encoded.chars().count();
        if len >= width {
            return encoded.to_string();
        }
        let mut padded = String::with_capacity(width);
        for _ in 0..(width - len) {
            padded.push(self.chars[0]);
        }
        padded.push_str(encoded);
        padded
    }
}
