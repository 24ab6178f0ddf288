use std::time::{SystemTime, UNIX_EPOCH};

use crate::checkdigit::DigitAlgorithm;

/// Configuration for a [`crate::SortableIdCodec`].
///
/// Values are carried as plain data here; validation happens when the codec
/// is constructed.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    pub alphabet: String,
    pub timestamp_width: usize,
    pub subsecond_bits: u32,
    pub rounding_digits: u32,
    pub check_algorithm: DigitAlgorithm,
    pub check_alphabet: String,
    pub epoch: SystemTime,
}

impl CodecConfig {
    /// Defaults: width 9, 10 subsecond bits (about millisecond precision),
    /// 4 rounding digits, Luhn digits over the decimal alphabet, Unix
    /// epoch.
    pub fn new(alphabet: impl Into<String>) -> Self {
        Self {
            alphabet: alphabet.into(),
            timestamp_width: 9,
            subsecond_bits: 10,
            rounding_digits: 4,
            check_algorithm: DigitAlgorithm::Luhn,
            check_alphabet: "0123456789".to_string(),
            epoch: UNIX_EPOCH,
        }
    }

    pub fn timestamp_width(mut self, width: usize) -> Self {
        self.timestamp_width = width;
        self
    }

    pub fn subsecond_bits(mut self, bits: u32) -> Self {
        self.subsecond_bits = bits;
        self
    }

    pub fn rounding_digits(mut self, digits: u32) -> Self {
        self.rounding_digits = digits;
        self
    }

    pub fn check_algorithm(mut self, algorithm: DigitAlgorithm) -> Self {
        self.check_algorithm = algorithm;
        self
    }

    pub fn check_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.check_alphabet = alphabet.into();
        self
    }

    pub fn epoch(mut self, epoch: SystemTime) -> Self {
        self.epoch = epoch;
        self
    }
}
