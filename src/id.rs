use std::fmt;
use std::time::{Duration, SystemTime};

use crate::alphabet::Alphabet;
use crate::checkdigit::{DigitAlgorithm, compute_check_digit};
use crate::compose::{self, IdParts};
use crate::config::CodecConfig;
use crate::error::{ChronoidError, Result};
use crate::timestamp::TimestampCodec;

/// Largest sequence number a codec will accept.
///
/// One decimal order of magnitude of the 63-bit positive range is reserved
/// for the check digit folded in as `sequence * 10 + digit`.
pub const MAX_SEQUENCE: u64 = i64::MAX as u64 / 10 - 1;

/// A generated or decoded identifier. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableId {
    timestamp: SystemTime,
    sequence: u64,
    id: String,
}

impl SortableId {
    pub const fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn into_string(self) -> String {
        self.id
    }
}

impl fmt::Display for SortableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Generates and decodes sortable, checksum-protected identifiers from
/// `(timestamp, sequence)` pairs.
///
/// The encoded timestamp occupies a fixed-width prefix; the sequence, with
/// a check digit folded into its low decimal digit, follows unpadded. All
/// operations are pure and safe to call concurrently: every lookup table
/// and the epoch are fixed at construction.
#[derive(Debug, Clone)]
pub struct SortableIdCodec {
    sequence_alphabet: Alphabet,
    timestamps: TimestampCodec,
    check_alphabet: Alphabet,
    check_algorithm: DigitAlgorithm,
    timestamp_width: usize,
}

impl SortableIdCodec {
    /// Validates the configuration and builds a codec.
    ///
    /// # Errors
    ///
    /// Returns configuration errors for an invalid alphabet, check
    /// alphabet, width, subsecond bits, or rounding digits.
    pub fn new(config: CodecConfig) -> Result<Self> {
        let sequence_alphabet = Alphabet::new(&config.alphabet)?;
        let timestamps = TimestampCodec::new(
            sequence_alphabet.clone(),
            config.timestamp_width,
            config.subsecond_bits,
            config.rounding_digits,
            config.epoch,
        )?;
        let check_alphabet = Alphabet::new(&config.check_alphabet)?;
        Ok(Self {
            sequence_alphabet,
            timestamps,
            check_alphabet,
            check_algorithm: config.check_algorithm,
            timestamp_width: config.timestamp_width,
        })
    }

    /// Whether encoded identifiers compare, as strings, in timestamp order.
    ///
    /// Requires the configured alphabet to be pre-sorted; callers that rely
    /// on sortability must check this rather than assume it.
    pub const fn retains_sort_order(&self) -> bool {
        self.sequence_alphabet.retains_sort_order()
    }

    /// Builds an identifier from a timestamp and a sequence number.
    ///
    /// The two composition passes stay immutable: the parts are composed
    /// once without the checksum to feed the digit computation, then
    /// rebuilt with the digit folded into the sequence.
    ///
    /// Every fresh identifier is decoded back before being returned; a
    /// sequence mismatch is a defect and fails hard, while timestamp drift
    /// beyond [`TimestampCodec::drift_bound`] is only logged since the
    /// packing is lossy by design.
    ///
    /// # Errors
    ///
    /// Returns `SequenceOutOfRange` above [`MAX_SEQUENCE`], timestamp
    /// encoding errors, digit-algorithm rejections,
    /// `NonDecimalCheckDigit` if the configured check alphabet projects
    /// outside `0..=9`, and `RoundTripMismatch` on self-verification
    /// failure.
    pub fn generate(&self, timestamp: SystemTime, sequence: u64) -> Result<SortableId> {
        if sequence > MAX_SEQUENCE {
            return Err(ChronoidError::SequenceOutOfRange {
                sequence,
                max: MAX_SEQUENCE,
            });
        }

        let encoded_timestamp = self.timestamps.encode(timestamp)?;
        let bare = IdParts::new(
            encoded_timestamp.clone(),
            self.sequence_alphabet.encode(sequence),
        );
        let payload = compose::compose(&bare, self.timestamp_width)?;

        let digit_char = compute_check_digit(&payload, self.check_algorithm, &self.check_alphabet)?;
        let digit = u64::from(
            digit_char
                .to_digit(10)
                .ok_or(ChronoidError::NonDecimalCheckDigit { digit: digit_char })?,
        );

        let checksummed = IdParts::new(
            encoded_timestamp,
            self.sequence_alphabet.encode(sequence * 10 + digit),
        );
        let id = compose::compose(&checksummed, self.timestamp_width)?;

        let decoded = self.decode(&id)?;
        if decoded.sequence != sequence {
            return Err(ChronoidError::RoundTripMismatch {
                expected: sequence,
                decoded: decoded.sequence,
            });
        }
        let drift = absolute_drift(decoded.timestamp, timestamp);
        let bound = self.timestamps.drift_bound();
        if drift > bound {
            tracing::warn!(?drift, ?bound, %id, "decoded timestamp drifted beyond the bound");
        }

        Ok(SortableId {
            timestamp,
            sequence,
            id,
        })
    }

    /// Decodes an identifier, validating the embedded checksum before
    /// trusting anything else.
    ///
    /// # Errors
    ///
    /// Every malformed input comes back as a typed rejection:
    /// `InvalidLength`, `UnknownCharacter`, `DecodeOverflow`, or
    /// `ChecksumMismatch`. Decoding never panics and never yields a
    /// partial identifier.
    pub fn decode(&self, id: &str) -> Result<SortableId> {
        let parts = compose::split(id, self.timestamp_width)?;
        let sequence_value = self.sequence_alphabet.decode(&parts.sequence)?;

        let digit = sequence_value % 10;
        let sequence = sequence_value / 10;
        if sequence > MAX_SEQUENCE {
            return Err(ChronoidError::SequenceOutOfRange {
                sequence,
                max: MAX_SEQUENCE,
            });
        }
        let digit_char = char::from_digit(digit as u32, 10).ok_or(ChronoidError::ChecksumMismatch)?;
        let payload = format!(
            "{}{}",
            parts.timestamp,
            self.sequence_alphabet.encode(sequence)
        );
        match compute_check_digit(&payload, self.check_algorithm, &self.check_alphabet) {
            Ok(expected) if expected == digit_char => {}
            // A digit-algorithm rejection means no digit could ever have
            // been generated for this payload.
            Ok(_) | Err(_) => return Err(ChronoidError::ChecksumMismatch),
        }

        let timestamp = self.timestamps.decode(&parts.timestamp)?;

        Ok(SortableId {
            timestamp,
            sequence,
            id: id.to_string(),
        })
    }

    /// True if `id` decodes cleanly.
    pub fn is_valid(&self, id: &str) -> bool {
        self.decode(id).is_ok()
    }
}

fn absolute_drift(a: SystemTime, b: SystemTime) -> Duration {
    a.duration_since(b)
        .or_else(|_| b.duration_since(a))
        .unwrap_or_default()
}
