use std::time::{Duration, SystemTime};

use crate::alphabet::Alphabet;
use crate::error::{ChronoidError, Result};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Encodes instants as fixed-width base-N strings relative to a custom
/// epoch.
///
/// Seconds and a rounded subsecond fraction are packed into one integer as
/// `(seconds << subsecond_bits) | fraction` before alphabet encoding. The
/// packing is lossy: decoded instants land within [`TimestampCodec::drift_bound`]
/// of the original.
///
/// The epoch is copied at construction and never changes afterward, so
/// concurrent encodes and decodes need no synchronization.
#[derive(Debug, Clone)]
pub struct TimestampCodec {
    alphabet: Alphabet,
    width: usize,
    subsecond_bits: u32,
    rounding_digits: u32,
    epoch: SystemTime,
}

impl TimestampCodec {
    /// Builds a codec.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWidth` for a zero width, `InvalidSubsecondBits` for
    /// bits outside `[0, 62]`, and `InvalidRoundingDigits` for digits
    /// outside `[1, 9]`.
    pub fn new(
        alphabet: Alphabet,
        width: usize,
        subsecond_bits: u32,
        rounding_digits: u32,
        epoch: SystemTime,
    ) -> Result<Self> {
        if width == 0 {
            return Err(ChronoidError::InvalidWidth { width });
        }
        if subsecond_bits > 62 {
            return Err(ChronoidError::InvalidSubsecondBits {
                bits: subsecond_bits,
            });
        }
        if !(1..=9).contains(&rounding_digits) {
            return Err(ChronoidError::InvalidRoundingDigits {
                digits: rounding_digits,
            });
        }
        Ok(Self {
            alphabet,
            width,
            subsecond_bits,
            rounding_digits,
            epoch,
        })
    }

    /// The fixed width of every encoded timestamp.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The epoch this codec measures from.
    pub const fn epoch(&self) -> SystemTime {
        self.epoch
    }

    /// Worst-case gap between an instant and its decoded round-trip: half a
    /// subsecond quantum plus half a decode-rounding step. Zero when
    /// subsecond encoding is disabled.
    ///
    /// At 10 or more subsecond bits the bound stays under a millisecond.
    /// This is documentation-grade: drift past it is logged by callers, not
    /// enforced.
    pub fn drift_bound(&self) -> Duration {
        if self.subsecond_bits == 0 {
            return Duration::ZERO;
        }
        let quantum_ns = NANOS_PER_SEC / (1u64 << self.subsecond_bits) as f64;
        let rounding_ns = NANOS_PER_SEC * 10f64.powi(-(self.rounding_digits as i32));
        Duration::from_nanos(((quantum_ns + rounding_ns) / 2.0).ceil() as u64)
    }

    /// Encodes `timestamp` to a string of exactly `width` alphabet
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns `PreEpochTimestamp` for instants before the epoch,
    /// `TimestampOutOfRange` if the seconds do not fit next to the
    /// subsecond field, and `ValueTooWide` if the encoding exceeds the
    /// fixed width.
    pub fn encode(&self, timestamp: SystemTime) -> Result<String> {
        let duration = timestamp
            .duration_since(self.epoch)
            .map_err(|_| ChronoidError::PreEpochTimestamp)?;
        let packed = self.pack(duration)?;
        let encoded = self.alphabet.encode(packed);
        let encoded_len = encoded.chars().count();
        if encoded_len > self.width {
            return Err(ChronoidError::ValueTooWide {
                encoded_len,
                width: self.width,
            });
        }
        Ok(self.alphabet.pad(&encoded, self.width))
    }

    /// Decodes an exactly-`width` string back to an instant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLength` for any other length, plus whatever the
    /// alphabet decode rejects.
    pub fn decode(&self, encoded: &str) -> Result<SystemTime> {
        let len = encoded.chars().count();
        if len != self.width {
            return Err(ChronoidError::InvalidLength {
                len,
                expected: format!("exactly {} characters", self.width),
            });
        }
        let packed = self.alphabet.decode(encoded)?;
        let duration = self.unpack(packed);
        self.epoch
            .checked_add(duration)
            .ok_or(ChronoidError::TimestampOutOfRange {
                seconds: duration.as_secs(),
            })
    }

    fn pack(&self, duration: Duration) -> Result<u64> {
        let mut seconds = duration.as_secs();
        if self.subsecond_bits == 0 {
            return Ok(seconds);
        }
        let scale = 1u64 << self.subsecond_bits;
        let fraction = f64::from(duration.subsec_nanos()) / NANOS_PER_SEC;
        let mut subseconds = (fraction * scale as f64).round() as u64;
        if subseconds == scale {
            // Rounding overflowed the subsecond field; carry into seconds.
            seconds = seconds
                .checked_add(1)
                .ok_or(ChronoidError::TimestampOutOfRange { seconds })?;
            subseconds = 0;
        }
        if seconds > u64::MAX >> self.subsecond_bits {
            return Err(ChronoidError::TimestampOutOfRange { seconds });
        }
        Ok((seconds << self.subsecond_bits) | subseconds)
    }

    fn unpack(&self, packed: u64) -> Duration {
        if self.subsecond_bits == 0 {
            return Duration::from_secs(packed);
        }
        let scale = 1u64 << self.subsecond_bits;
        let seconds = packed >> self.subsecond_bits;
        let subseconds = packed & (scale - 1);
        // Re-round the fraction to a fixed number of decimal digits so the
        // decoded value does not carry spurious binary-fraction precision.
        let step = 10f64.powi(self.rounding_digits as i32);
        let fraction = ((subseconds as f64 / scale as f64) * step).round() / step;
        let nanos = (fraction * NANOS_PER_SEC).round() as u32;
        Duration::new(seconds, nanos)
    }
}
