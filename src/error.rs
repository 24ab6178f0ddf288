#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChronoidError {
    // Configuration errors: raised at construction time, fatal to the component.
    #[error("invalid alphabet: {reason}")]
    InvalidAlphabet { reason: String },

    #[error("invalid timestamp width: {width}")]
    InvalidWidth { width: usize },

    #[error("subsecond bits out of range [0, 62]: {bits}")]
    InvalidSubsecondBits { bits: u32 },

    #[error("rounding digits out of range [1, 9]: {digits}")]
    InvalidRoundingDigits { digits: u32 },

    #[error("check digit is not a decimal digit: '{digit}'")]
    NonDecimalCheckDigit { digit: char },

    // Input rejections: per-call, recoverable by the caller.
    #[error("sequence {sequence} exceeds maximum encodable value {max}")]
    SequenceOutOfRange { sequence: u64, max: u64 },

    #[error("character not in alphabet: '{ch}'")]
    UnknownCharacter { ch: char },

    #[error("invalid input length {len}, expected {expected}")]
    InvalidLength { len: usize, expected: String },

    #[error("encoded value is {encoded_len} characters, wider than fixed width {width}")]
    ValueTooWide { encoded_len: usize, width: usize },

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("digit algorithm rejects all-zero payload")]
    ZeroPayload,

    #[error("digit algorithm does not accept character '{ch}'")]
    UnsupportedPayloadChar { ch: char },

    #[error("timestamp precedes the configured epoch")]
    PreEpochTimestamp,

    #[error("timestamp seconds {seconds} do not fit the subsecond packing")]
    TimestampOutOfRange { seconds: u64 },

    #[error("decoded value overflows u64")]
    DecodeOverflow,

    // Internal consistency failure: a freshly generated ID must decode back to
    // the same sequence. Anything else is a defect, not bad input.
    #[error("generated ID decodes incorrectly: expected sequence {expected}, decoded {decoded}")]
    RoundTripMismatch { expected: u64, decoded: u64 },
}

pub type Result<T> = std::result::Result<T, ChronoidError>;
