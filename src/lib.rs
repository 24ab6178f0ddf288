pub mod alphabet;
pub mod checkdigit;
pub mod compose;
pub mod config;
pub mod error;
pub mod id;
pub mod timestamp;

pub use alphabet::Alphabet;
pub use checkdigit::{DigitAlgorithm, compute_check_digit, is_valid_check_digit};
pub use compose::{IdParts, compose, split};
pub use config::CodecConfig;
pub use error::{ChronoidError, Result};
pub use id::{MAX_SEQUENCE, SortableId, SortableIdCodec};
pub use timestamp::TimestampCodec;
