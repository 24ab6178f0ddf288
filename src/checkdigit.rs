use sha2::{Digest, Sha256};

use crate::alphabet::Alphabet;
use crate::error::{ChronoidError, Result};

/// Verhoeff multiplication table for the dihedral group D5.
const VERHOEFF_D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Verhoeff position permutation table.
const VERHOEFF_P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Verhoeff inverse table.
const VERHOEFF_INV: [u8; 10] = [0, 4, 3, 2, 1, 5, 6, 7, 8, 9];

/// Pluggable payload-to-digit generators.
///
/// Each algorithm maps a digit string to a short decimal integer string.
/// Input-domain constraints differ per algorithm and are enforced, not
/// papered over: a rejection propagates to the caller rather than producing
/// a substitute digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitAlgorithm {
    /// Classical Luhn check digit. Decimal input only; rejects all-zero
    /// payloads.
    Luhn,
    /// Verhoeff dihedral-group check digit. Decimal input only; tolerates
    /// all-zero payloads.
    Verhoeff,
    /// ISIN-style double-add-double digit. Case-insensitive alphanumeric
    /// input, letters expand to 10..35; rejects all-zero payloads.
    Isin,
    /// SHA-256 seeded digit: first 8 digest bytes, big-endian, as a u64.
    Sha256,
}

impl DigitAlgorithm {
    /// Upper bound on the length of the string `compute` can return.
    pub const fn max_output_len(self) -> usize {
        match self {
            Self::Luhn | Self::Verhoeff | Self::Isin => 1,
            // u64::MAX has 20 decimal digits.
            Self::Sha256 => 20,
        }
    }

    /// Runs the algorithm over `payload`, returning a decimal integer
    /// string.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPayloadChar` for characters outside the
    /// algorithm's input domain and `ZeroPayload` where the algorithm
    /// forbids all-zero input.
    pub fn compute(self, payload: &str) -> Result<String> {
        match self {
            Self::Luhn => {
                let digits = decimal_values(payload)?;
                reject_all_zero(&digits)?;
                Ok(luhn_digit(&digits).to_string())
            }
            Self::Verhoeff => {
                let digits = decimal_values(payload)?;
                Ok(verhoeff_digit(&digits).to_string())
            }
            Self::Isin => {
                let expanded = isin_expand(payload)?;
                reject_all_zero(&expanded)?;
                Ok(luhn_digit(&expanded).to_string())
            }
            Self::Sha256 => {
                let digest = Sha256::digest(payload.as_bytes());
                let mut first = [0u8; 8];
                first.copy_from_slice(&digest[..8]);
                Ok(u64::from_be_bytes(first).to_string())
            }
        }
    }
}

fn decimal_values(payload: &str) -> Result<Vec<u8>> {
    payload
        .chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or(ChronoidError::UnsupportedPayloadChar { ch: c })
        })
        .collect()
}

fn reject_all_zero(digits: &[u8]) -> Result<()> {
    if digits.iter().all(|&d| d == 0) {
        return Err(ChronoidError::ZeroPayload);
    }
    Ok(())
}

/// Luhn check digit over payload digits: double every second digit starting
/// from the rightmost, digit-sum the products, take the tens' complement.
fn luhn_digit(digits: &[u8]) -> u8 {
    let mut sum = 0u64;
    for (i, &d) in digits.iter().rev().enumerate() {
        let mut v = u64::from(d);
        if i % 2 == 0 {
            v *= 2;
            if v > 9 {
                v -= 9;
            }
        }
        sum += v;
    }
    ((10 - sum % 10) % 10) as u8
}

/// Verhoeff check digit: fold payload digits right-to-left through the D5
/// multiplication table, permuted by position, then invert.
fn verhoeff_digit(digits: &[u8]) -> u8 {
    let mut c = 0u8;
    for (i, &d) in digits.iter().rev().enumerate() {
        let p = VERHOEFF_P[(i + 1) % 8][d as usize];
        c = VERHOEFF_D[c as usize][p as usize];
    }
    VERHOEFF_INV[c as usize]
}

/// Expands an alphanumeric payload the ISIN way: digits stay, letters become
/// the two digits of 10 + their index in the (case-folded) alphabet.
fn isin_expand(payload: &str) -> Result<Vec<u8>> {
    let mut digits = Vec::with_capacity(payload.len() * 2);
    for c in payload.chars() {
        if let Some(d) = c.to_digit(10) {
            digits.push(d as u8);
        } else if c.is_ascii_alphabetic() {
            let v = c.to_ascii_uppercase() as u8 - b'A' + 10;
            digits.push(v / 10);
            digits.push(v % 10);
        } else {
            return Err(ChronoidError::UnsupportedPayloadChar { ch: c });
        }
    }
    Ok(digits)
}

/// Reduces an arbitrary payload to the decimal-digit string the digit
/// algorithms operate on.
///
/// All-decimal payloads pass through unchanged so classical algorithms see
/// the literal number. Anything else becomes the concatenated decimal
/// renderings of its characters' Unicode code points.
fn to_digit_string(payload: &str) -> String {
    if !payload.is_empty() && payload.chars().all(|c| c.is_ascii_digit()) {
        return payload.to_string();
    }
    let mut out = String::with_capacity(payload.len() * 3);
    for c in payload.chars() {
        out.push_str(&(c as u32).to_string());
    }
    out
}

/// Computes a check digit for `payload`, drawn from `target_alphabet`.
///
/// The payload is reduced to decimal digits, run through `algorithm`, and
/// the absolute value of the result is projected onto the alphabet via
/// modulo.
///
/// # Errors
///
/// Propagates algorithm rejections (`ZeroPayload`,
/// `UnsupportedPayloadChar`).
pub fn compute_check_digit(
    payload: &str,
    algorithm: DigitAlgorithm,
    target_alphabet: &Alphabet,
) -> Result<char> {
    let digits = to_digit_string(payload);
    let raw = algorithm.compute(&digits)?;
    let seed: i128 = raw.parse().map_err(|_| ChronoidError::DecodeOverflow)?;
    let index = (seed.unsigned_abs() % u128::from(target_alphabet.radix())) as u64;
    target_alphabet
        .char_at(index)
        .ok_or(ChronoidError::DecodeOverflow)
}

/// Verifies that the last character of `value` is the check digit of
/// everything before it.
///
/// Values shorter than 2 characters have no room for a payload plus a
/// digit and are invalid by definition.
pub fn is_valid_check_digit(
    value: &str,
    algorithm: DigitAlgorithm,
    target_alphabet: &Alphabet,
) -> bool {
    let mut chars = value.chars();
    let Some(expected) = chars.next_back() else {
        return false;
    };
    let payload = chars.as_str();
    if payload.is_empty() {
        return false;
    }
    compute_check_digit(payload, algorithm, target_alphabet) == Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal() -> Alphabet {
        Alphabet::new("0123456789").expect("valid alphabet")
    }

    // ========== Luhn ==========

    #[test]
    fn test_luhn_known_value() {
        // 7992739871 is the classic Luhn example; its check digit is 3.
        assert_eq!(DigitAlgorithm::Luhn.compute("7992739871"), Ok("3".to_string()));
    }

    #[test]
    fn test_luhn_single_digit() {
        // 5 doubled is 10, digit sum 1, complement 9.
        assert_eq!(DigitAlgorithm::Luhn.compute("5"), Ok("9".to_string()));
    }

    #[test]
    fn test_luhn_rejects_all_zero() {
        assert_eq!(
            DigitAlgorithm::Luhn.compute("0000"),
            Err(ChronoidError::ZeroPayload)
        );
    }

    #[test]
    fn test_luhn_rejects_empty() {
        assert_eq!(DigitAlgorithm::Luhn.compute(""), Err(ChronoidError::ZeroPayload));
    }

    #[test]
    fn test_luhn_rejects_letters() {
        assert_eq!(
            DigitAlgorithm::Luhn.compute("12a4"),
            Err(ChronoidError::UnsupportedPayloadChar { ch: 'a' })
        );
    }

    // ========== Verhoeff ==========

    #[test]
    fn test_verhoeff_known_value() {
        // 236 -> check digit 3, so 2363 is a valid Verhoeff number.
        assert_eq!(DigitAlgorithm::Verhoeff.compute("236"), Ok("3".to_string()));
    }

    #[test]
    fn test_verhoeff_tolerates_all_zero() {
        assert!(DigitAlgorithm::Verhoeff.compute("0000").is_ok());
    }

    #[test]
    fn test_verhoeff_rejects_letters() {
        assert_eq!(
            DigitAlgorithm::Verhoeff.compute("23x"),
            Err(ChronoidError::UnsupportedPayloadChar { ch: 'x' })
        );
    }

    // ========== ISIN ==========

    #[test]
    fn test_isin_known_value() {
        // Apple's ISIN is US0378331005: payload US037833100, digit 5.
        assert_eq!(
            DigitAlgorithm::Isin.compute("US037833100"),
            Ok("5".to_string())
        );
    }

    #[test]
    fn test_isin_case_insensitive() {
        assert_eq!(
            DigitAlgorithm::Isin.compute("us037833100"),
            DigitAlgorithm::Isin.compute("US037833100")
        );
    }

    #[test]
    fn test_isin_decimal_passthrough_matches_luhn() {
        // With no letters to expand, ISIN degenerates to Luhn.
        assert_eq!(
            DigitAlgorithm::Isin.compute("7992739871"),
            DigitAlgorithm::Luhn.compute("7992739871")
        );
    }

    #[test]
    fn test_isin_rejects_all_zero() {
        assert_eq!(
            DigitAlgorithm::Isin.compute("000"),
            Err(ChronoidError::ZeroPayload)
        );
    }

    #[test]
    fn test_isin_rejects_punctuation() {
        assert_eq!(
            DigitAlgorithm::Isin.compute("US-037"),
            Err(ChronoidError::UnsupportedPayloadChar { ch: '-' })
        );
    }

    // ========== SHA-256 ==========

    #[test]
    fn test_sha256_deterministic() {
        let a = DigitAlgorithm::Sha256.compute("12345");
        let b = DigitAlgorithm::Sha256.compute("12345");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sha256_known_value() {
        // SHA256("hello") begins 2cf24dba5fb0a30e..., so the seed is
        // 0x2cf24dba5fb0a30e = 3238736544897475342.
        assert_eq!(
            DigitAlgorithm::Sha256.compute("hello"),
            Ok("3238736544897475342".to_string())
        );
    }

    #[test]
    fn test_sha256_tolerates_all_zero() {
        assert!(DigitAlgorithm::Sha256.compute("0000").is_ok());
    }

    #[test]
    fn test_max_output_len() {
        assert_eq!(DigitAlgorithm::Luhn.max_output_len(), 1);
        assert_eq!(DigitAlgorithm::Verhoeff.max_output_len(), 1);
        assert_eq!(DigitAlgorithm::Isin.max_output_len(), 1);
        assert_eq!(DigitAlgorithm::Sha256.max_output_len(), 20);
    }

    // ========== Engine: payload transformation ==========

    #[test]
    fn test_decimal_payload_passes_through() {
        assert_eq!(to_digit_string("00123"), "00123");
    }

    #[test]
    fn test_text_payload_expands_code_points() {
        // 'A' is U+0041 (65), 'B' is U+0042 (66).
        assert_eq!(to_digit_string("AB"), "6566");
    }

    #[test]
    fn test_empty_payload_expands_to_empty() {
        assert_eq!(to_digit_string(""), "");
    }

    #[test]
    fn test_mixed_payload_expands_everything() {
        // '1' is U+0031 (49), 'a' is U+0061 (97).
        assert_eq!(to_digit_string("1a"), "4997");
    }

    // ========== Engine: compute + validate ==========

    #[test]
    fn test_compute_check_digit_luhn_text_payload() {
        // "AB" expands to 6566; Luhn over 6566 gives 4.
        let digit = compute_check_digit("AB", DigitAlgorithm::Luhn, &decimal());
        assert_eq!(digit, Ok('4'));
    }

    #[test]
    fn test_compute_check_digit_numeric_payload() {
        let digit = compute_check_digit("7992739871", DigitAlgorithm::Luhn, &decimal());
        assert_eq!(digit, Ok('3'));
    }

    #[test]
    fn test_compute_projects_onto_target_alphabet() {
        let letters = Alphabet::new("abcdefghij").expect("valid alphabet");
        // Same index, different alphabet: Luhn digit 3 projects to 'd'.
        let digit = compute_check_digit("7992739871", DigitAlgorithm::Luhn, &letters);
        assert_eq!(digit, Ok('d'));
    }

    #[test]
    fn test_compute_propagates_zero_payload() {
        assert_eq!(
            compute_check_digit("000", DigitAlgorithm::Luhn, &decimal()),
            Err(ChronoidError::ZeroPayload)
        );
    }

    #[test]
    fn test_is_valid_agrees_with_compute() {
        let alpha = decimal();
        for algorithm in [
            DigitAlgorithm::Luhn,
            DigitAlgorithm::Verhoeff,
            DigitAlgorithm::Isin,
            DigitAlgorithm::Sha256,
        ] {
            let digit = compute_check_digit("31415926", algorithm, &alpha).expect("digit");
            let value = format!("31415926{digit}");
            assert!(
                is_valid_check_digit(&value, algorithm, &alpha),
                "{algorithm:?} failed its own digit"
            );
        }
    }

    #[test]
    fn test_is_valid_rejects_wrong_digit() {
        let alpha = decimal();
        let digit = compute_check_digit("31415926", DigitAlgorithm::Luhn, &alpha).expect("digit");
        let wrong = if digit == '0' { '1' } else { '0' };
        let value = format!("31415926{wrong}");
        assert!(!is_valid_check_digit(&value, DigitAlgorithm::Luhn, &alpha));
    }

    #[test]
    fn test_is_valid_short_values() {
        let alpha = decimal();
        assert!(!is_valid_check_digit("", DigitAlgorithm::Luhn, &alpha));
        assert!(!is_valid_check_digit("7", DigitAlgorithm::Luhn, &alpha));
    }

    #[test]
    fn test_is_valid_on_rejected_payload_is_false() {
        // Luhn rejects the all-zero payload, so no digit can validate it.
        assert!(!is_valid_check_digit("0007", DigitAlgorithm::Luhn, &decimal()));
    }

    #[test]
    fn test_single_char_flip_detected() {
        let alpha = decimal();
        let digit = compute_check_digit("8675309", DigitAlgorithm::Verhoeff, &alpha).expect("digit");
        let valid = format!("8675309{digit}");
        // Flip each payload position to a different digit; Verhoeff detects
        // all single-digit substitutions.
        for (i, original) in valid.chars().enumerate().take(valid.len() - 1) {
            let replacement = if original == '9' { '0' } else {
                char::from(original as u8 + 1)
            };
            let mut mutated: Vec<char> = valid.chars().collect();
            mutated[i] = replacement;
            let mutated: String = mutated.into_iter().collect();
            assert!(
                !is_valid_check_digit(&mutated, DigitAlgorithm::Verhoeff, &alpha),
                "substitution at {i} went undetected: {mutated}"
            );
        }
    }
}
