//! CPF validation and generation service
//!
//! Implements the Brazilian CPF check-digit algorithm: digit normalization,
//! rejection of the well-known all-identical-digit placeholders, and the two
//! weighted mod-11 check digits.

use std::fmt;

use thiserror::Error;

/// Number of digits in a CPF, including the two trailing check digits
pub const CPF_LENGTH: usize = 11;

/// Number of payload digits preceding the check digits
const PAYLOAD_LENGTH: usize = 9;

/// A valid CPF: 11 decimal digits whose two trailing check digits match the
/// values derived from the 9-digit payload.
///
/// Pure value type with no lifecycle. Construction goes through
/// [`CpfService::parse`] or [`CpfService::generate`], so an instance always
/// satisfies the validity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cpf {
    digits: [u8; CPF_LENGTH],
}

impl Cpf {
    /// The digits of this CPF, most significant first
    pub fn digits(&self) -> &[u8; CPF_LENGTH] {
        &self.digits
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

/// Reasons a candidate string fails strict CPF parsing
///
/// These never surface over HTTP: [`CpfService::is_valid`] absorbs every
/// variant into a plain `false`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CpfError {
    /// Input did not normalize to exactly 11 digits
    #[error("Expected 11 digits, found {0}")]
    InvalidLength(usize),

    /// All 11 digits are identical (e.g. "00000000000"), a well-known
    /// placeholder rejected regardless of checksum
    #[error("All digits are identical")]
    RepeatedDigits,

    /// A check digit does not match the value derived from the preceding
    /// digits
    #[error("Check digit at position {position} should be {expected}, found {found}")]
    CheckDigitMismatch {
        /// 0-based index of the offending check digit (9 or 10)
        position: usize,
        /// Check digit derived from the preceding digits
        expected: u8,
        /// Check digit actually present in the input
        found: u8,
    },
}

/// CPF service
///
/// Stateless; every operation is a pure function over its input, so
/// concurrent requests need no coordination.
pub struct CpfService;

impl CpfService {
    /// Strip every character that is not a decimal digit, preserving order
    ///
    /// # Arguments
    /// * `raw` - Free-form input (may carry dots, dashes, spaces, anything)
    ///
    /// # Returns
    /// * Digit values in input order; may be shorter or longer than 11
    pub fn normalize(raw: &str) -> Vec<u8> {
        raw.chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as u8)
            .collect()
    }

    /// Strictly parse a candidate string into a [`Cpf`]
    ///
    /// # Arguments
    /// * `raw` - Free-form candidate; normalized before the checks run
    ///
    /// # Returns
    /// * `Ok(Cpf)` - All validity rules hold
    /// * `Err(CpfError)` - The first rule that failed, in contract order
    ///   (length, repeated digits, first check digit, second check digit)
    pub fn parse(raw: &str) -> Result<Cpf, CpfError> {
        let digits: [u8; CPF_LENGTH] = Self::normalize(raw)
            .try_into()
            .map_err(|v: Vec<u8>| CpfError::InvalidLength(v.len()))?;

        if digits.iter().all(|&d| d == digits[0]) {
            return Err(CpfError::RepeatedDigits);
        }

        for position in [PAYLOAD_LENGTH, PAYLOAD_LENGTH + 1] {
            let expected = check_digit(&digits[..position]);
            if expected != digits[position] {
                return Err(CpfError::CheckDigitMismatch {
                    position,
                    expected,
                    found: digits[position],
                });
            }
        }

        Ok(Cpf { digits })
    }

    /// Whether `raw` is a valid CPF
    ///
    /// Malformed input is not an error condition, it is simply `false`.
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// Generate a fresh valid CPF
    ///
    /// Draws 9 payload digits from the thread-local pseudo-random generator
    /// (not cryptographic, not reproducible across calls) and appends the
    /// two derived check digits. An all-identical payload is redrawn so the
    /// repeated-digit rejection can never fire on generated output.
    pub fn generate() -> Cpf {
        let mut digits = [0u8; CPF_LENGTH];
        loop {
            for digit in digits.iter_mut().take(PAYLOAD_LENGTH) {
                *digit = rand::random_range(0..=9);
            }
            if digits[..PAYLOAD_LENGTH].iter().any(|&d| d != digits[0]) {
                break;
            }
        }
        digits[PAYLOAD_LENGTH] = check_digit(&digits[..PAYLOAD_LENGTH]);
        digits[PAYLOAD_LENGTH + 1] = check_digit(&digits[..PAYLOAD_LENGTH + 1]);
        Cpf { digits }
    }
}

/// Check digit for a digit prefix
///
/// Weights run from `prefix.len() + 1` down to 2, applied left to right.
/// The weighted sum mod 11 maps to 0 when the remainder is below 2,
/// otherwise to `11 - remainder`.
fn check_digit(prefix: &[u8]) -> u8 {
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, &digit)| u32::from(digit) * (prefix.len() + 1 - i) as u32)
        .sum();
    let remainder = (sum % 11) as u8;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_cpf() {
        assert!(CpfService::is_valid("52998224725"));
    }

    #[test]
    fn test_known_invalid_cpf() {
        assert!(!CpfService::is_valid("12345678900"));
    }

    #[test]
    fn test_punctuation_is_ignored() {
        assert!(CpfService::is_valid("529.982.247-25"));
        assert_eq!(
            CpfService::is_valid("529.982.247-25"),
            CpfService::is_valid("52998224725")
        );
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        assert!(!CpfService::is_valid(""));
        assert!(!CpfService::is_valid("5299822472"));
        assert!(!CpfService::is_valid("529982247255"));
        assert!(!CpfService::is_valid("not a cpf"));
    }

    #[test]
    fn test_repeated_digits_are_invalid() {
        // "11111111111" actually satisfies the checksum math, so this rule
        // must run before the check-digit comparison
        for digit in 0..=9 {
            let candidate = digit.to_string().repeat(11);
            assert!(
                !CpfService::is_valid(&candidate),
                "{} should be invalid",
                candidate
            );
        }
    }

    #[test]
    fn test_normalize_strips_non_digits() {
        assert_eq!(
            CpfService::normalize("529.982.247-25"),
            vec![5, 2, 9, 9, 8, 2, 2, 4, 7, 2, 5]
        );
        assert_eq!(CpfService::normalize("no digits here"), Vec::<u8>::new());
        assert_eq!(CpfService::normalize(""), Vec::<u8>::new());
    }

    #[test]
    fn test_parse_reports_failing_rule() {
        assert_eq!(CpfService::parse("123"), Err(CpfError::InvalidLength(3)));
        assert_eq!(
            CpfService::parse("00000000000"),
            Err(CpfError::RepeatedDigits)
        );
        // Last digit off by one: payload passes, second check digit fails
        assert!(matches!(
            CpfService::parse("52998224724"),
            Err(CpfError::CheckDigitMismatch { position: 10, .. })
        ));
    }

    #[test]
    fn test_generated_cpfs_are_valid() {
        for _ in 0..100 {
            let cpf = CpfService::generate();
            assert!(
                CpfService::is_valid(&cpf.to_string()),
                "generated {} should validate",
                cpf
            );
        }
    }

    #[test]
    fn test_generated_payload_is_never_uniform() {
        for _ in 0..100 {
            let cpf = CpfService::generate();
            let digits = cpf.digits();
            assert!(digits[..9].iter().any(|&d| d != digits[0]));
        }
    }

    #[test]
    fn test_generation_is_not_deterministic() {
        // Two draws collide with probability 1e-9 per attempt; three
        // attempts push a false failure below practical concern
        let first = CpfService::generate();
        let differs = (0..3).any(|_| CpfService::generate() != first);
        assert!(differs);
    }

    #[test]
    fn test_display_renders_eleven_digits() {
        let cpf = CpfService::parse("529.982.247-25").expect("known valid CPF");
        assert_eq!(cpf.to_string(), "52998224725");
    }
}
