use crate::Tag;
use core::fmt;
use core::str::FromStr;

const LETTERS: u32 = 26;
const DIGITS: u32 = 1000;

/// A short fixed-format tag: two uppercase ASCII letters followed by three
/// decimal digits, e.g. `"AB123"`.
///
/// The universe spans `AA000..=ZZ999`: 26² letter pairs × 10³ digit runs =
/// 676,000 distinct values. The value is stored packed as its dense index,
/// so a `Callsign` is a `u32` at rest; ordering and equality follow the
/// lexicographic order of the rendered form.
///
/// # Example
/// ```
/// use callsign::{Callsign, Tag};
///
/// let tag: Callsign = "AB123".parse().unwrap();
/// assert_eq!(tag.to_string(), "AB123");
/// assert_eq!(Callsign::from_index(tag.index()), tag);
/// assert_eq!(Callsign::UNIVERSE, 676_000);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Callsign {
    index: u32,
}

impl Callsign {
    /// Splits the packed index into (first letter, second letter, digits).
    const fn components(&self) -> (u32, u32, u32) {
        let letters = self.index / DIGITS;
        (letters / LETTERS, letters % LETTERS, self.index % DIGITS)
    }
}

impl Tag for Callsign {
    const UNIVERSE: u32 = LETTERS * LETTERS * DIGITS;

    fn from_index(index: u32) -> Self {
        assert!(index < Self::UNIVERSE, "index out of universe: {index}");
        Self { index }
    }

    fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let (first, second, digits) = self.components();
        write!(
            fmt,
            "{}{}{digits:03}",
            (b'A' + first as u8) as char,
            (b'A' + second as u8) as char,
        )
    }
}

impl fmt::Debug for Callsign {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Callsign({self})")
    }
}

/// Errors produced when parsing a [`Callsign`] from its string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParseCallsignError {
    /// The input was not exactly five bytes long.
    InvalidLength {
        /// The actual input length in bytes.
        len: usize,
    },
    /// One of the first two characters was not an uppercase ASCII letter.
    InvalidLetter {
        /// The offending character.
        found: char,
    },
    /// One of the last three characters was not an ASCII digit.
    InvalidDigit {
        /// The offending character.
        found: char,
    },
}

impl fmt::Display for ParseCallsignError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidLength { len } => {
                write!(fmt, "expected 5 characters, got {len}")
            }
            Self::InvalidLetter { found } => {
                write!(fmt, "expected uppercase ASCII letter, got {found:?}")
            }
            Self::InvalidDigit { found } => {
                write!(fmt, "expected ASCII digit, got {found:?}")
            }
        }
    }
}

impl core::error::Error for ParseCallsignError {}

impl FromStr for Callsign {
    type Err = ParseCallsignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 {
            return Err(ParseCallsignError::InvalidLength { len: bytes.len() });
        }

        let mut letters = 0;
        for &b in &bytes[..2] {
            if !b.is_ascii_uppercase() {
                return Err(ParseCallsignError::InvalidLetter { found: b as char });
            }
            letters = letters * LETTERS + u32::from(b - b'A');
        }

        let mut digits = 0;
        for &b in &bytes[2..] {
            if !b.is_ascii_digit() {
                return Err(ParseCallsignError::InvalidDigit { found: b as char });
            }
            digits = digits * 10 + u32::from(b - b'0');
        }

        Ok(Self {
            index: letters * DIGITS + digits,
        })
    }
}
