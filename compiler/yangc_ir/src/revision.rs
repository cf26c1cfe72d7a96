//! Revision dates (`YYYY-MM-DD`).

use std::fmt;
use std::str::FromStr;

/// A module revision date.
///
/// Ordering is chronological, so the latest revision of a set of
/// candidates is simply the maximum.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Revision {
    year: u16,
    month: u8,
    day: u8,
}

/// Error when a revision string is not a valid `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionError {
    /// Zero-based byte offset of the offending character.
    pub offset: usize,
    pub message: &'static str,
}

impl fmt::Display for RevisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid revision at offset {}: {}", self.offset + 1, self.message)
    }
}

impl std::error::Error for RevisionError {}

/// Proleptic Gregorian calendar.
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl Revision {
    /// Create a revision of an existing calendar date.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, RevisionError> {
        if !(1..=12).contains(&month) {
            return Err(RevisionError {
                offset: 5,
                message: "month out of range",
            });
        }
        if !(1..=days_in_month(year, month)).contains(&day) {
            return Err(RevisionError {
                offset: 8,
                message: "day out of range",
            });
        }
        Ok(Revision { year, month, day })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }
}

fn digits(s: &[u8], start: usize, len: usize) -> Result<u32, RevisionError> {
    let mut value = 0u32;
    for (i, b) in s[start..start + len].iter().enumerate() {
        if !b.is_ascii_digit() {
            return Err(RevisionError {
                offset: start + i,
                message: "expected digit",
            });
        }
        value = value * 10 + u32::from(b - b'0');
    }
    Ok(value)
}

impl FromStr for Revision {
    type Err = RevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 {
            return Err(RevisionError {
                offset: bytes.len().min(10),
                message: "expected YYYY-MM-DD",
            });
        }
        for dash in [4, 7] {
            if bytes[dash] != b'-' {
                return Err(RevisionError {
                    offset: dash,
                    message: "expected '-'",
                });
            }
        }
        let year = digits(bytes, 0, 4)?;
        let month = digits(bytes, 5, 2)?;
        let day = digits(bytes, 8, 2)?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "values are bounded by their digit counts"
        )]
        Revision::new(year as u16, month as u8, day as u8)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Revision({self})")
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
