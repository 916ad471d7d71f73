//! Decoding of one lunar month table entry.
//!
//! An entry has eight comma-separated fields:
//!
//! | # | Field | Encoding |
//! |---|-------|----------|
//! | 1 | stem + branch | decimal digit (stem `0..=9`) then hex digit (branch `0..=B`) |
//! | 2 | leap flag | `1` is a leap month, anything else is not |
//! | 3 | lunar month | hex digit `1..=C` |
//! | 4 | start offset | decimal, lunar day of solar day 1 |
//! | 5 | month length | `0` is 29 days, anything else 30 |
//! | 6 | next month length | `0` is 29 days, anything else 30 |
//! | 7 | first term day | decimal day of month, `0` for none |
//! | 8 | second term day | decimal day of month, `0` for none |

use crate::consts::{
    ENTRY_FIELD_SEPARATOR, LONG_LUNAR_MONTH, LUNAR_MONTHS, MAX_MONTH, SHORT_LUNAR_MONTH,
};
use crate::cycle::{Branch, SolarTerm, Stem};
use crate::table::TableError;

const FIELD_COUNT: usize = 8;
const DECIMAL: u32 = 10;
const HEX: u32 = 16;
const LEAP_FLAG: &str = "1";
const SHORT_MONTH_FLAG: &str = "0";
const NO_TERM: u8 = 0;
const MAX_START_OFFSET: u8 = 30;
const MAX_TERM_DAY: u8 = 31;

/// A solar-term boundary day within one solar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermBoundary {
    /// Solar day of month (1..=31)
    pub day: u8,
    /// The term starting on that day
    pub term: SolarTerm,
}

/// Decoded lunar month data for one solar `(year, month)`.
///
/// Everything describes the lunar month in effect on solar day 1. For
/// January and February the stem and branch are still the previous solar
/// year's; the year label changes at 立春.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LunarMonthRecord {
    pub stem: Stem,
    pub branch: Branch,
    pub is_leap_month: bool,
    /// Lunar month number (1..=12)
    pub lunar_month: u8,
    /// Lunar day of month on solar day 1 (1..=30)
    pub start_offset: u8,
    /// Days in this lunar month (29 or 30)
    pub month_length: u8,
    /// Days in the lunar month after it (29 or 30)
    pub next_month_length: u8,
    pub first_term: Option<TermBoundary>,
    pub second_term: Option<TermBoundary>,
}

impl LunarMonthRecord {
    /// Decodes the raw `entry` stored for solar `year` and `month`.
    ///
    /// # Errors
    /// Returns `TableError::Malformed` naming the offending field.
    pub fn decode(year: u16, month: u8, entry: &str) -> Result<Self, TableError> {
        let malformed = |reason: String| TableError::Malformed {
            year,
            month,
            reason,
        };

        let (first_name, second_name) = SolarTerm::of_month(month)
            .ok_or_else(|| malformed(format!("solar month must be 1-{MAX_MONTH}")))?;

        let fields: Vec<&str> = entry.split(ENTRY_FIELD_SEPARATOR).map(str::trim).collect();
        let [cycle, leap, lunar_month, start, length, next_length, term1, term2] = fields[..]
        else {
            return Err(malformed(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        };

        let (stem_digit, branch_digit) = cycle
            .char_indices()
            .nth(1)
            .map_or((cycle, ""), |(split, _)| cycle.split_at(split));
        let stem = single_digit(stem_digit, DECIMAL)
            .and_then(Stem::new)
            .ok_or_else(|| malformed(format!("invalid stem digit in {cycle:?}")))?;
        let branch = single_digit(branch_digit, HEX)
            .and_then(Branch::new)
            .ok_or_else(|| malformed(format!("invalid branch digit in {cycle:?}")))?;

        let lunar_month = single_digit(lunar_month, HEX)
            .filter(|m| (1..=LUNAR_MONTHS).contains(m))
            .ok_or_else(|| malformed(format!("invalid lunar month {lunar_month:?}")))?;

        let month_length = lunar_month_length(length);
        let start_offset = decimal(start)
            .filter(|s| (1..=MAX_START_OFFSET).contains(s))
            .ok_or_else(|| malformed(format!("invalid start offset {start:?}")))?;
        if start_offset > month_length {
            return Err(malformed(format!(
                "start offset {start_offset} past the end of a {month_length} day month"
            )));
        }

        let first_term = decode_term(term1, first_name)
            .ok_or_else(|| malformed(format!("invalid first term day {term1:?}")))?;
        let second_term = decode_term(term2, second_name)
            .ok_or_else(|| malformed(format!("invalid second term day {term2:?}")))?;
        if let (Some(a), Some(b)) = (first_term, second_term) {
            if a.day >= b.day {
                return Err(malformed(format!(
                    "term days out of order: {} then {}",
                    a.day, b.day
                )));
            }
        }

        Ok(Self {
            stem,
            branch,
            is_leap_month: leap == LEAP_FLAG,
            lunar_month,
            start_offset,
            month_length,
            next_month_length: lunar_month_length(next_length),
            first_term,
            second_term,
        })
    }

    /// Returns the solar term starting on solar `day`, if any.
    pub fn term_on(&self, day: u8) -> Option<SolarTerm> {
        [self.first_term, self.second_term]
            .into_iter()
            .flatten()
            .find(|boundary| boundary.day == day)
            .map(|boundary| boundary.term)
    }
}

fn lunar_month_length(flag: &str) -> u8 {
    if flag == SHORT_MONTH_FLAG {
        SHORT_LUNAR_MONTH
    } else {
        LONG_LUNAR_MONTH
    }
}

/// Exactly one digit in `radix`, no sign or padding.
fn single_digit(field: &str, radix: u32) -> Option<u8> {
    let mut chars = field.chars();
    let digit = chars.next()?.to_digit(radix)?;
    if chars.next().is_some() {
        return None;
    }
    u8::try_from(digit).ok()
}

/// Unsigned decimal made of ASCII digits only.
fn decimal(field: &str) -> Option<u8> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// `None` for an unreadable field, `Some(None)` for the no-term sentinel.
fn decode_term(field: &str, term: SolarTerm) -> Option<Option<TermBoundary>> {
    let day = decimal(field).filter(|d| *d <= MAX_TERM_DAY)?;
    if day == NO_TERM {
        return Some(None);
    }
    Some(Some(TermBoundary { day, term }))
}
