//! Table-driven conversion of solar (proleptic Gregorian) dates to the
//! traditional East-Asian lunisolar calendar.
//!
//! A [`Resolver`] decodes the lunar month table entry for a solar month and
//! works out the stem-branch year, lunar month (with leap flag), lunar day
//! and, on boundary days, the solar term. Solar years 1901 through 2100 are
//! supported.
//!
//! ```
//! use lunar_date::Resolver;
//!
//! let resolver = Resolver::bundled().unwrap();
//! let date = resolver.resolve(2021, 7, 22).unwrap();
//!
//! assert_eq!(date.stem_name(), "辛");
//! assert_eq!(date.branch_name(), "丑");
//! assert!(!date.is_leap_month());
//! assert_eq!((date.month(), date.day()), (6, 13));
//! assert_eq!(date.solar_term_name(), Some("大暑"));
//! assert_eq!(date.to_string(), "辛丑年六月十三 大暑");
//! ```

mod consts;
mod cycle;
pub mod names;
mod prelude;
mod record;
mod resolver;
mod table;
mod types;

pub use consts::*;
pub use cycle::{Branch, SolarTerm, Stem, UnknownName};
pub use record::{LunarMonthRecord, TermBoundary};
pub use resolver::Resolver;
pub use table::{MonthTable, TableError, TextTable, bundled};
pub use types::{Day, Month, Year};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use types::days_in_month;

/// Julian day number of 1970-01-01
const UNIX_EPOCH_JDN: i64 = 2_440_588;
/// Julian day number of `MIN_YEAR`-01-01
const FIRST_SUPPORTED_JDN: i64 = 2_415_386;
/// Julian day number of `MAX_YEAR`-12-31
const LAST_SUPPORTED_JDN: i64 = 2_488_434;
const SECONDS_PER_DAY: i64 = 86_400;

/// A validated solar calendar date within the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct SolarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Year {} is outside the supported range {}-{}", "_0", MIN_YEAR, MAX_YEAR)]
    OutOfRange(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Invalid lunar month: {} (must be 1-{})", "_0", LUNAR_MONTHS)]
    InvalidLunarMonth(u8),
    #[display(fmt = "Invalid lunar day: {} (must be 1-{})", "_0", LONG_LUNAR_MONTH)]
    InvalidLunarDay(u8),
    #[display(fmt = "Timestamp {_0} is outside the supported range {}-{}", MIN_YEAR, MAX_YEAR)]
    TimestampOutOfRange(i64),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

/// Error type for lunar date resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LunarError {
    /// The solar date was rejected.
    #[error(transparent)]
    Date(#[from] DateError),

    /// The lunar month table could not serve the date.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl LunarError {
    /// Returns `true` if the solar year is outside `MIN_YEAR..=MAX_YEAR`.
    pub const fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::Date(DateError::OutOfRange(_) | DateError::TimestampOutOfRange(_))
        )
    }
}

impl SolarDate {
    /// Creates a date, validating year range, month and day in that order
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange`, `DateError::InvalidMonth` or `DateError::InvalidDay`.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        Ok(Self {
            year:  Year::new(year)?,
            month: Month::new(month)?,
            day:   Day::new(day, year, month)?,
        })
    }

    /// Creates a date from a Minguo (Republic of China) era date.
    ///
    /// `roc_year` is the proleptic era year: 1 is 1912, 0 is 1911.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` unless the solar year is supported.
    pub fn from_minguo(roc_year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        let solar = roc_year.saturating_add(MINGUO_YEAR_OFFSET);
        let year = u16::try_from(solar).map_err(|_| DateError::OutOfRange(solar))?;
        Self::new(year, month, day)
    }

    /// Creates the civil date of a Unix timestamp, normalized to UTC+8.
    ///
    /// # Errors
    /// Returns `DateError::TimestampOutOfRange` when the date falls outside
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn from_unix_timestamp(secs: i64) -> Result<Self, DateError> {
        let out_of_range = DateError::TimestampOutOfRange(secs);
        let local = secs
            .checked_add(CIVIL_UTC_OFFSET_SECS)
            .ok_or_else(|| out_of_range.clone())?;
        let jdn = local.div_euclid(SECONDS_PER_DAY) + UNIX_EPOCH_JDN;
        if !(FIRST_SUPPORTED_JDN..=LAST_SUPPORTED_JDN).contains(&jdn) {
            return Err(out_of_range);
        }
        let (year, month, day) = civil_from_jdn(jdn);
        let year = u16::try_from(year).map_err(|_| out_of_range.clone())?;
        let month = u8::try_from(month).map_err(|_| out_of_range.clone())?;
        let day = u8::try_from(day).map_err(|_| out_of_range)?;
        Self::new(year, month, day)
    }

    /// Returns the year component
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day component
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns `(year, month, day)`
    pub const fn to_ymd(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }

    /// Returns the next day, or `None` after `MAX_YEAR`-12-31.
    pub fn succ(&self) -> Option<Self> {
        let (year, month, day) = self.to_ymd();
        let (year, month, day) = if day < days_in_month(year, month) {
            (year, month, day + 1)
        } else if month < DECEMBER {
            (year, month + 1, MIN_DAY)
        } else {
            (year.checked_add(1)?, JANUARY, MIN_DAY)
        };
        Self::new(year, month, day).ok()
    }

    /// Helper to parse u16 with better error messages
    fn parse_u16(s: &str) -> Result<u16, DateError> {
        s.parse::<u16>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    /// Helper to parse u8 with better error messages
    fn parse_u8(s: &str) -> Result<u8, DateError> {
        s.parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }
}

/// Converts a Julian day number to a Gregorian `(year, month, day)`.
fn civil_from_jdn(jdn: i64) -> (i64, i64, i64) {
    let f = jdn + 1401 + (((4 * jdn + 274_277) / 146_097) * 3) / 4 - 38;
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
    (year, month, day)
}

impl FromStr for SolarDate {
    type Err = DateError;

    /// Parses an ISO 8601 calendar date, `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts[..] else {
            return Err(DateError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {} {DATE_SEPARATOR} separators",
                parts.len() - 1
            )));
        };

        // Parse components - InvalidFormat if not numeric
        let year = Self::parse_u16(year)?;
        let month = Self::parse_u8(month)?;
        let day = Self::parse_u8(day)?;

        Self::new(year, month, day)
    }
}

impl TryFrom<(u16, u8, u8)> for SolarDate {
    type Error = DateError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl Serialize for SolarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SolarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A solar date expressed in the lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawResolvedLunarDate")]
pub struct ResolvedLunarDate {
    stem:          Stem,
    branch:        Branch,
    is_leap_month: bool,
    month:         u8,
    day:           u8,
    solar_term:    Option<SolarTerm>,
}

impl ResolvedLunarDate {
    /// Heavenly stem of the stem-branch year
    pub const fn stem(&self) -> Stem {
        self.stem
    }

    /// Earthly branch of the stem-branch year
    pub const fn branch(&self) -> Branch {
        self.branch
    }

    pub const fn stem_name(&self) -> &'static str {
        self.stem.name()
    }

    pub const fn branch_name(&self) -> &'static str {
        self.branch.name()
    }

    /// Returns `true` for an intercalary (閏) month
    pub const fn is_leap_month(&self) -> bool {
        self.is_leap_month
    }

    /// Lunar month number (1..=12); a leap month shares the number of the month before it
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Lunar day of month (1..=30)
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// The solar term starting on this day, if it is a boundary day
    pub const fn solar_term(&self) -> Option<SolarTerm> {
        self.solar_term
    }

    pub fn solar_term_name(&self) -> Option<&'static str> {
        self.solar_term.map(SolarTerm::name)
    }
}

/// Unchecked serde shape of `ResolvedLunarDate`
#[derive(Deserialize)]
struct RawResolvedLunarDate {
    stem:          Stem,
    branch:        Branch,
    is_leap_month: bool,
    month:         u8,
    day:           u8,
    solar_term:    Option<SolarTerm>,
}

impl TryFrom<RawResolvedLunarDate> for ResolvedLunarDate {
    type Error = DateError;

    fn try_from(raw: RawResolvedLunarDate) -> Result<Self, Self::Error> {
        if !(1..=LUNAR_MONTHS).contains(&raw.month) {
            return Err(DateError::InvalidLunarMonth(raw.month));
        }
        if !(1..=LONG_LUNAR_MONTH).contains(&raw.day) {
            return Err(DateError::InvalidLunarDay(raw.day));
        }
        Ok(Self {
            stem:          raw.stem,
            branch:        raw.branch,
            is_leap_month: raw.is_leap_month,
            month:         raw.month,
            day:           raw.day,
            solar_term:    raw.solar_term,
        })
    }
}

impl fmt::Display for ResolvedLunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = names::month(self.month, self.is_leap_month).ok_or(fmt::Error)?;
        let day = names::day(self.day).ok_or(fmt::Error)?;
        write!(f, "{}{}年{month}{day}", self.stem, self.branch)?;
        if let Some(term) = self.solar_term {
            write!(f, " {term}")?;
        }
        Ok(())
    }
}

/// Resolves a solar date against the bundled table.
///
/// # Errors
/// Returns `LunarError` when the year is outside `MIN_YEAR..=MAX_YEAR`, the
/// month or day is invalid, or the bundled table is unusable.
pub fn resolve(year: u16, month: u8, day: u8) -> Result<ResolvedLunarDate, LunarError> {
    Resolver::bundled()?.resolve(year, month, day)
}
