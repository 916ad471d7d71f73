//! Lunar month table: the raw, per solar month encoded entries the resolver
//! decodes.
//!
//! A table maps a solar `(year, month)` to one entry of eight comma-separated
//! fields. The bundled table covers 1901..=2100 and carries January 2101 so
//! that December 2100 can look one month ahead.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::consts::{MAX_MONTH, YEAR_KEY_PREFIX};

/// Error type for lunar month table lookups and decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The table has no row for this solar year.
    #[error("Lunar month table has no row for year {0}")]
    MissingYear(u16),

    /// The row for this solar year has no entry for the month.
    #[error("Lunar month table has no entry for {year}-{month:02}")]
    MissingEntry { year: u16, month: u8 },

    /// An entry does not follow the encoding.
    #[error("Malformed lunar month entry for {year}-{month:02}: {reason}")]
    Malformed {
        year:   u16,
        month:  u8,
        reason: String,
    },

    /// The table text could not be read.
    #[error("Lunar month table syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

/// Source of encoded lunar month entries.
///
/// Implementations must be read-only once built; the resolver may be shared
/// across threads.
pub trait MonthTable {
    /// Returns the raw entry for solar `year` and `month` (1..=12), or `None`
    /// when the table has no such entry.
    fn entry(&self, year: u16, month: u8) -> Option<&str>;

    /// Returns `true` when the table has a row for `year`.
    fn has_year(&self, year: u16) -> bool {
        self.entry(year, 1).is_some()
    }

    /// Looks up an entry, reporting which part of the key is missing.
    ///
    /// # Errors
    /// Returns `TableError::MissingYear` or `TableError::MissingEntry`.
    fn lookup(&self, year: u16, month: u8) -> Result<&str, TableError> {
        self.entry(year, month).ok_or_else(|| {
            if self.has_year(year) {
                TableError::MissingEntry { year, month }
            } else {
                TableError::MissingYear(year)
            }
        })
    }
}

impl<T: MonthTable + ?Sized> MonthTable for &T {
    fn entry(&self, year: u16, month: u8) -> Option<&str> {
        (**self).entry(year, month)
    }
}

/// A lunar month table read from text.
///
/// One line per solar year: the key `y<year>` followed by twelve
/// whitespace-separated entries, January first. Blank lines and lines
/// starting with `#` are skipped.
///
/// ```
/// use lunar_date::{MonthTable, TextTable};
///
/// let row = "y2021 60,0,B,18,0,1,5,20 60,0,C,20,1,0,3,18 71,0,1,18,0,1,5,20 \
///            71,0,2,20,1,1,4,20 71,0,3,20,1,0,5,21 71,0,4,21,0,1,5,21 \
///            71,0,5,22,1,0,7,22 71,0,6,23,0,1,7,23 71,0,7,25,1,0,7,23 \
///            71,0,8,25,0,1,8,23 71,0,9,27,1,0,7,22 71,0,A,27,0,1,7,21";
/// let table: TextTable = row.parse().unwrap();
/// assert_eq!(table.entry(2021, 7), Some("71,0,5,22,1,0,7,22"));
/// assert_eq!(table.entry(2022, 1), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    rows: BTreeMap<u16, Vec<String>>,
}

impl TextTable {
    /// Returns the range of solar years present, or `None` for an empty table
    pub fn years(&self) -> Option<(u16, u16)> {
        let first = self.rows.keys().next()?;
        let last = self.rows.keys().next_back()?;
        Some((*first, *last))
    }

    /// Number of solar years in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn parse_line(line_no: usize, line: &str) -> Result<(u16, Vec<String>), TableError> {
        let syntax = |reason: String| TableError::Syntax {
            line: line_no,
            reason,
        };
        let mut tokens = line.split_whitespace();
        let key = tokens
            .next()
            .ok_or_else(|| syntax("missing year key".to_owned()))?;
        let year = key
            .strip_prefix(YEAR_KEY_PREFIX)
            .and_then(|digits| digits.parse::<u16>().ok())
            .ok_or_else(|| syntax(format!("invalid year key: {key}")))?;
        let entries: Vec<String> = tokens.map(str::to_owned).collect();
        if entries.len() != usize::from(MAX_MONTH) {
            return Err(syntax(format!(
                "expected {MAX_MONTH} entries for {key}, found {}",
                entries.len()
            )));
        }
        Ok((year, entries))
    }
}

impl FromStr for TextTable {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = BTreeMap::new();
        for (index, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = index + 1;
            let (year, entries) = Self::parse_line(line_no, line)?;
            if rows.insert(year, entries).is_some() {
                return Err(TableError::Syntax {
                    line:   line_no,
                    reason: format!("duplicate row for year {year}"),
                });
            }
        }
        Ok(Self { rows })
    }
}

impl MonthTable for TextTable {
    fn entry(&self, year: u16, month: u8) -> Option<&str> {
        let index = usize::from(month).checked_sub(1)?;
        self.rows
            .get(&year)
            .and_then(|row| row.get(index))
            .map(String::as_str)
    }

    fn has_year(&self, year: u16) -> bool {
        self.rows.contains_key(&year)
    }
}

static BUNDLED_DATA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lunar_months.txt"));

static BUNDLED: LazyLock<Result<TextTable, TableError>> = LazyLock::new(|| {
    let table = BUNDLED_DATA.parse::<TextTable>();
    match &table {
        Ok(t) => tracing::debug!(years = t.len(), "loaded bundled lunar month table"),
        Err(e) => tracing::error!(error = %e, "bundled lunar month table is corrupt"),
    }
    table
});

/// Returns the bundled lunar month table covering 1901..=2100.
///
/// The table text is embedded at compile time and parsed on first use.
///
/// # Errors
/// Returns the `TableError` raised while parsing the embedded text.
pub fn bundled() -> Result<&'static TextTable, TableError> {
    BUNDLED.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: u16, entry: &str) -> String {
        let entries = vec![entry; 12].join(" ");
        format!("y{year} {entries}")
    }

    #[test]
    fn test_parse_and_lookup() {
        let text = format!(
            "# comment\n\n{}\n{}\n",
            row(1950, "60,0,1,1,1,0,5,20"),
            row(1951, "71,0,2,3,0,1,6,21")
        );
        let table: TextTable = text.parse().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.years(), Some((1950, 1951)));
        assert_eq!(table.entry(1950, 1), Some("60,0,1,1,1,0,5,20"));
        assert_eq!(table.entry(1951, 12), Some("71,0,2,3,0,1,6,21"));
        assert_eq!(table.entry(1951, 13), None);
        assert_eq!(table.entry(1951, 0), None);
        assert_eq!(table.entry(1952, 1), None);
    }

    #[test]
    fn test_lookup_errors() {
        let table: TextTable = row(1950, "60,0,1,1,1,0,5,20").parse().unwrap();
        assert_eq!(table.lookup(1949, 3), Err(TableError::MissingYear(1949)));
        assert_eq!(
            table.lookup(1950, 13),
            Err(TableError::MissingEntry {
                year:  1950,
                month: 13,
            })
        );
        assert!(table.lookup(1950, 12).is_ok());
    }

    #[test]
    fn test_reference_impl_forwards() {
        let table: TextTable = row(1950, "60,0,1,1,1,0,5,20").parse().unwrap();
        let by_ref = &table;
        assert_eq!(MonthTable::entry(&by_ref, 1950, 4), Some("60,0,1,1,1,0,5,20"));
    }

    #[test]
    fn test_syntax_errors() {
        let result = "1950 a b c".parse::<TextTable>();
        assert!(matches!(result, Err(TableError::Syntax { line: 1, .. })));

        let result = "\ny1950 60,0,1,1,1,0,5,20".parse::<TextTable>();
        let err = result.unwrap_err();
        assert!(matches!(err, TableError::Syntax { line: 2, .. }));
        assert!(err.to_string().contains("expected 12 entries"));

        let text = format!("{}\n{}", row(1950, "x"), row(1950, "y"));
        let err = text.parse::<TextTable>().unwrap_err();
        assert!(err.to_string().contains("duplicate row for year 1950"));
    }

    #[test]
    fn test_empty_table() {
        let table: TextTable = "# nothing here\n".parse().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.years(), None);
    }

    #[test]
    fn test_bundled_covers_supported_range() {
        let table = bundled().unwrap();
        assert_eq!(table.years(), Some((1901, 2101)));
        for year in 1901..=2100 {
            for month in 1..=12 {
                assert!(table.entry(year, month).is_some(), "missing {year}-{month}");
            }
        }
        assert!(table.entry(2101, 1).is_some());
    }
}
