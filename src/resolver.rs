//! Resolution of solar dates against a lunar month table.

use crate::consts::{DECEMBER, FEBRUARY, JANUARY, LUNAR_MONTHS};
use crate::record::LunarMonthRecord;
use crate::table::{self, MonthTable, TableError, TextTable};
use crate::types::days_in_month;
use crate::{LunarError, ResolvedLunarDate, SolarDate};

/// Converts solar dates using the entries of a [`MonthTable`].
///
/// The resolver holds no state besides the table, so it can be shared freely
/// between threads whenever the table can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver<T> {
    table: T,
}

impl Resolver<&'static TextTable> {
    /// Creates a resolver over the bundled 1901..=2100 table.
    ///
    /// # Errors
    /// Returns the `TableError` raised while parsing the embedded table text.
    pub fn bundled() -> Result<Self, TableError> {
        table::bundled().map(Self::new)
    }
}

impl<T: MonthTable> Resolver<T> {
    pub const fn new(table: T) -> Self {
        Self { table }
    }

    pub const fn table(&self) -> &T {
        &self.table
    }

    /// Decodes the table entry for solar `year` and `month`.
    ///
    /// # Errors
    /// Returns `TableError` if the entry is missing or malformed.
    pub fn record(&self, year: u16, month: u8) -> Result<LunarMonthRecord, TableError> {
        let entry = self.table.lookup(year, month)?;
        let record = LunarMonthRecord::decode(year, month, entry)?;
        tracing::trace!(year, month, entry, "decoded lunar month record");
        Ok(record)
    }

    /// Resolves the solar date `year-month-day`.
    ///
    /// # Errors
    /// Returns `LunarError::Date` if the year is outside `MIN_YEAR..=MAX_YEAR`
    /// or the month or day is invalid, and `LunarError::Table` if the table
    /// cannot serve the date.
    pub fn resolve(&self, year: u16, month: u8, day: u8) -> Result<ResolvedLunarDate, LunarError> {
        self.resolve_date(SolarDate::new(year, month, day)?)
    }

    /// Resolves an already validated solar date.
    ///
    /// # Errors
    /// Returns `LunarError::Table` if the table cannot serve the date.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve_date(&self, date: SolarDate) -> Result<ResolvedLunarDate, LunarError> {
        let (year, month, day) = date.to_ymd();
        let record = self.record(year, month)?;

        // The stem-branch year turns over at 立春, February's first term
        let (mut stem, mut branch) = (record.stem, record.branch);
        if month == FEBRUARY && record.first_term.is_some_and(|t| day >= t.day) {
            stem = stem.succ();
            branch = branch.succ();
        }

        let mut lunar_month = record.lunar_month;
        let mut is_leap_month = record.is_leap_month;
        let mut lunar_day = record.start_offset + (day - 1);

        if lunar_day > record.month_length {
            let (next_year, next_month) = following_solar_month(year, month);
            tracing::debug!(next_year, next_month, "lunar month ends within solar month");
            let next = self.record(next_year, next_month)?;
            let overflow = lunar_day - record.month_length;

            // Labels follow leap-month succession, not bare month + 1 or + 2
            let (label, leap) = if overflow > record.next_month_length {
                tracing::debug!(year, month, "three lunar months start in one solar month");
                lunar_day = overflow - record.next_month_length;
                (next.lunar_month, next.is_leap_month)
            } else {
                lunar_day = overflow;
                let days_left = days_in_month(year, month) - day;
                if lunar_day + days_left < record.next_month_length {
                    (next.lunar_month, next.is_leap_month)
                } else {
                    month_between(&record, &next)
                }
            };
            lunar_month = label;
            is_leap_month = leap;
        }

        let resolved = ResolvedLunarDate {
            stem,
            branch,
            is_leap_month,
            month: lunar_month,
            day: lunar_day,
            solar_term: record.term_on(day),
        };
        tracing::trace!(%resolved, "resolved");
        Ok(resolved)
    }
}

const fn following_solar_month(year: u16, month: u8) -> (u16, u8) {
    if month >= DECEMBER {
        (year + 1, JANUARY)
    } else {
        (year, month + 1)
    }
}

const fn following_lunar_month(month: u8) -> u8 {
    if month >= LUNAR_MONTHS { 1 } else { month + 1 }
}

const fn preceding_lunar_month(month: u8) -> u8 {
    if month <= 1 { LUNAR_MONTHS } else { month - 1 }
}

/// Label of the lunar month between `current` and `next`, when one lunar
/// month begins and ends strictly inside the solar month of `current`.
///
/// A leap month follows the common month of its number, so a leap `next`
/// means the month between is common with the same number. After a common
/// `k`, a `next` of common `k + 1` leaves room only for leap `k`.
const fn month_between(current: &LunarMonthRecord, next: &LunarMonthRecord) -> (u8, bool) {
    if next.is_leap_month {
        (next.lunar_month, false)
    } else if !current.is_leap_month
        && next.lunar_month == following_lunar_month(current.lunar_month)
    {
        (current.lunar_month, true)
    } else {
        (preceding_lunar_month(next.lunar_month), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateError;

    const ROW_1902: &str = "y1902 71,0,B,22,1,0,6,21 71,0,C,23,0,1,5,19 82,0,1,22,1,0,6,21 \
                            82,0,2,23,0,1,6,21 82,0,3,24,1,0,6,22 82,0,4,25,0,0,7,22 \
                            82,0,5,26,0,1,8,24 82,0,6,28,1,0,8,24 82,0,7,29,0,1,8,24 \
                            82,0,8,30,1,0,9,24 82,0,A,2,1,1,8,23 82,0,B,2,1,1,8,23";

    const ROW_2021: &str = "y2021 60,0,B,18,0,1,5,20 60,0,C,20,1,0,3,18 71,0,1,18,0,1,5,20 \
                            71,0,2,20,1,1,4,20 71,0,3,20,1,0,5,21 71,0,4,21,0,1,5,21 \
                            71,0,5,22,1,0,7,22 71,0,6,23,0,1,7,23 71,0,7,25,1,0,7,23 \
                            71,0,8,25,0,1,8,23 71,0,9,27,1,0,7,22 71,0,A,27,0,1,7,21";

    fn synthetic() -> Resolver<TextTable> {
        let table = format!("{ROW_1902}\n{ROW_2021}").parse().unwrap();
        Resolver::new(table)
    }

    /// `(stem, branch, leap, month, day, term)` for compact assertions
    fn summary(date: &ResolvedLunarDate) -> (&'static str, &'static str, bool, u8, u8, Option<&'static str>) {
        (
            date.stem_name(),
            date.branch_name(),
            date.is_leap_month(),
            date.month(),
            date.day(),
            date.solar_term_name(),
        )
    }

    #[test]
    fn test_resolve_within_record_month() {
        let resolver = synthetic();
        let date = resolver.resolve(2021, 7, 9).unwrap();
        assert_eq!(summary(&date), ("辛", "丑", false, 5, 30, None));
        let date = resolver.resolve(2021, 7, 7).unwrap();
        assert_eq!(summary(&date), ("辛", "丑", false, 5, 28, Some("小暑")));
    }

    #[test]
    fn test_resolve_following_month() {
        let resolver = synthetic();
        let date = resolver.resolve(2021, 7, 10).unwrap();
        assert_eq!(summary(&date), ("辛", "丑", false, 6, 1, None));
        let date = resolver.resolve(2021, 7, 22).unwrap();
        assert_eq!(summary(&date), ("辛", "丑", false, 6, 13, Some("大暑")));
    }

    #[test]
    fn test_year_turns_over_at_start_of_spring() {
        let resolver = synthetic();
        let date = resolver.resolve(2021, 2, 2).unwrap();
        assert_eq!(summary(&date), ("庚", "子", false, 12, 21, None));
        let date = resolver.resolve(2021, 2, 3).unwrap();
        assert_eq!(summary(&date), ("辛", "丑", false, 12, 22, Some("立春")));
        let date = resolver.resolve(2021, 2, 28).unwrap();
        assert_eq!((date.stem_name(), date.branch_name()), ("辛", "丑"));
        // January keeps the previous year's label
        let date = resolver.resolve(2021, 1, 31).unwrap();
        assert_eq!((date.stem_name(), date.branch_name()), ("庚", "子"));
    }

    #[test]
    fn test_year_holds_without_start_of_spring_entry() {
        let text = ROW_2021.replace("60,0,C,20,1,0,3,18", "60,0,C,20,1,0,0,18");
        let resolver = Resolver::new(text.parse::<TextTable>().unwrap());
        let cases = [(1, None), (3, None), (18, Some("雨水")), (28, None)];
        for (day, term) in cases {
            let date = resolver.resolve(2021, 2, day).unwrap();
            assert_eq!(
                (date.stem_name(), date.branch_name(), date.solar_term_name()),
                ("庚", "子", term),
                "2021-02-{day:02}"
            );
        }
        // March carries the new year label from the table
        let date = resolver.resolve(2021, 3, 1).unwrap();
        assert_eq!((date.stem_name(), date.branch_name()), ("辛", "丑"));
    }

    #[test]
    fn test_three_lunar_months_in_one_solar_month() {
        let resolver = synthetic();
        let cases = [
            (1, 8, 30),
            (2, 9, 1),
            (30, 9, 29),
            (31, 10, 1),
        ];
        for (day, month, lunar_day) in cases {
            let date = resolver.resolve(1902, 10, day).unwrap();
            assert_eq!(
                (date.stem_name(), date.branch_name(), date.month(), date.day()),
                ("壬", "寅", month, lunar_day),
                "1902-10-{day}"
            );
            assert!(!date.is_leap_month());
        }
    }

    #[test]
    fn test_missing_lookahead_row() {
        let resolver = synthetic();
        // December 2021 starts on lunar 10/27 of a 29 day month
        let date = resolver.resolve(2021, 12, 3).unwrap();
        assert_eq!((date.month(), date.day()), (10, 29));
        let err = resolver.resolve(2021, 12, 4).unwrap_err();
        assert_eq!(err, LunarError::Table(TableError::MissingYear(2022)));
    }

    #[test]
    fn test_missing_row_and_invalid_input() {
        let resolver = synthetic();
        let err = resolver.resolve(1950, 1, 1).unwrap_err();
        assert_eq!(err, LunarError::Table(TableError::MissingYear(1950)));

        let err = resolver.resolve(1900, 1, 1).unwrap_err();
        assert!(err.is_out_of_range());
        let err = resolver.resolve(2021, 13, 1).unwrap_err();
        assert_eq!(err, LunarError::Date(DateError::InvalidMonth(13)));
        let err = resolver.resolve(2021, 2, 29).unwrap_err();
        assert!(matches!(err, LunarError::Date(DateError::InvalidDay { .. })));
    }

    #[test]
    fn test_malformed_entry_is_reported() {
        let text = ROW_2021.replace("71,0,5,22,1,0,7,22", "71,0,5,22,1,0,7");
        let resolver = Resolver::new(text.parse::<TextTable>().unwrap());
        let err = resolver.resolve(2021, 7, 1).unwrap_err();
        assert!(matches!(
            err,
            LunarError::Table(TableError::Malformed { year: 2021, month: 7, .. })
        ));
        assert!(resolver.resolve(2021, 6, 1).is_ok());
    }

    #[test]
    fn test_leap_months() {
        let resolver = Resolver::bundled().unwrap();
        let cases = [
            ((2023, 3, 21), (false, 2, 30)),
            ((2023, 3, 22), (true, 2, 1)),
            ((2023, 4, 19), (true, 2, 29)),
            ((2023, 4, 20), (false, 3, 1)),
            ((2020, 5, 22), (false, 4, 30)),
            ((2020, 5, 23), (true, 4, 1)),
            ((2020, 6, 21), (false, 5, 1)),
            ((2033, 12, 21), (false, 11, 30)),
            ((2033, 12, 22), (true, 11, 1)),
            ((2034, 1, 20), (false, 12, 1)),
        ];
        for ((year, month, day), expected) in cases {
            let date = resolver.resolve(year, month, day).unwrap();
            assert_eq!(
                (date.is_leap_month(), date.month(), date.day()),
                expected,
                "{year}-{month:02}-{day:02}"
            );
        }
    }

    #[test]
    fn test_edges_of_supported_range() {
        let resolver = Resolver::bundled().unwrap();
        let date = resolver.resolve(1901, 1, 1).unwrap();
        assert_eq!(summary(&date), ("庚", "子", false, 11, 11, None));
        let date = resolver.resolve(2100, 11, 30).unwrap();
        assert_eq!((date.month(), date.day()), (10, 29));
        let date = resolver.resolve(2100, 12, 1).unwrap();
        assert_eq!((date.month(), date.day()), (11, 1));
        let date = resolver.resolve(2100, 12, 31).unwrap();
        assert_eq!((date.month(), date.day()), (12, 1));
        assert!(resolver.resolve(2101, 1, 1).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_resolve_date_matches_resolve() {
        let resolver = Resolver::bundled().unwrap();
        let date: SolarDate = "2000-01-01".parse().unwrap();
        let resolved = resolver.resolve_date(date).unwrap();
        assert_eq!(resolved, resolver.resolve(2000, 1, 1).unwrap());
        assert_eq!(summary(&resolved), ("己", "卯", false, 11, 25, None));
    }

    #[test]
    fn test_lunar_month_wrapping() {
        assert_eq!(following_lunar_month(12), 1);
        assert_eq!(following_lunar_month(5), 6);
        assert_eq!(preceding_lunar_month(1), 12);
        assert_eq!(preceding_lunar_month(6), 5);
        assert_eq!(following_solar_month(2100, 12), (2101, 1));
        assert_eq!(following_solar_month(2021, 7), (2021, 8));
    }

    #[test]
    fn test_month_between() {
        let record = |entry: &str| LunarMonthRecord::decode(2000, 1, entry).unwrap();
        let common = |month: u8| record(&format!("60,0,{month:X},1,1,1,6,21"));
        let leap = |month: u8| record(&format!("60,1,{month:X},1,1,1,6,21"));

        assert_eq!(month_between(&common(8), &common(10)), (9, false));
        assert_eq!(month_between(&common(4), &common(5)), (4, true));
        assert_eq!(month_between(&common(3), &leap(4)), (4, false));
        assert_eq!(month_between(&leap(2), &common(4)), (3, false));
        assert_eq!(month_between(&common(11), &common(1)), (12, false));
        assert_eq!(month_between(&common(12), &common(1)), (12, true));
    }

    #[test]
    fn test_resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver<TextTable>>();
        assert_send_sync::<Resolver<&'static TextTable>>();

        let resolver = Resolver::bundled().unwrap();
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=12)
                .map(|month| scope.spawn(move || resolver.resolve(2021, month, 15)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (index, result) in results.into_iter().enumerate() {
            assert!(result.is_ok(), "month {}", index + 1);
        }
    }
}
