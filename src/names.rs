//! Traditional names for lunar months and days.

/// Chinese numerals, `1..=9` are 一 to 九; index 0 holds 十 for day names.
const NUMERALS: [&str; 10] = ["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Returns the month name including 月, with 閏 for leap months.
///
/// Month 1 is 正月, 11 and 12 are 冬月 and 臘月. Returns `None` outside `1..=12`.
///
/// ```
/// use lunar_date::names;
///
/// assert_eq!(names::month(1, false).as_deref(), Some("正月"));
/// assert_eq!(names::month(2, true).as_deref(), Some("閏二月"));
/// assert_eq!(names::month(12, false).as_deref(), Some("臘月"));
/// ```
pub fn month(number: u8, is_leap: bool) -> Option<String> {
    let numeral = match number {
        1 => "正",
        2..=9 => NUMERALS[usize::from(number)],
        10 => "十",
        11 => "冬",
        12 => "臘",
        _ => return None,
    };
    let prefix = if is_leap { "閏" } else { "" };
    Some(format!("{prefix}{numeral}月"))
}

/// Returns the day name: 初一 to 初十, 十一 to 十九, 二十, 廿一 to 廿九, 三十.
///
/// Returns `None` outside `1..=30`.
///
/// ```
/// use lunar_date::names;
///
/// assert_eq!(names::day(13).as_deref(), Some("十三"));
/// assert_eq!(names::day(25).as_deref(), Some("廿五"));
/// ```
pub fn day(number: u8) -> Option<String> {
    let tens = match number {
        1..=10 => "初",
        11..=19 => "十",
        20 => "二",
        21..=29 => "廿",
        30 => "三",
        _ => return None,
    };
    Some(format!("{tens}{}", NUMERALS[usize::from(number % 10)]))
}
