/// First solar year covered by the lunar month table (inclusive)
pub const MIN_YEAR: u16 = 1901;

/// Last solar year covered by the lunar month table (inclusive)
pub const MAX_YEAR: u16 = 2100;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Length of a short (小) lunar month
pub const SHORT_LUNAR_MONTH: u8 = 29;
/// Length of a long (大) lunar month
pub const LONG_LUNAR_MONTH: u8 = 30;

/// Number of lunar months in a common lunar year
pub const LUNAR_MONTHS: u8 = 12;

/// The ten heavenly stems (天干), indexed 0..=9
pub const STEM_NAMES: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

/// The twelve earthly branches (地支), indexed 0..=11
pub const BRANCH_NAMES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

/// The 24 solar terms (節氣) in solar calendar order, two per solar month
/// starting with January's 小寒
pub const SOLAR_TERM_NAMES: [&str; 24] = [
    "小寒", "大寒", "立春", "雨水", "驚蟄", "春分", // January - March
    "清明", "穀雨", "立夏", "小滿", "芒種", "夏至", // April - June
    "小暑", "大暑", "立秋", "處暑", "白露", "秋分", // July - September
    "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", // October - December
];

/// Fixed civil offset (UTC+8) that instants are normalized to before a
/// calendar date is taken from them
pub const CIVIL_UTC_OFFSET_SECS: i64 = 8 * 3600;

/// Minguo (Republic of China) era year 1 is solar year 1912
pub const MINGUO_YEAR_OFFSET: i32 = 1911;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';

/// Field separator inside one encoded lunar month entry
pub const ENTRY_FIELD_SEPARATOR: char = ',';

/// Prefix of a year key in the lunar month table, as in `y1901`
pub const YEAR_KEY_PREFIX: char = 'y';
