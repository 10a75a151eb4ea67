use chrono::{Local, Month, NaiveDate};
use derive_more::Display;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

const DAYS_PER_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// Sakamoto's month offsets
const DOW_MONTH_OFFSET: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month));
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_PER_MONTH[(month as usize).saturating_sub(1) % 12]
    }
}

/// Day of week from 0 (Sunday) to 6 (Saturday) in the proleptic Gregorian
/// calendar.
pub fn day_of_week(year: i32, month: u32, day: u32) -> u32 {
    debug_assert!((1..=12).contains(&month));
    let y = if month < 3 { year as i64 - 1 } else { year as i64 };
    let m = (month as usize).saturating_sub(1) % 12;

    (y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
        + DOW_MONTH_OFFSET[m]
        + day as i64)
        .rem_euclid(7) as u32
}

pub fn is_valid_date(year: i32, month: i32, day: i32) -> bool {
    if !(1..=12).contains(&month) || day < 1 {
        return false;
    }

    if day as u32 > last_day_of_month(year, month as u32) {
        return false;
    }

    NaiveDate::from_ymd_opt(year, month as u32, day as u32).is_some()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_same_day(year: i32, month: u32, day: u32, other: &NaiveDate) -> bool {
    use chrono::Datelike;
    other.year() == year && other.month() == month && other.day() == day
}

pub fn is_today(year: i32, month: u32, day: u32) -> bool {
    is_same_day(year, month, day, &today())
}

/// `None` when the year would leave the `i32` range.
pub fn previous_month(year: i32, month: u32) -> Option<(i32, u32)> {
    if month <= 1 {
        year.checked_sub(1).map(|year| (year, 12))
    } else {
        Some((year, month - 1))
    }
}

/// `None` when the year would leave the `i32` range.
pub fn next_month(year: i32, month: u32) -> Option<(i32, u32)> {
    if month >= 12 {
        year.checked_add(1).map(|year| (year, 1))
    } else {
        Some((year, month + 1))
    }
}

/// A displayable (year, month) pair. Only exists for valid dates.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[display(fmt = "{:04}-{:02}", year, month)]
pub struct MonthView {
    year: i32,
    month: u32,
}

impl MonthView {
    pub fn new(year: i32, month: i32) -> Option<Self> {
        if is_valid_date(year, month, 1) {
            Some(MonthView {
                year,
                month: month as u32,
            })
        } else {
            None
        }
    }

    pub fn containing(date: &NaiveDate) -> Self {
        use chrono::Datelike;
        MonthView {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn value(&self) -> Month {
        // `month` is validated on construction
        Month::from_u32(self.month).unwrap_or(Month::January)
    }

    pub fn days(&self) -> u32 {
        last_day_of_month(self.year, self.month)
    }

    pub fn first_day_of_week(&self) -> u32 {
        day_of_week(self.year, self.month, 1)
    }

    pub fn last_day_of_week(&self) -> u32 {
        day_of_week(self.year, self.month, self.days())
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        *self == MonthView::containing(date)
    }

    /// The month before this one, if it is still a representable date.
    pub fn previous(&self) -> Option<Self> {
        let (year, month) = previous_month(self.year, self.month)?;
        MonthView::new(year, month as i32)
    }

    pub fn next(&self) -> Option<Self> {
        let (year, month) = next_month(self.year, self.month)?;
        MonthView::new(year, month as i32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Monday
    }
}

impl WeekStart {
    /// Maps a day of week (0 = Sunday) onto the column scale of this week
    /// start: 0-6 for Sunday, 1-7 for Monday.
    pub fn normalize(&self, dow: u32) -> u32 {
        match self {
            WeekStart::Sunday => dow,
            WeekStart::Monday if dow == 0 => 7,
            WeekStart::Monday => dow,
        }
    }

    pub fn columns(&self) -> [u32; 7] {
        match self {
            WeekStart::Sunday => [0, 1, 2, 3, 4, 5, 6],
            WeekStart::Monday => [1, 2, 3, 4, 5, 6, 7],
        }
    }

    /// Day of week (0 = Sunday) shown in each column, left to right.
    pub fn days_of_week(&self) -> [u32; 7] {
        let mut dows = self.columns();
        for dow in dows.iter_mut() {
            *dow %= 7;
        }
        dows
    }
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "sunday" => Ok(WeekStart::Sunday),
            "1" | "monday" => Ok(WeekStart::Monday),
            other => Err(Error::new(
                ErrorKind::InvalidOption,
                &format!("'{}' is not a week start (use sunday/0 or monday/1)", other),
            )),
        }
    }
}

impl TryFrom<i64> for WeekStart {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WeekStart::Sunday),
            1 => Ok(WeekStart::Monday),
            other => Err(Error::new(
                ErrorKind::InvalidOption,
                &format!("{} is not a week start (use 0 or 1)", other),
            )),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "sunday"),
            WeekStart::Monday => write!(f, "monday"),
        }
    }
}

impl<'de> Deserialize<'de> for WeekStart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Name(String),
        }

        let week_start = match Repr::deserialize(deserializer)? {
            Repr::Number(n) => WeekStart::try_from(n),
            Repr::Name(s) => s.parse(),
        };
        week_start.map_err(serde::de::Error::custom)
    }
}
