//! Day-precise dates for the ledger
//!
//! Dates are `YYYY-MM-DD`, not number of seconds. The ledger only ever needs
//! to walk forward one day at a time and to know the weekday of a date,
//! so that is all this module provides.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;
use std::str::FromStr;

use crate::load::{error::Error, parse};

/// A date with day-precision
///
/// Supports years in the range 1000..=9999.
///
/// All methods execute in constant time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: u16,
    month: Month,
    day: u8,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month.number(), self.day)
    }
}

/// Twelve months in the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan = 0,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Month from its calendar number (`1` is `Jan`)
    pub fn from_number(n: u8) -> Option<Self> {
        n.checked_sub(1).and_then(Self::from_u8)
    }

    /// Calendar number of the month (`Jan` is `1`)
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Month directly succeeding the current one with wrapping
    pub fn next(self) -> Self {
        Self::from_u8((self as u8 + 1) % 12).unwrap_or(Month::Jan)
    }

    /// Number of days in this month of the given year
    pub fn count(self, year: u16) -> u8 {
        use Month::*;
        match self {
            Jan | Mar | May | Jul | Aug | Oct | Dec => 31,
            Apr | Jun | Sep | Nov => 30,
            Feb => {
                if is_leap(year) {
                    29
                } else {
                    28
                }
            }
        }
    }
}

/// Weekday with Monday-first week convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum Weekday {
    Mon = 0,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Saturday and Sunday
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Ways in which a date taken from user input can be wrong
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateError {
    /// year is outside of 1000..=9999
    UnsupportedYear(usize),
    /// month outside of 1..=12
    InvalidMonth(usize),
    /// Feb 29 of a non-leap year
    NotBissextile(usize),
    /// Feb 30 or Feb 31 or 31st day of a 30-day month
    MonthTooShort(Month, usize),
    /// day outside of 1..=31
    InvalidDay(usize),
}

impl Date {
    /// Validate year-month-day into date
    pub fn from(year: usize, month: Month, day: usize) -> Result<Self, DateError> {
        if !(1000..=9999).contains(&year) {
            Err(DateError::UnsupportedYear(year))
        } else if day == 0 || day > 31 {
            Err(DateError::InvalidDay(day))
        } else if day <= month.count(year as u16) as usize {
            Ok(Self {
                year: year as u16,
                month,
                day: day as u8,
            })
        } else if day >= 30 {
            Err(DateError::MonthTooShort(month, day))
        } else {
            Err(DateError::NotBissextile(year))
        }
    }

    /// Validate year-month-day into date, with a numeric month
    pub fn from_numbers(year: usize, month: usize, day: usize) -> Result<Self, DateError> {
        let m = u8::try_from(month)
            .ok()
            .and_then(Month::from_number)
            .ok_or(DateError::InvalidMonth(month))?;
        Self::from(year, m, day)
    }

    /// `self.day` accessor
    pub fn day(&self) -> u8 {
        self.day
    }

    /// `self.month` accessor
    pub fn month(&self) -> Month {
        self.month
    }

    /// `self.year` accessor
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Biject the dates with integers
    ///
    /// This indexing is guaranteed consistent in the sense that
    /// for any date `d`, `d.index() + 1 == d.next().index()`
    pub fn index(self) -> usize {
        let leaps = {
            let years = if self.month <= Month::Feb {
                self.year as usize - 1
            } else {
                self.year as usize
            };
            // count leap years before current
            (years / 4) - (years / 100) + (years / 400)
        };
        let mut n = self.year as usize * 365 + self.day as usize;
        // partially elapsed current year
        n += [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334][self.month as usize];
        n += leaps; // each leap year adds one day
        n
    }

    /// Get day of week
    pub fn weekday(self) -> Weekday {
        let offset = 2; // essentially the weekday of 0000-Jan-01
        Weekday::from_usize((self.index() - offset) % 7).unwrap_or(Weekday::Mon)
    }

    /// The day after
    pub fn next(self) -> Self {
        if self.month.count(self.year) == self.day {
            if self.month == Month::Dec {
                Self {
                    year: self.year + 1,
                    month: Month::Jan,
                    day: 1,
                }
            } else {
                Self {
                    month: self.month.next(),
                    day: 1,
                    ..self
                }
            }
        } else {
            Self {
                day: self.day + 1,
                ..self
            }
        }
    }

    /// Whether the date falls in the given month of the given year
    pub fn is_in(self, year: u16, month: Month) -> bool {
        self.year == year && self.month == month
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        parse::date(s)
    }
}

fn is_leap(year: u16) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DateError::*;
        match self {
            UnsupportedYear(y) => write!(f, "{} is outside of the supported range for years", y),
            InvalidMonth(m) => write!(f, "{} is not a valid month", m),
            NotBissextile(y) => write!(f, "{} is not bissextile, Feb 29 does not exist", y),
            MonthTooShort(m, d) => write!(f, "{:?} is a short month, it does not have a {}th day", m, d),
            InvalidDay(d) => write!(f, "{} is not a valid day", d),
        }
    }
}

impl DateError {
    /// What message to show to help fix the date error
    pub fn fix_hint(&self) -> String {
        use DateError::*;
        match *self {
            UnsupportedYear(_) => "year should be between 1000 and 9999 inclusive".to_string(),
            InvalidMonth(_) => "months range from 01 to 12".to_string(),
            NotBissextile(y) => format!("did you mean {y}-02-28 or {y}-03-01 ?", y = y),
            MonthTooShort(m, d) => format!(
                "{:?} is only {} days long",
                m,
                if m == Month::Feb { 28.max(d - 1) } else { 30 }
            ),
            InvalidDay(d) => format!("{} is not in the range 1 ..= 31", d),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Month::*, Weekday::*, *};

    #[test]
    fn bissextile_check() {
        macro_rules! yes {
            ( $y:expr ) => {
                assert!(is_leap($y));
            };
        }
        macro_rules! no {
            ( $y:expr ) => {
                assert!(!is_leap($y));
            };
        }
        yes!(2004);
        no!(2100);
        yes!(2000);
        no!(2001);
        yes!(2016);
    }

    macro_rules! ok {
        ( $y:tt - $m:tt - $d:tt ) => {
            assert_eq!(Date::from($y, $m, $d), Ok(Date { year: $y, month: $m, day: $d }));
        };
    }
    macro_rules! short {
        ( $y:tt - $m:tt - $d:tt ) => {
            assert_eq!(Date::from($y, $m, $d), Err(DateError::MonthTooShort($m, $d)));
        };
    }
    macro_rules! nbiss {
        ( $y:tt - $m:tt - $d:tt ) => {
            assert_eq!(Date::from($y, $m, $d), Err(DateError::NotBissextile($y)));
        };
    }

    #[test]
    fn february() {
        short!(2015-Feb-30);
        nbiss!(2015-Feb-29);
        ok!(2015-Feb-28);
        ok!(2016-Feb-29);
        short!(2016-Feb-30);
    }

    #[test]
    fn numeric_months() {
        assert_eq!(Date::from_numbers(2015, 2, 3), Date::from(2015, Feb, 3));
        assert_eq!(Date::from_numbers(2015, 13, 3), Err(DateError::InvalidMonth(13)));
        assert_eq!(Date::from_numbers(2015, 0, 3), Err(DateError::InvalidMonth(0)));
        assert_eq!(Month::from_number(12), Some(Dec));
        assert_eq!(Jan.number(), 1);
        assert_eq!(Dec.next(), Jan);
    }

    macro_rules! dt {
        ( $y:tt - $m:tt - $d:tt ) => {
            Date::from($y, $m, $d).unwrap()
        };
    }

    #[test]
    fn iso_format() {
        assert_eq!(format!("{}", dt!(2015-Feb-3)), "2015-02-03");
        assert_eq!(format!("{}", dt!(2015-Dec-31)), "2015-12-31");
        assert_eq!("2015-02-03".parse::<Date>().unwrap(), dt!(2015-Feb-3));
    }

    #[test]
    fn weekday_references() {
        assert_eq!(dt!(2000-Jan-1).weekday(), Sat);
        assert_eq!(dt!(2000-Jan-3).weekday(), Mon);
        assert_eq!(dt!(2015-Feb-1).weekday(), Sun);
        assert_eq!(dt!(2015-Feb-2).weekday(), Mon);
        assert_eq!(dt!(2015-Feb-27).weekday(), Fri);
        assert_eq!(dt!(2016-Feb-29).weekday(), Mon);
        assert_eq!(dt!(2100-Jul-14).weekday(), Wed);
        assert!(dt!(2015-Feb-7).weekday().is_weekend());
        assert!(!dt!(2015-Feb-6).weekday().is_weekend());
    }

    #[test]
    fn successors() {
        assert_eq!(dt!(2015-Jan-31).next(), dt!(2015-Feb-1));
        assert_eq!(dt!(2015-Feb-28).next(), dt!(2015-Mar-1));
        assert_eq!(dt!(2016-Feb-28).next(), dt!(2016-Feb-29));
        assert_eq!(dt!(2015-Dec-31).next(), dt!(2016-Jan-1));
    }

    #[test]
    fn weekday_consistent() {
        let mut d = dt!(2000-Jan-1);
        let end = dt!(2100-Dec-31);
        while d < end {
            let ds = d.next();
            assert_eq!(d.index() + 1, ds.index(), "date {}, successor {}", d, ds);
            assert_eq!((d.weekday() as usize + 1) % 7, ds.weekday() as usize, "date {}", d);
            d = ds;
        }
    }
}
