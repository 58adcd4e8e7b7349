//! The days of one month of the ledger
//!
//! Days are added strictly in calendar order: the only day that may be added
//! is the next working day after the last one, and only once the last one is
//! complete. Weekends and holidays are never recorded, they are skipped.

use chrono::Duration;
use std::collections::HashMap;
use std::str::FromStr;

use crate::load::{
    error::{Error, Result},
    parse,
};
use crate::util::{
    date::{Date, Month},
    day::{Day, DayType, Schedule},
};

#[derive(Debug, Clone)]
pub struct CalendarMonth {
    year: u16,
    month: Month,
    days: Vec<Day>,
    /// registered holidays, may include dates of other months
    holidays: HashMap<Date, String>,
    schedule: Schedule,
}

impl CalendarMonth {
    /// Empty month from a `YYYY-MM` identifier
    pub fn new(month_id: &str) -> Result<Self> {
        Self::with_schedule(month_id, Schedule::default())
    }

    pub fn with_schedule(month_id: &str, schedule: Schedule) -> Result<Self> {
        let (year, month) = parse::month_id(month_id)?;
        Ok(Self {
            year,
            month,
            days: Vec::new(),
            holidays: HashMap::new(),
            schedule,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn holidays(&self) -> &HashMap<Date, String> {
        &self.holidays
    }

    /// Record the next day of the month
    ///
    /// `date` must be exactly `next_workday()`, and every day already
    /// recorded must be complete. The day is returned so that the caller
    /// can report on it.
    pub fn add_day(&mut self, date: &str) -> Result<&mut Day> {
        let mut day = Day::parse(date, self.schedule)?;
        if !day.date().is_in(self.year, self.month) {
            return Err(Error::report(format!(
                "New date string didn't match month. {} doesn't include {}.",
                self.id(),
                date
            )));
        }
        if let Some(open) = self.days.iter().find(|d| !d.complete()) {
            return Err(Error::report(format!(
                "New days can't be added while the report for a previous day is incomplete. \
                 Cannot add {} before {} is complete.",
                date,
                open.date()
            )));
        }
        let expected = self.next_workday();
        if day.date() != expected {
            return Err(Error::report(format!(
                "New work days must be added consecutively. Expected {}, got {}.",
                expected, date
            ))
            .with_hint("weekends and holidays are skipped, they are never added"));
        }
        classify(&self.holidays, &mut day);
        #[cfg(feature = "log")]
        log::debug!("adding {} as {}", day.date(), day.day_type);
        self.days.push(day);
        Ok(self
            .days
            .last_mut()
            .expect("a day was pushed just before"))
    }

    /// First date after the last recorded day that is neither a weekend
    /// nor a registered holiday
    ///
    /// Starts from the 1st of the month when nothing is recorded. There is no
    /// upper bound: the result is past the end of the month once every
    /// working day of the month is recorded.
    pub fn next_workday(&self) -> Date {
        let mut date = match self.days.last() {
            Some(last) => last.date().next(),
            None => self.first_date(),
        };
        while date.weekday().is_weekend() || self.holidays.contains_key(&date) {
            #[cfg(feature = "log")]
            log::trace!("skipping {} ({})", date, date.weekday());
            date = date.next();
        }
        date
    }

    /// Whether every working day of the month is recorded and the last one
    /// is complete
    ///
    /// A month in which nothing is recorded is never complete.
    pub fn complete(&self) -> bool {
        match self.days.last() {
            Some(last) => !self.next_workday().is_in(self.year, self.month) && last.complete(),
            None => false,
        }
    }

    /// Sum of the contributions of all recorded days
    pub fn calculate_flextime(&self) -> Duration {
        self.days
            .iter()
            .fold(Duration::zero(), |acc, day| acc + day.flextime())
    }

    /// Register a holiday, reclassifying the day if it is already recorded
    pub fn add_holiday(&mut self, date: &str, name: &str) -> Result<()> {
        let date = date.parse::<Date>()?;
        self.holidays.insert(date, name.to_string());
        if let Some(day) = self.days.iter_mut().find(|d| d.date() == date) {
            classify(&self.holidays, day);
            #[cfg(feature = "log")]
            log::debug!("{} is now a holiday ({})", date, name);
        }
        Ok(())
    }

    pub fn used_vacation(&self) -> usize {
        self.count(DayType::Vacation)
    }

    pub fn sick_days(&self) -> usize {
        self.count(DayType::SickDay)
    }

    fn count(&self, day_type: DayType) -> usize {
        self.days.iter().filter(|d| d.day_type == day_type).count()
    }

    /// `YYYY-MM`
    pub fn id(&self) -> String {
        format!("{}-{:02}", self.year, self.month.number())
    }

    fn first_date(&self) -> Date {
        // the 1st exists in every month of a supported year
        Date::from(self.year as usize, self.month, 1).unwrap_or_else(|e| {
            unreachable!("{}-{:02}-01 is not a date: {}", self.year, self.month.number(), e)
        })
    }
}

/// Holidays win over any other classification
fn classify(holidays: &HashMap<Date, String>, day: &mut Day) {
    if holidays.contains_key(&day.date()) {
        day.day_type = DayType::Holiday;
    }
}

impl FromStr for CalendarMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
    use super::*;
    use crate::load::error::ErrorKind;

    macro_rules! month {
        ( $s:expr ) => {
            $s.parse::<CalendarMonth>().unwrap()
        };
    }

    macro_rules! next {
        ( $m:expr => $s:expr ) => {
            assert_eq!(format!("{}", $m.next_workday()), $s);
        };
    }

    // record a day from its report line
    macro_rules! work {
        ( $m:expr, $date:expr, $line:expr ) => {
            $m.add_day($date).unwrap().apply(&parse::report($line).unwrap()).unwrap();
        };
    }

    // same, keeping a copy of the recorded day
    macro_rules! work_day {
        ( $m:expr, $date:expr, $line:expr ) => {{
            work!($m, $date, $line);
            $m.days().last().unwrap().clone()
        }};
    }

    #[test]
    fn construction() {
        let m = month!("2015-02");
        assert_eq!(m.year(), 2015);
        assert_eq!(m.month(), Month::Feb);
        assert_eq!(m.id(), "2015-02");
        assert!(m.days().is_empty());
        for bad in ["2015-2", "2015", "Feb 2015", "2015-13", "2015-00"] {
            assert_eq!(CalendarMonth::new(bad).unwrap_err().kind(), ErrorKind::BadDate);
        }
    }

    #[test]
    fn first_workday() {
        // 2015-06-01 is a Monday
        next!(month!("2015-06") => "2015-06-01");
        // 2015-02-01 is a Sunday
        next!(month!("2015-02") => "2015-02-02");
        // 2015-08-01 is a Saturday
        next!(month!("2015-08") => "2015-08-03");
        let mut m = month!("2015-06");
        m.add_holiday("2015-06-01", "Whit Monday").unwrap();
        next!(m => "2015-06-02");
    }

    #[test]
    fn consecutive_days() {
        let mut m = month!("2015-02");
        work!(m, "2015-02-02", "2. 8:00 1:00 17:00");
        next!(m => "2015-02-03");
        work!(m, "2015-02-03", "3. 8:00 1:00 17:00");
        work!(m, "2015-02-04", "4. 8:00 1:00 17:00");
        work!(m, "2015-02-05", "5. 8:00 1:00 17:00");
        work!(m, "2015-02-06", "6. 8:00 1:00 17:00");
        // weekend
        next!(m => "2015-02-09");
        assert_eq!(m.days().len(), 5);
    }

    #[test]
    fn out_of_order_days() {
        let mut m = month!("2015-02");
        work!(m, "2015-02-02", "2. 8:00 1:00 17:00");
        // skipped
        let err = m.add_day("2015-02-04").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Report);
        assert!(err.label().contains("Expected 2015-02-03, got 2015-02-04"), "{}", err);
        // already there
        assert_eq!(m.add_day("2015-02-02").unwrap_err().kind(), ErrorKind::Report);
        // weekend
        let mut m = month!("2015-02");
        assert_eq!(m.add_day("2015-02-01").unwrap_err().kind(), ErrorKind::Report);
        assert!(m.days().is_empty());
    }

    #[test]
    fn other_month() {
        let mut m = month!("2015-02");
        let err = m.add_day("2015-03-02").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Report);
        assert!(err.label().contains("2015-02 doesn't include 2015-03-02"), "{}", err);
        assert_eq!(m.add_day("2015-02-30").unwrap_err().kind(), ErrorKind::BadDate);
    }

    #[test]
    fn incomplete_previous_day() {
        let mut m = month!("2015-02");
        m.add_day("2015-02-02").unwrap().apply(&parse::report("2. 8:00").unwrap()).unwrap();
        let err = m.add_day("2015-02-03").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Report);
        m.days[0].apply(&parse::report("2. 8:00 1:00 17:00").unwrap()).unwrap();
        assert!(m.add_day("2015-02-03").is_ok());
    }

    #[test]
    fn holiday_before_day() {
        let mut m = month!("2015-02");
        work!(m, "2015-02-02", "2. 8:00 1:00 17:00");
        m.add_holiday("2015-02-03", "Imaginary day").unwrap();
        // holidays are skipped by the sequence
        next!(m => "2015-02-04");
        assert_eq!(m.add_day("2015-02-03").unwrap_err().kind(), ErrorKind::Report);
        let day = m.add_day("2015-02-04").unwrap();
        assert_eq!(day.day_type, DayType::WorkingDay);
        assert_eq!(m.holidays().get(&"2015-02-03".parse::<Date>().unwrap()).map(String::as_str), Some("Imaginary day"));
    }

    #[test]
    fn holiday_forced_on_new_day() {
        // register after the sequence has moved past the date
        let mut m = month!("2015-02");
        let mut day = work_day!(m, "2015-02-02", "2. 8:00 1:00 17:00");
        assert_eq!(day.day_type, DayType::WorkingDay);
        m.add_holiday("2015-02-02", "Imaginary day").unwrap();
        assert_eq!(m.days[0].day_type, DayType::Holiday);
        // a day built outside of the month is still classified on insertion
        day.day_type = DayType::WorkingDay;
        classify(&m.holidays, &mut day);
        assert_eq!(day.day_type, DayType::Holiday);
    }

    #[test]
    fn holiday_after_day() {
        let mut m = month!("2015-02");
        work!(m, "2015-02-02", "2. vacation");
        assert_eq!(m.used_vacation(), 1);
        m.add_holiday("2015-02-02", "Imaginary day").unwrap();
        assert_eq!(m.days()[0].day_type, DayType::Holiday);
        assert_eq!(m.used_vacation(), 0);
    }

    #[test]
    fn flextime() {
        let mut m = month!("2015-02");
        assert_eq!(m.calculate_flextime(), Duration::zero());
        work!(m, "2015-02-02", "2. 7:00 1:00 17:00");
        work!(m, "2015-02-03", "3. 8:00 0:30 16:00");
        work!(m, "2015-02-04", "4. vacation");
        work!(m, "2015-02-05", "5. 8:00 1:00 17:15");
        let expected = m.days().iter().fold(Duration::zero(), |acc, d| acc + d.flextime());
        assert_eq!(m.calculate_flextime(), expected);
        // +1:00, -0:30, vacation, +0:15
        assert_eq!(m.calculate_flextime(), Duration::minutes(45));
    }

    #[test]
    fn day_type_counts() {
        let mut m = month!("2015-02");
        work!(m, "2015-02-02", "2. sick");
        work!(m, "2015-02-03", "3. vacation");
        work!(m, "2015-02-04", "4. 8:00 1:00 17:00");
        work!(m, "2015-02-05", "5. sick");
        work!(m, "2015-02-06", "6. vacation");
        work!(m, "2015-02-09", "9. vacation");
        assert_eq!(m.used_vacation(), 3);
        assert_eq!(m.sick_days(), 2);
        assert_eq!(month!("2015-02").used_vacation(), 0);
    }

    #[test]
    fn completion() {
        let mut m = month!("2015-02");
        assert!(!m.complete());
        for n in [2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 16, 17, 18, 19, 20, 23, 24, 25, 26] {
            work!(m, &format!("2015-02-{:02}", n), &format!("{}. 8:00 1:00 17:00", n));
            assert!(!m.complete(), "complete after {}", n);
        }
        m.add_day("2015-02-27").unwrap().apply(&parse::report("27. 8:00").unwrap()).unwrap();
        next!(m => "2015-03-02");
        assert!(!m.complete());
        m.days[19].apply(&parse::report("27. 8:00 1:00 17:00").unwrap()).unwrap();
        assert!(m.complete());
    }

    #[test]
    fn completion_with_trailing_holiday() {
        let mut m = month!("2015-02");
        m.add_holiday("2015-02-27", "Imaginary day").unwrap();
        for n in [2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 16, 17, 18, 19, 20, 23, 24, 25] {
            work!(m, &format!("2015-02-{:02}", n), &format!("{}. 8:00 1:00 17:00", n));
        }
        assert!(!m.complete());
        work!(m, "2015-02-26", "26. 8:00 1:00 17:00");
        assert!(m.complete());
    }
}
