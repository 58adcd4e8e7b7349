use chrono::{Duration, NaiveTime};
use std::fmt;
use std::str::FromStr;

use crate::load::{
    error::{Error, Result},
    parse::Report,
};
use crate::util::date::Date;

/// How a recorded day counts toward the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    WorkingDay,
    /// public holidays, and weekends
    Holiday,
    Vacation,
    SickDay,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DayType::*;
        let name = match self {
            WorkingDay => "working day",
            Holiday => "holiday",
            Vacation => "vacation",
            SickDay => "sick day",
        };
        write!(f, "{}", name)
    }
}

/// Expected amount of work on a working day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub workday: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            workday: Duration::hours(8),
        }
    }
}

/// One calendar date of the ledger and what was reported for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    date: Date,
    pub day_type: DayType,
    start: Option<NaiveTime>,
    pause: Option<Duration>,
    stop: Option<NaiveTime>,
    info: Option<String>,
    schedule: Schedule,
}

impl Day {
    /// Fresh day with nothing reported, classified by its weekday alone
    pub fn new(date: Date, schedule: Schedule) -> Self {
        let day_type = if date.weekday().is_weekend() {
            DayType::Holiday
        } else {
            DayType::WorkingDay
        };
        Self {
            date,
            day_type,
            start: None,
            pause: None,
            stop: None,
            info: None,
            schedule,
        }
    }

    /// Fresh day from a `YYYY-MM-DD` string
    pub fn parse(s: &str, schedule: Schedule) -> Result<Self> {
        Ok(Self::new(s.parse::<Date>()?, schedule))
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn start(&self) -> Option<NaiveTime> {
        self.start
    }

    pub fn pause(&self) -> Option<Duration> {
        self.pause
    }

    pub fn stop(&self) -> Option<NaiveTime> {
        self.stop
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// Record the contents of a report line for this day
    ///
    /// Fields absent from the report are left as they were, so a day can be
    /// reported in several steps. A holiday stays a holiday even when the
    /// report says `vacation` or `sick`.
    pub fn apply(&mut self, report: &Report) -> Result<()> {
        if report.ordinal != self.date.day() {
            return Err(Error::report(format!(
                "Report for day {} does not belong to {}",
                report.ordinal, self.date
            )));
        }
        let start = report.start.or(self.start);
        let stop = report.stop.or(self.stop);
        if let (Some(start), Some(stop)) = (start, stop) {
            if stop < start {
                return Err(Error::report(format!(
                    "Stop time {} precedes start time {} on {}",
                    stop.format("%H:%M"),
                    start.format("%H:%M"),
                    self.date
                )));
            }
        }
        if let Some(kind) = report.kind {
            if self.day_type != DayType::Holiday {
                self.day_type = kind;
            }
        }
        self.start = start;
        self.stop = stop;
        self.pause = report.pause.or(self.pause);
        if report.info.is_some() {
            self.info = report.info.clone();
        }
        Ok(())
    }

    /// Whether everything needed to compute the flextime is known
    pub fn complete(&self) -> bool {
        match self.day_type {
            DayType::WorkingDay => {
                self.start.is_some() && self.pause.is_some() && self.stop.is_some()
            }
            DayType::Holiday | DayType::Vacation | DayType::SickDay => true,
        }
    }

    /// Time worked, breaks excluded
    pub fn worked_time(&self) -> Option<Duration> {
        match (self.start, self.pause, self.stop) {
            (Some(start), Some(pause), Some(stop)) => Some(stop - start - pause),
            _ => None,
        }
    }

    /// Contribution of this day to the balance
    ///
    /// Zero for days that are not working days and for working days
    /// that are not complete yet.
    pub fn flextime(&self) -> Duration {
        match (self.day_type, self.worked_time()) {
            (DayType::WorkingDay, Some(worked)) => worked - self.schedule.workday,
            _ => Duration::zero(),
        }
    }
}

impl FromStr for Day {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Schedule::default())
    }
}
