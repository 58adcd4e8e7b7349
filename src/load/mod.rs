//! Rebuild the ledger from the text of month files and holiday lists

pub mod error;
pub mod parse;
pub mod writer;

use std::fs;
use std::io;
use std::path::Path;

use crate::load::error::{Error, Result};
use crate::util::{
    calendar::CalendarMonth,
    date::Date,
    day::Schedule,
};

/// Holidays listed one per line as `YYYY-MM-DD: "Name"`
///
/// Blank lines and lines starting with `#` are ignored.
pub fn read_holidays(contents: &str) -> Result<Vec<(Date, String)>> {
    contents
        .lines()
        .filter(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(parse::holiday)
        .collect()
}

/// Replay the lines of a month file into a fresh month
///
/// Holidays outside of the month are ignored. Each non-blank line must be
/// the report of the next working day, in order.
pub fn read_month(
    month_id: &str,
    contents: &str,
    holidays: &[(Date, String)],
    schedule: Schedule,
) -> Result<CalendarMonth> {
    let mut month = CalendarMonth::with_schedule(month_id, schedule)?;
    for (date, name) in holidays {
        if date.is_in(month.year(), month.month()) {
            month.add_holiday(&date.to_string(), name)?;
        }
    }
    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        let report = parse::report(line)?;
        let date = format!("{}-{:02}", month.id(), report.ordinal);
        let day = month.add_day(&date).map_err(|e| e.with_text(format!("while reading \"{}\"", line)))?;
        day.apply(&report)?;
    }
    #[cfg(feature = "log")]
    log::debug!("read {} days of {}", month.days().len(), month.id());
    Ok(month)
}

/// Read the month file at `path`, named `YYYY-MM.<ext>`
///
/// A file that does not exist yet is an empty month.
pub fn load_month<P>(path: P, holidays: &[(Date, String)], schedule: Schedule) -> Result<CalendarMonth>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let month_id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::report(format!("File name is not a month file: \"{}\"", path.display())))?;
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::io(path, e)),
    };
    read_month(month_id, &contents, holidays, schedule)
}

/// Read a holiday list from `path`
pub fn load_holidays<P>(path: P) -> Result<Vec<(Date, String)>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    read_holidays(&contents)
}
