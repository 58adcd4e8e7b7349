//! Update the line of one day in a month file
//!
//! A month file is read as a sequence of lines keyed by the day of the month
//! they start with. Writing a line replaces the line with the same key, or
//! appends it when there is none. Lines are joined by a single newline and
//! the file never ends with one.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::load::{
    error::{Error, Result},
    parse,
};

/// One line of a month file
#[derive(Debug)]
struct Record {
    /// day of the month, absent for lines that do not start with one
    key: Option<String>,
    text: String,
}

/// The lines of a month file, in file order
#[derive(Debug, Default)]
struct Sheet {
    records: Vec<Record>,
}

impl Sheet {
    fn from(contents: &str) -> Self {
        let mut records = contents
            .lines()
            .map(|text| Record {
                key: parse::line_ordinal(text),
                text: text.to_string(),
            })
            .collect::<Vec<_>>();
        while records.last().map_or(false, |r| r.text.trim().is_empty()) {
            records.pop();
        }
        Self { records }
    }

    /// Replace the line of day `key`, or append
    fn put(&mut self, key: String, text: &str) {
        match self.records.iter_mut().find(|r| r.key.as_ref() == Some(&key)) {
            Some(record) => {
                #[cfg(feature = "log")]
                log::debug!("replacing line of day {}", key);
                record.text = text.to_string();
            }
            None => {
                #[cfg(feature = "log")]
                log::debug!("appending line of day {}", key);
                self.records.push(Record {
                    key: Some(key),
                    text: text.to_string(),
                });
            }
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", record.text)?;
        }
        Ok(())
    }
}

/// Check a new line and return it without its leading whitespace, with its key
fn validate(line: &str) -> Result<(String, &str)> {
    let bad = || Error::report(format!("Bad report string: \"{}\"", line));
    if line.contains(|c: char| c == '\n' || c == '\r') {
        return Err(bad()
            .with_text("a report is a single line")
            .with_hint("write one line per day"));
    }
    let trimmed = line.trim_start();
    match parse::line_key(trimmed) {
        Some(key) => Ok((key, trimmed)),
        None => Err(bad()
            .with_text("a report line starts with the day of the month, a period and a space")
            .with_hint("write it as '3. 8:00 0:45 17:00'")),
    }
}

/// Reject paths whose name is not `YYYY-MM.<ext>`
fn check_month_file(path: &Path) -> Result<()> {
    let is_month_file = path.extension().is_some()
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map_or(false, |stem| parse::month_id(stem).is_ok());
    if is_month_file {
        Ok(())
    } else {
        Err(Error::report(format!(
            "File name is not a month file: \"{}\"",
            path.display()
        ))
        .with_hint("month files are named after their month, as in '2015-02.txt'"))
    }
}

/// New contents of a month file after writing `line` into `contents`
pub fn edit_report(contents: &str, line: &str) -> Result<String> {
    let (key, line) = validate(line)?;
    let mut sheet = Sheet::from(contents);
    sheet.put(key, line);
    Ok(sheet.to_string())
}

/// Write `line` into the month file at `path`, creating it if needed
///
/// Nothing is read or written when the path or the line is rejected.
pub fn write_line<P>(path: P, line: &str) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    check_month_file(path)?;
    validate(line)?;
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::io(path, e)),
    };
    let updated = edit_report(&contents, line)?;
    fs::write(path, updated).map_err(|e| Error::io(path, e))
}
