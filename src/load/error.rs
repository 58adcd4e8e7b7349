//! Pretty-printing facility for error messages
//!
//! Every failure of the ledger is an `Error`: a kind, a one-line label that
//! names the offending value, and an optional list of notes, hints and
//! code blocks taken from the grammar.
//!
//! # Example
//!
//! ```ignore
//! Error::new(ErrorKind::Report, format!("Bad report string: \"{}\"", line))
//!     .with_text("a report line starts with the day of the month")
//!     .with_hint("write it as '3. 8:00 0:45 17:00'")
//! ```
//!
//! ```txt
//! --> Report error: Bad report string: "Four"
//!  |  a report line starts with the day of the month
//!  |      ? hint: write it as '3. 8:00 0:45 17:00'
//! ```

use std::fmt;

use crate::load::parse::Rule;

pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong, from the point of view of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// a date or month identifier does not have the expected shape
    BadDate,
    /// a ledger rule or a report line format is violated
    Report,
    /// the file system refused a read or a write
    Io,
}

/// Report for a single error
///
/// All messages (`label` passed with `new`, arguments of `with_hint`
/// and `with_text`) should fit in a single line.
#[must_use]
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    /// name of the error, includes the value that caused it
    label: String,
    /// contents of the error
    items: Vec<Item>,
}

/// Kinds of items that can be added to an error report
#[derive(Debug)]
enum Item {
    /// code block
    Block(Box<pest::error::Error<Rule>>),
    /// important message
    Text(String),
    /// recommendations for fixes
    Hint(String),
}

impl Error {
    /// Create a new error
    pub fn new<S>(kind: ErrorKind, msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            kind,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Shorthand for `Error::new(ErrorKind::BadDate, msg)`
    pub fn bad_date<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self::new(ErrorKind::BadDate, msg)
    }

    /// Shorthand for `Error::new(ErrorKind::Report, msg)`
    pub fn report<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self::new(ErrorKind::Report, msg)
    }

    /// Wrap a failed file system operation on `path`
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("Cannot access \"{}\"", path.display()))
            .with_text(err)
    }

    /// Add a pre-existing error (e.g. to build from a parsing error)
    pub fn with_error(mut self, err: pest::error::Error<Rule>) -> Self {
        self.items
            .push(Item::Block(Box::new(err.renamed_rules(rule_rename))));
        self
    }

    /// Add an important note
    pub fn with_text<S>(mut self, msg: S) -> Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn with_hint<S>(mut self, msg: S) -> Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::BadDate => write!(f, "Bad date"),
            ErrorKind::Report => write!(f, "Report error"),
            ErrorKind::Io => write!(f, "I/O error"),
        }
    }
}

const RED: &str = "\x1b[0;91;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}--> {}:{} {}{}", RED, self.kind, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Block(err) => {
                    for line in format!("{}", err).split('\n') {
                        write!(f, " {}|  {}", RED, BLUE)?;
                        for c in line.chars() {
                            match c {
                                '|' => write!(f, "|{}", NONE)?,
                                '=' => write!(f, "={}", NONE)?,
                                '^' => write!(f, "{}^", RED)?,
                                _ => write!(f, "{}", c)?,
                            }
                        }
                        writeln!(f, "{}", NONE)?;
                    }
                }
                Item::Text(txt) => {
                    writeln!(f, " {}|  {}{}{}", RED, WHITE, txt, NONE)?;
                }
                Item::Hint(txt) => {
                    writeln!(f, " {}|      {}? hint: {}{}", RED, BLUE, NONE, txt)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// Convert rule names to user-friendly information about their purpose
fn rule_rename(rule: &Rule) -> String {
    use Rule::*;
    String::from(match rule {
        EOI => "end of line",
        digit => "a digit",
        space => "a space or tab",
        year => "a 4-digit year",
        month => "a 2-digit month",
        day => "a 2-digit day",
        iso_date => "a date 'YYYY-MM-DD'",
        month_id => "a month 'YYYY-MM'",
        date_only => "a date 'YYYY-MM-DD'",
        ordinal => "a day of the month ('3.')",
        line_key => "a day of the month followed by '.' and a space",
        line_prefix => "a day of the month followed by '.'",
        hours => "1 or 2 digits of hours",
        minutes => "2 digits of minutes",
        clock => "a time 'H:MM'",
        start => "a start time",
        pause => "a break duration",
        stop => "a stop time",
        times => "'start break stop' times",
        vacation => "'vacation'",
        sick => "'sick'",
        kind => "'vacation' or 'sick'",
        info => "a free-form note",
        body => "times, 'vacation', 'sick' or a note",
        report => "a report line ('3. 8:00 0:45 17:00')",
        name => "a holiday name",
        holiday => "a holiday ('YYYY-MM-DD: \"Name\"')",
    })
}
