//! A plain-text work-time ledger
//!
//! Each month is a file named `YYYY-MM.txt` holding one line per working day,
//! such as `3. 8:00 0:45 17:00` (start, break, stop). A `CalendarMonth`
//! replays those days in calendar order and derives the flextime balance,
//! the vacation days used and the sick days taken. `write_line` updates the
//! line of one day in a month file.

pub mod load;
pub mod util;

pub use crate::load::{
    error::{Error, ErrorKind, Result},
    load_holidays, load_month,
    parse::Report,
    read_holidays, read_month,
    writer::{edit_report, write_line},
};
pub use crate::util::{
    calendar::CalendarMonth,
    date::{Date, Month, Weekday},
    day::{Day, DayType, Schedule},
};
