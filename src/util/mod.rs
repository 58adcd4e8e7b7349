pub mod calendar;
pub mod date;
pub mod day;
