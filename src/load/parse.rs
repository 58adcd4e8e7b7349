//! Convert month identifiers, dates, report lines and holiday entries
//! into their typed counterparts

#![allow(clippy::upper_case_acronyms)]

use chrono::{Duration, NaiveTime};
use pest::Parser;
use pest_derive::*;

use crate::load::error::{Error, Result};
use crate::util::{
    date::{Date, Month},
    day::DayType,
};

type Pair<'i> = pest::iterators::Pair<'i, Rule>;

#[derive(Parser)]
#[grammar = "load/grammar.pest"]
struct LedgerParser;

/// Contents of one line of a month file
///
/// `3. 8:00 0:45 17:00 standup moved` reads as day 3, started at 8:00,
/// 45 minutes of break, stopped at 17:00, with a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub ordinal: u8,
    /// set by the `vacation` and `sick` keywords
    pub kind: Option<DayType>,
    pub start: Option<NaiveTime>,
    pub pause: Option<Duration>,
    pub stop: Option<NaiveTime>,
    pub info: Option<String>,
}

fn unexpected_token<T>(token: Rule, parent: Rule) -> T {
    unreachable!("Grammar error: found `{token:?}` inside of `{parent:?}`")
}

// extract contents of wrapper rule
macro_rules! subrule {
    ( $node:expr ) => {{
        let mut items = $node.into_inner().filter(|p| p.as_rule() != Rule::EOI);
        let fst = items.next().unwrap_or_else(|| panic!("No subrule"));
        assert!(items.next().is_none(), "Several subrules");
        fst
    }};
}

// pair to number, for tokens whose length is bounded by the grammar
macro_rules! parse_bounded {
    ( $node:expr, $t:ty ) => {
        // safe to .unwrap() because the grammar validated it already
        $node.as_str().parse::<$t>().unwrap()
    };
}

/// Read a `YYYY-MM` month identifier
pub fn month_id(s: &str) -> Result<(u16, Month)> {
    let bad = || Error::bad_date(format!("Bad date string: \"{}\"", s));
    let pair = LedgerParser::parse(Rule::month_id, s)
        .map_err(|e| bad().with_error(e))?
        .next()
        .expect("grammar error: no month_id found");
    let mut items = pair.into_inner();
    let year = items.next().expect("grammar error: no year in month_id");
    let month = items.next().expect("grammar error: no month in month_id");
    let year = parse_bounded!(year, usize);
    let month = parse_bounded!(month, usize);
    match Date::from_numbers(year, month, 1) {
        Ok(first) => Ok((first.year(), first.month())),
        Err(e) => Err(bad().with_text(&e).with_hint(e.fix_hint())),
    }
}

/// Read a `YYYY-MM-DD` date, checking that it exists
pub fn date(s: &str) -> Result<Date> {
    let pair = LedgerParser::parse(Rule::date_only, s)
        .map_err(|e| Error::bad_date(format!("Bad date string: \"{}\"", s)).with_error(e))?
        .next()
        .expect("grammar error: no date found");
    build_date(s, subrule!(pair))
}

fn build_date(source: &str, pair: Pair) -> Result<Date> {
    assert_eq!(pair.as_rule(), Rule::iso_date);
    let mut items = pair.into_inner();
    let mut next = || items.next().expect("grammar error: incomplete iso_date");
    let year = parse_bounded!(next(), usize);
    let month = parse_bounded!(next(), usize);
    let day = parse_bounded!(next(), usize);
    Date::from_numbers(year, month, day).map_err(|e| {
        Error::bad_date(format!("Bad date string: \"{}\"", source))
            .with_text(&e)
            .with_hint(e.fix_hint())
    })
}

/// Day of the month of a line written as `N. ...`, leading whitespace excluded
///
/// This is the validation applied to new lines: the period must be followed
/// by whitespace. `None` if the line has another shape.
///
/// The key is the digits of the day without leading zeros, so `03.` and `3.`
/// name the same day however many digits are written.
pub fn line_key(line: &str) -> Option<String> {
    let pair = LedgerParser::parse(Rule::line_key, line).ok()?.next()?;
    Some(ordinal_key(subrule!(pair).as_str()))
}

/// Day of the month of an existing line, leading whitespace allowed
pub fn line_ordinal(line: &str) -> Option<String> {
    let pair = LedgerParser::parse(Rule::line_prefix, line).ok()?.next()?;
    Some(ordinal_key(subrule!(pair).as_str()))
}

fn ordinal_key(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => String::from("0"),
        key => key.to_string(),
    }
}

/// Read a full report line
pub fn report(line: &str) -> Result<Report> {
    let bad = || Error::report(format!("Bad report string: \"{}\"", line));
    let pair = LedgerParser::parse(Rule::report, line)
        .map_err(|e| bad().with_error(e).with_hint("write it as '3. 8:00 0:45 17:00'"))?
        .next()
        .expect("grammar error: no report found");
    let mut report = Report::default();
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::ordinal => {
                report.ordinal = item.as_str().parse::<u8>().map_err(|_| {
                    bad().with_text(format!("{} is not a day of the month", item.as_str()))
                })?;
            }
            Rule::body => build_body(line, item, &mut report)?,
            Rule::EOI => (),
            other => unexpected_token(other, Rule::report),
        }
    }
    Ok(report)
}

fn build_body(line: &str, pair: Pair, report: &mut Report) -> Result<()> {
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::kind => {
                report.kind = Some(match subrule!(item).as_rule() {
                    Rule::vacation => DayType::Vacation,
                    Rule::sick => DayType::SickDay,
                    other => unexpected_token(other, Rule::kind),
                });
            }
            Rule::times => {
                for time in item.into_inner() {
                    match time.as_rule() {
                        Rule::start => report.start = Some(build_clock(line, subrule!(time))?),
                        Rule::pause => report.pause = Some(build_pause(line, subrule!(time))?),
                        Rule::stop => report.stop = Some(build_clock(line, subrule!(time))?),
                        other => unexpected_token(other, Rule::times),
                    }
                }
            }
            Rule::info => report.info = Some(item.as_str().trim_end().to_string()),
            other => unexpected_token(other, Rule::body),
        }
    }
    Ok(())
}

fn clock_parts(pair: Pair) -> (u32, u32) {
    assert_eq!(pair.as_rule(), Rule::clock);
    let mut items = pair.into_inner();
    let hours = items.next().expect("grammar error: no hours in clock");
    let minutes = items.next().expect("grammar error: no minutes in clock");
    (parse_bounded!(hours, u32), parse_bounded!(minutes, u32))
}

fn build_clock(line: &str, pair: Pair) -> Result<NaiveTime> {
    let text = pair.as_str();
    let (h, m) = clock_parts(pair);
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(|| {
        Error::report(format!("Bad report string: \"{}\"", line))
            .with_text(format!("{} is not a time of day", text))
    })
}

fn build_pause(line: &str, pair: Pair) -> Result<Duration> {
    let text = pair.as_str();
    let (h, m) = clock_parts(pair);
    if m >= 60 {
        return Err(Error::report(format!("Bad report string: \"{}\"", line))
            .with_text(format!("{} has more than 59 minutes", text)));
    }
    Ok(Duration::hours(h.into()) + Duration::minutes(m.into()))
}

/// Read a `YYYY-MM-DD: "Name"` holiday entry
pub fn holiday(line: &str) -> Result<(Date, String)> {
    let pair = LedgerParser::parse(Rule::holiday, line)
        .map_err(|e| {
            Error::report(format!("Bad holiday string: \"{}\"", line))
                .with_error(e)
                .with_hint("write it as '2015-01-01: \"New Year\"'")
        })?
        .next()
        .expect("grammar error: no holiday found");
    let mut items = pair.into_inner();
    let date = build_date(line, items.next().expect("grammar error: no date in holiday"))?;
    let name = items.next().expect("grammar error: no name in holiday");
    Ok((date, name.as_str().to_string()))
}
