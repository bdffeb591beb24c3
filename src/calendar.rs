use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Number of days in `month` (1..=12) of `year`, honoring leap years.
/// An out-of-range month yields 0.
pub fn days_of_month(month: u32, year: i32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    match (first, next_first) {
        (Some(first), Some(next_first)) => {
            next_first.signed_duration_since(first).num_days() as u32
        }
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Upper bound on how far into the future a computed occurrence may lie.
/// A candidate beyond the bound indicates corrupt input and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    years: u32,
}

impl Horizon {
    pub fn years(years: u32) -> Self {
        Horizon { years }
    }

    pub fn end(&self, from: NaiveDate) -> NaiveDate {
        anniversary_in(from, from.year() + self.years as i32)
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon { years: 2 }
    }
}

/// The date with `dob`'s month and day in `year`. Feb 29 falls back to the
/// last day of February when `year` is not a leap year.
pub fn anniversary_in(dob: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, dob.month(), dob.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, dob.month(), days_of_month(dob.month(), year)))
        .unwrap_or(dob)
}

/// Full years elapsed between `dob` and `today`. One less than the naive
/// year difference while this year's anniversary is still ahead.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// The next anniversary of `dob` on or after `today`.
///
/// Candidates beyond `horizon` fall back to the unadvanced same-year date.
pub fn next_occurrence(dob: NaiveDate, today: NaiveDate, horizon: Horizon) -> NaiveDate {
    let mut next = anniversary_in(dob, today.year());

    if next < today {
        next = anniversary_in(dob, today.year() + 1);
    }

    if next > horizon.end(today) {
        anniversary_in(dob, today.year())
    } else {
        next
    }
}

/// Whole days from `today` until the next anniversary of `dob`. Exactly 0
/// when today's month and day match `dob`'s.
pub fn days_remaining(dob: NaiveDate, today: NaiveDate, horizon: Horizon) -> i64 {
    if (today.month(), today.day()) == (dob.month(), dob.day()) {
        return 0;
    }

    next_occurrence(dob, today, horizon)
        .signed_duration_since(today)
        .num_days()
}
