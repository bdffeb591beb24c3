use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use uuid::Uuid;

use crate::calendar::{self, Horizon};
use crate::zodiac::Sign;

/// A person with an optional date of birth. The derived values below are
/// computed on demand and never stored.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Contact {
    pub fn new(name: String, dob: Option<NaiveDate>, phone: Option<String>) -> Self {
        Contact {
            id: Uuid::new_v4(),
            name,
            dob,
            phone,
        }
    }

    /// Age in full years, 0 without a date of birth.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        self.dob.map_or(0, |dob| calendar::age_on(dob, today))
    }

    /// Age reached at the next occurrence.
    pub fn turning(&self, today: NaiveDate) -> i32 {
        self.age_on(today) + 1
    }

    /// Next anniversary of the date of birth; `today` without one.
    pub fn next_occurrence(&self, today: NaiveDate, horizon: Horizon) -> NaiveDate {
        self.dob
            .map_or(today, |dob| calendar::next_occurrence(dob, today, horizon))
    }

    /// Days until the next anniversary. Contacts without a date of birth
    /// report `i64::MAX` so they sort behind everyone else.
    pub fn days_remaining(&self, today: NaiveDate, horizon: Horizon) -> i64 {
        self.dob.map_or(i64::MAX, |dob| {
            calendar::days_remaining(dob, today, horizon)
        })
    }

    pub fn zodiac(&self) -> Option<Sign> {
        self.dob
            .and_then(|dob| Sign::from_month_day(dob.month(), dob.day()))
    }
}
