use chrono::{Datelike, Month, NaiveDate};
use itertools::Itertools;
use num_traits::FromPrimitive;

use crate::calendar::Horizon;
use crate::contact::Contact;
use crate::zodiac::Sign;

/// One contact with its derived display values for a given day.
#[derive(Debug, Clone)]
pub struct Upcoming<'a> {
    pub contact: &'a Contact,
    pub age: i32,
    pub turning: i32,
    pub next: NaiveDate,
    pub days_left: i64,
    pub zodiac: Option<Sign>,
}

impl Upcoming<'_> {
    fn matches(&self, needle: &str) -> bool {
        self.contact.name.to_lowercase().contains(needle)
            || self
                .zodiac
                .map_or(false, |sign| sign.to_string().to_lowercase().contains(needle))
            || self.next.to_string().contains(needle)
            || self.age.to_string() == needle
            || self.turning.to_string() == needle
    }
}

pub struct Agenda<'a> {
    contacts: &'a [Contact],
    horizon: Horizon,
}

impl<'a> Agenda<'a> {
    pub fn new(contacts: &'a [Contact], horizon: Horizon) -> Self {
        Agenda { contacts, horizon }
    }

    /// All contacts with their derived values, closest birthday first.
    /// Contacts without a date of birth come last.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<Upcoming<'a>> {
        let mut entries: Vec<_> = self
            .contacts
            .iter()
            .map(|contact| Upcoming {
                contact,
                age: contact.age_on(today),
                turning: contact.turning(today),
                next: contact.next_occurrence(today, self.horizon),
                days_left: contact.days_remaining(today, self.horizon),
                zodiac: contact.zodiac(),
            })
            .collect();

        entries.sort_by_key(|entry| entry.days_left);
        entries
    }

    /// Upcoming entries grouped by the month of their next occurrence,
    /// starting with today's month and wrapping around the year.
    pub fn by_month(&self, today: NaiveDate) -> Vec<(Month, Vec<Upcoming<'a>>)> {
        let mut entries = self.upcoming(today);
        entries.sort_by_key(|entry| {
            ((entry.next.month() + 12 - today.month()) % 12, entry.days_left)
        });

        let mut groups = Vec::new();
        for (month, group) in &entries.into_iter().group_by(|entry| entry.next.month()) {
            groups.push((Month::from_u32(month).unwrap(), group.collect()));
        }
        groups
    }

    /// Case-insensitive filter over name, zodiac label, next-occurrence
    /// date and age.
    pub fn search(&self, today: NaiveDate, term: &str) -> Vec<Upcoming<'a>> {
        let needle = term.to_lowercase();
        self.upcoming(today)
            .into_iter()
            .filter(|entry| entry.matches(&needle))
            .collect()
    }
}
