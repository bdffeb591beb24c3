use chrono::{Datelike, NaiveDate, Utc};

use crate::calendar::Horizon;
use crate::contact::Contact;

const PRODID: &str = "-//natalis//NONSGML natalis//EN";

fn generate_timestamp() -> String {
    let tstamp = Utc::now();
    format!("{}Z", tstamp.format("%Y%m%dT%H%M%S"))
}

fn push_alarm(out: &mut String, trigger: &str, description: &str) {
    out.push_str("BEGIN:VALARM\n");
    out.push_str("ACTION:DISPLAY\n");
    out.push_str(&format!("DESCRIPTION:{}\n", description));
    out.push_str(&format!("{}\n", trigger));
    out.push_str("END:VALARM\n");
}

/// Builds an iCalendar document with one yearly recurring event per
/// contact, placed on the next future occurrence of its birthday as of
/// `today`. Contacts without a date of birth are left out.
pub fn generate(contacts: &[Contact], today: NaiveDate, horizon: Horizon) -> String {
    let mut out = String::new();
    out.push_str("BEGIN:VCALENDAR\n");
    out.push_str("VERSION:2.0\n");
    out.push_str(&format!("PRODID:{}\n", PRODID));
    out.push_str("CALSCALE:GREGORIAN\n");
    out.push_str("METHOD:PUBLISH\n");

    let dtstamp = generate_timestamp();

    for contact in contacts {
        let dob = match contact.dob {
            Some(dob) => dob,
            None => continue,
        };

        let event_date = contact.next_occurrence(today, horizon);
        let turning = event_date.year() - dob.year();

        out.push_str("BEGIN:VEVENT\n");
        out.push_str(&format!(
            "UID:birthday-{}-{}@natalis\n",
            contact.id,
            event_date.year()
        ));
        out.push_str(&format!("DTSTAMP:{}\n", dtstamp));
        out.push_str(&format!(
            "DTSTART;VALUE=DATE:{}\n",
            event_date.format("%Y%m%d")
        ));
        out.push_str(&format!("SUMMARY:{} turns {}\n", contact.name, turning));
        out.push_str(&format!(
            "DESCRIPTION:Birthday of {}, turning {}\n",
            contact.name, turning
        ));
        out.push_str("RRULE:FREQ=YEARLY;INTERVAL=1\n");
        out.push_str("CATEGORIES:BIRTHDAY\n");
        out.push_str("TRANSP:TRANSPARENT\n");
        out.push_str("CLASS:PUBLIC\n");

        push_alarm(
            &mut out,
            "TRIGGER:-P7D",
            &format!("Reminder: {}'s birthday in one week", contact.name),
        );
        push_alarm(
            &mut out,
            "TRIGGER:-P1D",
            &format!("Reminder: {}'s birthday tomorrow", contact.name),
        );
        push_alarm(
            &mut out,
            "TRIGGER;VALUE=DURATION:PT0S",
            &format!("It is {}'s birthday today", contact.name),
        );

        out.push_str("END:VEVENT\n");
    }

    out.push_str("END:VCALENDAR");
    out
}
