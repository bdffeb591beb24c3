use chrono::{Months, NaiveDateTime};

/// Remaining time to a target instant, decomposed calendar-month-first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_past: bool,
}

/// Decomposes `target - now` into whole calendar months followed by days,
/// hours, minutes and seconds.
///
/// Months are counted by stepping a cursor one calendar month at a time
/// from `now` for as long as it stays on or before `target`; each step
/// clamps to the end of shorter months. Days, hours and minutes come from
/// the residual left after the month steps. The seconds field tracks the
/// full distance to the target, not the residual.
pub fn breakdown(target: NaiveDateTime, now: NaiveDateTime) -> Breakdown {
    if target <= now {
        return Breakdown {
            is_past: true,
            ..Breakdown::default()
        };
    }

    let total = target.signed_duration_since(now);

    let mut months = 0;
    let mut cursor = now;
    while let Some(next) = cursor.checked_add_months(Months::new(1)) {
        if next > target {
            break;
        }
        cursor = next;
        months += 1;
    }

    let residual = target.signed_duration_since(cursor);

    Breakdown {
        months,
        days: residual.num_days(),
        hours: residual.num_hours() % 24,
        minutes: residual.num_minutes() % 60,
        seconds: total.num_seconds() % 60,
        is_past: false,
    }
}
