//! Display labels in the site's single locale (US English).

use std::fmt;

use serde::Serialize;

use crate::classify::reference_frame;
use crate::instant::NormalizedInstant;

/// `Mon, Mar 10, 2025`
pub fn date_label(instant: &NormalizedInstant) -> String {
    instant.local().format("%a, %b %-d, %Y").to_string()
}

/// `6:30 PM`
pub fn time_label(instant: &NormalizedInstant) -> String {
    instant.local().format("%-I:%M %p").to_string()
}

/// Calendar-day distance as a phrase: `Today`, `Tomorrow`, `in 3 days`, ...
///
/// Dates are compared the same way day-granularity classification compares
/// them, so a class labelled `Today` is always in the today bucket.
pub fn relative_day_label(
    instant: &NormalizedInstant,
    reference_now: &NormalizedInstant,
) -> String {
    let days = (instant.local_date() - reference_now.local_date()).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        n if n > 1 => format!("in {} days", n),
        n => format!("{} days ago", -n),
    }
}

/// Whole time remaining until an instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl Countdown {
    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
        } else if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

/// Time until `instant`, rounded down to the minute and zero once started.
pub fn countdown(instant: &NormalizedInstant, reference_now: &NormalizedInstant) -> Countdown {
    let frame = reference_frame(reference_now);
    let remaining = instant.to_utc(frame) - reference_now.to_utc(frame);
    let total_minutes = remaining.num_minutes().max(0);

    Countdown {
        days: total_minutes / (24 * 60),
        hours: (total_minutes / 60) % 24,
        minutes: total_minutes % 60,
    }
}
