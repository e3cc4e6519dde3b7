//! League-local time helpers
//!
//! Kickoff times and "today" are always expressed in the league's home
//! timezone (Europe/Madrid), independent of where the service runs.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Europe::Madrid;

pub const LEAGUE_TZ: chrono_tz::Tz = Madrid;

/// Split a UTC instant into the league-local calendar date and "HH:MM" kickoff time
pub fn league_local_parts(utc: DateTime<Utc>) -> (NaiveDate, String) {
    let local = utc.with_timezone(&LEAGUE_TZ);
    (local.date_naive(), local.format("%H:%M").to_string())
}

/// The league-local calendar date for a given instant
pub fn league_today(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&LEAGUE_TZ).date_naive()
}
