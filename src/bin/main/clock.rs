//! Host wall clock as a [`ClockSource`].

use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use bootcon_core::status::{CalendarTime, ClockSource};

pub struct SystemClock;

impl ClockSource for SystemClock {
    type Error = SystemTimeError;

    fn now(&mut self) -> Result<CalendarTime, Self::Error> {
        let unix = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        Ok(calendar_from_unix(unix))
    }
}

fn calendar_from_unix(unix: u64) -> CalendarTime {
    let secs_of_day = unix % 86_400;
    let (year, month, day) = civil_from_days((unix / 86_400) as i64);
    CalendarTime {
        year: year as u16,
        month,
        day,
        hour: (secs_of_day / 3_600) as u8,
        minute: (secs_of_day / 60 % 60) as u8,
        second: (secs_of_day % 60) as u8,
    }
}

// Howard Hinnant's civil-from-days algorithm, proleptic Gregorian.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    (year + i64::from(month <= 2), month, day)
}
