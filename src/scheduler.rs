use std::time::Duration;

use chrono::{DateTime, Datelike, Days, TimeZone, Utc};
use chrono_tz::Tz;

/// Fires once a day at `hour:minute` local time on the allowed weekdays
/// (0 = Monday).
#[derive(Clone, Debug, PartialEq)]
pub struct DailySchedule {
    pub hour: u32,
    pub minute: u32,
    pub timezone: Tz,
    pub days: Vec<u8>,
}

impl DailySchedule {
    /// First run strictly after `now`.
    pub fn next_run(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.with_timezone(&self.timezone).date_naive();

        // a full week plus one day covers every allowed weekday
        (0..=7).find_map(|offset| {
            let date = today.checked_add_days(Days::new(offset))?;
            let weekday = date.weekday().num_days_from_monday() as u8;
            if !self.days.contains(&weekday) {
                return None;
            }
            let local = date.and_hms_opt(self.hour, self.minute, 0)?;
            let run = self
                .timezone
                .from_local_datetime(&local)
                .earliest()?
                .with_timezone(&Utc);
            (run > now).then_some(run)
        })
    }

    /// Time left until the next run, `None` if the schedule never fires.
    pub fn wait_time(&self, now: DateTime<Utc>) -> Option<Duration> {
        let next = self.next_run(now)?;
        Some((next - now).to_std().unwrap_or_default())
    }
}
