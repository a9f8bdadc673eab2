use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike,
};
use now::DateTimeNow;

/// This is the standard way of converting a date to a string in jagaatrack.
pub fn date_to_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns start of the next day.
pub fn next_day_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    let timezone = date.timezone();
    date.date_naive()
        .succ_opt()
        .and_then(|next| {
            timezone
                .from_local_datetime(&next.and_time(NaiveTime::MIN))
                .earliest()
        })
        // Midnight can fall into a DST gap.
        .unwrap_or_else(|| date + Duration::days(1))
}

/// Returns start of the next hour.
pub fn next_hour_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    let timezone = date.timezone();
    let local = date.naive_local();
    let hour_start = local
        .date()
        .and_hms_opt(local.hour(), 0, 0)
        .and_then(|hour| match timezone.from_local_datetime(&hour) {
            LocalResult::Single(v) => Some(v),
            // The hour repeats after a DST fall back, take the occurrence `date` belongs to.
            LocalResult::Ambiguous(earliest, latest) => {
                Some(if latest <= date { latest } else { earliest })
            }
            LocalResult::None => None,
        });
    match hour_start {
        Some(v) => v + Duration::hours(1),
        None => date + Duration::hours(1),
    }
}

/// Returns start of the next minute.
pub fn next_minute_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    date.with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .map(|v| v + Duration::minutes(1))
        .unwrap_or_else(|| date + Duration::minutes(1))
}

/// Local range `[start, end)` covering a calendar day.
pub fn local_day_range(date: NaiveDate) -> (DateTime<Local>, DateTime<Local>) {
    let start = Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    (start, next_day_start(start))
}

/// Start of the day `days` before the day containing `moment`.
pub fn start_of_day_days_ago(moment: DateTime<Local>, days: u32) -> DateTime<Local> {
    (moment - Duration::days(i64::from(days))).beginning_of_day()
}
