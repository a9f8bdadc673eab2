use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationStyle {
    /// `01:02:03`
    Colon,
    /// `1h 2m 3s`
    Units,
}

/// Human readable duration. Sub-second remainders are dropped.
pub fn format_duration(v: Duration, style: DurationStyle) -> String {
    let total_seconds = v.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = total_seconds / 60 % 60;
    let seconds = total_seconds % 60;

    match style {
        DurationStyle::Colon => format!("{hours:02}:{minutes:02}:{seconds:02}"),
        DurationStyle::Units => {
            let parts = [(hours, "h"), (minutes, "m"), (seconds, "s")]
                .into_iter()
                .filter(|(value, _)| *value > 0)
                .map(|(value, label)| format!("{value}{label}"))
                .collect::<Vec<_>>();
            if parts.is_empty() {
                "0s".into()
            } else {
                parts.join(" ")
            }
        }
    }
}

/// Hours with 2 decimals, `1.50` for an hour and a half. Computed from exact milliseconds.
pub fn format_machine_hours(v: Duration) -> String {
    format!("{:.2}", v.num_milliseconds() as f64 / 3_600_000.)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::{format_duration, format_machine_hours, DurationStyle};

    #[test]
    fn colon_style_pads() {
        let v = Duration::hours(1) + Duration::minutes(2) + Duration::seconds(3);
        assert_eq!(format_duration(v, DurationStyle::Colon), "01:02:03");
        assert_eq!(format_duration(Duration::zero(), DurationStyle::Colon), "00:00:00");
        assert_eq!(format_duration(Duration::hours(27), DurationStyle::Colon), "27:00:00");
    }

    #[test]
    fn units_style_skips_zeroes() {
        let v = Duration::hours(2) + Duration::seconds(5);
        assert_eq!(format_duration(v, DurationStyle::Units), "2h 5s");
        assert_eq!(format_duration(Duration::milliseconds(999), DurationStyle::Units), "0s");
    }

    #[test]
    fn machine_hours() {
        assert_eq!(format_machine_hours(Duration::minutes(90)), "1.50");
        assert_eq!(format_machine_hours(Duration::minutes(20)), "0.33");
    }

    #[test]
    fn machine_hours_are_not_rounded_to_minutes() {
        assert_eq!(format_machine_hours(Duration::seconds(30)), "0.01");
        assert_eq!(format_machine_hours(Duration::zero()), "0.00");
    }
}
