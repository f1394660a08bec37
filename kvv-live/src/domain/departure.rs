//! Departure value type.

use chrono::NaiveDateTime;

/// One scheduled or live-tracked vehicle departure from a stop.
///
/// Constructed by the decode layer (`kvv::convert`) and immutable
/// afterwards. `raw_time` keeps the string exactly as the service sent it
/// (after the `"0"` → `"sofort"` remap) for display purposes;
/// `resolved_time` is the absolute timestamp derived from it. A record
/// whose time string matches none of the known forms never becomes a
/// `Departure` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Line designator, e.g. "S1" or "4".
    pub route: String,

    /// Terminal display name.
    pub destination: String,

    /// Direction as free text.
    pub direction: String,

    /// Original time string, preserved for display.
    pub raw_time: String,

    /// Absolute departure time derived from `raw_time`.
    pub resolved_time: NaiveDateTime,

    /// Whether the vehicle is accessible (low-floor).
    pub low_floor: bool,

    /// True if the time comes from live vehicle tracking, false if it is
    /// the static schedule.
    pub realtime: bool,

    /// Vehicle type.
    pub traction: String,

    /// Platform / stop position.
    pub stop_position: String,
}

impl Departure {
    /// Format one departure-board line.
    ///
    /// Layout: the raw time string (or, with `always_relative`, a
    /// right-aligned `"  N min"` countdown computed against `now`), two
    /// spaces for a live-tracked time vs `"* "` for a scheduled one, a
    /// padding space unless the time reads `"sofort"`, then route and
    /// destination.
    pub fn pretty_format(&self, now: NaiveDateTime, always_relative: bool) -> String {
        let time = if always_relative && self.raw_time != "sofort" {
            let minutes = self.resolved_time.signed_duration_since(now).num_minutes();
            format!("{minutes:>3} min")
        } else {
            self.raw_time.clone()
        };

        let marker = if self.realtime { "  " } else { "* " };
        let pad = if time != "sofort" { " " } else { "" };

        format!("{time}{marker}{pad}{} {}", self.route, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn departure(raw_time: &str, resolved_time: NaiveDateTime, realtime: bool) -> Departure {
        Departure {
            route: "S1".to_string(),
            destination: "Bad Herrenalb".to_string(),
            direction: "2".to_string(),
            raw_time: raw_time.to_string(),
            resolved_time,
            low_floor: true,
            realtime,
            traction: "2".to_string(),
            stop_position: "1".to_string(),
        }
    }

    #[test]
    fn realtime_marker_is_two_spaces() {
        let d = departure("4 min", noon() + Duration::minutes(4), true);
        assert_eq!(d.pretty_format(noon(), false), "4 min   S1 Bad Herrenalb");
    }

    #[test]
    fn scheduled_marker_is_asterisk() {
        let d = departure("14:30", noon() + Duration::minutes(150), false);
        assert_eq!(d.pretty_format(noon(), false), "14:30*  S1 Bad Herrenalb");
    }

    #[test]
    fn sofort_skips_the_padding_space() {
        let d = departure("sofort", noon(), true);
        assert_eq!(d.pretty_format(noon(), false), "sofort  S1 Bad Herrenalb");
    }

    #[test]
    fn relative_formatting_counts_down_minutes() {
        let d = departure("14:30", noon() + Duration::minutes(150), true);
        assert_eq!(
            d.pretty_format(noon(), true),
            "150 min   S1 Bad Herrenalb"
        );
    }

    #[test]
    fn relative_formatting_right_aligns_short_countdowns() {
        let d = departure("4 min", noon() + Duration::minutes(4), true);
        assert_eq!(d.pretty_format(noon(), true), "  4 min   S1 Bad Herrenalb");
    }

    #[test]
    fn relative_formatting_leaves_sofort_alone() {
        let d = departure("sofort", noon(), true);
        assert_eq!(d.pretty_format(noon(), true), "sofort  S1 Bad Herrenalb");
    }
}
