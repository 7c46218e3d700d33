//! Turning departures into board text.
//!
//! A run filters by direction and minimum ETA, optionally merges departures
//! that would show the same countdown, and renders one fixed-width line per
//! departure. "Now" is captured once by the caller and passed in, so every
//! departure in a run is measured against the same instant.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

use crate::domain::{Departure, Direction, human_delta, minutes_until};

/// Default threshold (minutes) above which absolute times are shown.
pub const DEFAULT_LONG_ETA_MINS: i64 = 59;

/// Width of the line/destination label.
const LABEL_WIDTH: usize = 14;

/// Separator between merged line codes.
const LINE_SEPARATOR: &str = ", ";

/// How a departure list should be filtered and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureOptions {
    /// Directions to keep. `None` keeps both and disables grouping.
    pub directions: Option<Vec<Direction>>,

    /// Hide departures sooner than this many minutes from now.
    /// With 0, overdue realtime departures are still shown.
    pub min_eta_mins: i64,

    /// Show clock time instead of a countdown for departures more than this
    /// many minutes away. Zero or negative disables the switch.
    pub long_eta_mins: i64,

    /// Merge departures with identical countdowns into one line.
    /// Only honoured together with an explicit direction filter.
    pub grouped: bool,
}

impl DepartureOptions {
    /// Keep only departures in `direction`.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.directions
            .get_or_insert_with(Vec::new)
            .push(direction);
        self
    }

    /// Set the minimum ETA in minutes.
    pub fn with_min_eta(mut self, mins: i64) -> Self {
        self.min_eta_mins = mins;
        self
    }

    /// Set the long ETA threshold in minutes.
    pub fn with_long_eta(mut self, mins: i64) -> Self {
        self.long_eta_mins = mins;
        self
    }

    /// Enable or disable grouping.
    pub fn with_grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    /// The explicit direction filter, if any.
    fn explicit_directions(&self) -> Option<&[Direction]> {
        self.directions.as_deref().filter(|dirs| !dirs.is_empty())
    }
}

impl Default for DepartureOptions {
    fn default() -> Self {
        Self {
            directions: None,
            min_eta_mins: 0,
            long_eta_mins: DEFAULT_LONG_ETA_MINS,
            grouped: false,
        }
    }
}

/// Filter, group and render departures, one newline-terminated line each.
pub fn format_departure_list(
    departures: impl IntoIterator<Item = Departure>,
    options: &DepartureOptions,
    now: NaiveDateTime,
) -> String {
    let directions = options.explicit_directions().unwrap_or(&Direction::ALL);

    let min_eta = Duration::try_minutes(options.min_eta_mins)
        .and_then(|mins| now.checked_add_signed(mins));

    let deps = departures
        .into_iter()
        .filter(|d| directions.contains(&d.direction))
        .filter(|d| {
            let soon_enough = match min_eta {
                Some(threshold) => d.eta >= threshold,
                // Out of range: everything or nothing is late enough.
                None => options.min_eta_mins < 0,
            };
            soon_enough || (options.min_eta_mins == 0 && d.realtime)
        });

    let deps: Vec<Departure> = if options.grouped && options.explicit_directions().is_some() {
        group_departures(deps, now)
    } else {
        deps.collect()
    };

    let mut out = String::new();
    for dep in &deps {
        out.push_str(&format_departure(dep, options.long_eta_mins, now));
        out.push('\n');
    }
    out
}

/// Merge departures that share a countdown string.
///
/// Buckets keep the order in which they were first seen. A bucket with a
/// single departure passes through unchanged; larger buckets become one
/// departure listing every line, with the first member's ETA and direction.
pub fn group_departures(
    departures: impl IntoIterator<Item = Departure>,
    now: NaiveDateTime,
) -> Vec<Departure> {
    let mut buckets: Vec<Vec<Departure>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for dep in departures {
        let key = human_delta(dep.eta, now);
        match index.get(&key) {
            Some(&i) => buckets[i].push(dep),
            None => {
                index.insert(key, buckets.len());
                buckets.push(vec![dep]);
            }
        }
    }

    buckets.into_iter().filter_map(merge_bucket).collect()
}

fn merge_bucket(mut bucket: Vec<Departure>) -> Option<Departure> {
    if bucket.len() == 1 {
        return bucket.pop();
    }

    let first = bucket.first()?;
    let lines = bucket
        .iter()
        .map(|d| d.line.as_str())
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR);

    Some(Departure::new(lines, "", first.eta, first.direction))
}

/// Render one departure, switching to clock time beyond `long_eta_mins`.
pub fn format_departure(dep: &Departure, long_eta_mins: i64, now: NaiveDateTime) -> String {
    if 0 < long_eta_mins && long_eta_mins < minutes_until(dep.eta, now) {
        format_absolute(dep)
    } else {
        format_relative(dep, now)
    }
}

/// Label followed by a countdown, e.g. `"21 twentyone    7 min"`.
pub fn format_relative(dep: &Departure, now: NaiveDateTime) -> String {
    format!(
        "{:<width$}{:>7}",
        label(dep),
        human_delta(dep.eta, now),
        width = LABEL_WIDTH
    )
}

/// Label followed by the clock time, e.g. `"01 a            11:00"`.
pub fn format_absolute(dep: &Departure) -> String {
    format!(
        "{:<width$}{}",
        label(dep),
        dep.eta.format("%H:%M"),
        width = LABEL_WIDTH + 2
    )
}

/// Line code and destination, cut to the label width.
fn label(dep: &Departure) -> String {
    let mut label = dep.line.clone();
    if !dep.name.is_empty() {
        label.push(' ');
        label.push_str(&dep.name);
    }
    label.chars().take(LABEL_WIDTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ten_o_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    fn inbound(line: &str, name: &str, eta: NaiveDateTime) -> Departure {
        Departure::new(line, name, eta, Direction::Inbound)
    }

    fn lines(output: &str) -> Vec<&str> {
        output.lines().collect()
    }

    #[test]
    fn relative_line_layout() {
        let now = ten_o_clock();
        let dep = inbound("21", "twentyone", now + Duration::minutes(7));
        assert_eq!(format_relative(&dep, now), "21 twentyone    7 min");

        let dep = inbound("21", &"longname".repeat(3), now + Duration::minutes(77));
        assert_eq!(format_relative(&dep, now), "21 longnamelon 77 min");
    }

    #[test]
    fn absolute_line_layout() {
        let dep = inbound("01", "a", ten_o_clock() + Duration::minutes(60));
        assert_eq!(format_absolute(&dep), "01 a            11:00");
    }

    #[test]
    fn empty_name_shows_only_line() {
        let now = ten_o_clock();
        let dep = inbound("20, 21", "", now + Duration::minutes(2));
        assert_eq!(format_relative(&dep, now), "20, 21          2 min");
    }

    #[test]
    fn every_line_is_newline_terminated() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("1", "a", now + Duration::minutes(5)),
            inbound("2", "b", now + Duration::minutes(6)),
        ];
        let out = format_departure_list(deps, &DepartureOptions::default(), now);
        assert!(out.ends_with('\n'));
        assert_eq!(out.matches('\n').count(), 2);
        assert_eq!(
            lines(&out),
            vec!["1 a             5 min", "2 b             6 min"]
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let out = format_departure_list(Vec::new(), &DepartureOptions::default(), ten_o_clock());
        assert_eq!(out, "");
    }

    #[test]
    fn filters_by_direction() {
        let now = ten_o_clock();
        let deps = vec![
            Departure::new("31", "Tonsenhagen", now + Duration::minutes(5), Direction::Inbound),
            Departure::new("31", "Fornebu", now + Duration::minutes(6), Direction::Outbound),
        ];

        let all = format_departure_list(deps.clone(), &DepartureOptions::default(), now);
        assert_eq!(lines(&all).len(), 2);

        let options = DepartureOptions::default().with_direction(Direction::Outbound);
        let out = format_departure_list(deps.clone(), &options, now);
        assert_eq!(lines(&out), vec!["31 Fornebu      6 min"]);

        let options = DepartureOptions::default().with_direction(Direction::Inbound);
        let out = format_departure_list(deps, &options, now);
        assert!(!out.contains("Fornebu"));
    }

    #[test]
    fn zero_min_eta_keeps_overdue_realtime_departures() {
        let now = ten_o_clock();
        let overdue = now - Duration::minutes(1);
        let options = DepartureOptions::default().with_min_eta(0);

        let live = inbound("01", "a", overdue).with_realtime(true);
        assert_eq!(lines(&format_departure_list(vec![live], &options, now)).len(), 1);

        let scheduled = inbound("01", "a", overdue);
        assert_eq!(format_departure_list(vec![scheduled], &options, now), "");
    }

    #[test]
    fn positive_min_eta_hides_near_departures() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("01", "a", now + secs(30)).with_realtime(true),
            inbound("02", "b", now + Duration::minutes(1)),
            inbound("03", "c", now + Duration::minutes(2)),
            inbound("04", "d", now + Duration::minutes(5)),
        ];
        let options = DepartureOptions::default().with_min_eta(2);
        let out = format_departure_list(deps, &options, now);
        assert_eq!(
            lines(&out),
            vec!["03 c            2 min", "04 d            5 min"]
        );
    }

    #[test]
    fn huge_min_eta_hides_everything() {
        let now = ten_o_clock();
        let deps = vec![inbound("01", "a", now + Duration::minutes(5)).with_realtime(true)];
        let options = DepartureOptions::default().with_min_eta(i64::MAX);
        assert_eq!(format_departure_list(deps, &options, now), "");
    }

    #[test]
    fn groups_departures_with_same_countdown() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("01", "Zero", now + secs(1)),
            inbound("10", "Ones", now + secs(59)),
            inbound("11", "Ones", now + secs(59)),
            inbound("12", "Ones", now + secs(59)),
            inbound("20", "Twos", now + secs(121)),
            inbound("21", "Twos", now + secs(121)),
            inbound("21", "Thre", now + secs(181)),
            inbound("21", "Four", now + secs(241)),
        ];
        let options = DepartureOptions::default()
            .with_direction(Direction::Inbound)
            .with_grouped(true);

        let out = format_departure_list(deps, &options, now);
        assert_eq!(
            lines(&out),
            vec![
                "01, 10, 11, 12    naa",
                "20, 21          2 min",
                "21 Thre         3 min",
                "21 Four         4 min",
            ]
        );
    }

    #[test]
    fn grouping_requires_explicit_direction() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("20", "Twos", now + secs(121)),
            inbound("21", "Twos", now + secs(121)),
        ];
        let options = DepartureOptions::default().with_grouped(true);
        let out = format_departure_list(deps, &options, now);
        assert_eq!(lines(&out).len(), 2);
    }

    #[test]
    fn grouping_keeps_overdue_realtime_departures_together() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("01", "a", now - Duration::minutes(1)).with_realtime(true),
            inbound("02", "b", now - Duration::minutes(2)).with_realtime(true),
            inbound("03", "c", now - Duration::minutes(3)).with_realtime(true),
            inbound("51", "d", now + Duration::minutes(1) + secs(1)).with_realtime(true),
        ];
        let options = DepartureOptions::default()
            .with_direction(Direction::Inbound)
            .with_grouped(true);

        let out = format_departure_list(deps, &options, now);
        assert_eq!(
            lines(&out),
            vec!["01, 02, 03        naa", "51 d            1 min"]
        );
    }

    #[test]
    fn merged_departure_takes_first_members_fields() {
        let now = ten_o_clock();
        let first = inbound("20", "Twos", now + secs(125)).with_realtime(true);
        let second = inbound("21", "Other", now + secs(170));

        let grouped = group_departures(vec![first.clone(), second], now);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].line, "20, 21");
        assert_eq!(grouped[0].name, "");
        assert_eq!(grouped[0].eta, first.eta);
        assert_eq!(grouped[0].direction, first.direction);
        assert!(!grouped[0].realtime);
    }

    #[test]
    fn singleton_groups_pass_through_unchanged() {
        let now = ten_o_clock();
        let dep = inbound("21", "Thre", now + secs(181)).with_realtime(true);
        assert_eq!(group_departures(vec![dep.clone()], now), vec![dep]);
    }

    #[test]
    fn buckets_keep_first_occurrence_order() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("a", "", now + Duration::minutes(5)),
            inbound("b", "", now + Duration::minutes(2)),
            inbound("c", "", now + Duration::minutes(5)),
        ];
        let grouped = group_departures(deps, now);
        let codes: Vec<&str> = grouped.iter().map(|d| d.line.as_str()).collect();
        assert_eq!(codes, vec!["a, c", "b"]);
    }

    #[test]
    fn long_etas_show_clock_time() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("01", "a", now + Duration::minutes(60)).with_realtime(true),
            inbound("02", "b", now + Duration::minutes(120)).with_realtime(true),
            inbound("03", "c", now + Duration::minutes(150)),
            inbound("04", "d", now + Duration::minutes(58)),
        ];
        let options = DepartureOptions::default()
            .with_direction(Direction::Inbound)
            .with_long_eta(59);

        let out = format_departure_list(deps, &options, now);
        assert_eq!(
            lines(&out),
            vec![
                "01 a            11:00",
                "02 b            12:00",
                "03 c            12:30",
                "04 d           58 min",
            ]
        );
    }

    #[test]
    fn long_eta_boundary_is_exclusive() {
        let now = ten_o_clock();
        let dep = inbound("01", "a", now + Duration::minutes(59) + secs(30));
        assert_eq!(format_departure(&dep, 59, now), "01 a           59 min");
    }

    #[test]
    fn non_positive_long_eta_disables_clock_time() {
        let now = ten_o_clock();
        let dep = inbound("01", "a", now + Duration::minutes(150));
        assert_eq!(format_departure(&dep, 0, now), "01 a           99 min");
        assert_eq!(format_departure(&dep, -1, now), "01 a           99 min");
    }

    #[test]
    fn grouped_entries_use_clock_time_when_far_away() {
        let now = ten_o_clock();
        let deps = vec![
            inbound("20", "x", now + Duration::minutes(120)),
            inbound("21", "y", now + Duration::minutes(120) + secs(10)),
        ];
        let options = DepartureOptions::default()
            .with_direction(Direction::Inbound)
            .with_grouped(true)
            .with_long_eta(59);
        let out = format_departure_list(deps, &options, now);
        assert_eq!(lines(&out), vec!["20, 21          12:00"]);
    }

    #[test]
    fn default_options() {
        let options = DepartureOptions::default();
        assert_eq!(options.directions, None);
        assert_eq!(options.min_eta_mins, 0);
        assert_eq!(options.long_eta_mins, DEFAULT_LONG_ETA_MINS);
        assert!(!options.grouped);
    }
}
