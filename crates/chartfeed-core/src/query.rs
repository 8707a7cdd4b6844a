//! Temporal queries over a canonical [`Series`].
//!
//! The stats panel and range toolbar both reduce to the same two primitives:
//! nearest-at-or-before lookup and percent change between the latest value
//! and a baseline derived from a [`RangeToken`]. Baseline arithmetic lives
//! in one place here so every caller agrees on what "1M" means.

use serde::Serialize;
use time::Duration;

use crate::{Point, RangeToken, Series, UtcDateTime};

/// Value of the last point with `time <= cutoff`, by binary search.
///
/// `None` when the cutoff precedes the whole series (or the series is empty).
pub fn value_at_or_before(series: &Series, cutoff: UtcDateTime) -> Option<f64> {
    let points = series.points();
    let idx = points.partition_point(|point| point.time <= cutoff);
    idx.checked_sub(1).map(|i| points[i].value)
}

/// Percent change from `baseline` to `now`.
///
/// `None` on non-finite input or a zero baseline; division by zero and NaN
/// must never reach a rendering layer.
pub fn percent_change(now: f64, baseline: f64) -> Option<f64> {
    if !now.is_finite() || !baseline.is_finite() || baseline == 0.0 {
        return None;
    }

    let change = (now - baseline) / baseline.abs() * 100.0;
    change.is_finite().then_some(change)
}

/// Baseline instant for a range token relative to `now`.
///
/// `None` means unbounded: `ALL` is anchored at the series' own first
/// timestamp, which only the caller holding the series can resolve.
pub fn baseline_time(range: RangeToken, now: UtcDateTime) -> Option<UtcDateTime> {
    match range {
        RangeToken::Day => Some(now.floor_to_hour() - Duration::hours(24)),
        RangeToken::Week => Some(now.floor_to_day() - Duration::days(7)),
        RangeToken::Month => Some(now.floor_to_day() - Duration::days(30)),
        RangeToken::Quarter => Some(now.floor_to_day() - Duration::days(90)),
        RangeToken::YearToDate => Some(now.year_start()),
        RangeToken::All => None,
    }
}

/// Baseline value for a range, anchored at the series' last timestamp.
///
/// When the computed baseline precedes the series entirely, the first value
/// is used instead, so long ranges over a short series still resolve.
pub fn baseline_value(series: &Series, range: RangeToken) -> Option<f64> {
    let last = series.last()?;
    let first = series.first()?;

    match baseline_time(range, last.time) {
        Some(cutoff) => Some(value_at_or_before(series, cutoff).unwrap_or(first.value)),
        None => Some(first.value),
    }
}

/// Percent change between the series' latest value and the range baseline.
pub fn change_over_range(series: &Series, range: RangeToken) -> Option<f64> {
    let now = series.last()?.value;
    let baseline = baseline_value(series, range)?;
    percent_change(now, baseline)
}

/// Subsequence of points within the range, anchored at the last timestamp.
///
/// `ALL` returns a content-equal copy of the input.
pub fn filter_by_range(series: &Series, range: RangeToken) -> Series {
    let Some(last) = series.last() else {
        return Series::empty();
    };

    match baseline_time(range, last.time) {
        Some(cutoff) => {
            let points: Vec<Point> = series
                .iter()
                .filter(|point| point.time >= cutoff)
                .copied()
                .collect();
            Series::from_unordered(points)
        }
        None => series.clone(),
    }
}

/// Percent change for one range token, `None` when unresolvable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeChange {
    pub range: RangeToken,
    pub percent: Option<f64>,
}

/// Per-range percent changes, the payload behind a stats panel.
pub fn change_summary(series: &Series) -> Vec<RangeChange> {
    RangeToken::ALL_TOKENS
        .iter()
        .map(|&range| RangeChange {
            range,
            percent: change_over_range(series, range),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(input: &str) -> UtcDateTime {
        UtcDateTime::parse(input).expect("test timestamp")
    }

    fn series(rows: &[(&str, f64)]) -> Series {
        Series::from_unordered(
            rows.iter()
                .map(|&(date, value)| Point::new(ts(date), value).expect("finite"))
                .collect(),
        )
    }

    #[test]
    fn lookup_before_series_start_is_absent() {
        let s = series(&[("2024-01-10", 1.0), ("2024-01-20", 2.0)]);
        assert_eq!(value_at_or_before(&s, ts("2024-01-01")), None);
    }

    #[test]
    fn lookup_at_last_time_returns_last_value() {
        let s = series(&[("2024-01-10", 1.0), ("2024-01-20", 2.0)]);
        assert_eq!(value_at_or_before(&s, ts("2024-01-20")), Some(2.0));
    }

    #[test]
    fn lookup_between_points_returns_nearest_prior() {
        let s = series(&[("2024-01-10", 1.0), ("2024-01-20", 2.0)]);
        assert_eq!(value_at_or_before(&s, ts("2024-01-15")), Some(1.0));
    }

    #[test]
    fn percent_change_arithmetic() {
        assert_eq!(percent_change(110.0, 100.0), Some(10.0));
        assert_eq!(percent_change(90.0, 100.0), Some(-10.0));
    }

    #[test]
    fn percent_change_guards_zero_and_non_finite() {
        assert_eq!(percent_change(42.0, 0.0), None);
        assert_eq!(percent_change(f64::NAN, 100.0), None);
        assert_eq!(percent_change(1.0, f64::INFINITY), None);
    }

    #[test]
    fn percent_change_with_negative_baseline() {
        // (-90 - -100) / |-100| * 100 = +10
        assert_eq!(percent_change(-90.0, -100.0), Some(10.0));
    }

    #[test]
    fn baseline_times_per_token() {
        let now = ts("2024-03-15T13:42:09Z");

        assert_eq!(
            baseline_time(RangeToken::Day, now),
            Some(ts("2024-03-14T13:00:00Z"))
        );
        assert_eq!(
            baseline_time(RangeToken::Week, now),
            Some(ts("2024-03-08T00:00:00Z"))
        );
        assert_eq!(
            baseline_time(RangeToken::Month, now),
            Some(ts("2024-02-14T00:00:00Z"))
        );
        assert_eq!(
            baseline_time(RangeToken::Quarter, now),
            Some(ts("2023-12-16T00:00:00Z"))
        );
        assert_eq!(
            baseline_time(RangeToken::YearToDate, now),
            Some(ts("2024-01-01T00:00:00Z"))
        );
        assert_eq!(baseline_time(RangeToken::All, now), None);
    }

    #[test]
    fn one_week_change_uses_nearest_prior_baseline() {
        // Baseline 2024-01-24 has no exact point; nearest prior is 110.
        let s = series(&[
            ("2024-01-01", 100.0),
            ("2024-01-08", 110.0),
            ("2024-01-31", 90.0),
        ]);

        assert_eq!(baseline_value(&s, RangeToken::Week), Some(110.0));

        let change = change_over_range(&s, RangeToken::Week).expect("resolvable");
        assert!((change - (90.0 - 110.0) / 110.0 * 100.0).abs() < 1e-9);
        assert!((change + 18.18).abs() < 0.01);
    }

    #[test]
    fn baseline_before_series_falls_back_to_first_value() {
        let s = series(&[("2024-01-30", 100.0), ("2024-01-31", 90.0)]);

        // 3M baseline long precedes the series; fall back to the first point.
        assert_eq!(baseline_value(&s, RangeToken::Quarter), Some(100.0));
        assert_eq!(change_over_range(&s, RangeToken::Quarter), Some(-10.0));
    }

    #[test]
    fn all_range_filter_returns_everything() {
        let s = series(&[("2024-01-01", 1.0), ("2024-03-01", 2.0)]);
        assert_eq!(filter_by_range(&s, RangeToken::All), s);
    }

    #[test]
    fn week_filter_keeps_points_at_or_after_baseline() {
        let s = series(&[
            ("2024-01-01", 100.0),
            ("2024-01-24", 105.0),
            ("2024-01-28", 110.0),
            ("2024-01-31", 90.0),
        ]);

        let filtered = filter_by_range(&s, RangeToken::Week);
        let values: Vec<f64> = filtered.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![105.0, 110.0, 90.0]);
    }

    #[test]
    fn queries_on_empty_series_are_absent_not_panics() {
        let s = Series::empty();

        assert_eq!(value_at_or_before(&s, ts("2024-01-01")), None);
        assert_eq!(baseline_value(&s, RangeToken::All), None);
        assert_eq!(change_over_range(&s, RangeToken::Month), None);
        assert!(filter_by_range(&s, RangeToken::Week).is_empty());
        assert!(change_summary(&s).iter().all(|c| c.percent.is_none()));
    }

    #[test]
    fn change_summary_covers_every_token() {
        let s = series(&[("2024-01-01", 100.0), ("2024-01-31", 110.0)]);
        let summary = change_summary(&s);

        assert_eq!(summary.len(), RangeToken::ALL_TOKENS.len());
        let all = summary
            .iter()
            .find(|c| c.range == RangeToken::All)
            .expect("ALL entry present");
        assert_eq!(all.percent, Some(10.0));
    }
}
