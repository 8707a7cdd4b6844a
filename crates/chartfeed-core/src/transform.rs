//! Derived-series construction for composite chart datasets.
//!
//! These mirror the dataset-building steps of the original pipeline:
//! cumulating per-day buybacks, computing market cap from price and a fixed
//! circulating supply, and dividing one series by another to get a
//! percent-of-mcap-bought curve.

use crate::query::value_at_or_before;
use crate::{Point, Series};

/// Running sum of the series.
///
/// A series that is already monotone non-decreasing is assumed to be
/// cumulative and is returned as-is, so applying this twice is harmless.
pub fn cumulative(series: &Series) -> Series {
    let already_cumulative = series
        .points()
        .windows(2)
        .all(|pair| pair[0].value <= pair[1].value);
    if already_cumulative {
        return series.clone();
    }

    let mut total = 0.0;
    let points = series
        .iter()
        .filter_map(|point| {
            total += point.value;
            Point::new(point.time, total).ok()
        })
        .collect();

    Series::from_unordered(points)
}

/// Multiply every value by a constant factor, e.g. price times circulating
/// supply to approximate market cap. Non-finite products are dropped.
pub fn scale(series: &Series, factor: f64) -> Series {
    let points = series
        .iter()
        .filter_map(|point| Point::new(point.time, point.value * factor).ok())
        .collect();

    Series::from_unordered(points)
}

/// Pointwise quotient of two series, aligned on the numerator's timestamps.
///
/// The denominator is sampled at-or-before each numerator timestamp, which
/// carries sparse denominators forward. Points with no denominator, a zero
/// denominator, or a non-finite quotient are dropped.
pub fn ratio(numerator: &Series, denominator: &Series) -> Series {
    let points = numerator
        .iter()
        .filter_map(|point| {
            let den = value_at_or_before(denominator, point.time)?;
            if den == 0.0 {
                return None;
            }
            Point::new(point.time, point.value / den).ok()
        })
        .collect();

    Series::from_unordered(points)
}
