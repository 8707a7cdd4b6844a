use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// Canonical time/value observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: UtcDateTime,
    pub value: f64,
}

impl Point {
    pub fn new(time: UtcDateTime, value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "value" });
        }
        Ok(Self { time, value })
    }
}

/// Ordered sequence of [`Point`]s, strictly ascending and unique by time.
///
/// The invariant is enforced at construction: [`Series::from_unordered`]
/// sorts its input and collapses duplicate timestamps, keeping the point
/// that appeared last in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Point>);

impl Series {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a series from points in arbitrary order.
    ///
    /// Duplicate timestamps resolve to the later occurrence in the input,
    /// matching overwrite-on-refetch semantics.
    pub fn from_unordered(mut points: Vec<Point>) -> Self {
        // Stable sort keeps input order among equal timestamps, so the
        // last occurrence survives the backward dedup below.
        points.sort_by_key(|point| point.time);

        let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.time == point.time => *last = point,
                _ => deduped.push(point),
            }
        }

        Self(deduped)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
