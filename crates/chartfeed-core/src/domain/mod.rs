//! Canonical domain types for chartfeed series data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Point`] | Single time/value observation |
//! | [`Series`] | Ascending, time-unique sequence of points |
//! | [`RangeToken`] | Relative range selector (24H, 1W, 1M, 3M, YTD, ALL) |
//! | [`UtcDateTime`] | UTC instant with epoch and date-only parsing |
//!
//! All types validate their invariants at construction: points are finite,
//! series are strictly ascending with unique timestamps.

mod point;
mod range;
mod timestamp;

pub use point::{Point, Series};
pub use range::RangeToken;
pub use timestamp::UtcDateTime;
