//! # Core data model for binned histograms.
//!
//! A [`Histogram`](models::Histogram) is an ordered collection of [`Bin`](models::Bin)s, each an
//! x-interval carrying a y-value with independent upper and lower uncertainties. Bins are
//! always observed in ascending order of their summed edges, regardless of insertion order.
//!
//! The [`chop`] module selects whole bins covered by a list of keep-ranges, and [`ranges`]
//! maps histogram paths to the range each one should be chopped to.
//!
pub mod chop;
pub mod errors;
pub mod models;
pub mod ranges;
pub mod utils;

// re-export for cleaner imports
pub use chop::*;
pub use errors::*;
pub use models::{Bin, Histogram};
pub use ranges::*;
