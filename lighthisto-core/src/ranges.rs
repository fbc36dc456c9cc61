use std::collections::BTreeMap;
use std::str::FromStr;

use log::debug;

use crate::chop::KeepRange;
use crate::errors::{HistoError, Result};
use crate::models::Histogram;

///
/// RangeSpec struct, a bin range definition of the form `PATH:start:stop`,
/// where an empty start or stop means "no bound".
///
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSpec {
    pub path: String,
    pub range: KeepRange,
}

fn parse_bound(bound: &str, spec: &str) -> Result<Option<f64>> {
    let bound = bound.trim();
    if bound.is_empty() {
        return Ok(None);
    }
    bound.parse::<f64>().map(Some).map_err(|_| {
        HistoError::InvalidRangeSpec(format!("'{}' is not a number in `{}`", bound, spec))
    })
}

impl FromStr for RangeSpec {
    type Err = HistoError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [path, start, stop] = parts.as_slice() else {
            return Err(HistoError::InvalidRangeSpec(format!(
                "expected `PATH:start:stop`, got `{}`",
                s
            )));
        };

        if path.is_empty() {
            return Err(HistoError::InvalidRangeSpec(format!(
                "missing histogram path in `{}`",
                s
            )));
        }

        Ok(RangeSpec {
            path: path.to_string(),
            range: KeepRange::new(parse_bound(start, s)?, parse_bound(stop, s)?),
        })
    }
}

///
/// BinRanges struct, maps full histogram paths to the range of bins to keep.
/// Histograms without an entry pass through unchanged.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinRanges {
    ranges: BTreeMap<String, KeepRange>,
}

impl BinRanges {
    pub fn new() -> Self {
        BinRanges::default()
    }

    ///
    /// Set the keep-range for a histogram, replacing any earlier definition.
    ///
    pub fn insert<P: Into<String>>(&mut self, path: P, range: KeepRange) -> Option<KeepRange> {
        self.ranges.insert(path.into(), range)
    }

    pub fn insert_spec(&mut self, spec: RangeSpec) -> Option<KeepRange> {
        self.insert(spec.path, spec.range)
    }

    pub fn get(&self, full_path: &str) -> Option<&KeepRange> {
        self.ranges.get(full_path)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &KeepRange)> {
        self.ranges.iter()
    }

    ///
    /// Chop one histogram if it has an entry, pass it through otherwise.
    ///
    pub fn chop_one(&self, histogram: Histogram) -> Result<Histogram> {
        match self.ranges.get(&histogram.full_path()) {
            Some(range) => histogram.chop(std::slice::from_ref(range)),
            None => {
                debug!("No bin range for {}, keeping all bins", histogram.full_path());
                Ok(histogram)
            }
        }
    }

    ///
    /// Chop every histogram that has an entry.
    ///
    pub fn apply(&self, histograms: Vec<Histogram>) -> Result<Vec<Histogram>> {
        histograms
            .into_iter()
            .map(|histogram| self.chop_one(histogram))
            .collect()
    }
}

impl FromIterator<RangeSpec> for BinRanges {
    fn from_iter<T: IntoIterator<Item = RangeSpec>>(iter: T) -> Self {
        let mut bin_ranges = BinRanges::new();
        for spec in iter {
            bin_ranges.insert_spec(spec);
        }
        bin_ranges
    }
}

impl Extend<RangeSpec> for BinRanges {
    fn extend<T: IntoIterator<Item = RangeSpec>>(&mut self, iter: T) {
        for spec in iter {
            self.insert_spec(spec);
        }
    }
}
