use log::info;

use crate::errors::{HistoError, Result};
use crate::models::{Bin, Histogram};

///
/// KeepRange struct, one `[start, stop]` x-interval of bins to keep when chopping.
///
/// A missing start on the first range means "from the first bin", a missing stop on the
/// last range means "up to the last bin".
///
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeepRange {
    pub start: Option<f64>,
    pub stop: Option<f64>,
}

impl KeepRange {
    pub fn new(start: Option<f64>, stop: Option<f64>) -> Self {
        KeepRange { start, stop }
    }

    pub fn between(start: f64, stop: f64) -> Self {
        KeepRange::new(Some(start), Some(stop))
    }

    pub fn from_start(start: f64) -> Self {
        KeepRange::new(Some(start), None)
    }

    pub fn up_to(stop: f64) -> Self {
        KeepRange::new(None, Some(stop))
    }

    /// Keep every bin.
    pub fn all() -> Self {
        KeepRange::default()
    }

    ///
    /// Is the whole bin kept under this range?
    ///
    /// Bins are never split: a bin is kept when it lies above the start and below the stop,
    /// or when the start or stop lands inside it.
    pub fn keeps(&self, bin: &Bin) -> bool {
        let low_ok = match self.start {
            None => true,
            Some(start) => start <= bin.x_low || bin.contains(start),
        };
        let high_ok = match self.stop {
            None => true,
            Some(stop) => stop >= bin.x_high || bin.contains(stop),
        };
        low_ok && high_ok
    }
}

impl From<(Option<f64>, Option<f64>)> for KeepRange {
    fn from((start, stop): (Option<f64>, Option<f64>)) -> Self {
        KeepRange::new(start, stop)
    }
}

///
/// Check that keep-ranges are usable for chopping: at least one range, and every
/// stop strictly below the start of the following range.
///
pub fn validate_ranges(ranges: &[KeepRange]) -> Result<()> {
    if ranges.is_empty() {
        return Err(HistoError::EmptyRanges);
    }

    for (index, pair) in ranges.windows(2).enumerate() {
        let stop = pair[0]
            .stop
            .ok_or(HistoError::UnboundedInteriorRange { index })?;
        let start = pair[1]
            .start
            .ok_or(HistoError::UnboundedInteriorRange { index: index + 1 })?;

        // written negated so NaN bounds are rejected too
        if !(stop < start) {
            return Err(HistoError::UnorderedRanges { stop, start });
        }
    }

    Ok(())
}

impl Histogram {
    ///
    /// Return a chopped copy of this histogram, keeping only the bins covered by `ranges`.
    ///
    /// # Arguments
    /// - ranges: ascending, non-overlapping keep-ranges
    ///
    /// # Example
    /// ```
    /// use lighthisto_core::{Bin, Histogram, KeepRange};
    ///
    /// let mut histogram = Histogram::new("/ANALYSIS", "d01-x01-y01");
    /// for i in 0..10 {
    ///     histogram.add_bin(Bin::symmetric(i as f64, i as f64 + 1.0, 1.0, 0.1));
    /// }
    /// let chopped = histogram
    ///     .chop(&[KeepRange::between(2.5, 5.5), KeepRange::from_start(7.5)])
    ///     .unwrap();
    /// assert_eq!(chopped.num_bins(), 7);
    /// ```
    pub fn chop(&self, ranges: &[KeepRange]) -> Result<Histogram> {
        let (chopped, discarded) = self.chop_with_discarded(ranges)?;
        for bin in discarded.iter() {
            info!("Chopping bin {}:{:.6}", self.full_path(), bin.center());
        }
        Ok(chopped)
    }

    ///
    /// Same as [`Histogram::chop`], but also return the discarded bins in ascending
    /// order instead of logging them.
    ///
    pub fn chop_with_discarded(&self, ranges: &[KeepRange]) -> Result<(Histogram, Vec<Bin>)> {
        validate_ranges(ranges)?;

        let mut chopped = self.empty_copy();
        let mut discarded = Vec::new();
        let mut current = 0;

        for bin in self.bins().iter() {
            // move on once the bin starts beyond the current range
            while current + 1 < ranges.len()
                && ranges[current].stop.is_some_and(|stop| bin.x_low > stop)
            {
                current += 1;
            }

            if ranges[current].keeps(bin) {
                chopped.add_bin(*bin);
            } else {
                discarded.push(*bin);
            }
        }

        Ok((chopped, discarded))
    }
}
