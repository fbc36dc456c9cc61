use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::utils::format_sci;

///
/// Bin struct, one x-interval of a histogram with its y-value and
/// asymmetric y-uncertainties
///
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bin {
    pub x_low: f64,
    pub x_high: f64,
    pub y_value: f64,
    pub y_err_plus: f64,
    pub y_err_minus: f64,

    /// Explicit mean x-value, overriding the geometric center.
    pub focus: Option<f64>,
}

impl Bin {
    ///
    /// Create a new bin. The edges are taken as given: callers supply `x_low <= x_high`.
    ///
    pub fn new(x_low: f64, x_high: f64, y_value: f64, y_err_plus: f64, y_err_minus: f64) -> Self {
        Bin {
            x_low,
            x_high,
            y_value,
            y_err_plus,
            y_err_minus,
            focus: None,
        }
    }

    ///
    /// Create a bin whose y-uncertainty is the same in both directions.
    ///
    pub fn symmetric(x_low: f64, x_high: f64, y_value: f64, y_err: f64) -> Self {
        Bin::new(x_low, x_high, y_value, y_err, y_err)
    }

    pub fn with_focus(mut self, focus: f64) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x_low, self.x_high)
    }

    pub fn set_x_range(&mut self, x_low: f64, x_high: f64) -> &mut Self {
        self.x_low = x_low;
        self.x_high = x_high;
        self
    }

    /// Geometric middle of the bin range.
    pub fn center(&self) -> f64 {
        self.x_low + 0.5 * (self.x_high - self.x_low)
    }

    pub fn err_plus_x(&self) -> f64 {
        self.x_high - self.center()
    }

    pub fn err_minus_x(&self) -> f64 {
        self.center() - self.x_low
    }

    ///
    /// Mean x-value of the bin: the explicit focus when one was given,
    /// the geometric center otherwise.
    ///
    pub fn focus(&self) -> f64 {
        self.focus.unwrap_or_else(|| self.center())
    }

    pub fn width(&self) -> f64 {
        self.x_high - self.x_low
    }

    pub fn area(&self) -> f64 {
        self.y_value * self.width()
    }

    /// Mean of the upper and lower y-errors.
    pub fn mean_y_err(&self) -> f64 {
        (self.y_err_plus + self.y_err_minus) / 2.0
    }

    /// Set both y-errors to the same value.
    pub fn set_y_err(&mut self, y_err: f64) -> &mut Self {
        self.y_err_plus = y_err;
        self.y_err_minus = y_err;
        self
    }

    ///
    /// Does `x` fall inside the closed bin interval?
    ///
    pub fn contains(&self, x: f64) -> bool {
        self.x_low <= x && x <= self.x_high
    }

    ///
    /// Sort key of the bin: the sum of its edges.
    ///
    /// This orders non-overlapping bins by position but is not an interval
    /// comparison; overlapping bins sort by their midpoints.
    pub fn sort_key(&self) -> f64 {
        self.x_low + self.x_high
    }

    pub fn compare(&self, other: &Bin) -> Ordering {
        self.sort_key().total_cmp(&other.sort_key())
    }
}

impl Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}: {} +{}-{}",
            format_sci(self.x_low),
            format_sci(self.x_high),
            format_sci(self.y_value),
            format_sci(self.y_err_plus),
            format_sci(self.y_err_minus)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(-3.5, 2.25)]
    #[case(1e3, 1.5e3)]
    fn test_center_and_x_errors(#[case] x_low: f64, #[case] x_high: f64) {
        let bin = Bin::new(x_low, x_high, 1.0, 0.1, 0.2);

        assert_eq!(bin.center(), x_low + 0.5 * (x_high - x_low));
        assert!((bin.err_plus_x() + bin.err_minus_x() - (x_high - x_low)).abs() < 1e-12);
    }

    #[rstest]
    fn test_area_and_mean_error() {
        let bin = Bin::new(2.0, 4.0, 5.0, 1.0, 3.0);

        assert_eq!(bin.area(), 10.0);
        assert_eq!(bin.mean_y_err(), 2.0);
    }

    #[rstest]
    fn test_set_y_err_is_symmetric() {
        let mut bin = Bin::new(0.0, 1.0, 5.0, 1.0, 3.0);
        bin.set_y_err(0.5);

        assert_eq!(bin.y_err_plus, 0.5);
        assert_eq!(bin.y_err_minus, 0.5);
    }

    #[rstest]
    fn test_set_x_range() {
        let mut bin = Bin::symmetric(0.0, 1.0, 5.0, 0.5);
        bin.set_x_range(3.0, 7.0);

        assert_eq!(bin.x_range(), (3.0, 7.0));
        assert_eq!(bin.center(), 5.0);
    }

    #[rstest]
    fn test_focus_defaults_to_center() {
        let bin = Bin::new(0.0, 2.0, 1.0, 0.0, 0.0);
        assert_eq!(bin.focus(), 1.0);
        assert_eq!(bin.with_focus(0.3).focus(), 0.3);
    }

    #[rstest]
    fn test_compare_uses_summed_edges() {
        let narrow = Bin::new(1.0, 2.0, 0.0, 0.0, 0.0);
        let wide = Bin::new(0.0, 3.0, 0.0, 0.0, 0.0);
        let later = Bin::new(2.0, 3.0, 0.0, 0.0, 0.0);

        // same edge sum despite different extents
        assert_eq!(narrow.compare(&wide), Ordering::Equal);
        assert_eq!(narrow.compare(&later), Ordering::Less);
        assert_eq!(later.compare(&wide), Ordering::Greater);
    }

    #[rstest]
    fn test_display() {
        let bin = Bin::new(0.0, 1.0, 10.0, 1.0, 0.5);
        assert_eq!(
            bin.to_string(),
            "0.000000e+00 to 1.000000e+00: 1.000000e+01 +1.000000e+00-5.000000e-01"
        );
    }
}
