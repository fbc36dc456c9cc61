use std::cell::{Cell, Ref, RefCell};
use std::fmt::{self, Display};

use crate::errors::{HistoError, Result};
use crate::models::Bin;
use crate::utils::{is_ref_path, join_path, split_full_path};

///
/// Histogram struct, a named and pathed collection of bins with axis metadata.
///
/// Bins are stored in insertion order and sorted by [`Bin::sort_key`] the first time
/// they are read after a mutation. Every read accessor observes the sorted order.
///
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    pub path: String,
    pub name: String,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,

    bins: RefCell<Vec<Bin>>,
    sorted: Cell<bool>,
}

impl Histogram {
    pub fn new<P: Into<String>, N: Into<String>>(path: P, name: N) -> Self {
        Histogram {
            path: path.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    ///
    /// Create an empty histogram from a full path such as `/REF/ANALYSIS/d01-x01-y01`,
    /// split into directory and name at the final separator.
    ///
    pub fn from_full_path(full_path: &str) -> Self {
        let (path, name) = split_full_path(full_path);
        Histogram::new(path, name)
    }

    pub fn with_title<T: Into<String>>(mut self, title: T) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_labels<X: Into<String>, Y: Into<String>>(mut self, x_label: X, y_label: Y) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    pub fn with_bins(mut self, bins: Vec<Bin>) -> Self {
        self.set_bins(bins);
        self
    }

    ///
    /// A histogram with the same identity and metadata but no bins.
    ///
    pub fn empty_copy(&self) -> Histogram {
        Histogram {
            path: self.path.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            ..Default::default()
        }
    }

    pub fn add_bin(&mut self, bin: Bin) -> &mut Self {
        self.bins.get_mut().push(bin);
        self.sorted.set(false);
        self
    }

    pub fn set_bins(&mut self, bins: Vec<Bin>) -> &mut Self {
        *self.bins.get_mut() = bins;
        self.sorted.set(false);
        self
    }

    ///
    /// Get the bins in ascending order of their edge sums.
    ///
    pub fn bins(&self) -> Ref<'_, [Bin]> {
        self.ensure_sorted();
        Ref::map(self.bins.borrow(), |bins| bins.as_slice())
    }

    ///
    /// Get the `index`-th bin in sorted order.
    ///
    pub fn get_bin(&self, index: usize) -> Result<Bin> {
        let bins = self.bins();
        bins.get(index)
            .copied()
            .ok_or(HistoError::BinIndexOutOfRange {
                index,
                len: bins.len(),
            })
    }

    ///
    /// Consume the histogram, returning its bins in sorted order.
    ///
    pub fn into_bins(self) -> Vec<Bin> {
        self.ensure_sorted();
        self.bins.into_inner()
    }

    fn ensure_sorted(&self) {
        if !self.sorted.get() {
            // no Ref into the bins can outlive the &mut that cleared the flag
            self.bins.borrow_mut().sort_by(Bin::compare);
            self.sorted.set(true);
        }
    }

    pub fn full_path(&self) -> String {
        join_path(&self.path, &self.name)
    }

    pub fn num_bins(&self) -> usize {
        self.bins.borrow().len()
    }

    pub fn len(&self) -> usize {
        self.num_bins()
    }

    pub fn is_empty(&self) -> bool {
        self.num_bins() == 0
    }

    ///
    /// Sum of `y_value * width` over all bins
    ///
    pub fn area(&self) -> f64 {
        self.bins().iter().map(Bin::area).sum()
    }

    ///
    /// Is this reference data, i.e. does its full path start with `/REF`?
    ///
    pub fn is_reference(&self) -> bool {
        is_ref_path(&self.full_path())
    }
}

impl PartialEq for Histogram {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.name == other.name
            && self.title == other.title
            && self.x_label == other.x_label
            && self.y_label == other.y_label
            && *self.bins() == *other.bins()
    }
}

impl Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Histogram '{}' with {} bins",
            self.full_path(),
            self.num_bins()
        )?;
        writeln!(f, "Title: {}", self.title.as_deref().unwrap_or(""))?;
        writeln!(f, "XLabel: {}", self.x_label.as_deref().unwrap_or(""))?;
        write!(f, "YLabel: {}", self.y_label.as_deref().unwrap_or(""))?;
        for bin in self.bins().iter() {
            write!(f, "\n{}", bin)?;
        }
        Ok(())
    }
}
