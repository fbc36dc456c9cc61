//! # lighthisto
//!
//! Binned histograms with asymmetric y-errors, whole-bin range selection ("chopping") and
//! lossless conversion between the AIDA XML and flat text formats.
//!
//! ```
//! use lighthisto::core::{Bin, Histogram, KeepRange};
//! use lighthisto::io::{FlatMode, read_aida_document, to_aida_document, to_flat};
//!
//! let histogram = Histogram::new("/ANALYSIS", "d01-x01-y01").with_bins(vec![
//!     Bin::symmetric(0.0, 1.0, 10.0, 1.0),
//!     Bin::symmetric(1.0, 2.0, 20.0, 1.0),
//!     Bin::symmetric(2.0, 3.0, 5.0, 1.0),
//! ]);
//!
//! let chopped = histogram.chop(&[KeepRange::from_start(1.5)]).unwrap();
//! assert_eq!(chopped.num_bins(), 2);
//!
//! let aida = to_aida_document(&[chopped]);
//! let decoded = read_aida_document(&aida).unwrap();
//! let flat = to_flat(&decoded[0], FlatMode::Standard);
//! assert!(flat.starts_with("# BEGIN HISTOGRAM /ANALYSIS/d01-x01-y01"));
//! ```
#[cfg(feature = "core")]
#[doc(inline)]
pub use lighthisto_core as core;

#[cfg(feature = "io")]
#[doc(inline)]
pub use lighthisto_io as io;
