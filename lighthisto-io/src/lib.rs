//! # Input/Output for binned histograms.
//!
//! Two interchangeable text representations are supported:
//!
//! - the structured AIDA XML format, a document of `dataPointSet` elements whose
//!   `dataPoint`s carry an x and a y `measurement` with asymmetric errors;
//! - the line-oriented flat format, `# BEGIN HISTOGRAM` ... `# END HISTOGRAM` blocks of
//!   `key=value` headers followed by whitespace separated bin rows.
//!
//! Both directions preserve path, title, axis labels and every bin to `%e` precision.
//!
pub mod aida;
pub mod consts;
pub mod error;
pub mod escape;
pub mod flat;

// re-expose core functions
pub use aida::*;
pub use consts::*;
pub use error::*;
pub use escape::*;
pub use flat::*;
