pub mod bin;
pub mod histogram;

// re-export for cleaner imports
pub use self::bin::Bin;
pub use self::histogram::Histogram;
