use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoError {
    #[error("At least one (start, stop) range is needed")]
    EmptyRanges,

    #[error("(start, stop) ranges must be in numerical order: stop {stop} is not below next start {start}")]
    UnorderedRanges { stop: f64, start: f64 },

    #[error("Only the first range may omit its start and only the last may omit its stop (range #{index})")]
    UnboundedInteriorRange { index: usize },

    #[error("Bin index {index} out of range for histogram with {len} bins")]
    BinIndexOutOfRange { index: usize, len: usize },

    #[error("Can't parse bin range definition: {0}")]
    InvalidRangeSpec(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for lighthisto-core operations.
pub type Result<T> = std::result::Result<T, HistoError>;
