use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lighthisto_core::{BinRanges, KeepRange};

///
/// One `[[bins]]` table: the full path of a histogram and the x-range of bins to keep.
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct BinRangeEntry {
    pub path: String,
    pub start: Option<f64>,
    pub stop: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Default)]
pub struct ChopConfig {
    #[serde(default)]
    pub bins: Vec<BinRangeEntry>,
}

#[derive(Error, Debug)]
pub enum ChopConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ChopConfigResult<T> = std::result::Result<T, ChopConfigError>;

impl ChopConfig {
    ///
    /// Get the configured ranges keyed by histogram path. A path listed twice keeps its
    /// last entry.
    ///
    pub fn into_bin_ranges(self) -> BinRanges {
        let mut bin_ranges = BinRanges::new();
        for entry in self.bins {
            bin_ranges.insert(entry.path, KeepRange::new(entry.start, entry.stop));
        }
        bin_ranges
    }
}

impl TryFrom<&Path> for ChopConfig {
    type Error = ChopConfigError;

    fn try_from(path: &Path) -> ChopConfigResult<Self> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::fs::write;

    #[rstest]
    fn test_try_from_toml() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("ranges.toml");
        write(
            &path,
            r#"
[[bins]]
path = "/ANALYSIS/d01-x01-y01"
start = 0.5
stop = 10.0

[[bins]]
path = "/ANALYSIS/d02-x01-y01"
stop = 3.0
"#,
        )
        .unwrap();

        let config = ChopConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.bins.len(), 2);
        assert_eq!(config.bins[1].start, None);

        let bin_ranges = config.into_bin_ranges();
        assert_eq!(
            bin_ranges.get("/ANALYSIS/d01-x01-y01"),
            Some(&KeepRange::between(0.5, 10.0))
        );
        assert_eq!(
            bin_ranges.get("/ANALYSIS/d02-x01-y01"),
            Some(&KeepRange::up_to(3.0))
        );
    }

    #[rstest]
    fn test_empty_config() {
        let config: ChopConfig = toml::from_str("").unwrap();
        assert!(config.into_bin_ranges().is_empty());
    }

    #[rstest]
    fn test_missing_path_is_an_error() {
        let result: Result<ChopConfig, _> = toml::from_str("[[bins]]\nstart = 1.0\n");
        assert!(result.is_err());
    }

    #[rstest]
    fn test_missing_file() {
        let result = ChopConfig::try_from(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ChopConfigError::Io(_))));
    }
}
