pub const AIDA_VERSION: &str = "3.3";
pub const AIDA_DTD_URL: &str = "http://aida.freehep.org/schemas/3.3/aida.dtd";
pub const AIDA_IMPLEMENTATION: &str = r#"<implementation version="1.1" package="FreeHEP"/>"#;

pub const AIDA_ROOT_TAG: &str = "aida";
pub const DPS_TAG: &str = "dataPointSet";
pub const DIMENSION_TAG: &str = "dimension";
pub const POINT_TAG: &str = "dataPoint";
pub const MEASUREMENT_TAG: &str = "measurement";

pub const DPS_INDENT: &str = "  ";
pub const POINT_INDENT: &str = "    ";

pub const FLAT_BEGIN_HISTOGRAM: &str = "# BEGIN HISTOGRAM";
pub const FLAT_END_HISTOGRAM: &str = "# END HISTOGRAM";
pub const FLAT_BEGIN_PLOT: &str = "# BEGIN PLOT";
pub const FLAT_END_PLOT: &str = "# END PLOT";

pub const AIDA_PATH_KEY: &str = "AidaPath";
pub const TITLE_KEY: &str = "Title";
pub const X_LABEL_KEY: &str = "XLabel";
pub const Y_LABEL_KEY: &str = "YLabel";

/// Plotting hints attached to reference data: draw as markers with error bars.
pub const REF_HINTS: [(&str, &str); 2] = [("PolyMarker", "*"), ("ErrorBars", "1")];
