use std::path::Path;

use log::{debug, error, warn};

use lighthisto_core::models::{Bin, Histogram};
use lighthisto_core::utils::{format_sci, read_to_string_dynamic, write_dynamic};

use crate::consts::*;
use crate::error::{CodecError, Result};

///
/// Column layout of flat bin rows.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlatMode {
    /// `xlow xhigh yval yerrminus yerrplus`
    #[default]
    Standard,
    /// `xval yval xlow xhigh ylow yhigh`, ready for plotting with error boxes
    Gnuplot,
}

impl FlatMode {
    fn column_header(&self) -> &'static str {
        match self {
            FlatMode::Standard => "## xlow  \txhigh   \tyval    \tyerrminus\tyerrplus",
            FlatMode::Gnuplot => "## xval  \tyval    \txlow    \txhigh    \tylow     \tyhigh",
        }
    }
}

///
/// Get one bin as a tab separated flat row.
///
pub fn bin_to_flat(bin: &Bin, mode: FlatMode) -> String {
    let columns = match mode {
        FlatMode::Standard => vec![
            bin.x_low,
            bin.x_high,
            bin.y_value,
            bin.y_err_minus,
            bin.y_err_plus,
        ],
        FlatMode::Gnuplot => vec![
            bin.center(),
            bin.y_value,
            bin.x_low,
            bin.x_high,
            bin.y_value - bin.y_err_minus,
            bin.y_value + bin.y_err_plus,
        ],
    };

    columns
        .into_iter()
        .map(format_sci)
        .collect::<Vec<_>>()
        .join("\t")
}

/// `Title`, `XLabel` and `YLabel` header lines, empty when unset
fn metadata_lines(histogram: &Histogram) -> String {
    [
        (TITLE_KEY, &histogram.title),
        (X_LABEL_KEY, &histogram.x_label),
        (Y_LABEL_KEY, &histogram.y_label),
    ]
    .into_iter()
    .map(|(key, value)| format!("{}={}\n", key, value.as_deref().unwrap_or("")))
    .collect()
}

///
/// Get a histogram as a `# BEGIN HISTOGRAM` ... `# END HISTOGRAM` block.
///
/// # Arguments
/// - histogram: the histogram to render
/// - mode: column layout of the bin rows
pub fn to_flat(histogram: &Histogram, mode: FlatMode) -> String {
    let full_path = histogram.full_path();

    let mut out = format!("{} {}\n", FLAT_BEGIN_HISTOGRAM, full_path);
    out.push_str(&format!("{}={}\n", AIDA_PATH_KEY, full_path));
    out.push_str(&metadata_lines(histogram));
    if histogram.is_reference() {
        for (key, value) in REF_HINTS {
            out.push_str(&format!("{}={}\n", key, value));
        }
    }

    out.push_str(&format!("## Area: {}\n", format_sci(histogram.area())));
    out.push_str(&format!("## Num bins: {}\n", histogram.num_bins()));
    out.push_str(mode.column_header());
    out.push('\n');

    for bin in histogram.bins().iter() {
        out.push_str(&bin_to_flat(bin, mode));
        out.push('\n');
    }

    out.push_str(FLAT_END_HISTOGRAM);
    out
}

///
/// Get a `# BEGIN PLOT` section carrying the histogram's title and axis labels.
///
pub fn plot_header(histogram: &Histogram) -> String {
    let mut out = format!("{} {}\n", FLAT_BEGIN_PLOT, histogram.full_path());
    out.push_str("LogY=1\n");
    out.push_str(&metadata_lines(histogram));
    out.push_str(FLAT_END_PLOT);
    out
}

///
/// Get many histograms as one flat document, blocks separated by a blank line.
///
pub fn to_flat_document(histograms: &[Histogram], mode: FlatMode) -> String {
    let mut out = histograms
        .iter()
        .map(|h| to_flat(h, mode))
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_bin_row(line: &str) -> Option<Bin> {
    let values = line
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .ok()?;

    match *values.as_slice() {
        [x_low, x_high, y_value, y_err] => Some(Bin::symmetric(x_low, x_high, y_value, y_err)),
        [x_low, x_high, y_value, y_err_minus, y_err_plus] => {
            Some(Bin::new(x_low, x_high, y_value, y_err_plus, y_err_minus))
        }
        _ => None,
    }
}

///
/// Build a histogram from the lines of one flat block.
///
/// Marker and comment lines are skipped, `key=value` lines set metadata, and every other
/// line must be a bin row of four (symmetric error) or five numbers. Malformed rows are
/// logged and skipped. The block must name its histogram with an `AidaPath` header.
pub fn histogram_from_flat<'a, I>(lines: I) -> Result<Histogram>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut block_name: Option<String> = None;
    let mut aida_path: Option<String> = None;
    let mut title = None;
    let mut x_label = None;
    let mut y_label = None;
    let mut bins = Vec::new();

    for line in lines {
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            continue;
        }

        if let Some(name) = line.strip_prefix(FLAT_BEGIN_HISTOGRAM) {
            block_name = Some(name.trim().to_string());
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                AIDA_PATH_KEY => aida_path = non_empty(value.trim()),
                TITLE_KEY => title = non_empty(value),
                X_LABEL_KEY => x_label = non_empty(value),
                Y_LABEL_KEY => y_label = non_empty(value),
                other => debug!("Ignoring flat header '{}'", other),
            }
            continue;
        }

        match parse_bin_row(line) {
            Some(bin) => bins.push(bin),
            None => error!("Unknown line format in '{}'", line),
        }
    }

    let aida_path = aida_path.ok_or_else(|| CodecError::MissingAidaPath {
        block: block_name.unwrap_or_default(),
    })?;

    let mut histogram = Histogram::from_full_path(&aida_path).with_bins(bins);
    histogram.title = title;
    histogram.x_label = x_label;
    histogram.y_label = y_label;

    Ok(histogram)
}

///
/// Read every histogram block of a flat document, in document order.
///
/// `# BEGIN PLOT` sections and anything else outside histogram blocks are ignored. A
/// document without block markers is read as a single bare block when it has an `AidaPath`.
pub fn read_flat_document(text: &str) -> Result<Vec<Histogram>> {
    let mut histograms = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(name) = trimmed.strip_prefix(FLAT_BEGIN_HISTOGRAM) {
            if let Some((open, _)) = current.take() {
                return Err(CodecError::UnterminatedBlock(open));
            }
            current = Some((name.trim().to_string(), vec![line]));
        } else if trimmed.starts_with(FLAT_END_HISTOGRAM) {
            match current.take() {
                Some((_, lines)) => histograms.push(histogram_from_flat(lines)?),
                None => warn!("Ignoring '{}' outside a histogram block", FLAT_END_HISTOGRAM),
            }
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((open, _)) = current.take() {
        return Err(CodecError::UnterminatedBlock(open));
    }

    let has_aida_path = text
        .lines()
        .any(|l| l.trim_start().starts_with(AIDA_PATH_KEY));
    if histograms.is_empty() && has_aida_path {
        debug!("No histogram markers found, reading document as a single block");
        histograms.push(histogram_from_flat(text.lines())?);
    }

    debug!("Read {} histograms from flat document", histograms.len());
    Ok(histograms)
}

///
/// Read all histograms from a flat file on disk (optionally gzip'd).
///
pub fn read_flat_file<P: AsRef<Path>>(path: P) -> Result<Vec<Histogram>> {
    let text = read_to_string_dynamic(path.as_ref())?;
    read_flat_document(&text)
}

pub trait FlatWrite {
    ///
    /// Write histograms to disk in the flat format
    /// (gzip'd when the path ends in `.gz`)
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    /// - mode: column layout of the bin rows
    fn write_flat<T: AsRef<Path>>(&self, path: T, mode: FlatMode) -> std::io::Result<()>;
}

impl FlatWrite for [Histogram] {
    fn write_flat<T: AsRef<Path>>(&self, path: T, mode: FlatMode) -> std::io::Result<()> {
        write_dynamic(path.as_ref(), &to_flat_document(self, mode))
    }
}
