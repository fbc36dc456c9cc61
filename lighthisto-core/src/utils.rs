use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::errors::Result;

/// Path prefix marking reference (measured) data.
pub const REF_PREFIX: &str = "/REF";

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Read a whole (possibly gzip'd) text file into memory.
///
pub fn read_to_string_dynamic(path: &Path) -> Result<String> {
    let mut reader = get_dynamic_reader(path)?;
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

///
/// Read a whole (possibly gzip'd) file into memory without assuming an encoding.
///
pub fn read_bytes_dynamic(path: &Path) -> Result<Vec<u8>> {
    let mut reader = get_dynamic_reader(path)?;
    let mut contents = Vec::new();
    reader.read_to_end(&mut contents)?;
    Ok(contents)
}

///
/// Write text to disk, gzip-compressing it when the path ends in `.gz`.
/// Parent directories are created as needed.
///
/// # Arguments
/// - path: the path to the file to dump to
/// - contents: the full text of the file
pub fn write_dynamic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    match is_gzipped(path) {
        true => {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
            encoder.write_all(contents.as_bytes())?;
            encoder.finish()?.flush()
        }
        false => {
            let mut writer = BufWriter::new(file);
            writer.write_all(contents.as_bytes())?;
            writer.flush()
        }
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Split a full histogram path into its directory and name at the final `/`.
///
/// Trailing slashes are stripped from the directory part unless it consists of
/// slashes only, so `/REF/A/d01` gives `("/REF/A", "d01")` and `/d01` gives `("/", "d01")`.
pub fn split_full_path(full_path: &str) -> (String, String) {
    match full_path.rfind('/') {
        Some(idx) => {
            let head = &full_path[..=idx];
            let trimmed = head.trim_end_matches('/');
            let head = if trimmed.is_empty() { head } else { trimmed };
            (head.to_string(), full_path[idx + 1..].to_string())
        }
        None => (String::new(), full_path.to_string()),
    }
}

///
/// Join a histogram directory and name with a single `/`.
///
pub fn join_path(path: &str, name: &str) -> String {
    if name.starts_with('/') || path.is_empty() {
        name.to_string()
    } else if path.ends_with('/') {
        format!("{}{}", path, name)
    } else {
        format!("{}/{}", path, name)
    }
}

///
/// Is this the path of a reference data histogram?
///
pub fn is_ref_path(path: &str) -> bool {
    path.starts_with(REF_PREFIX)
}

///
/// Format a number in C `%e` style: six digits after the decimal point and a
/// signed exponent of at least two digits, e.g. `1.250000e+01`.
///
pub fn format_sci(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{:.6e}", value);
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };

    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}
