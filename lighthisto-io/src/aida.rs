use std::path::Path;

use log::debug;
use roxmltree::{Document, Node, ParsingOptions};

use lighthisto_core::models::{Bin, Histogram};
use lighthisto_core::utils::{format_sci, read_bytes_dynamic, write_dynamic};

use crate::consts::*;
use crate::error::{CodecError, Result};
use crate::escape::{escape, resolve_named_entities};

/// One `<measurement>`: a central value with upper and lower errors.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Measurement {
    value: f64,
    error_plus: f64,
    error_minus: f64,
}

fn parsing_options() -> ParsingOptions {
    // the DOCTYPE points at an external DTD which is never fetched
    ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or(CodecError::MissingAttribute { element, attribute })
}

fn numeric_attribute(node: Node, attribute: &'static str) -> Result<f64> {
    let raw = required_attribute(node, MEASUREMENT_TAG, attribute)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CodecError::InvalidNumber {
            context: format!("<{} {}>", MEASUREMENT_TAG, attribute),
            value: raw.to_string(),
        })
}

fn read_measurement(node: Node) -> Result<Measurement> {
    Ok(Measurement {
        value: numeric_attribute(node, "value")?,
        error_plus: numeric_attribute(node, "errorPlus")?,
        error_minus: numeric_attribute(node, "errorMinus")?,
    })
}

///
/// Build a bin from a `<dataPoint>`: the x measurement is a center with asymmetric
/// half-widths, the y measurement is the value with its errors.
///
fn bin_from_point(point: Node, index: usize, full_path: &str) -> Result<Bin> {
    let measurements: Vec<Node> = point
        .children()
        .filter(|n| n.has_tag_name(MEASUREMENT_TAG))
        .collect();

    let [x, y] = measurements.as_slice() else {
        return Err(CodecError::UnexpectedShape(format!(
            "data point {} of {} has {} measurements, expected 2",
            index,
            full_path,
            measurements.len()
        )));
    };

    let x = read_measurement(*x)?;
    let y = read_measurement(*y)?;

    Ok(Bin::new(
        x.value - x.error_minus,
        x.value + x.error_plus,
        y.value,
        y.error_plus,
        y.error_minus,
    ))
}

///
/// Build a histogram from a `<dataPointSet>` element.
///
/// `name` and `path` are mandatory. Axis labels come from the two `<dimension>`
/// elements; a point set without any `<dimension>` has no labels.
pub fn histogram_from_dps(dps: Node) -> Result<Histogram> {
    if !dps.has_tag_name(DPS_TAG) {
        return Err(CodecError::UnexpectedShape(format!(
            "expected <{}>, found <{}>",
            DPS_TAG,
            dps.tag_name().name()
        )));
    }

    let name = required_attribute(dps, DPS_TAG, "name")?;
    let path = required_attribute(dps, DPS_TAG, "path")?;

    let mut histogram = Histogram::new(path, name);
    histogram.title = non_empty(dps.attribute("title"));
    let full_path = histogram.full_path();

    let dimensions: Vec<Node> = dps
        .children()
        .filter(|n| n.has_tag_name(DIMENSION_TAG))
        .collect();

    match dimensions.len() {
        0 => debug!("{} has no axis labels", full_path),
        2 => {
            for dimension in dimensions {
                let label = non_empty(dimension.attribute("title"));
                match dimension.attribute("dim") {
                    Some("0") => histogram.x_label = label,
                    Some("1") => histogram.y_label = label,
                    other => {
                        return Err(CodecError::UnexpectedShape(format!(
                            "{} has a <dimension> with index {:?}, expected 0 or 1",
                            full_path, other
                        )));
                    }
                }
            }
        }
        n => {
            return Err(CodecError::UnexpectedShape(format!(
                "{} has {} <dimension> elements, expected 2",
                full_path, n
            )));
        }
    }

    for (index, point) in dps
        .children()
        .filter(|n| n.has_tag_name(POINT_TAG))
        .enumerate()
    {
        histogram.add_bin(bin_from_point(point, index, &full_path)?);
    }

    Ok(histogram)
}

///
/// Read every histogram of an AIDA document, in document order.
///
pub fn read_aida_document(text: &str) -> Result<Vec<Histogram>> {
    let text = resolve_named_entities(text);
    let doc = Document::parse_with_options(&text, parsing_options())?;

    let root = doc.root_element();
    if !root.has_tag_name(AIDA_ROOT_TAG) {
        return Err(CodecError::UnexpectedShape(format!(
            "root element is <{}>, expected <{}>",
            root.tag_name().name(),
            AIDA_ROOT_TAG
        )));
    }

    let histograms = root
        .children()
        .filter(|n| n.has_tag_name(DPS_TAG))
        .map(histogram_from_dps)
        .collect::<Result<Vec<_>>>()?;

    debug!("Read {} histograms from AIDA document", histograms.len());
    Ok(histograms)
}

///
/// Read a single `<dataPointSet>` element given on its own, outside an `<aida>` document.
///
pub fn read_aida_point_set(text: &str) -> Result<Histogram> {
    let text = resolve_named_entities(text);
    let doc = Document::parse_with_options(&text, parsing_options())?;
    histogram_from_dps(doc.root_element())
}

///
/// Read all histograms from an AIDA file on disk (optionally gzip'd).
///
pub fn read_aida_file<P: AsRef<Path>>(path: P) -> Result<Vec<Histogram>> {
    let bytes = read_bytes_dynamic(path.as_ref())?;
    read_aida_document(&decode_document(bytes)?)
}

fn declares_latin1(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"<?xml") {
        return false;
    }
    let end = bytes
        .windows(2)
        .position(|w| w == b"?>")
        .unwrap_or(bytes.len());
    let declaration = String::from_utf8_lossy(&bytes[..end]).to_ascii_lowercase();
    ["iso-8859-1", "iso8859-1", "latin-1", "latin1"]
        .iter()
        .any(|name| declaration.contains(name))
}

///
/// Decode the raw bytes of an AIDA document.
///
/// UTF-8 (which covers the pure-ASCII documents written here) is taken as is.
/// Otherwise the XML declaration must name ISO-8859-1, and every byte maps to
/// the char with the same code point.
fn decode_document(bytes: Vec<u8>) -> Result<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            let bytes = err.into_bytes();
            if !declares_latin1(&bytes) {
                return Err(CodecError::InvalidEncoding);
            }
            debug!("Decoding AIDA document as ISO-8859-1");
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
    }
}

fn measurement_line(value: f64, error_plus: f64, error_minus: f64) -> String {
    format!(
        "{}  <{} errorPlus=\"{}\" value=\"{}\" errorMinus=\"{}\"/>\n",
        POINT_INDENT,
        MEASUREMENT_TAG,
        format_sci(error_plus),
        format_sci(value),
        format_sci(error_minus)
    )
}

fn annotation_item(key: &str, value: &str) -> String {
    format!(
        "{}    <item key=\"{}\" value=\"{}\" sticky=\"true\"/>\n",
        DPS_INDENT, key, value
    )
}

///
/// Get one bin as an AIDA `<dataPoint>`.
///
pub fn bin_to_aida(bin: &Bin) -> String {
    let mut out = format!("{}<{}>\n", POINT_INDENT, POINT_TAG);
    out.push_str(&measurement_line(bin.center(), bin.err_plus_x(), bin.err_minus_x()));
    out.push_str(&measurement_line(bin.y_value, bin.y_err_plus, bin.y_err_minus));
    out.push_str(&format!("{}</{}>\n", POINT_INDENT, POINT_TAG));
    out
}

///
/// Get a histogram as an AIDA `<dataPointSet>` element.
///
/// Free text is escaped to plain ASCII. Reference histograms carry extra
/// annotation items asking for markers with error bars.
pub fn to_aida(histogram: &Histogram) -> String {
    let ind = DPS_INDENT;
    let full_path = histogram.full_path();
    let title = escape(histogram.title.as_deref().unwrap_or(""));

    let mut out = format!(
        "{}<{} name=\"{}\" dimension=\"2\"\n",
        ind,
        DPS_TAG,
        escape(&histogram.name)
    );
    out.push_str(&format!(
        "{}    path=\"{}\" title=\"{}\">\n",
        ind,
        escape(&histogram.path),
        title
    ));

    for (dim, label) in [(0, &histogram.x_label), (1, &histogram.y_label)] {
        out.push_str(&format!(
            "{}  <{} dim=\"{}\" title=\"{}\"/>\n",
            ind,
            DIMENSION_TAG,
            dim,
            escape(label.as_deref().unwrap_or(""))
        ));
    }

    out.push_str(&format!("{}  <annotation>\n", ind));
    out.push_str(&annotation_item(TITLE_KEY, &title));
    out.push_str(&annotation_item(AIDA_PATH_KEY, &escape(&full_path)));
    if histogram.is_reference() {
        for (key, value) in REF_HINTS {
            out.push_str(&annotation_item(key, value));
        }
    }
    out.push_str(&format!("{}  </annotation>\n", ind));

    for bin in histogram.bins().iter() {
        out.push_str(&bin_to_aida(bin));
    }
    out.push_str(&format!("{}</{}>\n", ind, DPS_TAG));
    out
}

///
/// Get a complete AIDA document holding `histograms`, sorted by full path.
///
pub fn to_aida_document(histograms: &[Histogram]) -> String {
    let mut sorted: Vec<&Histogram> = histograms.iter().collect();
    sorted.sort_by_cached_key(|h| h.full_path());

    let blocks: Vec<String> = sorted.into_iter().map(to_aida).collect();

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"ISO-8859-1\" ?>\n");
    out.push_str(&format!(
        "<!DOCTYPE {} SYSTEM \"{}\">\n",
        AIDA_ROOT_TAG, AIDA_DTD_URL
    ));
    out.push_str(&format!(
        "<{} version=\"{}\">\n",
        AIDA_ROOT_TAG, AIDA_VERSION
    ));
    out.push_str(&format!("{}{}\n", DPS_INDENT, AIDA_IMPLEMENTATION));
    out.push_str(&blocks.join("\n"));
    out.push_str(&format!("</{}>\n", AIDA_ROOT_TAG));
    out
}

pub trait AidaWrite {
    ///
    /// Write histograms to disk as an AIDA document
    /// (gzip'd when the path ends in `.gz`)
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_aida<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()>;
}

impl AidaWrite for [Histogram] {
    fn write_aida<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        write_dynamic(path.as_ref(), &to_aida_document(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn get_test_path(file_name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../tests/data/histo")
            .join(file_name)
    }

    fn assert_close(a: f64, b: f64) {
        let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
        assert!((a - b).abs() <= 1e-6 * scale, "{} != {}", a, b);
    }

    fn assert_same_bins(left: &Histogram, right: &Histogram) {
        assert_eq!(left.num_bins(), right.num_bins());
        for (l, r) in left.bins().iter().zip(right.bins().iter()) {
            assert_close(l.x_low, r.x_low);
            assert_close(l.x_high, r.x_high);
            assert_close(l.y_value, r.y_value);
            assert_close(l.y_err_plus, r.y_err_plus);
            assert_close(l.y_err_minus, r.y_err_minus);
        }
    }

    #[fixture]
    fn jets() -> Histogram {
        Histogram::new("/MC_JETS", "jet_pt")
            .with_title("Jet p_T & \u{3b7} < 2.5")
            .with_labels("$p_T$ [GeV]", "d\u{3c3}/dp_T")
            .with_bins(vec![
                Bin::new(20.0, 30.0, 1.5e3, 12.5, 11.0),
                Bin::new(10.0, 20.0, 3.14159e3, 20.0, 25.0),
                Bin::new(30.0, 50.0, 0.0375, 0.001, 0.002),
            ])
    }

    #[rstest]
    fn test_read_document() {
        let histograms = read_aida_file(get_test_path("reference.aida")).unwrap();

        assert_eq!(histograms.len(), 2);

        let first = &histograms[0];
        assert_eq!(first.full_path(), "/REF/TEST_2011_S1234/d01-x01-y01");
        assert_eq!(first.title.as_deref(), Some("Charged multiplicity, \u{221a}s = 7 TeV"));
        assert_eq!(first.x_label.as_deref(), Some("$N_\\text{ch}$"));
        assert_eq!(first.y_label.as_deref(), Some("$1/\\sigma \\, d\\sigma/dN_\\text{ch}$"));
        assert_eq!(first.num_bins(), 4);

        let bin = first.get_bin(0).unwrap();
        assert_close(bin.x_low, 0.5);
        assert_close(bin.x_high, 1.5);
        assert_close(bin.y_value, 0.0123);
        assert_close(bin.y_err_plus, 0.0011);
        assert_close(bin.y_err_minus, 0.0009);
    }

    #[rstest]
    fn test_read_point_set_alone() {
        let text = r#"<dataPointSet name="d01" dimension="2" path="/A" title="">
            <dataPoint>
              <measurement errorPlus="0.5" value="1.5" errorMinus="0.5"/>
              <measurement errorPlus="1.0" value="10.0" errorMinus="2.0"/>
            </dataPoint>
          </dataPointSet>"#;

        let histogram = read_aida_point_set(text).unwrap();

        assert_eq!(histogram.full_path(), "/A/d01");
        assert_eq!(histogram.title, None);
        assert_eq!(histogram.x_label, None);
        assert_eq!(
            histogram.get_bin(0).unwrap(),
            Bin::new(1.0, 2.0, 10.0, 1.0, 2.0)
        );
    }

    #[rstest]
    fn test_round_trip(jets: Histogram) {
        let text = to_aida_document(std::slice::from_ref(&jets));
        let decoded = read_aida_document(&text).unwrap();

        assert_eq!(decoded.len(), 1);
        let decoded = &decoded[0];
        assert_eq!(decoded.path, jets.path);
        assert_eq!(decoded.name, jets.name);
        assert_eq!(decoded.title, jets.title);
        assert_eq!(decoded.x_label, jets.x_label);
        assert_eq!(decoded.y_label, jets.y_label);
        assert_same_bins(decoded, &jets);
    }

    #[rstest]
    fn test_output_is_ascii(jets: Histogram) {
        let text = to_aida(&jets);

        assert!(text.is_ascii());
        assert!(text.contains("title=\"Jet p_T &amp; &eta; &lt; 2.5\""));
    }

    #[rstest]
    fn test_bin_to_aida() {
        let bin = Bin::new(0.0, 1.0, 10.0, 1.0, 0.5);
        assert_eq!(
            bin_to_aida(&bin),
            concat!(
                "    <dataPoint>\n",
                "      <measurement errorPlus=\"5.000000e-01\" value=\"5.000000e-01\" ",
                "errorMinus=\"5.000000e-01\"/>\n",
                "      <measurement errorPlus=\"1.000000e+00\" value=\"1.000000e+01\" ",
                "errorMinus=\"5.000000e-01\"/>\n",
                "    </dataPoint>\n"
            )
        );
    }

    #[rstest]
    fn test_reference_hints(jets: Histogram) {
        let mut reference = jets.clone();
        reference.path = "/REF/MC_JETS".to_string();

        let text = to_aida(&reference);
        assert!(text.contains(r#"<item key="PolyMarker" value="*" sticky="true"/>"#));
        assert!(text.contains(r#"<item key="ErrorBars" value="1" sticky="true"/>"#));
        assert!(!to_aida(&jets).contains("PolyMarker"));
    }

    #[rstest]
    fn test_document_sorted_by_full_path(jets: Histogram) {
        let other =
            Histogram::new("/MC_A", "zzz").with_bins(vec![Bin::symmetric(0.0, 1.0, 1.0, 0.1)]);
        let text = to_aida_document(&[jets, other]);

        let lines: Vec<&str> = text.lines().take(4).collect();
        assert_eq!(
            lines,
            vec![
                "<?xml version=\"1.0\" encoding=\"ISO-8859-1\" ?>",
                "<!DOCTYPE aida SYSTEM \"http://aida.freehep.org/schemas/3.3/aida.dtd\">",
                "<aida version=\"3.3\">",
                "  <implementation version=\"1.1\" package=\"FreeHEP\"/>",
            ]
        );

        let decoded = read_aida_document(&text).unwrap();
        let paths: Vec<String> = decoded.iter().map(|h| h.full_path()).collect();
        assert_eq!(paths, vec!["/MC_A/zzz", "/MC_JETS/jet_pt"]);
        assert!(text.contains("</dataPointSet>\n\n  <dataPointSet"));
    }

    #[rstest]
    #[case::three_measurements(
        r#"<aida><dataPointSet name="d" path="/A"><dataPoint>
            <measurement value="1" errorPlus="0" errorMinus="0"/>
            <measurement value="1" errorPlus="0" errorMinus="0"/>
            <measurement value="1" errorPlus="0" errorMinus="0"/>
        </dataPoint></dataPointSet></aida>"#
    )]
    #[case::one_dimension(
        r#"<aida><dataPointSet name="d" path="/A">
            <dimension dim="0" title="x"/>
        </dataPointSet></aida>"#
    )]
    #[case::bad_dimension_index(
        r#"<aida><dataPointSet name="d" path="/A">
            <dimension dim="0" title="x"/>
            <dimension dim="2" title="y"/>
        </dataPointSet></aida>"#
    )]
    #[case::wrong_root(r#"<histograms><dataPointSet name="d" path="/A"/></histograms>"#)]
    fn test_malformed_shape(#[case] text: &str) {
        assert!(matches!(
            read_aida_document(text),
            Err(CodecError::UnexpectedShape(_))
        ));
    }

    #[rstest]
    fn test_missing_name() {
        let text = r#"<aida><dataPointSet path="/A"/></aida>"#;
        assert!(matches!(
            read_aida_document(text),
            Err(CodecError::MissingAttribute {
                element: "dataPointSet",
                attribute: "name"
            })
        ));
    }

    #[rstest]
    fn test_invalid_number() {
        let text = r#"<aida><dataPointSet name="d" path="/A"><dataPoint>
            <measurement value="one" errorPlus="0" errorMinus="0"/>
            <measurement value="1" errorPlus="0" errorMinus="0"/>
        </dataPoint></dataPointSet></aida>"#;
        assert!(matches!(
            read_aida_document(text),
            Err(CodecError::InvalidNumber { .. })
        ));
    }

    #[rstest]
    fn test_not_xml() {
        assert!(matches!(
            read_aida_document("# BEGIN HISTOGRAM /A/d"),
            Err(CodecError::Xml(_))
        ));
    }

    #[rstest]
    fn test_write_aida_gz(jets: Histogram) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("jets.aida.gz");

        vec![jets.clone()].write_aida(&path).unwrap();

        let decoded = read_aida_file(&path).unwrap();
        assert_eq!(decoded[0].full_path(), jets.full_path());
        assert_same_bins(&decoded[0], &jets);
    }

    fn latin1_document(declaration: &[u8]) -> Vec<u8> {
        let mut bytes = declaration.to_vec();
        bytes.extend_from_slice(b"\n<aida version=\"1.0\">\n");
        bytes.extend_from_slice(b"<dataPointSet name=\"d01\" path=\"/A\" ");
        bytes.extend_from_slice(b"title=\"angle 30\xB0\">\n<dataPoint>\n");
        bytes.extend_from_slice(b"<measurement errorPlus='0.5' value='0.5' errorMinus='0.5'/>");
        bytes.extend_from_slice(b"<measurement errorPlus='0.1' value='2.0' errorMinus='0.1'/>");
        bytes.extend_from_slice(b"</dataPoint>\n</dataPointSet>\n</aida>\n");
        bytes
    }

    #[rstest]
    #[case(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\" ?>")]
    #[case(b"<?xml version='1.0' encoding='latin-1'?>")]
    fn test_read_latin1_file(#[case] declaration: &[u8]) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("legacy.aida");
        std::fs::write(&path, latin1_document(declaration)).unwrap();

        let histograms = read_aida_file(&path).unwrap();

        assert_eq!(histograms.len(), 1);
        assert_eq!(histograms[0].title.as_deref(), Some("angle 30\u{b0}"));
        assert_close(histograms[0].bins()[0].y_value, 2.0);
    }

    #[rstest]
    fn test_read_non_utf8_without_latin1_declaration() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("broken.aida");
        std::fs::write(&path, latin1_document(b"<?xml version=\"1.0\"?>")).unwrap();

        assert!(matches!(read_aida_file(&path), Err(CodecError::InvalidEncoding)));
    }
}
