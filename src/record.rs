//! Result records and their persisted row layout.
//!
//! One [`ResultRecord`] is produced per kept family. Floating-point fields are
//! rounded to six decimal digits when the record is built, so the table is
//! stable and diffable across runs.
//!
//! # Row layout
//!
//! ```text
//! index,antichain_minimals,family_size,min_freq_before,var_before,compressed_changed,min_freq_after,var_after,freqs_before,freqs_after
//! 1,"[[0], [1]]",4,0.0,0.055556,True,0.0,0.074074,"[0.5, 0.5, 0.0]","[0.666667, 0.333333, 0.0]"
//! ```
//!
//! List-valued columns are JSON arrays written with `", "` separators, and
//! fields are quoted only when they contain a comma, quote or line break.
//! Floats use the shortest round-trip digits, switching to exponent form
//! (`6.8e-05`) below `1e-4` and from `1e16` on.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::antichain::Antichain;
use crate::compress::Analysis;
use crate::error::Result;

/// Column names of the persisted table, in order.
pub const CSV_HEADER: [&str; 10] = [
    "index",
    "antichain_minimals",
    "family_size",
    "min_freq_before",
    "var_before",
    "compressed_changed",
    "min_freq_after",
    "var_after",
    "freqs_before",
    "freqs_after",
];

/// Rounds to six decimal digits.
pub fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Statistics of one non-isomorphic union-closed family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    /// Position in emission order, starting at 0
    pub index: usize,
    /// Generating antichain, as explicit element sets
    pub antichain_minimals: Vec<Vec<usize>>,
    pub family_size: usize,
    pub min_freq_before: f64,
    pub var_before: f64,
    pub compressed_changed: bool,
    pub min_freq_after: f64,
    pub var_after: f64,
    pub freqs_before: Vec<f64>,
    pub freqs_after: Vec<f64>,
}

impl ResultRecord {
    pub fn new(index: usize, antichain: &Antichain, analysis: &Analysis, n: usize) -> Self {
        Self {
            index,
            antichain_minimals: antichain.to_element_sets(n),
            family_size: analysis.size,
            min_freq_before: round6(analysis.before.min),
            var_before: round6(analysis.before.variance),
            compressed_changed: analysis.changed,
            min_freq_after: round6(analysis.after.min),
            var_after: round6(analysis.after.variance),
            freqs_before: analysis.before.freqs.iter().copied().map(round6).collect(),
            freqs_after: analysis.after.freqs.iter().copied().map(round6).collect(),
        }
    }

    /// Renders the record as field values in [`CSV_HEADER`] order, unquoted.
    pub fn to_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            self.index.to_string(),
            to_spaced_json(&self.antichain_minimals)?,
            self.family_size.to_string(),
            to_spaced_json(&self.min_freq_before)?,
            to_spaced_json(&self.var_before)?,
            if self.compressed_changed { "True" } else { "False" }.to_string(),
            to_spaced_json(&self.min_freq_after)?,
            to_spaced_json(&self.var_after)?,
            to_spaced_json(&self.freqs_before)?,
            to_spaced_json(&self.freqs_after)?,
        ])
    }

    /// Renders the record as one CSV row, without the line terminator.
    pub fn to_csv_row(&self) -> Result<String> {
        let fields = self.to_fields()?;
        Ok(fields.iter().map(|f| quote_field(f)).collect::<Vec<_>>().join(","))
    }
}

/// Writes the header and one row per record.
pub fn write_csv<W: Write>(mut writer: W, records: &[ResultRecord]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;
    for record in records {
        writeln!(writer, "{}", record.to_csv_row()?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Compact JSON with `", "` between array elements and floats in [`format_float`] form.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(format_float(value).as_bytes())
    }
}

/// Shortest round-trip rendering of a finite float.
///
/// Positional with at least one fractional digit (`0.5`, `2.0`) while the
/// decimal exponent is in `-4..16`, otherwise exponent form with a signed,
/// two-digit exponent (`6.8e-05`, `1e+16`).
pub fn format_float(value: f64) -> String {
    let sci = format!("{:e}", value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if (-4..16).contains(&exp) {
        let fixed = value.to_string();
        if fixed.contains('.') {
            fixed
        } else {
            fixed + ".0"
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    }
}

fn to_spaced_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
