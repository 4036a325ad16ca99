//! Column width, row height and numeric column heuristics.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::render::TabularOptions;

const MIN_WIDTH: f64 = 12.0;
const MAX_WIDTH: f64 = 60.0;
const MIN_WRAP_CHARS: f64 = 8.0;

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid regex"));

/// Check if a value is a plain integer or decimal.
pub fn is_numeric(value: &str) -> bool {
    NUMERIC.is_match(value.trim())
}

/// Width in characters of the longest line of `text`.
fn longest_line(text: &str) -> usize {
    text.split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// Column widths in character units.
///
/// For each column the longest-line lengths of the header and the first
/// `sample` rows are reduced to their 90th percentile, bumped (above 80
/// becomes 55, above 50 becomes 45, anything else gets 2 more) and clamped
/// to `[12, 60]`.
pub fn column_widths(headers: &[String], rows: &[Vec<String>], sample: usize) -> Vec<f64> {
    let widths: Vec<f64> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let mut lengths: Vec<usize> = Vec::with_capacity(sample.min(rows.len()) + 1);
            lengths.push(longest_line(header));
            lengths.extend(
                rows.iter()
                    .take(sample)
                    .map(|row| row.get(col).map(|v| longest_line(v)).unwrap_or(0)),
            );
            bump(percentile_90(&mut lengths) as f64).clamp(MIN_WIDTH, MAX_WIDTH)
        })
        .collect();
    log::debug!("column widths: {:?}", widths);
    widths
}

/// Nearest-rank 90th percentile.
fn percentile_90(values: &mut [usize]) -> usize {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let rank = (values.len() as f64 * 0.9).ceil() as usize;
    values[rank.saturating_sub(1).min(values.len() - 1)]
}

fn bump(chars: f64) -> f64 {
    if chars > 80.0 {
        55.0
    } else if chars > 50.0 {
        45.0
    } else {
        chars + 2.0
    }
}

/// Estimated wrapped line count of a cell in a column of `width` characters.
fn wrapped_lines(text: &str, width: f64) -> usize {
    let per_line = (width - 2.0).max(MIN_WRAP_CHARS);
    text.split('\n')
        .map(|line| {
            let chars = line.chars().count() as f64;
            ((chars / per_line).ceil() as usize).max(1)
        })
        .sum()
}

/// Data row heights in points.
pub fn row_heights(rows: &[Vec<String>], widths: &[f64], options: &TabularOptions) -> Vec<f64> {
    rows.iter()
        .map(|row| {
            let lines = widths
                .iter()
                .enumerate()
                .map(|(col, width)| {
                    row.get(col)
                        .map(|v| wrapped_lines(v, *width))
                        .unwrap_or(1)
                })
                .max()
                .unwrap_or(1);
            (lines as f64 * options.line_height as f64)
                .clamp(options.base_row_height as f64, options.max_row_height as f64)
        })
        .collect()
}

/// Columns whose non-empty values in the first `sample` rows are all
/// numeric. A column without any non-empty sampled value is not numeric.
pub fn numeric_columns(column_count: usize, rows: &[Vec<String>], sample: usize) -> Vec<bool> {
    (0..column_count)
        .map(|col| {
            let mut seen = false;
            for row in rows.iter().take(sample) {
                let value = row.get(col).map(|v| v.trim()).unwrap_or("");
                if value.is_empty() {
                    continue;
                }
                if !is_numeric(value) {
                    return false;
                }
                seen = true;
            }
            seen
        })
        .collect()
}
