//! XLSX (SpreadsheetML) export of tabular datasets.
//!
//! One worksheet per dataset: a filled, bordered header row frozen at the
//! top, an autofilter over the used range and every cell of that range
//! bordered and wrapped, empty ones included.

mod layout;
mod parts;

pub use layout::{column_widths, is_numeric, numeric_columns, row_heights};
pub use parts::{column_letter, sheet_name, MAX_SHEET_NAME};

use crate::error::Result;
use crate::export::{output_file_name, ExportFormat};
use crate::model::TabularDataset;
use crate::render::package::{xml_escape, Package, Relationships, XML_DECL};
use crate::render::plain::{escape_formula, html_to_plain};
use crate::render::{ExportResult, ExportStats, TabularOptions};

use parts::{
    styles_xml, workbook_xml, CT_STYLES, CT_WORKBOOK, CT_WORKSHEET, MAIN_NS, REL_STYLES,
    REL_WORKSHEET, R_NS, STYLE_HEADER, STYLE_NUMBER, STYLE_TEXT,
};

/// Columns holding plain metadata; every other column holds editor HTML.
pub const METADATA_KEYS: &[&str] = &[
    "paper_id", "id", "doi", "authors", "title", "year", "category",
];

/// Check if a column key is one of the plain metadata columns.
pub fn is_metadata_key(key: &str) -> bool {
    METADATA_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Cell texts of a dataset in column order, rich values flattened to plain
/// text.
pub fn prepare_rows(dataset: &TabularDataset) -> Vec<Vec<String>> {
    dataset
        .rows
        .iter()
        .map(|row| {
            dataset
                .columns
                .iter()
                .map(|column| {
                    let raw = TabularDataset::cell_text(row, &column.key);
                    if is_metadata_key(&column.key) {
                        raw
                    } else {
                        escape_formula(&html_to_plain(&raw))
                    }
                })
                .collect()
        })
        .collect()
}

/// Export a dataset as a single-sheet workbook.
///
/// Datasets without rows produce a sheet with only the header row.
pub fn export_tabular(dataset: &TabularDataset, options: &TabularOptions) -> Result<ExportResult> {
    let headers: Vec<String> = dataset
        .columns
        .iter()
        .map(|c| c.header().to_string())
        .collect();
    let rows = prepare_rows(dataset);

    let widths = column_widths(&headers, &rows, options.width_sample_rows);
    let heights = row_heights(&rows, &widths, options);
    let numeric = numeric_columns(headers.len(), &rows, options.numeric_sample_rows);

    let sheet = sheet_name(options.sheet_name.as_deref().unwrap_or(&dataset.name));
    let used_range = if headers.is_empty() {
        None
    } else {
        Some(format!(
            "A1:{}{}",
            column_letter(headers.len() - 1),
            rows.len() + 1
        ))
    };

    let worksheet = worksheet_xml(
        &headers,
        &rows,
        &widths,
        &heights,
        &numeric,
        options,
        used_range.as_deref(),
    );

    let mut package = Package::new();
    package.add_part(
        "xl/workbook.xml",
        CT_WORKBOOK,
        &workbook_xml(&sheet, used_range.as_deref()),
    )?;
    package.add_part("xl/worksheets/sheet1.xml", CT_WORKSHEET, &worksheet)?;
    package.add_part("xl/styles.xml", CT_STYLES, &styles_xml())?;

    let mut rels = Relationships::new();
    rels.add(REL_WORKSHEET, "worksheets/sheet1.xml");
    rels.add(REL_STYLES, "styles.xml");
    package.add_file("xl/_rels/workbook.xml.rels", rels.to_xml().as_bytes())?;
    package.add_core_properties(&dataset.name)?;
    package.add_root_rels("xl/workbook.xml")?;

    let stats = ExportStats {
        row_count: rows.len() as u32,
        ..Default::default()
    };
    log::debug!(
        "xlsx sheet {:?}: {} columns, {} rows",
        sheet,
        headers.len(),
        rows.len()
    );

    let format = ExportFormat::Xlsx;
    Ok(ExportResult::new(
        package.finish()?,
        format.mime_type(),
        output_file_name(&dataset.name, format),
        stats,
    ))
}

fn worksheet_xml(
    headers: &[String],
    rows: &[Vec<String>],
    widths: &[f64],
    heights: &[f64],
    numeric: &[bool],
    options: &TabularOptions,
    used_range: Option<&str>,
) -> String {
    let mut xml = format!(r#"{}<worksheet xmlns="{}" xmlns:r="{}">"#, XML_DECL, MAIN_NS, R_NS);
    if let Some(range) = used_range {
        xml.push_str(&format!(r#"<dimension ref="{}"/>"#, range));
    }
    xml.push_str(concat!(
        r#"<sheetViews><sheetView workbookViewId="0">"#,
        r#"<pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>"#,
        r#"<selection pane="bottomLeft" activeCell="A2" sqref="A2"/>"#,
        "</sheetView></sheetViews>",
        r#"<sheetFormatPr defaultRowHeight="15"/>"#
    ));

    if !widths.is_empty() {
        xml.push_str("<cols>");
        for (i, width) in widths.iter().enumerate() {
            xml.push_str(&format!(
                r#"<col min="{n}" max="{n}" width="{w}" customWidth="1"/>"#,
                n = i + 1,
                w = width
            ));
        }
        xml.push_str("</cols>");
    }

    xml.push_str("<sheetData>");
    if !headers.is_empty() {
        xml.push_str(&format!(
            r#"<row r="1" ht="{}" customHeight="1">"#,
            options.header_height
        ));
        for (col, header) in headers.iter().enumerate() {
            xml.push_str(&inline_cell(&format!("{}1", column_letter(col)), STYLE_HEADER, header));
        }
        xml.push_str("</row>");

        for (i, row) in rows.iter().enumerate() {
            let r = i + 2;
            xml.push_str(&format!(
                r#"<row r="{}" ht="{}" customHeight="1">"#,
                r, heights[i]
            ));
            for col in 0..headers.len() {
                let reference = format!("{}{}", column_letter(col), r);
                let value = row.get(col).map(String::as_str).unwrap_or("");
                let style = if numeric[col] { STYLE_NUMBER } else { STYLE_TEXT };
                if value.is_empty() {
                    xml.push_str(&format!(r#"<c r="{}" s="{}"/>"#, reference, style));
                } else if numeric[col] {
                    xml.push_str(&format!(
                        r#"<c r="{}" s="{}"><v>{}</v></c>"#,
                        reference,
                        style,
                        value.trim()
                    ));
                } else {
                    xml.push_str(&inline_cell(&reference, style, value));
                }
            }
            xml.push_str("</row>");
        }
    }
    xml.push_str("</sheetData>");

    if let Some(range) = used_range {
        xml.push_str(&format!(r#"<autoFilter ref="{}"/>"#, range));
    }
    xml.push_str(
        r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#,
    );
    xml.push_str("</worksheet>");
    xml
}

fn inline_cell(reference: &str, style: u32, text: &str) -> String {
    format!(
        r#"<c r="{}" s="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        style,
        xml_escape(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use serde_json::json;

    fn dataset(rows: serde_json::Value, columns: &[&str]) -> TabularDataset {
        TabularDataset {
            name: "Matrix".into(),
            columns: columns.iter().map(|k| Column::new(*k)).collect(),
            rows: rows
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r.as_object().cloned().unwrap())
                .collect(),
        }
    }

    #[test]
    fn test_prepare_rows_flattens_rich_columns() {
        let data = dataset(
            json!([{
                "title": "=cmd()",
                "gaps": "<ol><li>One</li><li>Two</li></ol>",
                "notes": "=HYPERLINK(\"x\")",
                "score": "-1.5"
            }, {
                "notes": "<p>-5</p>",
                "score": "42"
            }]),
            &["title", "gaps", "notes", "score"],
        );
        let rows = prepare_rows(&data);
        assert_eq!(rows[0][0], "=cmd()");
        assert_eq!(rows[0][1], "1. One\n2. Two");
        assert_eq!(rows[0][2], "'=HYPERLINK(\"x\")");
        assert_eq!(rows[0][3], "'-1.5");
        assert_eq!(rows[1][2], "'-5");
        assert_eq!(rows[1][3], "42");
    }

    #[test]
    fn test_worksheet_borders_empty_cells() {
        let data = dataset(json!([{"title": "A"}, {"year": 2020}]), &["title", "year"]);
        let result = export_tabular(&data, &TabularOptions::default()).unwrap();
        assert_eq!(result.stats.row_count, 2);
        assert_eq!(result.filename, "Matrix.xlsx");

        let headers = vec!["title".to_string(), "year".to_string()];
        let rows = prepare_rows(&data);
        let xml = worksheet_xml(
            &headers,
            &rows,
            &[12.0, 12.0],
            &[18.0, 18.0],
            &[false, true],
            &TabularOptions::default(),
            Some("A1:B3"),
        );
        assert!(xml.contains(r#"<c r="B2" s="3"/>"#));
        assert!(xml.contains(r#"<c r="A3" s="2"/>"#));
        assert!(xml.contains(r#"<c r="B3" s="3"><v>2020</v></c>"#));
        assert!(xml.contains(r#"<autoFilter ref="A1:B3"/>"#));
        assert!(xml.contains(r#"state="frozen""#));
    }

    #[test]
    fn test_metadata_keys() {
        assert!(is_metadata_key("doi"));
        assert!(is_metadata_key("Paper_ID"));
        assert!(!is_metadata_key("research_gap"));
    }
}
