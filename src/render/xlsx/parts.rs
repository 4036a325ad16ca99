//! SpreadsheetML parts.

use crate::render::package::{xml_escape, XML_DECL};

pub(super) const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(super) const R_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(super) const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
pub(super) const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
pub(super) const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

pub(super) const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub(super) const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Cell style indices into `cellXfs`.
pub(super) const STYLE_HEADER: u32 = 1;
pub(super) const STYLE_TEXT: u32 = 2;
pub(super) const STYLE_NUMBER: u32 = 3;

/// Maximum sheet name length.
pub const MAX_SHEET_NAME: usize = 31;

/// Spreadsheet column letters for a zero-based index (`0` is `A`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Sheet name from a template name: uppercased, forbidden characters
/// replaced and truncated to 31 characters.
pub fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .to_uppercase()
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => ' ',
            c => c,
        })
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "SHEET1".to_string()
    } else {
        cleaned
    }
}

pub(super) fn workbook_xml(sheet: &str, filter_range: Option<&str>) -> String {
    let mut xml = format!(
        r#"{}<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>"#,
        XML_DECL,
        MAIN_NS,
        R_NS,
        xml_escape(sheet)
    );
    if let Some(range) = filter_range {
        xml.push_str(&format!(
            r#"<definedNames><definedName name="_xlnm._FilterDatabase" localSheetId="0" hidden="1">'{}'!{}</definedName></definedNames>"#,
            xml_escape(&sheet.replace('\'', "''")),
            absolute_range(range)
        ));
    }
    xml.push_str("</workbook>");
    xml
}

fn absolute_range(range: &str) -> String {
    range
        .split(':')
        .map(|cell| {
            let split = cell.find(|c: char| c.is_ascii_digit()).unwrap_or(cell.len());
            format!("${}${}", &cell[..split], &cell[split..])
        })
        .collect::<Vec<_>>()
        .join(":")
}

pub(super) fn styles_xml() -> String {
    let border = concat!(
        r#"<border><left style="thin"><color rgb="FF000000"/></left>"#,
        r#"<right style="thin"><color rgb="FF000000"/></right>"#,
        r#"<top style="thin"><color rgb="FF000000"/></top>"#,
        r#"<bottom style="thin"><color rgb="FF000000"/></bottom><diagonal/></border>"#
    );
    format!(
        concat!(
            "{}",
            r#"<styleSheet xmlns="{}">"#,
            r#"<fonts count="2"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font>"#,
            r#"<font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font></fonts>"#,
            r#"<fills count="3"><fill><patternFill patternType="none"/></fill>"#,
            r#"<fill><patternFill patternType="gray125"/></fill>"#,
            r#"<fill><patternFill patternType="solid"><fgColor rgb="FFD9E1F2"/><bgColor indexed="64"/></patternFill></fill></fills>"#,
            r#"<borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border>{}</borders>"#,
            r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
            r#"<cellXfs count="4"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
            r#"<xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1">"#,
            r#"<alignment horizontal="center" vertical="center" wrapText="1"/></xf>"#,
            r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1" applyAlignment="1">"#,
            r#"<alignment horizontal="left" vertical="top" wrapText="1" indent="1"/></xf>"#,
            r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1" applyAlignment="1">"#,
            r#"<alignment horizontal="right" vertical="top" wrapText="1"/></xf></cellXfs>"#,
            r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
            "</styleSheet>"
        ),
        XML_DECL, MAIN_NS, border
    )
}
