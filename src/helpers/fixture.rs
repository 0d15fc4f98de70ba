//! Test-only writer producing small xlsx and ods workbooks on disk.

use quick_xml::escape::escape;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

/// One cell of a fixture sheet.
#[derive(Clone, Debug)]
pub(crate) enum FixtureCell {
    Empty,
    /// Shared string in xlsx, string cell in ods
    Text(String),
    /// Inline string in xlsx, string cell in ods
    InlineText(String),
    Number(String),
    Boolean(bool),
    /// Serial number for xlsx, ISO date for ods
    Date(String),
    /// Serial number for xlsx, ISO datetime for ods
    DateTime(String),
    /// Day fraction for xlsx, ISO duration for ods
    Time(String),
    Error(String),
}

pub(crate) fn text(value: &str) -> FixtureCell {
    FixtureCell::Text(value.to_owned())
}

pub(crate) fn number(value: &str) -> FixtureCell {
    FixtureCell::Number(value.to_owned())
}

pub(crate) fn empty() -> FixtureCell {
    FixtureCell::Empty
}

/// A sheet name with its rows, first row usually the header.
pub(crate) type FixtureSheet = (&'static str, Vec<Vec<FixtureCell>>);

/// Shorthand for a row of text cells, `""` meaning an empty cell.
pub(crate) fn text_row(values: &[&str]) -> Vec<FixtureCell> {
    values
        .iter()
        .map(|value| if value.is_empty() { empty() } else { text(value) })
        .collect()
}

fn reference(row: usize, col: usize) -> String {
    crate::spreadsheet::reference::index_to_reference(row, col)
}

pub(crate) fn write_xlsx(dir: &Path, file_name: &str, sheets: &[FixtureSheet]) -> PathBuf {
    let path = dir.join(file_name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default();

    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr date1904="false"/><sheets>"#,
    );
    let mut relationships = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut shared_strings = Vec::<String>::new();
    let mut worksheets = Vec::<String>::new();

    for (index, (name, rows)) in sheets.iter().enumerate() {
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(*name),
            index + 1,
            index + 1
        ));
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            index + 1,
            index + 1
        ));

        let mut sheet = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row, cells) in rows.iter().enumerate() {
            sheet.push_str(&format!(r#"<row r="{}">"#, row + 1));
            for (col, cell) in cells.iter().enumerate() {
                let r = reference(row, col);
                let xml = match cell {
                    FixtureCell::Empty => continue,
                    FixtureCell::Text(value) => {
                        shared_strings.push(value.to_owned());
                        format!(r#"<c r="{r}" t="s"><v>{}</v></c>"#, shared_strings.len() - 1)
                    }
                    FixtureCell::InlineText(value) => {
                        format!(r#"<c r="{r}" t="inlineStr"><is><t>{}</t></is></c>"#, escape(value.as_str()))
                    }
                    FixtureCell::Number(value) => format!(r#"<c r="{r}"><v>{value}</v></c>"#),
                    FixtureCell::Boolean(value) => {
                        format!(r#"<c r="{r}" t="b"><v>{}</v></c>"#, if *value { 1 } else { 0 })
                    }
                    FixtureCell::Date(value) => format!(r#"<c r="{r}" s="1"><v>{value}</v></c>"#),
                    FixtureCell::DateTime(value) => format!(r#"<c r="{r}" s="2"><v>{value}</v></c>"#),
                    FixtureCell::Time(value) => format!(r#"<c r="{r}" s="3"><v>{value}</v></c>"#),
                    FixtureCell::Error(value) => {
                        format!(r#"<c r="{r}" t="e"><v>{}</v></c>"#, escape(value.as_str()))
                    }
                };
                sheet.push_str(&xml);
            }
            sheet.push_str("</row>");
        }
        sheet.push_str("</sheetData></worksheet>");
        worksheets.push(sheet);
    }
    workbook.push_str("</sheets></workbook>");
    relationships.push_str("</Relationships>");

    let mut sst = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    for value in &shared_strings {
        sst.push_str(&format!("<si><t>{}</t></si>", escape(value.as_str())));
    }
    sst.push_str("</sst>");

    let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy\-mm\-dd hh:mm:ss"/></numFmts><cellXfs count="4"><xf numFmtId="0"/><xf numFmtId="14"/><xf numFmtId="164"/><xf numFmtId="21"/></cellXfs></styleSheet>"#;

    let mut put = |name: &str, content: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    };
    put("xl/workbook.xml", &workbook);
    put("xl/_rels/workbook.xml.rels", &relationships);
    put("xl/sharedStrings.xml", &sst);
    put("xl/styles.xml", styles);
    for (index, sheet) in worksheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", index + 1), sheet);
    }
    zip.finish().unwrap();
    path
}

pub(crate) fn write_ods(dir: &Path, file_name: &str, sheets: &[FixtureSheet]) -> PathBuf {
    let path = dir.join(file_name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/vnd.oasis.opendocument.spreadsheet").unwrap();

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><office:body><office:spreadsheet>"#,
    );
    for (name, rows) in sheets {
        content.push_str(&format!(r#"<table:table table:name="{}">"#, escape(*name)));
        for cells in rows {
            content.push_str("<table:table-row>");
            for cell in cells {
                let xml = match cell {
                    FixtureCell::Empty => "<table:table-cell/>".to_owned(),
                    FixtureCell::Text(value) | FixtureCell::InlineText(value) => format!(
                        r#"<table:table-cell office:value-type="string"><text:p>{}</text:p></table:table-cell>"#,
                        escape(value.as_str())
                    ),
                    FixtureCell::Number(value) => format!(
                        r#"<table:table-cell office:value-type="float" office:value="{value}"><text:p>{value}</text:p></table:table-cell>"#
                    ),
                    FixtureCell::Boolean(value) => format!(
                        r#"<table:table-cell office:value-type="boolean" office:boolean-value="{value}"><text:p>{value}</text:p></table:table-cell>"#
                    ),
                    FixtureCell::Date(value) | FixtureCell::DateTime(value) => format!(
                        r#"<table:table-cell office:value-type="date" office:date-value="{value}"><text:p>{value}</text:p></table:table-cell>"#
                    ),
                    FixtureCell::Time(value) => format!(
                        r#"<table:table-cell office:value-type="time" office:time-value="{value}"><text:p>{value}</text:p></table:table-cell>"#
                    ),
                    FixtureCell::Error(value) => format!(
                        r#"<table:table-cell office:value-type="string" calcext:value-type="error"><text:p>{}</text:p></table:table-cell>"#,
                        escape(value.as_str())
                    ),
                };
                content.push_str(&xml);
            }
            content.push_str("</table:table-row>");
        }
        content.push_str("</table:table>");
    }
    content.push_str("</office:spreadsheet></office:body></office:document-content>");

    let manifest = r#"<?xml version="1.0" encoding="UTF-8"?><manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"><manifest:file-entry manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/><manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/></manifest:manifest>"#;

    let options = SimpleFileOptions::default();
    zip.start_file("content.xml", options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
    zip.start_file("META-INF/manifest.xml", options).unwrap();
    zip.write_all(manifest.as_bytes()).unwrap();
    zip.finish().unwrap();
    path
}
