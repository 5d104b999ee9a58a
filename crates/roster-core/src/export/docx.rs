//! Minimal WordprocessingML package holding one table.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;
use crate::record::{Record, field_text};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_CLOSE: &str = "</w:body></w:document>";

const TABLE_PROPERTIES: &str = r#"<w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/><w:tblBorders><w:top w:val="single" w:sz="4"/><w:left w:val="single" w:sz="4"/><w:bottom w:val="single" w:sz="4"/><w:right w:val="single" w:sz="4"/><w:insideH w:val="single" w:sz="4"/><w:insideV w:val="single" w:sz="4"/></w:tblBorders></w:tblPr>"#;

pub(super) fn encode(rows: &[&Record], title: &str) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(rows, title).as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

/// The header row is taken from the first record; later records are
/// rendered under those keys, missing fields as empty cells.
fn document_xml(rows: &[&Record], title: &str) -> String {
    let header: Vec<&str> = rows.first().map(|r| r.keys().collect()).unwrap_or_default();

    let mut xml = String::from(DOCUMENT_OPEN);
    xml.push_str(r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>"#);
    xml.push_str(&escape(&*xml_text(title)));
    xml.push_str("</w:t></w:r></w:p>");

    xml.push_str("<w:tbl>");
    xml.push_str(TABLE_PROPERTIES);
    xml.push_str("<w:tblGrid>");
    for _ in &header {
        xml.push_str(r#"<w:gridCol w:w="2000"/>"#);
    }
    xml.push_str("</w:tblGrid>");

    if !header.is_empty() {
        xml.push_str("<w:tr>");
        for key in &header {
            push_cell(&mut xml, key, true);
        }
        xml.push_str("</w:tr>");
    }

    for record in rows {
        xml.push_str("<w:tr>");
        for key in &header {
            let text = record.get(key).map(field_text).unwrap_or_default();
            push_cell(&mut xml, &text, false);
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
    // A body must not end with a table.
    xml.push_str("<w:p/>");
    xml.push_str(DOCUMENT_CLOSE);
    xml
}

fn push_cell(xml: &mut String, text: &str, bold: bool) {
    xml.push_str("<w:tc><w:p><w:r>");
    if bold {
        xml.push_str("<w:rPr><w:b/></w:rPr>");
    }
    xml.push_str(r#"<w:t xml:space="preserve">"#);
    xml.push_str(&escape(&*xml_text(text)));
    xml.push_str("</w:t></w:r></w:p></w:tc>");
}

/// Drop characters XML 1.0 does not allow, which Word refuses to open.
fn xml_text(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}
