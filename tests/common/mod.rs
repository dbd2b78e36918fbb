//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use image::{ImageFormat, Rgb, RgbImage};

use event_report::intake::AttendanceUpload;
use event_report::models::{Attachment, AttachmentRole, DateRange, EventInfo};
use event_report::report::Report;

pub const TITLE: &str = "Workshop on Applied Machine Learning";
pub const DEPARTMENT: &str = "Department of Computer Science";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// An event with only the required fields filled in.
pub fn minimal_event() -> EventInfo {
    let mut event = EventInfo::new(TITLE, DEPARTMENT, DateRange::single(day(2025, 3, 12)));
    event.institution.university = "CHRIST (Deemed to be University), Bangalore".to_string();
    event
}

/// A solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([30, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}

pub fn attachment(role: AttachmentRole, filename: &str, bytes: Vec<u8>) -> Attachment {
    Attachment {
        role,
        filename: filename.to_string(),
        bytes,
    }
}

pub fn csv_upload(contents: &str) -> AttendanceUpload {
    AttendanceUpload {
        filename: "attendance.csv".to_string(),
        bytes: contents.as_bytes().to_vec(),
    }
}

/// `Name,ID` CSV with `n` generated rows.
pub fn attendance_csv(n: usize) -> String {
    let mut csv = String::from("Name,ID\n");
    for i in 1..=n {
        csv.push_str(&format!("Student {i},R{i:04}\n"));
    }
    csv
}

/// Cell value in a hand-built worksheet.
pub enum XlsxCell<'a> {
    Text(&'a str),
    Number(f64),
}

/// A single-sheet xlsx workbook with the given rows, stored uncompressed.
pub fn xlsx_bytes(rows: &[Vec<XlsxCell<'_>>]) -> Vec<u8> {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let col = (b'A' + c as u8) as char;
            let reference = format!("{col}{}", r + 1);
            match cell {
                XlsxCell::Text(t) => sheet.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{t}</t></is></c>"#
                )),
                XlsxCell::Number(n) => {
                    sheet.push_str(&format!(r#"<c r="{reference}"><v>{n}</v></c>"#))
                }
            }
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Attendance" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
        ),
        ("xl/worksheets/sheet1.xml", sheet),
    ];

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, body) in parts {
        zip.start_file(name, options).expect("start xlsx part");
        zip.write_all(body.as_bytes()).expect("write xlsx part");
    }
    zip.finish().expect("finish xlsx").into_inner()
}

/// All text drawn in the report, page by page.
pub fn report_text(report: &Report) -> String {
    report
        .pages
        .iter()
        .flat_map(|p| p.texts())
        .collect::<Vec<_>>()
        .join("\n")
}
