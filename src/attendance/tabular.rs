use std::io::Cursor;

use calamine::{Data, Reader};

use crate::config::BlankRowPolicy;
use crate::errors::ReportError;
use crate::intake::AttendanceUpload;
use crate::models::{AttendanceSheet, AttendeeRecord};

const NAME_HEADERS: &[&str] = &[
    "name",
    "names",
    "participant",
    "participant name",
    "student name",
    "full name",
    "attendee",
    "attendee name",
];

const ID_HEADERS: &[&str] = &[
    "id",
    "roll",
    "roll no",
    "roll number",
    "register no",
    "register number",
    "registration no",
    "registration number",
    "reg no",
    "identifier",
    "student id",
    "employee id",
];

/// Parse an uploaded CSV or workbook into an attendance sheet. The first
/// non-blank row must be a header naming a name column.
pub fn parse_tabular(
    upload: &AttendanceUpload,
    policy: BlankRowPolicy,
) -> Result<AttendanceSheet, ReportError> {
    let rows = match upload.extension().as_str() {
        "csv" => read_csv(&upload.bytes)?,
        _ => read_workbook(&upload.bytes)?,
    };
    sheet_from_rows(rows, policy)
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, ReportError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReportError::AttendanceFormat(e.to_string()))?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(rows)
}

/// First worksheet of an xlsx/xls/ods workbook.
fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, ReportError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ReportError::AttendanceFormat(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::AttendanceFormat("the workbook has no worksheets".to_string()))?
        .map_err(|e| ReportError::AttendanceFormat(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Roll numbers typed into Excel come back as floats; show 1001.0 as "1001".
fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

fn normalize_header(label: &str) -> String {
    label
        .to_lowercase()
        .replace(['.', ':', '_', '#'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Turn raw rows (header first) into records.
pub fn sheet_from_rows(
    rows: Vec<Vec<String>>,
    policy: BlankRowPolicy,
) -> Result<AttendanceSheet, ReportError> {
    let Some(header_idx) = rows.iter().position(|r| !is_blank(r)) else {
        return Err(ReportError::AttendanceFormat(
            "the file contains no rows".to_string(),
        ));
    };
    let header = &rows[header_idx];
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();

    let name_col = normalized
        .iter()
        .position(|h| NAME_HEADERS.contains(&h.as_str()))
        .ok_or_else(|| {
            ReportError::AttendanceFormat(
                "the first row must be a header with a name column (e.g. 'Name')".to_string(),
            )
        })?;
    let id_col = normalized
        .iter()
        .enumerate()
        .position(|(i, h)| i != name_col && ID_HEADERS.contains(&h.as_str()));

    let mut extra_cols: Vec<(usize, String)> = Vec::new();
    for (i, label) in header.iter().enumerate() {
        let label = label.trim();
        if i == name_col || Some(i) == id_col || label.is_empty() {
            continue;
        }
        let mut unique = label.to_string();
        let mut n = 2;
        while extra_cols.iter().any(|(_, l)| *l == unique) {
            unique = format!("{label} ({n})");
            n += 1;
        }
        extra_cols.push((i, unique));
    }

    let cell = |row: &[String], i: usize| row.get(i).map(|c| c.trim().to_string()).unwrap_or_default();

    let mut records = Vec::new();
    for (offset, row) in rows.iter().enumerate().skip(header_idx + 1) {
        if is_blank(row) {
            continue;
        }
        let name = cell(row, name_col);
        if name.is_empty() {
            let row_number = offset + 1;
            match policy {
                BlankRowPolicy::Skip => {
                    log::debug!("Skipping attendance row {row_number} without a name");
                    continue;
                }
                BlankRowPolicy::Reject => {
                    return Err(ReportError::AttendanceFormat(format!(
                        "row {row_number} has no value in the '{}' column",
                        header[name_col].trim()
                    )));
                }
            }
        }
        records.push(AttendeeRecord {
            name,
            identifier: id_col.map(|i| cell(row, i)).unwrap_or_default(),
            extra: extra_cols
                .iter()
                .map(|(i, label)| (label.clone(), cell(row, *i)))
                .collect(),
        });
    }

    Ok(AttendanceSheet {
        name_label: header[name_col].trim().to_string(),
        identifier_label: id_col.map(|i| header[i].trim().to_string()),
        extra_labels: extra_cols.into_iter().map(|(_, l)| l).collect(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_drop_the_fraction() {
        assert_eq!(format_number(1001.0), "1001");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn headers_are_normalised() {
        assert_eq!(normalize_header("  Roll No. "), "roll no");
        assert_eq!(normalize_header("Reg_No"), "reg no");
        assert_eq!(normalize_header("Participant   Name"), "participant name");
    }

    #[test]
    fn duplicate_extra_headers_get_suffixes() {
        let rows = vec![
            vec!["Name".into(), "Class".into(), "Class".into()],
            vec!["Asha".into(), "A".into(), "B".into()],
        ];
        let sheet = sheet_from_rows(rows, BlankRowPolicy::Skip).unwrap();
        assert_eq!(sheet.extra_labels, vec!["Class", "Class (2)"]);
        assert_eq!(sheet.row_cells(&sheet.records[0]), vec!["Asha", "A", "B"]);
    }
}
