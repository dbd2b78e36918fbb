mod common;

use event_report::attendance::parse_tabular;
use event_report::config::BlankRowPolicy;
use event_report::errors::ReportError;
use event_report::models::{AttachmentRole, AttendanceSheet, AttendeeRecord};
use event_report::report::{self, TableKind};

use common::*;

#[test]
fn minimal_report_has_header_and_placeholders() {
    let event = minimal_event();
    let report = report::generate(&event, &[], &AttendanceSheet::empty(), 1200).expect("generate");

    assert!(report.pdf.starts_with(b"%PDF"));
    assert_eq!(report.filename, "Workshop_on_Applied_Machine_Learning_2025-03-12_Report.pdf");

    let text = report_text(&report);
    assert!(text.contains(DEPARTMENT));
    assert!(text.contains("Activity Report"));
    assert!(text.contains("No photos provided."));
    assert!(text.contains("No attendance records provided."));
}

#[test]
fn pdf_bytes_carry_the_drawn_text() {
    let event = minimal_event();
    let report = report::generate(&event, &[], &AttendanceSheet::empty(), 1200).expect("generate");

    let haystack = String::from_utf8_lossy(&report.pdf);
    assert!(haystack.contains(DEPARTMENT));
    assert!(haystack.contains(&format!("Page 1 of {}", report.page_count())));
    assert!(haystack.contains("/Times-Roman"));
}

#[test]
fn sections_appear_in_order() {
    let report =
        report::generate(&minimal_event(), &[], &AttendanceSheet::empty(), 1200).expect("generate");
    let text = report_text(&report);

    let order = [
        "General Information",
        "Speaker/Guest/Presenter Details",
        "Participants Profile",
        "Synopsis of the Activity (Description)",
        "Report Prepared By",
        "Photos of the Activity",
        "Attendance List",
        "Flyer of the Event",
        "Approval Letter",
        "Feedback Screenshots",
        "Impact Analysis Report",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|s| text.find(s).unwrap_or_else(|| panic!("missing section {s}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn attendance_table_has_one_row_per_record() {
    let sheet = parse_tabular(&csv_upload(&attendance_csv(12)), BlankRowPolicy::Skip)
        .expect("parse csv");
    let report = report::generate(&minimal_event(), &[], &sheet, 1200).expect("generate");

    let spanned = report
        .pages
        .iter()
        .filter(|p| p.rows(TableKind::Attendance).next().is_some())
        .count();
    let rows: Vec<_> = report
        .pages
        .iter()
        .flat_map(|p| p.rows(TableKind::Attendance))
        .collect();
    let headers = rows.iter().filter(|r| r.header).count();
    let data = rows.iter().filter(|r| !r.header && !r.continued).count();
    assert_eq!(headers, spanned);
    assert_eq!(data, 12);

    let text = report_text(&report);
    assert!(text.contains("Student 12"));
    assert!(text.contains("R0012"));
}

#[test]
fn long_attendance_repeats_the_header_on_every_page() {
    let records: Vec<AttendeeRecord> = (1..=150)
        .map(|i| AttendeeRecord::new(format!("Participant {i}"), format!("ID{i}")))
        .collect();
    let sheet = AttendanceSheet::manual(records);
    let report = report::generate(&minimal_event(), &[], &sheet, 1200).expect("generate");

    assert!(report.page_count() > 1);

    let mut pages_with_rows = 0;
    let mut data_rows = 0;
    for page in &report.pages {
        let rows: Vec<_> = page.rows(TableKind::Attendance).collect();
        if rows.is_empty() {
            continue;
        }
        pages_with_rows += 1;
        assert!(rows[0].header, "page {} starts without a header", page.number);
        assert_eq!(rows[0].texts[0].text, "Participant Name");
        data_rows += rows.iter().filter(|r| !r.header && !r.continued).count();
    }
    assert!(pages_with_rows > 1);
    assert_eq!(data_rows, 150);

    for (i, page) in report.pages.iter().enumerate() {
        assert_eq!(page.number, i + 1);
    }
}

#[test]
fn long_summary_flows_onto_more_pages() {
    let mut event = minimal_event();
    event.synopsis.summary = "The session covered model evaluation in depth. ".repeat(400);
    let report = report::generate(&event, &[], &AttendanceSheet::empty(), 1200).expect("generate");
    assert!(report.page_count() > 1);
}

#[test]
fn same_input_lays_out_the_same_pages() {
    let mut event = minimal_event();
    event.speaker.name = "Dr. Priya Menon".to_string();
    event.organizers = vec!["IEEE Student Branch".to_string(), "CS Club".to_string()];
    let sheet = AttendanceSheet::manual(vec![AttendeeRecord::new("Asha", "R1")]);
    let photos = vec![attachment(AttachmentRole::Photo, "p1.png", png_bytes(40, 30))];

    let first = report::generate(&event, &photos, &sheet, 1200).expect("first");
    let second = report::generate(&event, &photos, &sheet, 1200).expect("second");
    assert_eq!(first.pages, second.pages);
    assert_eq!(first.filename, second.filename);
}

#[test]
fn photos_are_embedded_in_upload_order() {
    let photos = vec![
        attachment(AttachmentRole::Photo, "a.png", png_bytes(60, 40)),
        attachment(AttachmentRole::Photo, "b.png", png_bytes(20, 20)),
        attachment(AttachmentRole::Flyer, "flyer.png", png_bytes(30, 50)),
    ];
    let report =
        report::generate(&minimal_event(), &photos, &AttendanceSheet::empty(), 1200).expect("generate");

    let placed: Vec<usize> = report
        .pages
        .iter()
        .flat_map(|p| p.images().map(|(i, _)| i).collect::<Vec<_>>())
        .collect();
    assert_eq!(placed, vec![0, 1, 2]);
    assert!(!report_text(&report).contains("No photos provided."));
    assert!(report_text(&report).contains("No approval letter uploaded."));
}

#[test]
fn wide_images_fit_the_content_width() {
    let photos = vec![attachment(AttachmentRole::Photo, "wide.png", png_bytes(3000, 500))];
    let report =
        report::generate(&minimal_event(), &photos, &AttendanceSheet::empty(), 1200).expect("generate");

    let (_, frame) = report
        .pages
        .iter()
        .flat_map(|p| p.images().map(|(i, f)| (i, *f)).collect::<Vec<_>>())
        .next()
        .expect("image placed");
    assert!(frame.width <= 475.2 + 0.01);
    assert!((frame.width / frame.height - 6.0).abs() < 0.05);
}

#[test]
fn corrupt_photo_fails_the_whole_report() {
    let photos = vec![
        attachment(AttachmentRole::Photo, "ok.png", png_bytes(10, 10)),
        attachment(AttachmentRole::Photo, "broken.jpg", b"\xFF\xD8 not really".to_vec()),
    ];
    let err = report::generate(&minimal_event(), &photos, &AttendanceSheet::empty(), 1200)
        .unwrap_err();
    match err {
        ReportError::AssetDecode { role, filename, .. } => {
            assert_eq!(role, AttachmentRole::Photo);
            assert_eq!(filename, "broken.jpg");
        }
        other => panic!("expected AssetDecode, got {other:?}"),
    }
}

#[test]
fn participant_count_falls_back_to_attendance_size() {
    let sheet = AttendanceSheet::manual(vec![
        AttendeeRecord::new("Asha", ""),
        AttendeeRecord::new("Ravi", ""),
        AttendeeRecord::new("Meera", ""),
    ]);
    let report = report::generate(&minimal_event(), &[], &sheet, 1200).expect("generate");

    let details: Vec<Vec<String>> = report
        .pages
        .iter()
        .flat_map(|p| p.rows(TableKind::Details))
        .map(|r| r.texts.iter().map(|t| t.text.clone()).collect())
        .collect();
    assert!(
        details
            .iter()
            .any(|cells| cells.first().map(String::as_str) == Some("No. of Participants")
                && cells.last().map(String::as_str) == Some("3")),
        "{details:?}"
    );
    // ID column is dropped when nobody has one
    let header = report
        .pages
        .iter()
        .flat_map(|p| p.rows(TableKind::Attendance))
        .find(|r| r.header)
        .expect("attendance header");
    assert_eq!(header.cells.len(), 1);
}

#[test]
fn oversized_attendance_header_does_not_stall_the_report() {
    let csv = format!("Name,ID,{}\nAsha,R1,x\n", "w".repeat(5000));
    let sheet = parse_tabular(&csv_upload(&csv), BlankRowPolicy::Skip).expect("parse csv");
    let report = report::generate(&minimal_event(), &[], &sheet, 1200).expect("generate");

    assert!(report.page_count() < 30, "{} pages", report.page_count());
    assert!(report_text(&report).contains("Asha"));
    assert!(report.pdf.starts_with(b"%PDF"));
}
