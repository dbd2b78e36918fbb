//! Document assembly: prepared images + story blocks → pages → PDF bytes.

pub mod assets;
pub mod layout;
pub mod render;
pub mod story;
pub mod text;

use chrono::Local;

use crate::attendance;
use crate::config::AppConfig;
use crate::errors::ReportError;
use crate::intake::{self, ReportSubmission};
use crate::models::{Attachment, AttendanceSheet, EventInfo};

pub use layout::{DrawOp, Page, PageGeometry};
pub use story::TableKind;

/// The generated document. Built once, never modified.
#[derive(Debug, Clone)]
pub struct Report {
    pub filename: String,
    pub pages: Vec<Page>,
    pub pdf: Vec<u8>,
}

impl Report {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Generate the PDF for one event. Any undecodable attachment fails the
/// whole report; nothing partial is returned.
pub fn generate(
    event: &EventInfo,
    attachments: &[Attachment],
    attendance: &AttendanceSheet,
    max_image_px: u32,
) -> Result<Report, ReportError> {
    let images = assets::prepare_all(attachments, max_image_px)?;
    let geo = PageGeometry::A4;
    let story = story::build_story(event, attendance, &images);
    let pages = layout::paginate(&story, &images, &geo);

    let info = render::DocumentInfo {
        title: format!("{} \u{2013} Activity Report", event.activity.title),
        created: Local::now(),
    };
    let pdf = render::render_pdf(&pages, &images, &geo, &info);

    log::info!(
        "Generated report '{}': {} page(s), {} image(s), {} attendee(s), {} bytes",
        event.activity.title,
        pages.len(),
        images.len(),
        attendance.len(),
        pdf.len()
    );

    Ok(Report {
        filename: download_filename(event),
        pages,
        pdf,
    })
}

/// Run the whole pipeline for a submission: validate, resolve attendance,
/// assemble the document.
pub fn from_submission(
    submission: &ReportSubmission,
    config: &AppConfig,
) -> Result<Report, ReportError> {
    let event = intake::build_event_info(&submission.values, &submission.upload_errors, config)?;
    let sheet = attendance::resolve(submission, config.blank_rows)?;
    generate(&event, &submission.attachments, &sheet, config.max_image_px)
}

/// `<title>_<start date>_Report.pdf`, restricted to filesystem-safe ASCII.
pub fn download_filename(event: &EventInfo) -> String {
    let mut stem: String = event
        .activity
        .title
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    while stem.contains("__") {
        stem = stem.replace("__", "_");
    }
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "Activity" } else { stem };
    let stem: String = stem.chars().take(80).collect();
    format!(
        "{}_{}_Report.pdf",
        stem,
        event.activity.dates.start.format("%Y-%m-%d")
    )
}
