//! The report as an ordered list of blocks, before any page is decided.

use crate::models::{AttachmentRole, AttendanceSheet, EventInfo};

use super::assets::PreparedImage;
use super::text::{Face, TextStyle};

pub const HEADER_MAIN: TextStyle = TextStyle::new(Face::Bold, 16.0, 19.2);
pub const HEADER_SUB: TextStyle = TextStyle::new(Face::Regular, 10.0, 12.0);
pub const REPORT_TITLE: TextStyle = TextStyle::new(Face::Bold, 12.0, 14.4);
pub const SECTION_TITLE: TextStyle = TextStyle::new(Face::Bold, 10.0, 12.0);
pub const NORMAL: TextStyle = TextStyle::new(Face::Regular, 10.0, 14.0);
pub const TABLE_TEXT: TextStyle = TextStyle::new(Face::Regular, 10.0, 12.0);

/// Fraction of the content width given to the key column of detail tables.
const KEY_COLUMN: f32 = 0.314;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Details,
    Attendance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: TableKind,
    /// Column widths as fractions of the content width.
    pub columns: Vec<f32>,
    /// Repeated at the top of every page the table continues on.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    pub bold_first_column: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text {
        text: String,
        style: TextStyle,
        align: Align,
        space_before: f32,
        space_after: f32,
        /// Start a new page rather than strand this block at the bottom.
        keep_with_next: bool,
    },
    Spacer(f32),
    Table(Table),
    /// Index into the prepared image list.
    Image(usize),
}

fn text(text: impl Into<String>, style: TextStyle, align: Align, after: f32) -> Block {
    Block::Text {
        text: text.into(),
        style,
        align,
        space_before: 0.0,
        space_after: after,
        keep_with_next: false,
    }
}

fn section(title: &str) -> Block {
    Block::Text {
        text: title.to_string(),
        style: SECTION_TITLE,
        align: Align::Left,
        space_before: 14.0,
        space_after: 6.0,
        keep_with_next: true,
    }
}

fn paragraph(body: impl Into<String>) -> [Block; 2] {
    [text(body, NORMAL, Align::Left, 0.0), Block::Spacer(5.76)]
}

fn details(rows: &[(&str, String)]) -> [Block; 2] {
    [
        Block::Table(Table {
            kind: TableKind::Details,
            columns: vec![KEY_COLUMN, 1.0 - KEY_COLUMN],
            header: None,
            rows: rows
                .iter()
                .map(|(k, v)| vec![k.to_string(), v.clone()])
                .collect(),
            bold_first_column: true,
        }),
        Block::Spacer(5.76),
    ]
}

fn attendance_table(sheet: &AttendanceSheet) -> Table {
    let columns = sheet.columns();
    let weights: Vec<f32> = (0..columns.len())
        .map(|i| if i == 0 { 3.0 } else { 2.0 })
        .collect();
    let total: f32 = weights.iter().sum();
    Table {
        kind: TableKind::Attendance,
        columns: weights.iter().map(|w| w / total).collect(),
        header: Some(columns),
        rows: sheet.records.iter().map(|r| sheet.row_cells(r)).collect(),
        bold_first_column: false,
    }
}

/// Image blocks for one role in upload order, or the placeholder sentence.
fn images_or(
    out: &mut Vec<Block>,
    images: &[PreparedImage],
    role: AttachmentRole,
    placeholder: &str,
) {
    let mut any = false;
    for (i, img) in images.iter().enumerate() {
        if img.role == role {
            out.push(Block::Image(i));
            out.push(Block::Spacer(8.64));
            any = true;
        }
    }
    if !any {
        out.extend(paragraph(placeholder));
    }
}

/// Lay the report out as blocks, in the fixed section order.
pub fn build_story(
    event: &EventInfo,
    attendance: &AttendanceSheet,
    images: &[PreparedImage],
) -> Vec<Block> {
    let mut story = Vec::new();
    let inst = &event.institution;
    let act = &event.activity;

    story.push(text(&inst.university, HEADER_MAIN, Align::Center, 8.0));
    if !inst.school.is_empty() {
        story.push(text(&inst.school, HEADER_SUB, Align::Center, 4.0));
    }
    if !inst.department.is_empty() {
        story.push(text(&inst.department, HEADER_SUB, Align::Center, 4.0));
    }
    story.push(Block::Spacer(14.4));
    story.push(text("Activity Report", REPORT_TITLE, Align::Center, 12.0));

    story.push(section("General Information"));
    story.extend(details(&[
        ("Type of Activity", act.kind.clone()),
        ("Title of the Activity", act.title.clone()),
        ("Date/s", act.dates.display()),
        ("Time", act.time.clone()),
        ("Venue", act.venue.clone()),
        ("Organized by", event.organizers.join(", ")),
        ("Collaboration/Sponsor (if any)", act.collaboration.clone()),
    ]));

    let speaker = &event.speaker;
    story.push(section("Speaker/Guest/Presenter Details"));
    story.extend(details(&[
        ("Name", speaker.name.clone()),
        ("Title/Position", speaker.position.clone()),
        ("Organization", speaker.organization.clone()),
        ("Title of Presentation", speaker.presentation_title.clone()),
    ]));

    let count = match event.participants.count {
        Some(n) => n.to_string(),
        None if !attendance.is_empty() => attendance.len().to_string(),
        None => String::new(),
    };
    story.push(section("Participants Profile"));
    story.extend(details(&[
        ("Type of Participants", event.participants.kind.clone()),
        ("No. of Participants", count),
    ]));

    let synopsis = &event.synopsis;
    story.push(section("Synopsis of the Activity (Description)"));
    story.extend(details(&[
        ("Highlights of the Activity (Description)", synopsis.highlights.clone()),
        ("Key Takeaways", synopsis.key_takeaways.clone()),
        ("Summary of the Activity", synopsis.summary.clone()),
        ("Follow-up plan", synopsis.follow_up_plan.clone()),
    ]));

    story.push(section("Report Prepared By"));
    story.extend(details(&[
        ("Name", event.prepared_by.name.clone()),
        ("Designation/Title", event.prepared_by.designation.clone()),
    ]));

    let portrait = images
        .iter()
        .position(|img| img.role == AttachmentRole::SpeakerPortrait);
    if !speaker.profile.is_empty() || portrait.is_some() {
        story.push(section("Speaker Profile"));
        if !speaker.profile.is_empty() {
            story.extend(paragraph(speaker.profile.clone()));
        }
        if let Some(i) = portrait {
            story.push(Block::Image(i));
            story.push(Block::Spacer(8.64));
        }
    }

    story.push(section("Photos of the Activity"));
    images_or(&mut story, images, AttachmentRole::Photo, "No photos provided.");
    if !event.photo_caption.is_empty() {
        story.extend(paragraph(event.photo_caption.clone()));
    }

    story.push(section("Attendance List"));
    if attendance.is_empty() {
        story.extend(paragraph("No attendance records provided."));
    } else {
        story.push(Block::Table(attendance_table(attendance)));
        story.push(Block::Spacer(8.64));
    }

    story.push(section("Flyer of the Event"));
    images_or(&mut story, images, AttachmentRole::Flyer, "No flyer uploaded.");

    story.push(section("Approval Letter"));
    images_or(
        &mut story,
        images,
        AttachmentRole::Approval,
        "No approval letter uploaded.",
    );

    story.push(section("Feedback Screenshots"));
    images_or(
        &mut story,
        images,
        AttachmentRole::FeedbackScreenshot,
        "No feedback screenshots uploaded.",
    );

    story.push(section("Impact Analysis Report"));
    images_or(
        &mut story,
        images,
        AttachmentRole::ImpactReport,
        "No impact analysis report uploaded.",
    );

    story
}
