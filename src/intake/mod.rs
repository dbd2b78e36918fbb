//! Intake: turn a multipart form submission into typed, request-owned values.
//!
//! `multipart` reads the raw stream into a [`ReportSubmission`]; `validate`
//! checks it and builds the [`EventInfo`](crate::models::EventInfo).

pub mod multipart;
pub mod validate;

use std::path::Path;

use crate::models::{Attachment, AttachmentRole};

pub use multipart::read_submission;
pub use validate::build_event_info;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];
pub const ATTENDANCE_EXTENSIONS: &[&str] = &["xlsx", "xls", "ods", "csv"];

/// The text fields the report form knows about. Anything else posted
/// alongside is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub university: String,
    pub school: String,
    pub department: String,
    pub activity_type: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub time: String,
    pub venue: String,
    pub collaboration: String,
    pub organizers: String,
    pub speaker_name: String,
    pub speaker_position: String,
    pub speaker_organization: String,
    pub presentation_title: String,
    pub profile_text: String,
    pub participant_type: String,
    pub participant_count: String,
    pub highlights: String,
    pub key_takeaways: String,
    pub summary: String,
    pub follow_up_plan: String,
    pub prepared_by_name: String,
    pub prepared_by_designation: String,
    pub caption: String,
    pub attendance_text: String,
}

impl FormValues {
    /// Store a recognised field. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "university" => &mut self.university,
            "school" => &mut self.school,
            "department" => &mut self.department,
            "activity_type" => &mut self.activity_type,
            "title" => &mut self.title,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
            "time" => &mut self.time,
            "venue" => &mut self.venue,
            "collaboration" => &mut self.collaboration,
            "organizers" => &mut self.organizers,
            "speaker_name" => &mut self.speaker_name,
            "speaker_position" => &mut self.speaker_position,
            "speaker_organization" => &mut self.speaker_organization,
            "presentation_title" => &mut self.presentation_title,
            "profile_text" => &mut self.profile_text,
            "participant_type" => &mut self.participant_type,
            "participant_count" => &mut self.participant_count,
            "highlights" => &mut self.highlights,
            "key_takeaways" => &mut self.key_takeaways,
            "summary" => &mut self.summary,
            "follow_up_plan" => &mut self.follow_up_plan,
            "prepared_by_name" => &mut self.prepared_by_name,
            "prepared_by_designation" => &mut self.prepared_by_designation,
            "caption" => &mut self.caption,
            "attendance_text" => &mut self.attendance_text,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// A spreadsheet or CSV upload, not yet parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl AttendanceUpload {
    pub fn extension(&self) -> String {
        file_extension(&self.filename)
    }
}

/// One complete form submission, before validation.
#[derive(Debug, Clone, Default)]
pub struct ReportSubmission {
    pub values: FormValues,
    pub csrf_token: Option<String>,
    /// Repeated `attendee_name` / `attendee_id` fields, paired by position.
    pub attendee_names: Vec<String>,
    pub attendee_ids: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub attendance_file: Option<AttendanceUpload>,
    /// Problems found while reading uploads (bad extension, too large, too many).
    pub upload_errors: Vec<String>,
}

impl ReportSubmission {
    pub fn accept_text(&mut self, name: &str, value: String) {
        match name {
            "csrf_token" => self.csrf_token = Some(value),
            "attendee_name" => self.attendee_names.push(value),
            "attendee_id" => self.attendee_ids.push(value),
            _ => {
                if !self.values.set(name, value) {
                    log::debug!("Ignoring unrecognised form field '{name}'");
                }
            }
        }
    }

    /// Route an uploaded file by field name. Empty file inputs (no filename
    /// or no bytes) mean "nothing chosen" and are dropped.
    pub fn accept_file(&mut self, name: &str, filename: String, bytes: Vec<u8>) {
        if filename.trim().is_empty() || bytes.is_empty() {
            return;
        }

        if name == "attendance_file" || name == "attendance_excel" {
            let upload = AttendanceUpload { filename, bytes };
            if !ATTENDANCE_EXTENSIONS.contains(&upload.extension().as_str()) {
                self.upload_errors.push(format!(
                    "Attendance file '{}' must be one of: {}",
                    upload.filename,
                    ATTENDANCE_EXTENSIONS.join(", ")
                ));
                return;
            }
            self.attendance_file = Some(upload);
            return;
        }

        let Some(role) = AttachmentRole::from_field(name) else {
            log::debug!("Ignoring file in unrecognised field '{name}'");
            return;
        };

        if !IMAGE_EXTENSIONS.contains(&file_extension(&filename).as_str()) {
            self.upload_errors.push(format!(
                "The {role} '{filename}' must be one of: {}",
                IMAGE_EXTENSIONS.join(", ")
            ));
            return;
        }

        let already = self.attachments.iter().filter(|a| a.role == role).count();
        if already >= role.max_count() {
            self.upload_errors
                .push(format!("At most {} {role} file(s) may be uploaded", role.max_count()));
            return;
        }

        self.attachments.push(Attachment {
            role,
            filename,
            bytes,
        });
    }
}

/// Lowercased extension without the dot, or "" when there is none.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_text_fields_are_ignored() {
        let mut sub = ReportSubmission::default();
        sub.accept_text("title", "Workshop".to_string());
        sub.accept_text("is_admin", "true".to_string());
        assert_eq!(sub.values.title, "Workshop");
        assert_eq!(sub.values, FormValues { title: "Workshop".to_string(), ..FormValues::default() });
    }

    #[test]
    fn empty_file_inputs_are_dropped() {
        let mut sub = ReportSubmission::default();
        sub.accept_file("flyer", String::new(), Vec::new());
        sub.accept_file("flyer", "flyer.png".to_string(), Vec::new());
        assert!(sub.attachments.is_empty());
        assert!(sub.upload_errors.is_empty());
    }

    #[test]
    fn wrong_extension_is_reported() {
        let mut sub = ReportSubmission::default();
        sub.accept_file("photo_1", "notes.pdf".to_string(), vec![1, 2, 3]);
        sub.accept_file("attendance_file", "list.txt".to_string(), vec![1]);
        assert!(sub.attachments.is_empty());
        assert!(sub.attendance_file.is_none());
        assert_eq!(sub.upload_errors.len(), 2);
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(file_extension("Photo.JPG"), "jpg");
        assert_eq!(file_extension("noext"), "");
    }
}
