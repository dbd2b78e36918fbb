//! Attendance resolution: a tabular upload wins over manual entries, unless
//! it parses to zero attendees.

pub mod manual;
pub mod tabular;

use crate::config::BlankRowPolicy;
use crate::errors::ReportError;
use crate::intake::ReportSubmission;
use crate::models::AttendanceSheet;

pub use manual::{parse_attendance_text, resolve_manual};
pub use tabular::parse_tabular;

/// Resolve the attendance list for one submission.
pub fn resolve(
    submission: &ReportSubmission,
    policy: BlankRowPolicy,
) -> Result<AttendanceSheet, ReportError> {
    if let Some(upload) = &submission.attendance_file {
        let sheet = parse_tabular(upload, policy)?;
        if !sheet.is_empty() {
            log::info!(
                "Attendance: {} record(s) from '{}'",
                sheet.len(),
                upload.filename
            );
            return Ok(sheet);
        }
        log::info!(
            "Attendance file '{}' has no attendees, using manual entries",
            upload.filename
        );
    }

    let sheet = resolve_manual(
        &submission.attendee_names,
        &submission.attendee_ids,
        &submission.values.attendance_text,
        policy,
    )?;
    log::info!("Attendance: {} manual record(s)", sheet.len());
    Ok(sheet)
}
