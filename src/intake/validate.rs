use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::errors::ReportError;
use crate::models::{
    ActivityDetails, DateRange, EventInfo, Institution, ParticipantsProfile, PreparedBy,
    SpeakerDetails, Synopsis,
};

use super::FormValues;

const SHORT_TEXT: usize = 300;
const LONG_TEXT: usize = 20_000;

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    if value.trim().chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Parse a `YYYY-MM-DD` date as sent by `<input type="date">`.
pub fn parse_date(value: &str, field_name: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{field_name} must be a date in YYYY-MM-DD format"))
}

/// Split a comma/newline separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Check every form field and build the [`EventInfo`]. All problems are
/// reported together, along with any collected while reading uploads.
pub fn build_event_info(
    values: &FormValues,
    upload_errors: &[String],
    config: &AppConfig,
) -> Result<EventInfo, ReportError> {
    let mut errors: Vec<String> = upload_errors.to_vec();

    errors.extend(validate_required(&values.title, "Title of the activity", SHORT_TEXT));
    errors.extend(validate_required(&values.department, "Department", SHORT_TEXT));

    let short_fields = [
        (&values.university, "University"),
        (&values.school, "School"),
        (&values.activity_type, "Type of activity"),
        (&values.time, "Time"),
        (&values.venue, "Venue"),
        (&values.collaboration, "Collaboration/Sponsor"),
        (&values.speaker_name, "Speaker name"),
        (&values.speaker_position, "Speaker title/position"),
        (&values.speaker_organization, "Speaker organization"),
        (&values.presentation_title, "Title of presentation"),
        (&values.participant_type, "Type of participants"),
        (&values.prepared_by_name, "Prepared by (name)"),
        (&values.prepared_by_designation, "Prepared by (designation)"),
    ];
    for (value, label) in short_fields {
        errors.extend(validate_optional(value, label, SHORT_TEXT));
    }

    let long_fields = [
        (&values.organizers, "Organizers"),
        (&values.profile_text, "Speaker profile"),
        (&values.highlights, "Highlights"),
        (&values.key_takeaways, "Key takeaways"),
        (&values.summary, "Summary"),
        (&values.follow_up_plan, "Follow-up plan"),
        (&values.caption, "Photo caption"),
        (&values.attendance_text, "Attendance list"),
    ];
    for (value, label) in long_fields {
        errors.extend(validate_optional(value, label, LONG_TEXT));
    }

    let dates = match validate_dates(&values.start_date, &values.end_date) {
        Ok(d) => Some(d),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let count = match values.participant_count.trim() {
        "" => None,
        raw => match raw.parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => {
                errors.push("No. of participants must be a whole number".to_string());
                None
            }
        },
    };

    let Some(dates) = dates else {
        return Err(ReportError::Validation(errors));
    };
    if !errors.is_empty() {
        return Err(ReportError::Validation(errors));
    }

    let university = match values.university.trim() {
        "" => config.default_university.clone(),
        u => u.to_string(),
    };

    Ok(EventInfo {
        institution: Institution {
            university,
            school: values.school.trim().to_string(),
            department: values.department.trim().to_string(),
        },
        activity: ActivityDetails {
            kind: values.activity_type.trim().to_string(),
            title: values.title.trim().to_string(),
            dates,
            time: values.time.trim().to_string(),
            venue: values.venue.trim().to_string(),
            collaboration: values.collaboration.trim().to_string(),
        },
        organizers: split_list(&values.organizers),
        speaker: SpeakerDetails {
            name: values.speaker_name.trim().to_string(),
            position: values.speaker_position.trim().to_string(),
            organization: values.speaker_organization.trim().to_string(),
            presentation_title: values.presentation_title.trim().to_string(),
            profile: values.profile_text.trim().to_string(),
        },
        participants: ParticipantsProfile {
            kind: values.participant_type.trim().to_string(),
            count,
        },
        synopsis: Synopsis {
            highlights: values.highlights.trim().to_string(),
            key_takeaways: values.key_takeaways.trim().to_string(),
            summary: values.summary.trim().to_string(),
            follow_up_plan: values.follow_up_plan.trim().to_string(),
        },
        prepared_by: PreparedBy {
            name: values.prepared_by_name.trim().to_string(),
            designation: values.prepared_by_designation.trim().to_string(),
        },
        photo_caption: values.caption.trim().to_string(),
    })
}

fn validate_dates(start: &str, end: &str) -> Result<DateRange, String> {
    if start.trim().is_empty() {
        return Err("Start date is required".to_string());
    }
    let start = parse_date(start, "Start date")?;
    if end.trim().is_empty() {
        return Ok(DateRange::single(start));
    }
    let end = parse_date(end, "End date")?;
    DateRange::new(start, end).ok_or_else(|| "End date cannot be before the start date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_whitespace() {
        assert!(validate_required("   ", "Title", 10).is_some());
        assert!(validate_required("ok", "Title", 10).is_none());
        assert!(validate_required("0123456789x", "Title", 10).is_some());
    }

    #[test]
    fn split_list_handles_commas_and_newlines() {
        assert_eq!(
            split_list("Dr. A, Dr. B\n\n Club C "),
            vec!["Dr. A", "Dr. B", "Club C"]
        );
    }

    #[test]
    fn end_date_defaults_to_start() {
        let range = validate_dates("2025-03-12", "").unwrap();
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = validate_dates("2025-03-12", "2025-03-10").unwrap_err();
        assert!(err.contains("before"));
    }
}
