use crate::config::BlankRowPolicy;
use crate::errors::ReportError;
use crate::models::{AttendanceSheet, AttendeeRecord};

/// Build the sheet from the repeated `attendee_name`/`attendee_id` fields
/// followed by the names typed into the free-text box.
pub fn resolve_manual(
    names: &[String],
    ids: &[String],
    attendance_text: &str,
    policy: BlankRowPolicy,
) -> Result<AttendanceSheet, ReportError> {
    let mut records = Vec::new();
    let rows = names.len().max(ids.len());

    for i in 0..rows {
        let name = names.get(i).map(|s| s.trim()).unwrap_or_default();
        let id = ids.get(i).map(|s| s.trim()).unwrap_or_default();

        if name.is_empty() && id.is_empty() {
            continue;
        }
        if name.is_empty() {
            match policy {
                BlankRowPolicy::Skip => {
                    log::debug!("Skipping attendee row {} with ID '{id}' but no name", i + 1);
                    continue;
                }
                BlankRowPolicy::Reject => {
                    return Err(ReportError::validation(format!(
                        "Attendee row {} has an ID ('{id}') but no name",
                        i + 1
                    )));
                }
            }
        }
        records.push(AttendeeRecord::new(name, id));
    }

    records.extend(
        parse_attendance_text(attendance_text)
            .into_iter()
            .map(|name| AttendeeRecord::new(name, "")),
    );

    Ok(AttendanceSheet::manual(records))
}

/// One name per line; a line with commas holds several names.
pub fn parse_attendance_text(text: &str) -> Vec<String> {
    text.lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn groups_pair_by_position_and_skip_blank_rows() {
        let sheet = resolve_manual(
            &strings(&["Asha", "", "Ravi"]),
            &strings(&["21CS01", "", "21CS02"]),
            "",
            BlankRowPolicy::Reject,
        )
        .unwrap();
        assert_eq!(
            sheet.records,
            vec![
                AttendeeRecord::new("Asha", "21CS01"),
                AttendeeRecord::new("Ravi", "21CS02"),
            ]
        );
        assert_eq!(sheet.identifier_label.as_deref(), Some("ID"));
    }

    #[test]
    fn id_without_name_follows_policy() {
        let names = strings(&["Asha", ""]);
        let ids = strings(&["1", "2"]);

        let skipped = resolve_manual(&names, &ids, "", BlankRowPolicy::Skip).unwrap();
        assert_eq!(skipped.len(), 1);

        let rejected = resolve_manual(&names, &ids, "", BlankRowPolicy::Reject);
        assert!(matches!(rejected, Err(ReportError::Validation(_))));
    }

    #[test]
    fn free_text_splits_lines_and_commas() {
        assert_eq!(
            parse_attendance_text("Asha, Ravi\n\n  Meera  \n,"),
            vec!["Asha", "Ravi", "Meera"]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let sheet =
            resolve_manual(&[], &[], "Asha\nAsha", BlankRowPolicy::Skip).unwrap();
        assert_eq!(sheet.len(), 2);
        assert!(sheet.identifier_label.is_none());
    }
}
