/// One row of attendance. Extra columns keep the order they had in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeRecord {
    pub name: String,
    pub identifier: String,
    pub extra: Vec<(String, String)>,
}

impl AttendeeRecord {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            extra: Vec::new(),
        }
    }
}

/// Resolved attendance for one request: the column labels used for the
/// table header, plus the records in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheet {
    pub name_label: String,
    pub identifier_label: Option<String>,
    pub extra_labels: Vec<String>,
    pub records: Vec<AttendeeRecord>,
}

impl AttendanceSheet {
    pub const DEFAULT_NAME_LABEL: &'static str = "Participant Name";
    pub const DEFAULT_ID_LABEL: &'static str = "ID";

    /// Sheet for manually entered rows. The ID column only appears when at
    /// least one attendee has an identifier.
    pub fn manual(records: Vec<AttendeeRecord>) -> Self {
        let identifier_label = records
            .iter()
            .any(|r| !r.identifier.is_empty())
            .then(|| Self::DEFAULT_ID_LABEL.to_string());
        Self {
            name_label: Self::DEFAULT_NAME_LABEL.to_string(),
            identifier_label,
            extra_labels: Vec::new(),
            records,
        }
    }

    pub fn empty() -> Self {
        Self::manual(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Header cells in display order.
    pub fn columns(&self) -> Vec<String> {
        let mut cols = vec![self.name_label.clone()];
        if let Some(id) = &self.identifier_label {
            cols.push(id.clone());
        }
        cols.extend(self.extra_labels.iter().cloned());
        cols
    }

    /// Cells for one record, aligned with `columns()`. Missing extras render blank.
    pub fn row_cells(&self, record: &AttendeeRecord) -> Vec<String> {
        let mut cells = vec![record.name.clone()];
        if self.identifier_label.is_some() {
            cells.push(record.identifier.clone());
        }
        for label in &self.extra_labels {
            let value = record
                .extra
                .iter()
                .find(|(k, _)| k == label)
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            cells.push(value);
        }
        cells
    }
}
