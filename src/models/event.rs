use chrono::NaiveDate;

/// Letterhead printed at the top of the first page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Institution {
    pub university: String,
    pub school: String,
    pub department: String,
}

/// Inclusive date range of the activity. `end` is never before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns None when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// "12 Mar 2025" or "12 Mar 2025 to 14 Mar 2025".
    pub fn display(&self) -> String {
        let fmt = "%d %b %Y";
        if self.start == self.end {
            self.start.format(fmt).to_string()
        } else {
            format!("{} to {}", self.start.format(fmt), self.end.format(fmt))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDetails {
    pub kind: String,
    pub title: String,
    pub dates: DateRange,
    pub time: String,
    pub venue: String,
    pub collaboration: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerDetails {
    pub name: String,
    pub position: String,
    pub organization: String,
    pub presentation_title: String,
    pub profile: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantsProfile {
    pub kind: String,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Synopsis {
    pub highlights: String,
    pub key_takeaways: String,
    pub summary: String,
    pub follow_up_plan: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedBy {
    pub name: String,
    pub designation: String,
}

/// Everything typed into the report form, validated. Built once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInfo {
    pub institution: Institution,
    pub activity: ActivityDetails,
    pub organizers: Vec<String>,
    pub speaker: SpeakerDetails,
    pub participants: ParticipantsProfile,
    pub synopsis: Synopsis,
    pub prepared_by: PreparedBy,
    pub photo_caption: String,
}

impl EventInfo {
    /// Minimal event with only the required fields set.
    pub fn new(title: &str, department: &str, dates: DateRange) -> Self {
        Self {
            institution: Institution {
                department: department.to_string(),
                ..Institution::default()
            },
            activity: ActivityDetails {
                kind: String::new(),
                title: title.to_string(),
                dates,
                time: String::new(),
                venue: String::new(),
                collaboration: String::new(),
            },
            organizers: Vec::new(),
            speaker: SpeakerDetails::default(),
            participants: ParticipantsProfile::default(),
            synopsis: Synopsis::default(),
            prepared_by: PreparedBy::default(),
            photo_caption: String::new(),
        }
    }
}
