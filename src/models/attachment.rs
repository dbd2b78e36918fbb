use std::fmt;

/// What an uploaded image is used for in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentRole {
    Flyer,
    Approval,
    Photo,
    SpeakerPortrait,
    ImpactReport,
    FeedbackScreenshot,
}

impl AttachmentRole {
    /// Map a multipart field name onto a role. `photo_1`..`photo_5` and
    /// `feedback_ss_1`..`feedback_ss_5` are the numbered slots.
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "flyer" => Some(Self::Flyer),
            "approval_letter" => Some(Self::Approval),
            "speaker_image" => Some(Self::SpeakerPortrait),
            "impact_analysis_report" => Some(Self::ImpactReport),
            _ => {
                if numbered_slot(name, "photo_") {
                    Some(Self::Photo)
                } else if numbered_slot(name, "feedback_ss_") {
                    Some(Self::FeedbackScreenshot)
                } else {
                    None
                }
            }
        }
    }

    /// Upper bound on attachments with this role per submission.
    pub fn max_count(&self) -> usize {
        match self {
            Self::Photo | Self::FeedbackScreenshot => 5,
            _ => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flyer => "flyer",
            Self::Approval => "approval letter",
            Self::Photo => "photo",
            Self::SpeakerPortrait => "speaker image",
            Self::ImpactReport => "impact analysis report",
            Self::FeedbackScreenshot => "feedback screenshot",
        }
    }
}

impl fmt::Display for AttachmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn numbered_slot(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| (1..=5).contains(&n))
}

/// An uploaded file, held in memory for the lifetime of the request.
#[derive(Clone, PartialEq)]
pub struct Attachment {
    pub role: AttachmentRole,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("role", &self.role)
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}
