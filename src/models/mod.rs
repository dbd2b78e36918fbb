pub mod attachment;
pub mod attendee;
pub mod event;

pub use attachment::{Attachment, AttachmentRole};
pub use attendee::{AttendanceSheet, AttendeeRecord};
pub use event::*;
