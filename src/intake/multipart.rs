use actix_multipart::Multipart;
use futures_util::StreamExt;

use crate::config::AppConfig;
use crate::errors::AppError;

use super::ReportSubmission;

/// Drain a multipart body into a [`ReportSubmission`].
///
/// Everything is buffered in memory; nothing touches the filesystem. A file
/// over `max_upload_bytes` is recorded as an upload error and discarded, a
/// body over `max_request_bytes` aborts the read.
pub async fn read_submission(
    mut payload: Multipart,
    config: &AppConfig,
) -> Result<ReportSubmission, AppError> {
    let mut submission = ReportSubmission::default();
    let mut total: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        let mut oversized = false;
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            total += chunk.len();
            if total > config.max_request_bytes {
                return Err(AppError::Multipart(format!(
                    "request body exceeds {} bytes",
                    config.max_request_bytes
                )));
            }
            if oversized {
                continue;
            }
            if bytes.len() + chunk.len() > config.max_upload_bytes {
                oversized = true;
                bytes.clear();
                continue;
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) if oversized => {
                submission.upload_errors.push(format!(
                    "'{filename}' is larger than the {} MB upload limit",
                    config.max_upload_bytes / (1024 * 1024)
                ));
            }
            Some(filename) => submission.accept_file(&name, filename, bytes),
            None if oversized => {
                submission
                    .upload_errors
                    .push(format!("Field '{name}' is too long"));
            }
            None => {
                let value = String::from_utf8_lossy(&bytes).into_owned();
                submission.accept_text(&name, value);
            }
        }
    }

    log::debug!(
        "Read submission: {} bytes, {} attachment(s), attendance file: {}",
        total,
        submission.attachments.len(),
        submission.attendance_file.is_some()
    );
    Ok(submission)
}
