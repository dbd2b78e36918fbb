use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::models::AttachmentRole;

/// Failures of the report pipeline. All of them come from the submitted
/// data and are shown back on the form.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Attendance file could not be read: {0}")]
    AttendanceFormat(String),

    #[error("The {role} '{filename}' is not a readable image: {reason}")]
    AssetDecode {
        role: AttachmentRole,
        filename: String,
        reason: String,
    },
}

impl ReportError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ReportError::Validation(vec![msg.into()])
    }

    /// Messages suitable for the form's error list.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ReportError::Validation(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Template(askama::Error),
    Multipart(String),
    Csrf(String),
    Blocking(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Multipart(e) => write!(f, "Malformed upload: {e}"),
            AppError::Csrf(e) => write!(f, "CSRF error: {e}"),
            AppError::Blocking(e) => write!(f, "Worker error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Csrf(_) => {
                log::warn!("{self}");
                HttpResponse::Forbidden().body("Invalid or missing CSRF token")
            }
            AppError::Multipart(_) => {
                log::warn!("{self}");
                HttpResponse::BadRequest().body(self.to_string())
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        AppError::Multipart(e.to_string())
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Blocking(e.to_string())
    }
}

/// Render a template into a 200 HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Render a template with a non-200 status, e.g. a form re-shown with errors.
pub fn render_with_status(
    tmpl: impl Template,
    status: actix_web::http::StatusCode,
) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}
