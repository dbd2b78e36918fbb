use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use crate::config::AppConfig;
use crate::csrf;
use crate::errors::{render, render_with_status, AppError};
use crate::intake::{self, FormValues};
use crate::report::{self, Report};
use crate::templates_structs::ReportFormTemplate;

/// GET /: the blank report form.
pub async fn form(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let tmpl = ReportFormTemplate::new(
        csrf::issue_token(&session),
        &config,
        FormValues::default(),
        vec![],
    );
    render(tmpl)
}

/// POST /report: build the PDF from the multipart submission.
///
/// Validation, attendance and image problems re-render the form (422) with
/// the submitted text kept; uploads must be chosen again.
pub async fn generate(
    session: Session,
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let submission = intake::read_submission(payload, &config).await?;
    csrf::verify(&session, submission.csrf_token.as_deref())?;

    let values = submission.values.clone();
    let worker_config = config.clone();
    let result =
        web::block(move || report::from_submission(&submission, &worker_config)).await?;

    match result {
        Ok(report) => Ok(pdf_response(report)),
        Err(e) => {
            log::warn!("Report rejected: {e}");
            let tmpl = ReportFormTemplate::new(
                csrf::issue_token(&session),
                &config,
                values,
                e.messages(),
            );
            render_with_status(tmpl, StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

fn pdf_response(report: Report) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(report.filename)],
        })
        .body(report.pdf)
}
