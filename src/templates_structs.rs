use askama::Template;

use crate::config::AppConfig;
use crate::intake::FormValues;

pub const APP_NAME: &str = "Activity Report Generator";

#[derive(Template)]
#[template(path = "report_form.html")]
pub struct ReportFormTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub default_university: String,
    pub values: FormValues,
    pub errors: Vec<String>,
}

impl ReportFormTemplate {
    pub fn new(
        csrf_token: String,
        config: &AppConfig,
        values: FormValues,
        errors: Vec<String>,
    ) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            csrf_token,
            default_university: config.default_university.clone(),
            values,
            errors,
        }
    }
}
