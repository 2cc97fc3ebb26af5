use crate::app::error::RenderError;
use crate::reporter::aggregate::Summary;
use crate::reporter::context::RunContext;
use derivative::*;
use liquid::{ParserBuilder, Template};
use serde_derive::Serialize;

const HTML_TEMPLATE: &str = include_str!("templates/report.html.liquid");
const TEXT_TEMPLATE: &str = include_str!("templates/report.txt.liquid");

/// Pass rates at or below this many percent get no label inside the progress bar
const PROGRESS_LABEL_THRESHOLD: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Renderer {
    #[derivative(Debug = "ignore")]
    html: Template,
    #[derivative(Debug = "ignore")]
    text: Template,
}

#[derive(Debug, Serialize)]
struct ReportView<'a> {
    title: &'a str,
    status: String,
    status_icon: &'static str,
    status_class: &'static str,
    total: u64,
    passed: u64,
    failed: u64,
    skipped: u64,
    pass_rate: String,
    show_progress_label: bool,
    has_failures: bool,
    failures: &'a [String],
    run_url: Option<String>,
    dashboard_url: Option<String>,
    sent_at: Option<&'a str>,
    repository: &'a str,
}

impl<'a> ReportView<'a> {
    fn new(summary: &'a Summary, context: &'a RunContext) -> Self {
        let status = summary.overall_status();
        let pass_rate = summary.pass_percentage();
        let run_url = context.run_url();
        // the dashboard link is only offered next to the run link
        let dashboard_url = run_url.as_ref().and_then(|_| context.dashboard_url());
        Self {
            title: &context.title,
            status: status.to_string(),
            status_icon: status.icon(),
            status_class: status.css_class(),
            total: summary.total as u64,
            passed: summary.passed as u64,
            failed: summary.failed as u64,
            skipped: summary.skipped as u64,
            pass_rate: pass_rate.to_string(),
            show_progress_label: pass_rate.exceeds(PROGRESS_LABEL_THRESHOLD),
            has_failures: !summary.failures().is_empty(),
            failures: summary.failures(),
            run_url,
            dashboard_url,
            sent_at: context.sent_at.as_deref(),
            repository: context.repository.as_deref().unwrap_or("N/A"),
        }
    }

    fn subject(&self) -> String {
        format!("{} Status - {} {}", self.title, self.status, self.status_icon)
    }
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let parser = ParserBuilder::with_stdlib().build()?;
        Ok(Self {
            html: parser.parse(HTML_TEMPLATE)?,
            text: parser.parse(TEXT_TEMPLATE)?,
        })
    }

    pub fn render(&self, summary: &Summary, context: &RunContext) -> Result<Report, RenderError> {
        let view = ReportView::new(summary, context);
        trace!("Rendering report {:#?}", view);
        let globals = liquid::to_object(&view)?;
        Ok(Report {
            subject: view.subject(),
            html: self.html.render(&globals)?,
            text: self.text.render(&globals)?,
        })
    }
}
