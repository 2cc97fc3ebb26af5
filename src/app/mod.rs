pub(crate) mod error;
pub(crate) mod notification;

use crate::app::error::{DeliveryError, Error};
use crate::app::notification::{Delivery, Notification};
use crate::configuration::constants::variables;
use crate::configuration::settings::Configuration;
use crate::connection::SendMessage;
use crate::reporter::{aggregate, Renderer, Summary};
use std::path::PathBuf;

pub struct App {
    configuration: Configuration,
    results_dir: PathBuf,
    html_output: Option<PathBuf>,
}

impl App {
    pub fn new(
        configuration: Configuration,
        results_dir: PathBuf,
        html_output: Option<PathBuf>,
    ) -> Self {
        App {
            configuration,
            results_dir,
            html_output,
        }
    }

    /// Aggregates the results, renders the report and hands it to `sender` exactly once
    pub async fn run<S>(&self, sender: &S) -> Result<Delivery, Error>
    where
        S: SendMessage<Notification, Result<Delivery, DeliveryError>>,
    {
        info!("Parsing test results from {}", self.results_dir.display());
        let summary = aggregate(&self.results_dir);
        log_summary(&summary);

        let mut context = self.configuration.context.clone();
        context.sent_at = Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
        let report = Renderer::new()?.render(&summary, &context)?;
        if let Some(path) = &self.html_output {
            match std::fs::write(path, &report.html) {
                Ok(()) => info!("Report written into {}", path.display()),
                Err(e) => warn!("Cannot write report into {}: {}", path.display(), e),
            }
        }

        let notification = Notification::compose(&self.configuration, report);
        let recipients = notification.recipients();
        let subject = notification.subject.clone();
        info!("Sending email notification to {}", recipients);
        match sender.send(notification).await {
            Ok(delivery) => {
                info!("Email sent successfully");
                info!("Message ID: {}", delivery.message_id);
                info!("To: {}", recipients);
                info!("Subject: {}", subject);
                debug!("Relay response {} {}", delivery.code, delivery.response);
                Ok(delivery)
            }
            Err(e) => {
                log_delivery_failure(&e);
                Err(e.into())
            }
        }
    }
}

fn log_summary(summary: &Summary) {
    info!("Total Tests: {}", summary.total);
    info!("Passed: {}", summary.passed);
    info!("Failed: {}", summary.failed);
    info!("Skipped: {}", summary.skipped);
    if summary.unrecognized > 0 {
        info!("Other: {}", summary.unrecognized);
    }
    info!("Pass Rate: {}%", summary.pass_percentage());
    info!("Status: {}", summary.overall_status());
}

fn log_delivery_failure(err: &DeliveryError) {
    error!("Failed to send email: {}", err);
    if let DeliveryError::Authentication(_) = err {
        error!("Troubleshooting:");
        error!("  - Check {} is correct", variables::USER);
        error!("  - Check {} is an App Password (16 chars)", variables::PASSWORD);
        error!("  - Verify 2-Step Verification is enabled on the account");
    }
}
