use crate::app::error::DeliveryError;
use crate::configuration::settings::Configuration;
use crate::reporter::Report;
use lettre::message::{Mailbox, MultiPart};
use lettre::Message;

/// A rendered report addressed to its recipients
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub message_id: String,
}

/// Acknowledgment of the relay
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub message_id: String,
    pub code: String,
    pub response: String,
}

impl Notification {
    pub fn compose(configuration: &Configuration, report: Report) -> Self {
        let message_id = format!(
            "<{}@{}>",
            uuid::Uuid::new_v4().simple(),
            configuration.sender.email.domain()
        );
        Self {
            from: configuration.sender.clone(),
            to: configuration.recipients.clone(),
            subject: report.subject,
            html: report.html,
            text: report.text,
            message_id,
        }
    }

    pub fn recipients(&self) -> String {
        self.to
            .iter()
            .map(|mailbox| mailbox.email.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// multipart/alternative with the plain text part first
    pub fn into_message(self) -> Result<Message, DeliveryError> {
        let mut builder = Message::builder()
            .from(self.from)
            .subject(self.subject)
            .message_id(Some(self.message_id));
        for mailbox in self.to {
            builder = builder.to(mailbox);
        }
        Ok(builder.multipart(MultiPart::alternative_plain_html(self.text, self.html))?)
    }
}
