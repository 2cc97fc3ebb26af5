use crate::app::error::DeliveryError;
use crate::app::notification::{Delivery, Notification};
use crate::configuration::settings::Relay;
use crate::connection::SendMessage;
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

/// Authenticated relay over implicit TLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(relay: &Relay) -> Result<Self, DeliveryError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&relay.host)?
            .credentials(Credentials::new(
                relay.user.clone(),
                relay.password.clone(),
            ))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl SendMessage<Notification, Result<Delivery, DeliveryError>> for SmtpMailer {
    async fn send(&self, data: Notification) -> Result<Delivery, DeliveryError> {
        let message_id = data.message_id.clone();
        let message = data.into_message()?;
        let response = AsyncTransport::send(&self.transport, message).await?;
        debug!("Relay answered {:?}", response);
        Ok(Delivery {
            message_id,
            code: response.code().to_string(),
            response: response.message().collect::<Vec<_>>().join(" "),
        })
    }
}
