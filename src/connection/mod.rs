pub mod smtp;

use async_trait::async_trait;

pub use smtp::SmtpMailer;

#[async_trait]
pub trait SendMessage<T, R>
where
    T: Send + 'static,
{
    async fn send(&self, data: T) -> R;
}
