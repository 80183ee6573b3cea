//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::{Notifier, NotifyError, StatusChangeNotice};

/// Sends status-change mail through a plain SMTP relay (mailhog-style in
/// dev, a real relay in prod).
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpNotifier {
    pub fn new(host: &str, port: u16, sender: &str) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Ok(Self {
            transport,
            sender: sender.parse()?,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn status_changed(&self, notice: StatusChangeNotice) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(notice.recipient.parse::<Mailbox>()?)
            .subject(notice.subject())
            .body(notice.body())?;

        self.transport.send(message).await?;
        tracing::info!(issue_id = %notice.issue_id, "status-change mail sent");
        Ok(())
    }
}
