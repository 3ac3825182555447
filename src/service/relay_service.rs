use tracing::{error, info};

use crate::clients::sms_client::SmsSender;
use crate::errors::CheckError;
use crate::models::inbound::InboundMessage;

pub struct RelayService;

impl RelayService {
    pub fn forward_body(message: &InboundMessage) -> String {
        format!("From: {}\n\n{}", message.from, message.body)
    }

    pub async fn forward<S: SmsSender + ?Sized>(
        sender: &S,
        destination: &str,
        message: &InboundMessage,
    ) -> Result<(), CheckError> {
        let body = Self::forward_body(message);
        match sender.send(destination, &body).await {
            Ok(()) => {
                info!(from = %message.from, "forwarded inbound message");
                Ok(())
            }
            Err(err) => {
                error!(from = %message.from, error = %err, "failed to forward inbound message");
                Err(err)
            }
        }
    }
}
