mod blocks;
mod inmemory;
mod slack_api;

pub use blocks::{escape_mrkdwn, Block, Text};
pub use inmemory::{InMemoryMessenger, SentMessage};
pub use slack_api::SlackMessenger;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("The message could not be sent: {0}")]
    Transport(String),
    #[error("The message was rejected: {0}")]
    Rejected(String),
}

/// Delivers rendered notifications to chat channels
#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    /// Posts `blocks` to `channel` shown as sent by `display_name`
    async fn post_message(
        &self,
        channel: &str,
        display_name: &str,
        blocks: &[Block],
    ) -> Result<(), DeliveryError>;
}
