use super::{Block, DeliveryError, IMessenger};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub channel: String,
    pub display_name: String,
    pub blocks: Vec<Block>,
}

/// Messenger that records the delivered messages, used when testing
#[derive(Default)]
pub struct InMemoryMessenger {
    sent: Mutex<Vec<SentMessage>>,
    failing_channels: Mutex<HashSet<String>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following message to `channel` is rejected
    pub fn fail_channel(&self, channel: &str) {
        self.failing_channels
            .lock()
            .unwrap()
            .insert(channel.to_string());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn post_message(
        &self,
        channel: &str,
        display_name: &str,
        blocks: &[Block],
    ) -> Result<(), DeliveryError> {
        if self.failing_channels.lock().unwrap().contains(channel) {
            return Err(DeliveryError::Rejected("channel_not_found".into()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            channel: channel.to_string(),
            display_name: display_name.to_string(),
            blocks: blocks.to_vec(),
        });
        Ok(())
    }
}
