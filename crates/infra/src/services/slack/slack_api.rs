use super::{Block, DeliveryError, IMessenger};
use crate::services::rest::RestApi;
use serde::{Deserialize, Serialize};
use tracing::error;

// https://api.slack.com/methods/chat.postMessage
const SLACK_API_BASE_URL: &str = "https://slack.com/api";

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    username: &'a str,
    text: String,
    blocks: &'a [Block],
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackMessenger {
    api: RestApi,
}

impl SlackMessenger {
    pub fn new(bot_token: String) -> Self {
        Self {
            api: RestApi::new("Slack", SLACK_API_BASE_URL, bot_token),
        }
    }
}

#[async_trait::async_trait]
impl IMessenger for SlackMessenger {
    async fn post_message(
        &self,
        channel: &str,
        display_name: &str,
        blocks: &[Block],
    ) -> Result<(), DeliveryError> {
        let body = PostMessageRequest {
            channel,
            username: display_name,
            text: Block::fallback_text(blocks),
            blocks,
        };
        let res: PostMessageResponse = self
            .api
            .post(&body, &["chat.postMessage"])
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        if res.ok {
            return Ok(());
        }
        let reason = res.error.unwrap_or_else(|| "unknown_error".to_string());
        error!(
            "Slack rejected the message to channel: {}. Error message: {}",
            channel, reason
        );
        Err(DeliveryError::Rejected(reason))
    }
}
