use serde::Serialize;

// https://api.slack.com/reference/block-kit/blocks

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PlainText { text } | Self::Mrkdwn { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: Text },
    Section { text: Text },
    Context { elements: Vec<Text> },
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header {
            text: Text::plain(text),
        }
    }

    pub fn section(mrkdwn: impl Into<String>) -> Self {
        Self::Section {
            text: Text::mrkdwn(mrkdwn),
        }
    }

    pub fn context(mrkdwn: impl Into<String>) -> Self {
        Self::Context {
            elements: vec![Text::mrkdwn(mrkdwn)],
        }
    }

    /// Text shown by clients that can not render blocks, e.g. in push
    /// notifications
    pub fn fallback_text(blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| match block {
                Block::Header { text } | Block::Section { text } => text.as_str().to_string(),
                Block::Context { elements } => elements
                    .iter()
                    .map(Text::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Escapes the control characters of Slack's mrkdwn format
pub fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
