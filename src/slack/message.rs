//! Send plain, ephemeral, and direct messages.

use super::{
    api::*,
    bot::SlackBot,
    channel::ChannelId,
    error::SlackError,
    user::{UserId, UserName},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The timestamp Slack assigns a posted message, which doubles as its ID
/// within a channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageTs(pub String);

impl fmt::Display for MessageTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// <https://api.slack.com/methods/chat.postMessage#args>
#[derive(Serialize)]
struct MessageRequest<'a> {
    channel: &'a ChannelId,
    text: &'a str,
}

/// <https://api.slack.com/methods/chat.postMessage#examples>
#[derive(Deserialize)]
struct MessageResponse {
    ts: MessageTs,
}

/// <https://api.slack.com/methods/chat.postEphemeral#args>
#[derive(Serialize)]
struct EphemeralRequest<'a> {
    channel: &'a ChannelId,
    text: &'a str,
    user: &'a UserId,
}

/// <https://api.slack.com/methods/chat.postEphemeral#examples>
#[derive(Deserialize)]
struct EphemeralResponse {
    message_ts: MessageTs,
}

impl SlackBot {
    /// Post a message in a channel, defaulting to the bot's channel.
    ///
    /// Ephemeral messages are only visible to one user, defaulting to the
    /// bot's user. Nothing is sent if the channel, or for ephemeral messages
    /// the user, can't be determined.
    pub async fn send_message(
        &self,
        text: &str,
        channel: Option<&ChannelId>,
        ephemeral: bool,
        user: Option<&UserId>,
    ) -> Result<Option<MessageTs>, SlackError> {
        let channel = channel
            .or(self.channel_id())
            .ok_or(SlackError::MissingChannel)?;

        if !ephemeral {
            return Ok(self.post_message("send_message", channel, text).await);
        }

        let user = user.or(self.user_id()).ok_or(SlackError::MissingUser)?;

        let res = dispatch::<EphemeralResponse>(
            self.api
                .post("/chat.postEphemeral")
                .json(&EphemeralRequest {
                    channel,
                    text,
                    user,
                }),
        )
        .await;

        Ok(evaluate("send_message", res).map(|x| x.message_ts))
    }

    /// Message a user privately, defaulting to the bot's user. The direct
    /// message channel is opened first, or reused if it already exists.
    pub async fn send_direct_message(
        &self,
        text: &str,
        user_name: Option<&UserName>,
    ) -> Result<Option<MessageTs>, SlackError> {
        let user = match user_name {
            Some(name) => self.resolve_user_id(Some(name)).await?,
            None => self.user_id().cloned(),
        };

        let user = match (user, user_name) {
            (Some(x), _) => x,
            // A named user who couldn't be resolved has already been logged.
            (None, Some(_)) => return Ok(None),
            (None, None) => return Err(SlackError::MissingUser),
        };

        let channel = match self.open("send_dm", &[user]).await {
            Some(x) => x,
            None => return Ok(None),
        };

        Ok(self.post_message("send_dm_message", &channel, text).await)
    }

    async fn post_message(&self, op: &str, channel: &ChannelId, text: &str) -> Option<MessageTs> {
        let res = dispatch::<MessageResponse>(
            self.api
                .post("/chat.postMessage")
                .json(&MessageRequest { channel, text }),
        )
        .await;

        evaluate(op, res).map(|x| x.ts)
    }
}
