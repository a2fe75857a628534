//! Open direct and multi-party conversations.

use super::{api::*, bot::SlackBot, channel::ChannelId, user::UserId};
use serde::{Deserialize, Serialize};

/// <https://api.slack.com/methods/conversations.open#args>
#[derive(Serialize)]
struct OpenRequest {
    /// Comma-separated user IDs.
    users: String,
}

/// <https://api.slack.com/methods/conversations.open#examples>
#[derive(Deserialize)]
struct OpenResponse {
    channel: OpenedChannel,
}

#[derive(Deserialize)]
struct OpenedChannel {
    id: ChannelId,
}

impl SlackBot {
    /// Open, or resume, a conversation between the bot and the given users.
    /// One user opens a direct message; several open a multi-party one.
    pub async fn open_conversation(&self, users: &[UserId]) -> Option<ChannelId> {
        self.open("open_conversation", users).await
    }

    pub(super) async fn open(&self, op: &str, users: &[UserId]) -> Option<ChannelId> {
        let users = users
            .iter()
            .map(|x| x.0.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let res = dispatch::<OpenResponse>(
            self.api
                .post("/conversations.open")
                .json(&OpenRequest { users }),
        )
        .await;

        evaluate(op, res).map(|x| x.channel.id)
    }
}
