//! The bot itself: a Slack API transport plus the user and channel it was
//! configured for, if any.

use super::{
    api::Api,
    channel::{ChannelId, ChannelName},
    user::{UserId, UserName},
};
use crate::config::Config;
use tracing::warn;

/// A human-readable name alongside the ID Slack resolved it to. The two only
/// ever exist together, so a bot can't hold a name whose ID is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<N, I> {
    pub name: N,
    pub id: I,
}

/// A Slack bot bound to one token, optionally remembering a default user and
/// channel to fall back on when an operation isn't given one explicitly.
///
/// Operations live alongside the types they deal in, see the sibling modules.
#[derive(Debug)]
pub struct SlackBot {
    pub(super) api: Api,
    user: Option<Resolved<UserName, UserId>>,
    channel: Option<Resolved<ChannelName, ChannelId>>,
}

impl SlackBot {
    /// Construct a bot, immediately resolving any names given. Names that
    /// can't be resolved are logged and dropped, leaving the bot without a
    /// default user or channel rather than with a name it can't use.
    pub async fn new(
        config: Config,
        user_name: Option<UserName>,
        channel_name: Option<ChannelName>,
    ) -> Self {
        let mut bot = SlackBot {
            api: Api::new(config),
            user: None,
            channel: None,
        };

        if let Some(name) = user_name {
            bot.set_user(name).await;
        }

        if let Some(name) = channel_name {
            bot.set_channel(name).await;
        }

        bot
    }

    pub fn user(&self) -> Option<&Resolved<UserName, UserId>> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|x| &x.id)
    }

    pub fn channel(&self) -> Option<&Resolved<ChannelName, ChannelId>> {
        self.channel.as_ref()
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel.as_ref().map(|x| &x.id)
    }

    /// Resolve and remember the default user, replacing any previous one.
    /// On failure the default user is cleared.
    pub async fn set_user(&mut self, name: UserName) -> Option<&UserId> {
        let res = self.resolve_user_id(Some(&name)).await;

        self.user = match res {
            Ok(Some(id)) => Some(Resolved { name, id }),
            Ok(None) | Err(_) => {
                warn!("Error getting user id for {}. Setting user to None.", name);
                None
            }
        };

        self.user_id()
    }

    /// Resolve and remember the default channel, replacing any previous one.
    /// On failure the default channel is cleared.
    pub async fn set_channel(&mut self, name: ChannelName) -> Option<&ChannelId> {
        let res = self.resolve_channel_id(Some(&name)).await;

        self.channel = match res {
            Ok(Some(id)) => Some(Resolved { name, id }),
            Ok(None) | Err(_) => {
                warn!(
                    "Error getting channel id for {}. Setting channel to None.",
                    name
                );
                None
            }
        };

        self.channel_id()
    }
}
