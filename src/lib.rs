//! A thin convenience wrapper around the [Slack Web API][slack].
//!
//! [SlackBot] resolves human-readable user and channel names to Slack IDs and
//! exposes one method per supported API call: messages, ephemeral messages,
//! direct messages, file uploads, and channel membership.
//!
//! Remote failures are logged and surface as `None`. `Err` is reserved for
//! mistakes detected before anything is sent, such as an ephemeral message
//! without a user. See [slack::error::SlackError].
//!
//! ```no_run
//! # async fn run() -> Result<(), slackbot::config::ConfigError> {
//! use slackbot::{config::Config, slack::channel::ChannelName, SlackBot};
//!
//! let config = Config::from_env()?;
//! let bot = SlackBot::new(config, None, Some(ChannelName("#general".into()))).await;
//! # Ok(())
//! # }
//! ```
//!
//! [slack]: https://api.slack.com/web

pub mod config;
mod de;
pub mod slack;

pub use slack::bot::SlackBot;
