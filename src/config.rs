//! Everything a [SlackBot][crate::SlackBot] needs before it can talk to Slack.
//!
//! Configuration can be built explicitly with [Config::new] or read from the
//! environment with [Config::from_env], which also loads a `.env` file when
//! one exists.

use crate::slack::auth::SlackAccessToken;
use std::{env, fmt};
use tracing::debug;
use url::Url;

/// The base URL of the Slack API.
pub const API_BASE: &str = "https://slack.com/api";

/// Environment variable holding the bot token.
pub const TOKEN_VAR: &str = "SLACK_BOT_TOKEN";

/// Optional environment variable overriding [API_BASE], typically to point at
/// a test double.
pub const API_BASE_VAR: &str = "SLACK_API_BASE";

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) token: SlackAccessToken,
    pub(crate) api_base: Url,
}

/// Sum type representing every way configuration can be unusable. Both are
/// fatal: without a token there is nothing useful a bot can do.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingToken,
    InvalidApiBase(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            ConfigError::MissingToken => format!(
                "${} needs to be defined or the token has to be passed explicitly",
                TOKEN_VAR
            ),
            ConfigError::InvalidApiBase(s) => format!("Invalid Slack API base URL: {}", s),
        };

        write!(f, "{}", x)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Configuration for the real Slack API with the given token.
    pub fn new(token: SlackAccessToken) -> Result<Self, ConfigError> {
        if token.0.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Config {
            token,
            api_base: default_api_base(),
        })
    }

    /// Point the bot somewhere other than [API_BASE].
    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        self.api_base = parse_api_base(base)?;
        Ok(self)
    }

    /// Read configuration from `$SLACK_BOT_TOKEN` and `$SLACK_API_BASE`,
    /// loading a `.env` file first if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_err() {
            debug!("No .env found");
        }

        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Read configuration through an arbitrary variable lookup. Kept separate
    /// from [Config::from_env] so tests needn't touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR).ok_or(ConfigError::MissingToken)?;
        let config = Self::new(SlackAccessToken(token))?;

        match lookup(API_BASE_VAR) {
            Some(base) => config.with_api_base(&base),
            None => Ok(config),
        }
    }

    pub fn token(&self) -> &SlackAccessToken {
        &self.token
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// The full URL of an API method, e.g. `"/chat.postMessage"`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        self.api_base.as_str().trim_end_matches('/').to_owned() + path
    }
}

fn default_api_base() -> Url {
    // This unwrap is tested below.
    Url::parse(API_BASE).unwrap()
}

fn parse_api_base(base: &str) -> Result<Url, ConfigError> {
    Url::parse(base).map_err(|_| ConfigError::InvalidApiBase(base.to_owned()))
}
