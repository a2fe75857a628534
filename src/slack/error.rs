use std::{fmt, io, path::PathBuf};

/// Sum type representing every possible unexceptional fail state.
///
/// The first two variants describe remote failures. These are logged and
/// absorbed by [SlackBot][super::bot::SlackBot]'s operations rather than
/// returned; the remainder are returned to callers because nothing was sent.
#[derive(Debug)]
pub enum SlackError {
    APIRequestFailed(reqwest::Error),
    APIResponseError(String),
    /// An operation needed a user but none was given or stored.
    MissingUser,
    /// An operation needed a channel but none was given or stored.
    MissingChannel,
    FileAccess(PathBuf, io::Error),
}

impl From<reqwest::Error> for SlackError {
    fn from(e: reqwest::Error) -> Self {
        SlackError::APIRequestFailed(e)
    }
}

impl fmt::Display for SlackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            SlackError::APIRequestFailed(e) => format!("Slack API request failed: {:?}", e),
            SlackError::APIResponseError(e) => format!("Slack API returned error: {}", e),
            SlackError::MissingUser => "No Slack user was given or resolved".into(),
            SlackError::MissingChannel => "No Slack channel was given or resolved".into(),
            SlackError::FileAccess(p, e) => format!("Could not read {}: {}", p.display(), e),
        };

        write!(f, "{}", x)
    }
}

impl std::error::Error for SlackError {}
