//! Look up Slack users, and resolve user names to user IDs.

use super::{
    api::*,
    bot::SlackBot,
    error::SlackError,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::fmt;
use tracing::warn;

/// User names as are visible in the Slack UI, with or without the leading
/// at sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(pub String);

impl UserName {
    /// User names can't contain `@`, so by stripping it consumers may supply
    /// a mention-style name or not.
    pub fn normalised(&self) -> UserName {
        UserName(self.0.trim_start_matches('@').into())
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stable identifier Slack's API expects wherever a user is referenced,
/// for example `U024BE7LH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metadata we care about per-user within a `users.list` response.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
}

/// <https://api.slack.com/methods/users.list#args>
#[derive(Serialize)]
struct ListRequest {
    limit: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

/// <https://api.slack.com/methods/users.list#examples>
#[derive(Deserialize)]
struct ListResponse {
    members: Vec<User>,
    #[serde(default)]
    response_metadata: PaginationMeta,
}

impl SlackBot {
    /// Every user in the workspace visible to the bot, following pagination
    /// to the last page. Any failed page fails the whole list.
    pub async fn list_users(&self) -> Option<Vec<User>> {
        evaluate("get_users_list", self.fetch_users().await)
    }

    async fn fetch_users(&self) -> Result<Vec<User>, SlackError> {
        let mut users: Vec<User> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut res = dispatch::<ListResponse>(self.api.get("/users.list").query(
                &ListRequest {
                    limit: PAGE_LIMIT,
                    cursor,
                },
            ))
            .await?;

            users.append(&mut res.members);

            cursor = res.response_metadata.next_cursor;
            if cursor.is_none() {
                break Ok(users);
            }
        }
    }

    /// Get the user ID associated with a user name, falling back to the bot's
    /// default user when no name is given.
    ///
    /// Fails only when there's no name to look up. A failed lookup, or a name
    /// that matches nobody, is logged and yields `None`.
    pub async fn resolve_user_id(
        &self,
        user_name: Option<&UserName>,
    ) -> Result<Option<UserId>, SlackError> {
        let user_name = user_name
            .or(self.user().map(|x| &x.name))
            .ok_or(SlackError::MissingUser)?
            .normalised();

        let users = match self.list_users().await {
            Some(x) => x,
            None => {
                warn!("Error getting users list. Setting user id to None.");
                return Ok(None);
            }
        };

        let id = find_user_id(&users, &user_name);
        if id.is_none() {
            warn!("Unknown Slack user: {}", user_name);
        }

        Ok(id)
    }
}

/// The first user going by `name`.
fn find_user_id(users: &[User], name: &UserName) -> Option<UserId> {
    users
        .iter()
        .find(|x| &x.name == name)
        .map(|x| x.id.clone())
}
