//! Interact with Slack channels: look them up, create them, and join or
//! leave them programmatically.

use super::{api::*, bot::SlackBot, error::SlackError};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::fmt;
use tracing::warn;

/// Channel names as are visible in the Slack UI, with or without the leading
/// hash.
///
/// ```
/// # use slackbot::slack::channel::ChannelName;
/// let with =    ChannelName("#playground".into());
/// let without = ChannelName("playground".into());
/// assert_eq!(with.normalised(), without);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelName(pub String);

impl ChannelName {
    /// Channel names can't contain hashes, so by stripping them consumers may
    /// supply a leading hash or not.
    pub fn normalised(&self) -> ChannelName {
        ChannelName(self.0.trim_start_matches('#').into())
    }
}

/// Format without the surrounding newtype wrapper.
///
/// ```
/// # use slackbot::slack::channel::ChannelName;
/// let x = ChannelName("fp".into());
/// assert_eq!(format!("{}", x), "fp");
/// ```
impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Because channel names can change, channels are generally referred to by
/// their underlying ID. This can be found in the UI by copying a link to the
/// channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metadata we care about per-channel.
///
/// Direct message channels have no name, in which case it's empty.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub name: ChannelName,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub topic: Topic,
    #[serde(default)]
    pub purpose: Topic,
}

/// A channel's topic or purpose. Slack represents an unset one as an empty
/// string.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Topic {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub value: Option<String>,
}

/// <https://api.slack.com/methods/conversations.list#args>
#[derive(Serialize)]
struct ListRequest {
    limit: u16,
    /// Doesn't affect `limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

/// <https://api.slack.com/methods/conversations.list#examples>
#[derive(Deserialize)]
struct ListResponse {
    channels: Vec<Channel>,
    #[serde(default)]
    response_metadata: PaginationMeta,
}

/// <https://api.slack.com/methods/conversations.create#args>
#[derive(Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    is_private: bool,
}

/// Shared by `conversations.info`, `conversations.join`, and
/// `conversations.leave`.
#[derive(Serialize)]
struct ChannelRequest<'a> {
    channel: &'a ChannelId,
}

/// Shared by `conversations.create`, `conversations.info`, and
/// `conversations.join`.
#[derive(Deserialize)]
struct ChannelResponse {
    channel: Channel,
}

impl SlackBot {
    /// Channels visible to the bot, following pagination to the last page.
    /// Any failed page fails the whole list.
    pub async fn list_channels(&self, exclude_archived: Option<bool>) -> Option<Vec<Channel>> {
        evaluate(
            "get_channels_list",
            self.fetch_channels(exclude_archived).await,
        )
    }

    async fn fetch_channels(
        &self,
        exclude_archived: Option<bool>,
    ) -> Result<Vec<Channel>, SlackError> {
        let mut channels: Vec<Channel> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut res = dispatch::<ListResponse>(self.api.get("/conversations.list").query(
                &ListRequest {
                    limit: PAGE_LIMIT,
                    exclude_archived,
                    cursor,
                },
            ))
            .await?;

            channels.append(&mut res.channels);

            cursor = res.response_metadata.next_cursor;
            if cursor.is_none() {
                break Ok(channels);
            }
        }
    }

    pub async fn channel_info(&self, channel: &ChannelId) -> Option<Channel> {
        let res = dispatch::<ChannelResponse>(
            self.api
                .get("/conversations.info")
                .query(&ChannelRequest { channel }),
        )
        .await;

        evaluate("get_channel_info", res).map(|x| x.channel)
    }

    /// Create a public or private channel, returning it.
    pub async fn create_channel(&self, name: &ChannelName, is_private: bool) -> Option<Channel> {
        let name = name.normalised();

        let res = dispatch::<ChannelResponse>(self.api.post("/conversations.create").json(
            &CreateRequest {
                name: &name.0,
                is_private,
            },
        ))
        .await;

        evaluate("create_channel", res).map(|x| x.channel)
    }

    /// We must join public channels before we can message in them.
    pub async fn join_channel(&self, channel: &ChannelId) -> Option<Channel> {
        let res = dispatch::<ChannelResponse>(
            self.api
                .post("/conversations.join")
                .json(&ChannelRequest { channel }),
        )
        .await;

        evaluate("join_channel", res).map(|x| x.channel)
    }

    pub async fn leave_channel(&self, channel: &ChannelId) -> Option<()> {
        let res = dispatch::<Empty>(
            self.api
                .post("/conversations.leave")
                .json(&ChannelRequest { channel }),
        )
        .await;

        evaluate("leave_channel", res).map(|_| ())
    }

    /// Get the channel ID associated with a channel name, falling back to the
    /// bot's default channel when no name is given.
    ///
    /// Fails only when there's no name to look up. A failed lookup, or a name
    /// that matches no channel, is logged and yields `None`.
    pub async fn resolve_channel_id(
        &self,
        channel_name: Option<&ChannelName>,
    ) -> Result<Option<ChannelId>, SlackError> {
        let channel_name = channel_name
            .or(self.channel().map(|x| &x.name))
            .ok_or(SlackError::MissingChannel)?
            .normalised();

        let channels = match self.list_channels(None).await {
            Some(x) => x,
            None => {
                warn!("Error getting channels list. Setting channel id to None.");
                return Ok(None);
            }
        };

        let id = find_channel_id(&channels, &channel_name);
        if id.is_none() {
            warn!("Unknown Slack channel: {}", channel_name);
        }

        Ok(id)
    }
}

/// The first channel going by `name`.
fn find_channel_id(channels: &[Channel], name: &ChannelName) -> Option<ChannelId> {
    channels
        .iter()
        .find(|x| &x.name == name)
        .map(|x| x.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::bot::testing::*;
    use mockito::Matcher;
    use serde_json::json;

    quickcheck::quickcheck! {
        fn test_normalised_has_no_leading_hash(x: String) -> bool {
            !ChannelName(x).normalised().0.starts_with('#')
        }
    }

    #[tokio::test]
    async fn test_list_channels() {
        let mut srv = server().await;

        let list_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "200".into()),
                Matcher::UrlEncoded("exclude_archived".into(), "true".into()),
            ]))
            .with_body(CHANNELS)
            .create_async()
            .await;

        let channels = bot(&srv).await.list_channels(Some(true)).await.unwrap();

        list_mock.assert_async().await;

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, ChannelName("general".into()));
        assert!(channels[0].is_member);
        assert_eq!(channels[0].topic.value, None);
        assert_eq!(
            channels[0].purpose.value.as_deref(),
            Some("Company-wide chatter")
        );
        assert!(channels[1].is_archived);
    }

    #[tokio::test]
    async fn test_list_channels_pages() {
        let mut srv = server().await;

        let page1_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::Exact("limit=200".into()))
            .with_body(
                r#"{
                    "ok": true,
                    "channels": [{ "id": "C1", "name": "general" }],
                    "response_metadata": { "next_cursor": "dGVhbTpDMDYxRkE1UEI=" }
                }"#,
            )
            .create_async()
            .await;

        let page2_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::UrlEncoded(
                "cursor".into(),
                "dGVhbTpDMDYxRkE1UEI=".into(),
            ))
            .with_body(
                r#"{
                    "ok": true,
                    "channels": [{ "id": "C7", "name": "late-arrivals" }],
                    "response_metadata": { "next_cursor": "" }
                }"#,
            )
            .create_async()
            .await;

        let bot = bot(&srv).await;

        assert_eq!(
            bot.resolve_channel_id(Some(&ChannelName("#late-arrivals".into())))
                .await
                .unwrap(),
            Some(ChannelId("C7".into()))
        );

        page1_mock.assert_async().await;
        page2_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_channels_failure() {
        let mut srv = server().await;

        let _list_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::Any)
            .with_body(INVALID_AUTH)
            .create_async()
            .await;

        assert!(bot(&srv).await.list_channels(None).await.is_none());
    }

    #[tokio::test]
    async fn test_channel_info() {
        let mut srv = server().await;

        let info_mock = srv
            .mock("GET", "/conversations.info")
            .match_query(Matcher::UrlEncoded("channel".into(), "C1".into()))
            .with_body(
                r#"{
                    "ok": true,
                    "channel": { "id": "C1", "name": "general", "is_private": false }
                }"#,
            )
            .create_async()
            .await;

        let channel = bot(&srv)
            .await
            .channel_info(&ChannelId("C1".into()))
            .await
            .unwrap();

        info_mock.assert_async().await;
        assert_eq!(channel.id, ChannelId("C1".into()));
        assert_eq!(channel.name, ChannelName("general".into()));
    }

    #[tokio::test]
    async fn test_channel_info_not_found() {
        let mut srv = server().await;

        let _info_mock = srv
            .mock("GET", "/conversations.info")
            .match_query(Matcher::Any)
            .with_body(r#"{ "ok": false, "error": "channel_not_found" }"#)
            .create_async()
            .await;

        assert!(bot(&srv)
            .await
            .channel_info(&ChannelId("C404".into()))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let mut srv = server().await;

        let create_mock = srv
            .mock("POST", "/conversations.create")
            .match_body(Matcher::Json(json!({ "name": "test", "is_private": false })))
            .with_body(
                r#"{
                    "ok": true,
                    "channel": { "id": "C9", "name": "test", "is_member": true }
                }"#,
            )
            .create_async()
            .await;

        let list_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::Any)
            .with_body(
                r#"{
                    "ok": true,
                    "channels": [
                        { "id": "C1", "name": "general" },
                        { "id": "C9", "name": "test" }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let bot = bot(&srv).await;

        let created = bot
            .create_channel(&ChannelName("#test".into()), false)
            .await
            .unwrap();
        let channels = bot.list_channels(None).await.unwrap();

        create_mock.assert_async().await;
        list_mock.assert_async().await;

        assert_eq!(created.id, ChannelId("C9".into()));
        assert!(channels
            .iter()
            .any(|x| x.name == ChannelName("test".into())));
    }

    #[tokio::test]
    async fn test_create_channel_taken() {
        let mut srv = server().await;

        let _create_mock = srv
            .mock("POST", "/conversations.create")
            .with_body(r#"{ "ok": false, "error": "name_taken" }"#)
            .create_async()
            .await;

        assert!(bot(&srv)
            .await
            .create_channel(&ChannelName("general".into()), true)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_join_and_leave() {
        let mut srv = server().await;

        let join_mock = srv
            .mock("POST", "/conversations.join")
            .match_body(Matcher::Json(json!({ "channel": "C1" })))
            .with_body(
                r#"{
                    "ok": true,
                    "channel": { "id": "C1", "name": "general" },
                    "warning": "already_in_channel"
                }"#,
            )
            .create_async()
            .await;

        let leave_mock = srv
            .mock("POST", "/conversations.leave")
            .match_body(Matcher::Json(json!({ "channel": "C1" })))
            .with_body(r#"{ "ok": true }"#)
            .create_async()
            .await;

        let bot = bot(&srv).await;
        let channel = ChannelId("C1".into());

        assert!(bot.join_channel(&channel).await.is_some());
        assert!(bot.leave_channel(&channel).await.is_some());

        join_mock.assert_async().await;
        leave_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_leave_failure() {
        let mut srv = server().await;

        let _leave_mock = srv
            .mock("POST", "/conversations.leave")
            .with_body(r#"{ "ok": false, "error": "cant_leave_general" }"#)
            .create_async()
            .await;

        assert!(bot(&srv)
            .await
            .leave_channel(&ChannelId("C1".into()))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_resolve_channel_id() {
        let mut srv = server().await;

        let _list_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::Any)
            .with_body(CHANNELS)
            .create_async()
            .await;

        let bot = bot(&srv).await;

        assert_eq!(
            bot.resolve_channel_id(Some(&ChannelName("#random".into())))
                .await
                .unwrap(),
            Some(ChannelId("C2".into()))
        );
        assert_eq!(
            bot.resolve_channel_id(Some(&ChannelName("missing".into())))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_resolve_channel_id_without_name() {
        let srv = server().await;

        let res = bot(&srv).await.resolve_channel_id(None).await;

        assert!(matches!(res, Err(SlackError::MissingChannel)));
    }
}
