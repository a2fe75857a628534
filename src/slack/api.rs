//! Type definitions and helpers for the Slack API.

use super::{auth::*, error::SlackError};
use crate::config::Config;
use serde::{de::DeserializeOwned, Deserialize};
use serde_with::{serde_as, NoneAsEmptyString};
use tracing::{debug, error};

/// The page size requested from list methods. Maximum supported is 1000,
/// however a limit of 200 is "recommended". Slack may return fewer than this
/// even when more remain, so follow [PaginationMeta::next_cursor].
pub const PAGE_LIMIT: u16 = 200;

/// Everything needed to issue an authenticated request: a reusable client
/// that holds a connection pool internally, as per [reqwest::Client], and the
/// token and base URL it's bound to.
#[derive(Debug)]
pub struct Api {
    http: reqwest::Client,
    config: Config,
}

impl Api {
    pub fn new(config: Config) -> Self {
        Api {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a GET request to any Slack API endpoint, handling authentication.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        debug!("GET {}", path);

        self.http
            .get(self.config.endpoint(path))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
    }

    /// Create a POST request to any Slack API endpoint, handling authentication.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        debug!("POST {}", path);

        self.http
            .post(self.config.endpoint(path))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
    }

    fn auth_header(&self) -> String {
        to_auth_header_val(&self.config.token)
    }
}

/// Slack's API returns a common response envelope, representing whether a
/// request was successful.
///
/// ```json
/// {
///     "ok": true,
///     "channels": []
/// }
/// ```
///
/// ```json
/// {
///     "ok": false,
///     "error": "invalid_auth"
/// }
/// ```
#[derive(Deserialize)]
#[serde(untagged)]
pub enum APIResult<T> {
    Ok(Success<T>),
    Err(ErrorResponse),
}

/// The universal response in case of a successful request, wrapping the
/// method-specific payload.
// Ideally we'd be able to use `ok` as a tag, rather than defining `APIResult`
// as untagged. The `only_true`/`only_false` pair gets us the same outcome:
//   <https://github.com/serde-rs/serde/issues/745#issuecomment-294314786>
#[derive(Deserialize)]
pub struct Success<T> {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_true")]
    ok: bool,
    #[serde(flatten)]
    pub body: T,
}

/// The universal response in case of an unsuccessful request.
#[derive(Deserialize)]
pub struct ErrorResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_false")]
    ok: bool,
    pub error: String,
}

/// The metadata attached to list responses, enabling pagination. The last
/// page has an empty cursor, or no metadata at all.
#[serde_as]
#[derive(Default, Deserialize)]
pub struct PaginationMeta {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A payload for methods whose successful response carries nothing we need.
#[derive(Deserialize)]
pub struct Empty {}

/// Send a request and unwrap Slack's envelope, turning `"ok": false` into
/// [SlackError::APIResponseError].
pub async fn dispatch<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T, SlackError> {
    let res: APIResult<T> = req.send().await?.json().await?;

    match res {
        APIResult::Ok(res) => Ok(res.body),
        APIResult::Err(res) => Err(SlackError::APIResponseError(res.error)),
    }
}

/// The one place remote failures are judged. Failures are logged against the
/// operation that caused them and absorbed.
pub fn evaluate<T>(op: &str, res: Result<T, SlackError>) -> Option<T> {
    match res {
        Ok(x) => Some(x),
        Err(e) => {
            error!("ERROR in {}: {}", op, e);
            None
        }
    }
}
