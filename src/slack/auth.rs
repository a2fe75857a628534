//! Helpers around Slack's use of OAuth Bearer Authentication.

use std::fmt;

/// A newtype wrapper around Slack access tokens, typically a bot token
/// beginning `xoxb-`.
#[derive(PartialEq, Eq, Clone)]
pub struct SlackAccessToken(pub String);

// Tokens end up inside `Config` and `SlackBot`, both of which get logged in
// debug output.
impl fmt::Debug for SlackAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SlackAccessToken([REDACTED])")
    }
}

/// Convert a Slack access token to a `Bearer` `Authorization` header value.
///
/// ```ignore
/// let token = SlackAccessToken("xoxb-foo".into());
/// assert_eq!(to_auth_header_val(&token), "Bearer xoxb-foo");
/// ```
pub fn to_auth_header_val(t: &SlackAccessToken) -> String {
    format!("Bearer {}", t.0)
}
