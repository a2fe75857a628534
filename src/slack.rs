//! Talks to Slack's Web API on behalf of a single bot token.
//!
//! Everything hangs off [bot::SlackBot]; each submodule contributes the
//! request/response types for one area of the API along with an `impl
//! SlackBot` block exposing it.

mod api;
pub mod auth;
pub mod bot;
pub mod channel;
pub mod conversation;
pub mod error;
pub mod file;
pub mod message;
pub mod user;
