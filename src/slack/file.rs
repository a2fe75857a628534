//! Upload files into a channel.

use super::{api::*, bot::SlackBot, channel::ChannelId, error::SlackError};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::{fmt, path::Path};

/// Slack's identifier for an uploaded file, for example `F0S43PZDF`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// <https://api.slack.com/methods/files.upload#examples>
#[derive(Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Deserialize)]
struct UploadedFile {
    id: FileId,
}

impl SlackBot {
    /// Upload a file, sharing it to a channel which defaults to the bot's
    /// channel. With no channel at all the file is uploaded unshared. The
    /// file is named after the last component of `path`; `title` defaults to
    /// that name on Slack's end.
    ///
    /// The file is read in full before anything is sent, so an unreadable
    /// file fails without touching the API.
    pub async fn send_file<P: AsRef<Path>>(
        &self,
        path: P,
        title: Option<&str>,
        channel: Option<&ChannelId>,
    ) -> Result<Option<FileId>, SlackError> {
        let path = path.as_ref();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SlackError::FileAccess(path.to_owned(), e))?;

        let filename = file_name(path);

        let mut form = Form::new()
            .text("filename", filename.clone())
            .part("file", Part::bytes(bytes).file_name(filename));

        if let Some(channel) = channel.or(self.channel_id()) {
            form = form.text("channels", channel.0.clone());
        }

        if let Some(title) = title {
            form = form.text("title", title.to_owned());
        }

        let res = dispatch::<UploadResponse>(self.api.post("/files.upload").multipart(form)).await;

        Ok(evaluate("send_file", res).map(|x| x.file.id))
    }
}

/// The last component of a path, or nothing if it's e.g. `..`.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default()
}
