//! Request and response types for the file management API

use serde::{Deserialize, Serialize};
use std::fmt;

/// File management operation; the value is the URL path segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FmgrOp {
    Move,
    Copy,
    Fetch,
    Delete,
    DeleteM3u8,
    DeletePrefix,
}

impl FmgrOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FmgrOp::Move => "move",
            FmgrOp::Copy => "copy",
            FmgrOp::Fetch => "fetch",
            FmgrOp::Delete => "delete",
            FmgrOp::DeleteM3u8 => "deletem3u8",
            FmgrOp::DeletePrefix => "deletePrefix",
        }
    }
}

impl fmt::Display for FmgrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters of a file management task
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FmgrOptions {
    /// Callback URL, sent base64url-encoded
    pub notify_url: Option<String>,
    /// Whether to notify per file (`1`) or once per task
    pub separate: Option<String>,
    /// Overwrite an existing target (fetch only)
    pub force: Option<String>,
}

impl FmgrOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    pub fn with_separate(mut self, separate: impl Into<String>) -> Self {
        self.separate = Some(separate.into());
        self
    }

    pub fn with_force(mut self, force: impl Into<String>) -> Self {
        self.force = Some(force.into());
        self
    }
}

/// Task submission result
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmgrTask {
    /// Id to poll with `status`
    pub persistent_id: String,
}
