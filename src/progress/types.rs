// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Progress message types.

use serde::{Deserialize, Serialize};

/// Total size reported when the server omits a Content-Length.
pub const SIZE_UNKNOWN: i64 = -1;

/// Lifecycle stage of one artifact's fetch attempt.
///
/// A successful attempt moves strictly `Started` -> `Downloading`* ->
/// `Done`. `Failed` is emitted only after every repository has been
/// exhausted and terminates that artifact's message sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadState {
    /// A repository responded; the transfer is about to begin.
    Started,
    /// One chunk was written to the destination file.
    Downloading,
    /// End of stream reached; the artifact is fully cached.
    Done,
    /// All repositories exhausted; no cache file was produced.
    Failed,
}

impl DownloadState {
    /// Returns true once no further messages will follow for the artifact.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadState::Done | DownloadState::Failed)
    }
}

/// Immutable snapshot of one artifact's fetch progress.
///
/// `downloaded` is the size of the chunk carried by *this* message, not a
/// running total; observers wanting a cumulative count sum the chunks
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    /// Artifact display name, e.g. `foo-1.0`
    pub name: String,
    /// Lifecycle stage
    pub state: DownloadState,
    /// Expected total size in bytes, [`SIZE_UNKNOWN`] if the server did
    /// not advertise one
    pub total: i64,
    /// Bytes in this update
    pub downloaded: u64,
}

impl ProgressMessage {
    pub fn started(name: impl Into<String>, total: i64) -> Self {
        Self {
            name: name.into(),
            state: DownloadState::Started,
            total,
            downloaded: 0,
        }
    }

    pub fn downloading(name: impl Into<String>, total: i64, chunk: u64) -> Self {
        Self {
            name: name.into(),
            state: DownloadState::Downloading,
            total,
            downloaded: chunk,
        }
    }

    pub fn done(name: impl Into<String>, total: i64, last_chunk: u64) -> Self {
        Self {
            name: name.into(),
            state: DownloadState::Done,
            total,
            downloaded: last_chunk,
        }
    }

    /// Failure carries zero for both size fields.
    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: DownloadState::Failed,
            total: 0,
            downloaded: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!DownloadState::Started.is_terminal());
        assert!(!DownloadState::Downloading.is_terminal());
        assert!(DownloadState::Done.is_terminal());
        assert!(DownloadState::Failed.is_terminal());
    }

    #[test]
    fn test_failed_zeroes_sizes() {
        let msg = ProgressMessage::failed("foo-1.0");
        assert_eq!(msg.total, 0);
        assert_eq!(msg.downloaded, 0);
        assert_eq!(msg.state, DownloadState::Failed);
    }

    #[test]
    fn test_started_carries_total_and_zero_downloaded() {
        let msg = ProgressMessage::started("foo-1.0", 4096);
        assert_eq!(msg.total, 4096);
        assert_eq!(msg.downloaded, 0);
    }
}
