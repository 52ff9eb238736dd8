// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Single-artifact download with repository failover.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::progress::{ProgressBus, ProgressMessage, SIZE_UNKNOWN};

/// Fetch-level failure: every repository was tried and none served the
/// artifact. Transport errors from individual repositories never escape
/// the fetcher; they are logged and the next repository is tried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unable to download {name} from any repository ({attempts} attempted)")]
    Exhausted { name: String, attempts: usize },
}

/// One repository attempt's failure. Internal to the fetcher; callers
/// only ever see [`FetchError::Exhausted`].
#[derive(Debug, Error)]
enum AttemptError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads artifacts, trying repositories in order until one succeeds.
///
/// Publishes the artifact's lifecycle to the bus as it goes: `Started`
/// once a repository responds, `Downloading` per chunk written, `Done` at
/// end of stream. It never publishes `Failed`; that is the caller's job
/// on exhaustion.
pub struct RepoFetcher {
    client: reqwest::Client,
    bus: Arc<ProgressBus>,
}

impl RepoFetcher {
    pub fn new(bus: Arc<ProgressBus>) -> Self {
        Self {
            client: reqwest::Client::new(),
            bus,
        }
    }

    /// Fetch `remote_path` into `dest`, trying `repositories` in order.
    ///
    /// Success short-circuits: once one repository serves the artifact,
    /// no further repositories are contacted. A zero-length repository
    /// list is exhausted immediately. The destination is recreated fresh
    /// for each attempt, so a partial file from a failed repository is
    /// overwritten by the next.
    pub async fn fetch(
        &self,
        repositories: &[String],
        remote_path: &str,
        dest: &Path,
        name: &str,
    ) -> Result<(), FetchError> {
        for repo in repositories {
            match self.try_repository(repo, remote_path, dest, name).await {
                Ok(()) => {
                    tracing::debug!(artifact = name, repository = %repo, "download complete");
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!(
                        artifact = name,
                        repository = %repo,
                        "repository attempt failed: {err}; trying next"
                    );
                }
            }
        }
        Err(FetchError::Exhausted {
            name: name.to_string(),
            attempts: repositories.len(),
        })
    }

    async fn try_repository(
        &self,
        repo: &str,
        remote_path: &str,
        dest: &Path,
        name: &str,
    ) -> Result<(), AttemptError> {
        let url = join_url(repo, remote_path);
        let mut response = self.client.get(&url).send().await?.error_for_status()?;

        let total = response
            .content_length()
            .map(|len| len as i64)
            .unwrap_or(SIZE_UNKNOWN);
        self.bus.publish(ProgressMessage::started(name, total));

        let mut file = tokio::fs::File::create(dest).await?;
        let mut last_chunk = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            last_chunk = chunk.len() as u64;
            self.bus
                .publish(ProgressMessage::downloading(name, total, last_chunk));
        }
        file.flush().await?;

        self.bus
            .publish(ProgressMessage::done(name, total, last_chunk));
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("https://repo.example/m2/", "org/foo/1.0/foo-1.0.jar"),
            "https://repo.example/m2/org/foo/1.0/foo-1.0.jar"
        );
        assert_eq!(
            join_url("https://repo.example/m2", "org/foo/1.0/foo-1.0.jar"),
            "https://repo.example/m2/org/foo/1.0/foo-1.0.jar"
        );
    }

    #[tokio::test]
    async fn test_zero_repositories_exhausts_immediately() {
        let bus = Arc::new(ProgressBus::new());
        let fetcher = RepoFetcher::new(bus);
        let tmp = tempfile::tempdir().unwrap();
        let err = fetcher
            .fetch(&[], "org/foo/1.0/foo-1.0.jar", &tmp.path().join("foo.jar"), "foo-1.0")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Exhausted { attempts: 0, .. }));
    }
}
