// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fetch scheduling and the completion barrier.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::artifact::ArtifactCoordinate;
use crate::progress::{ProgressBus, ProgressMessage};

use super::fetcher::RepoFetcher;

/// Default number of concurrent fetches.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Schedules one fetch per missing artifact onto a bounded pool.
///
/// Artifacts whose cache file already exists are never submitted. The
/// existence check is not re-run or locked between test and submission;
/// concurrent coordinators racing on the same cache are out of scope.
pub struct FetchCoordinator {
    bus: Arc<ProgressBus>,
    fetcher: Arc<RepoFetcher>,
    repositories: Arc<Vec<String>>,
    pool_size: usize,
}

impl FetchCoordinator {
    pub fn new(bus: Arc<ProgressBus>, repositories: Vec<String>) -> Self {
        Self::with_pool_size(bus, repositories, DEFAULT_POOL_SIZE)
    }

    pub fn with_pool_size(
        bus: Arc<ProgressBus>,
        repositories: Vec<String>,
        pool_size: usize,
    ) -> Self {
        let fetcher = Arc::new(RepoFetcher::new(bus.clone()));
        Self {
            bus,
            fetcher,
            repositories: Arc::new(repositories),
            pool_size: pool_size.max(1),
        }
    }

    /// Resolve every dependency into the cache.
    ///
    /// Returns the cache path of every coordinate, in input order, for
    /// classpath assembly. Does not return until every submitted fetch has
    /// reached a terminal state: the handles are joined sequentially in
    /// submission order while the pool runs them concurrently, so the
    /// sequential joins simply observe completions that may already have
    /// happened out of order.
    ///
    /// A fetch that exhausts all repositories does not abort its siblings
    /// or the barrier; it is logged, reported as a `Failed` message, and
    /// leaves its cache file absent. Later stages referencing that path
    /// will find nothing there.
    pub async fn fetch_all(
        &self,
        dependencies: &[ArtifactCoordinate],
        cache_root: &Path,
    ) -> Result<Vec<PathBuf>, std::io::Error> {
        let semaphore = Arc::new(Semaphore::new(self.pool_size));
        let mut handles: Vec<JoinHandle<()>> = Vec::new();
        let mut resolved = Vec::with_capacity(dependencies.len());

        for coord in dependencies {
            let jar = cache_root.join(coord.cache_path());
            if let Some(parent) = jar.parent() {
                std::fs::create_dir_all(parent)?;
            }
            resolved.push(jar.clone());

            if jar.exists() {
                tracing::debug!(artifact = %coord, "already cached, skipping");
                continue;
            }

            let semaphore = semaphore.clone();
            let fetcher = self.fetcher.clone();
            let bus = self.bus.clone();
            let repositories = self.repositories.clone();
            let remote_path = coord.remote_path();
            let name = coord.display_name();

            handles.push(tokio::spawn(async move {
                // Pool bound: at most pool_size fetches hold a permit.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if let Err(err) = fetcher.fetch(&repositories, &remote_path, &jar, &name).await {
                    tracing::error!("{err}");
                    bus.publish(ProgressMessage::failed(&name));
                }
            }));
        }

        // Barrier: join in submission order. By the time the last join
        // returns, every submitted fetch has finished one way or another.
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::error!("fetch task panicked: {err}");
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_artifact_is_never_submitted() {
        let bus = Arc::new(ProgressBus::new());
        // No repositories: any submitted fetch would publish Failed.
        let coordinator = FetchCoordinator::new(bus.clone(), Vec::new());

        let tmp = tempfile::tempdir().unwrap();
        let coord = ArtifactCoordinate::new("org.example", "foo", "1.0");
        let jar = tmp.path().join(coord.cache_path());
        std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
        std::fs::write(&jar, b"cached").unwrap();

        let resolved = coordinator
            .fetch_all(&[coord], tmp.path())
            .await
            .unwrap();
        assert_eq!(resolved, vec![jar.clone()]);
        assert_eq!(std::fs::read(&jar).unwrap(), b"cached");
    }

    #[tokio::test]
    async fn test_resolved_paths_follow_input_order() {
        let bus = Arc::new(ProgressBus::new());
        let coordinator = FetchCoordinator::new(bus, Vec::new());
        let tmp = tempfile::tempdir().unwrap();

        let deps = vec![
            ArtifactCoordinate::new("org.example", "foo", "1.0"),
            ArtifactCoordinate::new("org.example", "bar", "2.0"),
        ];
        // Pre-cache both so nothing is fetched.
        for coord in &deps {
            let jar = tmp.path().join(coord.cache_path());
            std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
            std::fs::write(&jar, b"x").unwrap();
        }

        let resolved = coordinator.fetch_all(&deps, tmp.path()).await.unwrap();
        assert_eq!(resolved[0], tmp.path().join(deps[0].cache_path()));
        assert_eq!(resolved[1], tmp.path().join(deps[1].cache_path()));
    }
}
