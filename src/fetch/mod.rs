// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Concurrent artifact fetching.
//!
//! [`RepoFetcher`] downloads one artifact, failing over across an ordered
//! repository list. [`FetchCoordinator`] runs one fetcher per missing
//! artifact on a bounded pool and barrier-waits until every submitted
//! fetch has reached a terminal state.

pub mod coordinator;
pub mod fetcher;

pub use coordinator::{FetchCoordinator, DEFAULT_POOL_SIZE};
pub use fetcher::{FetchError, RepoFetcher};
