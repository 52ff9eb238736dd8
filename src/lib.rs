// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! podrun - bootstrap launcher library
//!
//! Resolves a declared set of jar dependencies from remote repositories,
//! caches them locally, reports download progress to asynchronously
//! registered observers ("pods"), then assembles a classpath and spawns
//! the packaged application.
//!
//! # Core Modules
//!
//! - [`artifact`] - Coordinate parsing and cache/remote path derivation
//! - [`config`] - Properties-file configuration and install directories
//! - [`progress`] - The asynchronous progress bus and its message types
//! - [`fetch`] - Repository-failover downloads on a bounded worker pool
//! - [`pods`] - Pluggable progress listeners and the pod registry
//! - [`launch`] - Classpath assembly and the child-process spawn

pub mod artifact;
pub mod config;
pub mod fetch;
pub mod launch;
pub mod locks;
pub mod pods;
pub mod progress;

// Re-export the types that make up the public fetch pipeline
pub use artifact::ArtifactCoordinate;
pub use config::{ConfigError, LauncherConfig};
pub use fetch::{FetchCoordinator, FetchError, RepoFetcher, DEFAULT_POOL_SIZE};
pub use launch::{LaunchComposer, LaunchError, CLASSPATH_SEPARATOR};
pub use pods::{Pod, PodError, PodRegistry};
pub use progress::{DownloadState, ProgressBus, ProgressCallback, ProgressMessage, SIZE_UNKNOWN};
