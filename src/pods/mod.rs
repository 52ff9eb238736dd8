// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pods: pluggable progress listeners.
//!
//! A pod is handed the [`ProgressBus`] once, on its own task, and from
//! there registers or unregisters whatever subscribers it likes. Pods are
//! looked up by identifier in a [`PodRegistry`] populated with explicit
//! `register` calls; there is no runtime class resolution. A pod that is
//! unknown or fails to start is logged and isolated; it never affects
//! fetching or other pods.

pub mod console;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::progress::ProgressBus;

pub use console::ConsolePod;

/// Pod startup failures. Never fatal to the launcher.
#[derive(Debug, Error)]
pub enum PodError {
    #[error("unknown pod {0}")]
    Unknown(String),
}

/// A plugin with one entry point.
pub trait Pod: Send + Sync {
    /// Called once on the pod's own task. Typically subscribes one or
    /// more callbacks to the bus and returns; long-running pods may loop
    /// here instead.
    fn init(&self, bus: &Arc<ProgressBus>);
}

type PodFactory = Box<dyn Fn() -> Arc<dyn Pod> + Send + Sync>;

/// Maps pod identifiers to factories.
#[derive(Default)]
pub struct PodRegistry {
    factories: HashMap<String, PodFactory>,
}

impl PodRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in pods registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("console", || Arc::new(ConsolePod::new()));
        registry
    }

    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Pod> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Instantiate the pod for `id` and run its `init` on a fresh task.
    pub fn spawn(&self, id: &str, bus: Arc<ProgressBus>) -> Result<(), PodError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| PodError::Unknown(id.to_string()))?;
        let pod = factory();
        tokio::spawn(async move {
            pod.init(&bus);
        });
        Ok(())
    }

    /// Spawn every identifier in `ids`, logging and skipping failures.
    pub fn spawn_all(&self, ids: &[String], bus: &Arc<ProgressBus>) {
        for id in ids {
            if let Err(err) = self.spawn(id, bus.clone()) {
                tracing::error!("failed to start pod: {err}");
            }
        }
    }
}
