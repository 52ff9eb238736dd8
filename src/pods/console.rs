// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Built-in console pod: renders per-artifact download progress bars.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::progress::{DownloadState, ProgressBus, ProgressCallback, ProgressMessage};

use super::Pod;

/// Pod that subscribes a progress-bar renderer to the bus.
pub struct ConsolePod;

impl ConsolePod {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePod {
    fn default() -> Self {
        Self::new()
    }
}

impl Pod for ConsolePod {
    fn init(&self, bus: &Arc<ProgressBus>) {
        bus.subscribe(Arc::new(ConsoleObserver::new()));
    }
}

struct Entry {
    bar: ProgressBar,
    /// Chunk sizes summed; messages carry per-chunk counts only.
    received: u64,
}

/// Renders one indicatif bar per in-flight artifact.
struct ConsoleObserver {
    multi: MultiProgress,
    entries: Mutex<HashMap<String, Entry>>,
}

impl ConsoleObserver {
    fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn start_bar(&self, message: &ProgressMessage) -> ProgressBar {
        let bar = if message.total >= 0 {
            let bar = self.multi.add(ProgressBar::new(message.total as u64));
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} | {msg}")
                    .unwrap()
                    .progress_chars("█▓░"),
            );
            bar
        } else {
            let bar = self.multi.add(ProgressBar::new_spinner());
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner:.green} {bytes} | {msg}")
                    .unwrap(),
            );
            bar
        };
        bar.set_message(message.name.clone());
        bar
    }
}

impl ProgressCallback for ConsoleObserver {
    fn on_message(&self, message: &ProgressMessage) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };

        match message.state {
            DownloadState::Started => {
                let bar = self.start_bar(message);
                // A retry against a later repository restarts the count.
                entries.insert(
                    message.name.clone(),
                    Entry { bar, received: 0 },
                );
            }
            DownloadState::Downloading => {
                if let Some(entry) = entries.get_mut(&message.name) {
                    entry.received += message.downloaded;
                    entry.bar.set_position(entry.received);
                }
            }
            DownloadState::Done => {
                if let Some(entry) = entries.remove(&message.name) {
                    entry
                        .bar
                        .finish_with_message(format!("{} {}", "✓".green(), message.name));
                }
            }
            DownloadState::Failed => {
                match entries.remove(&message.name) {
                    Some(entry) => entry
                        .bar
                        .abandon_with_message(format!("{} {}", "✗".red(), message.name)),
                    None => {
                        // Failure with no prior Started: no repository
                        // ever responded.
                        let bar = self.multi.add(ProgressBar::new(0));
                        bar.abandon_with_message(format!("{} {}", "✗".red(), message.name));
                    }
                }
            }
        }
    }
}
