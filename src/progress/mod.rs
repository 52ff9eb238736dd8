// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Download progress reporting.
//!
//! Fetch workers push [`ProgressMessage`]s into the [`ProgressBus`], which
//! relays them asynchronously to every registered [`ProgressCallback`].
//! Messages for one artifact arrive in production order; messages for
//! different artifacts interleave freely.

pub mod bus;
pub mod types;

pub use bus::{ProgressBus, ProgressCallback};
pub use types::{DownloadState, ProgressMessage, SIZE_UNKNOWN};
