// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Classpath assembly and the final process spawn.
//!
//! Thin, sequential glue after all fetches have settled: make sure the
//! runnable jar is in place, join the resolved artifact paths into a
//! classpath, and hand off to a child `java` process with inherited
//! stdio.

use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use thiserror::Error;

/// Environment variable overriding the `java` executable.
pub const JAVA_ENV: &str = "PODRUN_JAVA";

/// Environment variable supplying extra whitespace-separated JVM flags.
pub const JAVA_OPTS_ENV: &str = "PODRUN_JAVA_OPTS";

/// Platform path-list separator for classpath entries.
pub const CLASSPATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("main jar not found at {0}")]
    MainJarMissing(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Builds the classpath and spawns the target application.
pub struct LaunchComposer {
    install_dir: PathBuf,
    app_name: String,
    jar_name: String,
}

impl LaunchComposer {
    pub fn new(
        install_dir: impl Into<PathBuf>,
        app_name: impl Into<String>,
        jar_name: impl Into<String>,
    ) -> Self {
        Self {
            install_dir: install_dir.into(),
            app_name: app_name.into(),
            jar_name: jar_name.into(),
        }
    }

    /// Where the runnable jar lives: `<install>/apps/<appname>/<jarname>`.
    pub fn main_jar_path(&self) -> PathBuf {
        self.install_dir
            .join("apps")
            .join(&self.app_name)
            .join(&self.jar_name)
    }

    /// Make sure the runnable jar is installed, copying it from
    /// `source_dir` on first run.
    pub fn ensure_main_jar(&self, source_dir: &Path) -> Result<PathBuf, LaunchError> {
        let dest = self.main_jar_path();
        if dest.exists() {
            return Ok(dest);
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let source = source_dir.join(&self.jar_name);
        if !source.exists() {
            return Err(LaunchError::MainJarMissing(source));
        }
        std::fs::copy(&source, &dest)?;
        tracing::info!(jar = %dest.display(), "installed main jar");
        Ok(dest)
    }

    /// Join resolved artifact paths with the platform path separator.
    pub fn build_classpath(paths: &[PathBuf]) -> String {
        paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(&CLASSPATH_SEPARATOR.to_string())
    }

    /// Spawn the application with inherited stdio and return immediately.
    ///
    /// `PODRUN_JAVA` overrides the executable; `PODRUN_JAVA_OPTS` passes
    /// extra flags through to the child JVM.
    pub fn launch(&self, classpath: &str, main_jar: &Path) -> Result<Child, LaunchError> {
        let java = std::env::var(JAVA_ENV).unwrap_or_else(|_| "java".to_string());
        let mut command = Command::new(java);
        if let Ok(opts) = std::env::var(JAVA_OPTS_ENV) {
            for opt in opts.split_whitespace() {
                command.arg(opt);
            }
        }
        command.arg("-cp").arg(classpath).arg("-jar").arg(main_jar);

        tracing::info!(jar = %main_jar.display(), "launching application");
        Ok(command.spawn()?)
    }
}
