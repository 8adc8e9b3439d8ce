// smps2bin - An SMPS2ASM music script assembler for Mega Drive sound drivers
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Re-assembly on save.
//!
//! Editors save in different ways: some truncate and rewrite the file,
//! others write a temporary file and rename it over the original. The
//! watcher therefore watches the parent directory and filters events by
//! file name.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

/// Rapid changes within this window count as one.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// Errors that can occur while watching the source file.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Failed to create file watcher: {0}")]
    Create(#[source] notify::Error),

    #[error("Cannot resolve path {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to watch {}: {source}", path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("Watch channel closed")]
    ChannelClosed,

    #[error("Watch error: {0}")]
    Event(#[source] notify::Error),
}

/// Watches one source file for changes.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    path: PathBuf,
}

impl SourceWatcher {
    /// Start watching `path`, which must exist.
    pub fn new(path: &Path) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx).map_err(WatchError::Create)?;

        let canonical = path.canonicalize().map_err(|source| WatchError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = canonical.parent() {
            watcher
                .watch(parent, RecursiveMode::NonRecursive)
                .map_err(|source| WatchError::Watch {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tracing::debug!(path = %canonical.display(), "watching source");

        Ok(Self {
            _watcher: watcher,
            rx,
            path: canonical,
        })
    }

    /// The canonical path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the file changes.
    pub fn wait_for_change(&self) -> Result<(), WatchError> {
        loop {
            let event = self
                .rx
                .recv()
                .map_err(|_| WatchError::ChannelClosed)?
                .map_err(WatchError::Event)?;

            if !self.is_relevant(&event) {
                continue;
            }

            std::thread::sleep(DEBOUNCE_DURATION);
            while self.rx.try_recv().is_ok() {}
            tracing::debug!(kind = ?event.kind, "source changed");
            return Ok(());
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return false;
        }
        event.paths.iter().any(|p| path_matches(p, &self.path))
    }
}

/// Whether an event path refers to the watched file.
fn path_matches(event_path: &Path, watched: &Path) -> bool {
    let canonical = event_path
        .canonicalize()
        .unwrap_or_else(|_| event_path.to_path_buf());
    if canonical == watched {
        return true;
    }
    // The file may not exist yet during an atomic save.
    canonical.file_name() == watched.file_name() && canonical.parent() == watched.parent()
}
