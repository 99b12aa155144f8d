// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File watcher bridging on-disk spec changes into the event channel.
//!
//! External edits (another editor, git checkout) surface as the same
//! websocket events as API writes. A write performed through the API marks
//! its path suppressed so the echo is swallowed once.

use std::sync::mpsc;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{info, warn};

use super::{AppState, SpecEvent};
use crate::store::SpecFolder;

/// Starts watching the spec folder on a dedicated thread.
///
/// The watcher handle is moved into the thread and lives as long as the
/// event stream does.
pub fn spawn_watcher(state: AppState) -> notify::Result<()> {
    let root = state.folder().root().to_path_buf();
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();

    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&root, RecursiveMode::NonRecursive)?;
    info!(root = %root.display(), "watching spec folder");

    std::thread::Builder::new()
        .name("spec-watch".to_owned())
        .spawn(move || {
            let _watcher = watcher;
            for result in rx {
                match result {
                    Ok(event) => handle_event(&state, &event),
                    Err(err) => warn!(error = %err, "watch: backend error"),
                }
            }
        })
        .expect("spawn spec watcher thread");

    Ok(())
}

fn handle_event(state: &AppState, event: &Event) {
    for path in &event.paths {
        // Temp files and non-spec entries never reach clients.
        let Some(name) = SpecFolder::spec_name(path) else {
            continue;
        };

        match event.kind {
            EventKind::Create(_) => {
                if state.take_suppressed(path) {
                    continue;
                }
                state.broadcast(SpecEvent::SpecAdded { name });
            }
            EventKind::Modify(_) => {
                if state.take_suppressed(path) {
                    continue;
                }
                match state.folder().read_text(&name) {
                    Ok(content) => {
                        state.broadcast(SpecEvent::SpecChanged { name, content });
                    }
                    Err(err) => {
                        warn!(name, error = %err, "watch: changed spec became unreadable");
                    }
                }
            }
            EventKind::Remove(_) => {
                state.broadcast(SpecEvent::SpecRemoved { name });
            }
            _ => {}
        }
    }
}
