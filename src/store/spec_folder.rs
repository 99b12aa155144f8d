// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::model::Document;

/// A folder of `.md` spec documents, addressed by bare name (no extension).
///
/// This is the storage collaborator of the sync core: it moves whole text
/// strings in and out; header/block derivation happens in the core on every
/// read, never incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFolder {
    root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub enum StoreError {
    InvalidName { name: String },
    NotFound { name: String },
    AlreadyExists { name: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name } => write!(
                f,
                "invalid spec name: {name:?} (expected a non-empty name without path separators)"
            ),
            Self::NotFound { name } => write!(f, "spec not found: {name}"),
            Self::AlreadyExists { name } => write!(f, "spec already exists: {name}"),
            Self::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn validate_spec_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.starts_with('.')
        || name.contains("..");
    if invalid {
        return Err(StoreError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

impl SpecFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the folder if missing. Idempotent.
    pub fn ensure_root(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })
    }

    pub fn spec_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_spec_name(name)?;
        Ok(self.root.join(format!("{name}.md")))
    }

    /// Extracts a spec name from a path, if it looks like a spec file.
    pub fn spec_name(path: &Path) -> Option<String> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        validate_spec_name(stem).ok()?;
        Some(stem.to_owned())
    }

    /// Lists spec files sorted by name. Non-`.md` entries are skipped.
    pub fn list(&self) -> Result<Vec<SpecEntry>, StoreError> {
        let read_dir = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            let Some(name) = Self::spec_name(&path) else {
                continue;
            };
            entries.push(SpecEntry { name, path });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub fn read_text(&self, name: &str) -> Result<String, StoreError> {
        let path = self.spec_path(name)?;
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                name: name.to_owned(),
            },
            _ => StoreError::Io { path, source },
        })
    }

    /// Reads and parses a spec into a [`Document`] (header, body, blocks).
    pub fn read(&self, name: &str) -> Result<Document, StoreError> {
        let path = self.spec_path(name)?;
        let text = self.read_text(name)?;
        Ok(Document::parse(path, text))
    }

    /// Writes spec text atomically: temp file in the same folder, then
    /// rename over the target. A concurrent reader sees either the old or
    /// the new text, never a torn write. The temp path is unique per write
    /// so concurrent writers to one spec never clobber each other; last
    /// rename wins.
    pub fn write(&self, name: &str, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.spec_path(name)?;
        let tmp = self.temp_path(name);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        if let Err(source) = file.write_all(text.as_bytes()) {
            drop(file);
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io { path: tmp, source });
        }
        drop(file);

        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io { path, source });
        }
        Ok(path)
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        static WRITE_COUNTER: AtomicU64 = AtomicU64::new(0);
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = WRITE_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{name}.md.tmp-{}-{nanos}-{counter}",
            std::process::id()
        ))
    }

    /// Creates a new spec; fails if a spec with that name already exists.
    pub fn create(&self, name: &str, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.spec_path(name)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        self.write(name, text)
    }
}

#[cfg(test)]
mod tests;
