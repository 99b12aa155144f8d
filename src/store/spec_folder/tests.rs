// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{SpecFolder, StoreError};
use crate::model::DocStatus;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct SpecFolderTestCtx {
    tmp: TempDir,
    folder: SpecFolder,
}

impl SpecFolderTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let folder = SpecFolder::new(tmp.path().join("specs"));
        folder.ensure_root().unwrap();
        Self { tmp, folder }
    }
}

#[fixture]
fn ctx() -> SpecFolderTestCtx {
    SpecFolderTestCtx::new("spec-folder")
}

const SPEC_TEXT: &str = concat!(
    "---\n",
    "title: Checkout\n",
    "status: review\n",
    "---\n",
    "```mermaid\n",
    "graph TD\n",
    "    A --> B\n",
    "```\n",
);

#[rstest]
fn list_is_empty_for_fresh_folder(ctx: SpecFolderTestCtx) {
    assert_eq!(ctx.folder.list().unwrap(), vec![]);
}

#[rstest]
fn list_skips_non_md_entries_and_sorts_by_name(ctx: SpecFolderTestCtx) {
    ctx.folder.create("zeta", "z").unwrap();
    ctx.folder.create("alpha", "a").unwrap();
    std::fs::write(ctx.folder.root().join("notes.txt"), "not a spec").unwrap();
    std::fs::create_dir(ctx.folder.root().join("subdir.md")).unwrap();

    let names: Vec<String> =
        ctx.folder.list().unwrap().into_iter().map(|entry| entry.name).collect();
    // A directory named like a spec still lists; reads of it fail with Io.
    assert_eq!(names, vec!["alpha", "subdir", "zeta"]);
}

#[rstest]
fn create_then_read_parses_the_document(ctx: SpecFolderTestCtx) {
    ctx.folder.create("checkout", SPEC_TEXT).unwrap();

    let doc = ctx.folder.read("checkout").unwrap();
    assert_eq!(doc.header().title, "Checkout");
    assert_eq!(doc.header().status, DocStatus::Review);
    assert_eq!(doc.blocks().len(), 1);
    assert_eq!(doc.blocks()[0].raw(), "graph TD\n    A --> B");
}

#[rstest]
fn create_refuses_to_overwrite(ctx: SpecFolderTestCtx) {
    ctx.folder.create("checkout", SPEC_TEXT).unwrap();
    let result = ctx.folder.create("checkout", "other");
    assert!(matches!(result, Err(StoreError::AlreadyExists { name }) if name == "checkout"));
    assert_eq!(ctx.folder.read_text("checkout").unwrap(), SPEC_TEXT);
}

#[rstest]
fn write_replaces_text_and_leaves_no_temp_files(ctx: SpecFolderTestCtx) {
    ctx.folder.create("checkout", SPEC_TEXT).unwrap();
    ctx.folder.write("checkout", "replaced").unwrap();

    assert_eq!(ctx.folder.read_text("checkout").unwrap(), "replaced");
    let leftovers: Vec<_> = std::fs::read_dir(ctx.folder.root())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[rstest]
fn concurrent_writes_to_one_spec_all_succeed(ctx: SpecFolderTestCtx) {
    ctx.folder.create("checkout", "seed").unwrap();

    let writers: Vec<_> = ["alpha", "beta"]
        .into_iter()
        .map(|text| {
            let folder = ctx.folder.clone();
            std::thread::spawn(move || {
                for round in 0..200 {
                    folder
                        .write("checkout", text)
                        .unwrap_or_else(|err| panic!("round {round}: write {text}: {err}"));
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("writer thread");
    }

    // Last rename wins; the file is whole either way.
    let text = ctx.folder.read_text("checkout").unwrap();
    assert!(text == "alpha" || text == "beta", "torn write: {text:?}");
    let leftovers: Vec<_> = std::fs::read_dir(ctx.folder.root())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[rstest]
fn read_of_missing_spec_is_not_found(ctx: SpecFolderTestCtx) {
    let result = ctx.folder.read_text("nope");
    assert!(matches!(result, Err(StoreError::NotFound { name }) if name == "nope"));
}

#[rstest]
#[case("")]
#[case("a/b")]
#[case("a\\b")]
#[case("..")]
#[case(".hidden")]
fn invalid_names_are_rejected(ctx: SpecFolderTestCtx, #[case] name: &str) {
    let result = ctx.folder.read_text(name);
    assert!(matches!(result, Err(StoreError::InvalidName { .. })), "name {name:?} accepted");
    assert!(ctx.folder.write(name, "x").is_err());
}

#[rstest]
fn spec_name_maps_paths_back_to_names(ctx: SpecFolderTestCtx) {
    let path = ctx.folder.create("checkout", SPEC_TEXT).unwrap();
    assert_eq!(SpecFolder::spec_name(&path).as_deref(), Some("checkout"));
    assert_eq!(SpecFolder::spec_name(ctx.tmp.path().join("notes.txt").as_path()), None);
    assert_eq!(SpecFolder::spec_name(std::path::Path::new(".hidden.md")), None);
}
