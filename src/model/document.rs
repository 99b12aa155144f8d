// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ids::BlockId;

/// Spec lifecycle status carried in the front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    #[default]
    Draft,
    Review,
    Approved,
    Implemented,
}

/// Diagram kind, declared per block in the front matter's `diagrams` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Architecture,
    Flow,
}

/// One entry of the front matter's `diagrams` list; paired with fenced blocks
/// by ordinal position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDiagram {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
}

/// Structured front matter of a spec document.
///
/// Every field is optional in the text; absence of the whole section (or an
/// undecodable section) degrades to `DocumentHeader::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentHeader {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: DocStatus,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub diagrams: Vec<DeclaredDiagram>,
}

/// One fenced Mermaid region extracted from a document body.
///
/// Blocks are value objects: re-extracted on every parse, never mutated in
/// place. `start_line`/`end_line` are 0-based offsets of the fence delimiter
/// lines within the body and are informational only; splicing re-resolves the
/// block by content (see [`crate::markdown::splice_block`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    id: BlockId,
    kind: BlockKind,
    raw: String,
    start_line: usize,
    end_line: usize,
}

impl DiagramBlock {
    pub fn new(
        id: BlockId,
        kind: BlockKind,
        raw: impl Into<String>,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            id,
            kind,
            raw: raw.into(),
            start_line,
            end_line,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// The Mermaid source between the fence delimiters, fences excluded.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }
}

/// A loaded spec document: full text plus the derived header and blocks.
///
/// Owned by whoever loaded it. Every edit round-trip rebuilds the document
/// from a freshly computed full text string instead of mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: PathBuf,
    header: DocumentHeader,
    full_text: String,
    body: String,
    blocks: Vec<DiagramBlock>,
}

impl Document {
    /// Derives header, body and blocks from raw document text.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let full_text = text.into();
        let (header, body) = crate::markdown::split_front_matter(&full_text);
        let body = body.to_owned();
        let blocks = crate::markdown::extract_blocks(&body, &header);
        Self {
            path: path.into(),
            header,
            full_text,
            body,
            blocks,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Document text minus the front matter section.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn blocks(&self) -> &[DiagramBlock] {
        &self.blocks
    }

    pub fn block(&self, ordinal: usize) -> Option<&DiagramBlock> {
        self.blocks.get(ordinal)
    }

    pub fn block_by_id(&self, id: &BlockId) -> Option<&DiagramBlock> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    /// Rebuilds the document from externally changed text, keeping the path.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::parse(self.path.clone(), text)
    }
}
