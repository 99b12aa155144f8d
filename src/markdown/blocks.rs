// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::{BlockId, BlockKind, DiagramBlock, DocumentHeader};

const FENCE_OPEN: &str = "```mermaid";
const FENCE_CLOSE: &str = "```";

/// Scans a document body for Mermaid fence pairs.
///
/// Pairs are matched at stack depth 1 in left-to-right order and numbered by
/// 0-based ordinal. Identity and kind come from the header's `diagrams` list
/// at the same ordinal when present, otherwise `diagram-<ordinal>` with the
/// default kind. An opening fence with no closing fence before end of text is
/// dropped silently; an opening fence inside an open block restarts the
/// block.
pub fn extract_blocks(body: &str, header: &DocumentHeader) -> Vec<DiagramBlock> {
    let mut blocks = Vec::new();
    let mut ordinal = 0usize;
    let mut open_line: Option<usize> = None;
    let mut raw_lines: Vec<&str> = Vec::new();

    for (idx, line) in body.split('\n').enumerate() {
        let trimmed = line.trim();
        if trimmed == FENCE_OPEN {
            open_line = Some(idx);
            raw_lines.clear();
        } else if open_line.is_some() && trimmed == FENCE_CLOSE {
            let start_line = open_line.take().expect("open fence recorded");
            let (id, kind) = block_identity(header, ordinal);
            blocks.push(DiagramBlock::new(
                id,
                kind,
                raw_lines.join("\n"),
                start_line,
                idx,
            ));
            raw_lines.clear();
            ordinal += 1;
        } else if open_line.is_some() {
            raw_lines.push(line);
        }
    }

    blocks
}

fn block_identity(header: &DocumentHeader, ordinal: usize) -> (BlockId, BlockKind) {
    match header.diagrams.get(ordinal) {
        Some(decl) => {
            let id = BlockId::new(decl.id.clone()).unwrap_or_else(|_| fallback_id(ordinal));
            (id, decl.kind)
        }
        None => (fallback_id(ordinal), BlockKind::default()),
    }
}

fn fallback_id(ordinal: usize) -> BlockId {
    BlockId::new(format!("diagram-{ordinal}")).expect("valid block id")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    /// No fence pair in the current text carries the block's original raw
    /// content. The document has drifted past recognition; the caller must
    /// reload instead of editing blind.
    BlockNotFound { block_id: BlockId },
}

impl fmt::Display for SpliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockNotFound { block_id } => {
                write!(f, "diagram block '{block_id}' not found in document text")
            }
        }
    }
}

impl std::error::Error for SpliceError {}

/// Replaces one block's body lines inside full document text.
///
/// The target is resolved by content: the first fence pair whose raw text
/// equals `block.raw()` wins. Stored line numbers are deliberately ignored;
/// concurrent external edits may have shifted them. Fence delimiter lines are
/// kept verbatim and every byte outside the block is copied unchanged, so
/// extracting right after a successful splice finds a block whose raw text
/// equals `new_raw` at the same ordinal.
pub fn splice_block(
    full_text: &str,
    block: &DiagramBlock,
    new_raw: &str,
) -> Result<String, SpliceError> {
    let lines: Vec<&str> = full_text.split('\n').collect();

    let mut target: Option<(usize, usize)> = None;
    let mut open_line: Option<usize> = None;
    let mut raw_lines: Vec<&str> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed == FENCE_OPEN {
            open_line = Some(idx);
            raw_lines.clear();
        } else if let Some(start) = open_line {
            if trimmed == FENCE_CLOSE {
                if raw_lines.join("\n") == block.raw() {
                    target = Some((start, idx));
                    break;
                }
                open_line = None;
                raw_lines.clear();
            } else {
                raw_lines.push(line);
            }
        }
    }

    let Some((open_idx, close_idx)) = target else {
        return Err(SpliceError::BlockNotFound {
            block_id: block.id().clone(),
        });
    };

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..=open_idx]);
    out.extend(new_raw.split('\n'));
    out.extend_from_slice(&lines[close_idx..]);
    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::{extract_blocks, splice_block, SpliceError};
    use crate::model::{BlockKind, DeclaredDiagram, DiagramBlock, DocumentHeader};

    fn header_with(ids: &[(&str, BlockKind)]) -> DocumentHeader {
        DocumentHeader {
            diagrams: ids
                .iter()
                .map(|(id, kind)| DeclaredDiagram {
                    id: (*id).to_owned(),
                    kind: *kind,
                })
                .collect(),
            ..DocumentHeader::default()
        }
    }

    const TWO_BLOCKS: &str = concat!(
        "intro\n",
        "```mermaid\n",
        "graph TD\n",
        "    A --> B\n",
        "```\n",
        "middle prose\n",
        "```mermaid\n",
        "graph LR\n",
        "    C --> D\n",
        "```\n",
        "outro\n",
    );

    #[test]
    fn extracts_blocks_with_header_identities() {
        let header = header_with(&[("arch", BlockKind::Architecture), ("flow", BlockKind::Flow)]);
        let blocks = extract_blocks(TWO_BLOCKS, &header);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id().as_str(), "arch");
        assert_eq!(blocks[0].raw(), "graph TD\n    A --> B");
        assert_eq!(blocks[0].start_line(), 1);
        assert_eq!(blocks[0].end_line(), 4);
        assert_eq!(blocks[1].id().as_str(), "flow");
        assert_eq!(blocks[1].kind(), BlockKind::Flow);
    }

    #[test]
    fn missing_declarations_synthesize_ordinal_identities() {
        let blocks = extract_blocks(TWO_BLOCKS, &DocumentHeader::default());
        assert_eq!(blocks[0].id().as_str(), "diagram-0");
        assert_eq!(blocks[1].id().as_str(), "diagram-1");
        assert_eq!(blocks[1].kind(), BlockKind::Architecture);
    }

    #[test]
    fn unterminated_block_is_dropped_silently() {
        let body = "```mermaid\ngraph TD\n    A --> B\nno closing fence";
        let blocks = extract_blocks(body, &DocumentHeader::default());
        assert!(blocks.is_empty());
    }

    #[test]
    fn reopened_fence_restarts_the_block() {
        let body = "```mermaid\nfirst\n```mermaid\nsecond\n```\n";
        let blocks = extract_blocks(body, &DocumentHeader::default());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw(), "second");
        assert_eq!(blocks[0].start_line(), 2);
    }

    #[test]
    fn extraction_is_idempotent_on_unchanged_text() {
        let header = DocumentHeader::default();
        assert_eq!(
            extract_blocks(TWO_BLOCKS, &header),
            extract_blocks(TWO_BLOCKS, &header)
        );
    }

    #[test]
    fn splice_replaces_only_the_matched_block() {
        let blocks = extract_blocks(TWO_BLOCKS, &DocumentHeader::default());
        let spliced =
            splice_block(TWO_BLOCKS, &blocks[1], "graph LR\n    C -->|ok| D").expect("splice");

        let expected = concat!(
            "intro\n",
            "```mermaid\n",
            "graph TD\n",
            "    A --> B\n",
            "```\n",
            "middle prose\n",
            "```mermaid\n",
            "graph LR\n",
            "    C -->|ok| D\n",
            "```\n",
            "outro\n",
        );
        assert_eq!(spliced, expected);
    }

    #[test]
    fn splice_then_extract_recovers_replacement_at_same_ordinal() {
        let blocks = extract_blocks(TWO_BLOCKS, &DocumentHeader::default());
        let new_raw = "graph TD\n    A --> B\n    B --> Z";
        let spliced = splice_block(TWO_BLOCKS, &blocks[0], new_raw).expect("splice");

        let reblocks = extract_blocks(&spliced, &DocumentHeader::default());
        assert_eq!(reblocks.len(), 2);
        assert_eq!(reblocks[0].raw(), new_raw);
        assert_eq!(reblocks[1].raw(), blocks[1].raw());
    }

    #[test]
    fn splice_preserves_indented_fence_lines_verbatim() {
        let body = "  ```mermaid\ngraph TD\n  ```\ntail";
        let blocks = extract_blocks(body, &DocumentHeader::default());
        let spliced = splice_block(body, &blocks[0], "graph LR").expect("splice");
        assert_eq!(spliced, "  ```mermaid\ngraph LR\n  ```\ntail");
    }

    #[test]
    fn splice_fails_when_block_content_has_drifted() {
        let blocks = extract_blocks(TWO_BLOCKS, &DocumentHeader::default());
        let drifted = TWO_BLOCKS.replace("A --> B", "A --> Z");
        let result = splice_block(&drifted, &blocks[0], "graph TD");
        assert_eq!(
            result,
            Err(SpliceError::BlockNotFound {
                block_id: blocks[0].id().clone()
            })
        );
        // Unrelated blocks still splice fine in the drifted text.
        let drifted_blocks = extract_blocks(&drifted, &DocumentHeader::default());
        assert!(splice_block(&drifted, &drifted_blocks[1], "x").is_ok());
    }

    #[test]
    fn splice_accepts_multi_line_replacements_built_elsewhere() {
        let block = DiagramBlock::new(
            "diagram-0".parse().expect("id"),
            BlockKind::Architecture,
            "graph TD\n    A --> B",
            0,
            0,
        );
        // Stored line numbers are wrong on purpose; content matching wins.
        let spliced = splice_block(TWO_BLOCKS, &block, "graph TD\n    B --> A").expect("splice");
        let reblocks = extract_blocks(&spliced, &DocumentHeader::default());
        assert_eq!(reblocks[0].raw(), "graph TD\n    B --> A");
    }
}
