// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Markdown-side plumbing: front matter splitting, fenced Mermaid block
//! extraction, and content-addressed block splicing. Everything here is a
//! pure transformation over strings; no I/O, no shared state.

mod blocks;
mod frontmatter;

pub use blocks::{extract_blocks, splice_block, SpliceError};
pub use frontmatter::split_front_matter;
