// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus: bidirectional Mermaid/Markdown sync engine for spec documents.
//!
//! The core keeps two representations of a diagram in lockstep: the Mermaid
//! flowchart text embedded in a markdown spec file, and a typed node/edge
//! graph suitable for visual editing. Parsing, layout, serialization and
//! block splicing are pure string/value transformations; the `store` and
//! `server` modules wrap them with persistence and live updates.

pub mod format;
pub mod layout;
pub mod markdown;
pub mod model;
pub mod server;
pub mod store;
