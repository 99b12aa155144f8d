// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deterministic diagram layout.
//!
//! Layout is a pluggable strategy behind a narrow surface: a graph plus its
//! declared direction goes in, per-node coordinates come out. Any layered
//! graph-drawing algorithm satisfies that contract; this module ships one.

pub mod flowchart;

pub use flowchart::{layout_flowchart, FlowchartLayout};
