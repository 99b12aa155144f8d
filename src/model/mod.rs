// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core value types: typed ids, the flowchart graph, and the document model.

pub mod document;
pub mod graph;
pub mod ids;

pub use document::{
    BlockKind, DeclaredDiagram, DiagramBlock, DocStatus, Document, DocumentHeader,
};
pub use graph::{Direction, FlowEdge, FlowGraph, FlowNode, NodeShape, Position};
pub use ids::{BlockId, EdgeId, Id, IdError, NodeId};
