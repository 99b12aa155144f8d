// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;

use super::ids::{EdgeId, NodeId};

/// Layout direction declared by a flowchart block.
///
/// `TD` is an alias Mermaid accepts for `TB`; both canonicalize to
/// [`Direction::TopBottom`], and serialization emits `TD` for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TD" | "TB" => Some(Self::TopBottom),
            "BT" => Some(Self::BottomTop),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    /// Canonical textual token used on serialization.
    pub fn token(self) -> &'static str {
        match self {
            Self::TopBottom => "TD",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }
}

/// Node shape, detected from the delimiter pair wrapping the label.
///
/// The textual delimiter tables live in [`crate::format::shape`]; the model
/// only carries the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    #[default]
    Box,
    Decision,
    Cylinder,
}

/// Layout-assigned coordinates. `(0, 0)` until the layout engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    id: NodeId,
    label: String,
    shape: NodeShape,
    position: Position,
}

impl FlowNode {
    pub fn new(id: NodeId) -> Self {
        let label = id.as_str().to_owned();
        Self {
            id,
            label,
            shape: NodeShape::Box,
            position: Position::default(),
        }
    }

    pub fn new_with(id: NodeId, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id,
            label: label.into(),
            shape,
            position: Position::default(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: NodeShape) {
        self.shape = shape;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    label: Option<String>,
}

impl FlowEdge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            label: None,
        }
    }

    pub fn new_with(id: EdgeId, source: NodeId, target: NodeId, label: Option<String>) -> Self {
        Self {
            id,
            source,
            target,
            label,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<T: Into<String>>(&mut self, label: Option<T>) {
        self.label = label.map(Into::into);
    }
}

/// A directed flowchart graph.
///
/// Nodes iterate in first-registration order (the textual order of their
/// first occurrence), edges in declaration order. Both orders are load-bearing
/// for serialization: emitting in iteration order is what makes
/// parse → serialize → parse reproduce the same graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowGraph {
    nodes: IndexMap<NodeId, FlowNode>,
    edges: Vec<FlowEdge>,
    direction: Direction,
}

impl FlowGraph {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.values()
    }

    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut FlowNode> {
        self.nodes.get_mut(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Registers a node if the id is unseen. The first registration of an id
    /// wins; later calls for the same id leave label and shape untouched.
    pub fn ensure_node(&mut self, node: FlowNode) -> &FlowNode {
        self.nodes.entry(node.id().clone()).or_insert(node)
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Vec<FlowEdge> {
        &mut self.edges
    }

    pub fn push_edge(&mut self, edge: FlowEdge) {
        self.edges.push(edge);
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
