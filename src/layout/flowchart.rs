// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::model::{Direction, FlowGraph, NodeId, Position};

pub const NODE_WIDTH: f64 = 180.0;
pub const NODE_HEIGHT: f64 = 40.0;
pub const NODE_SEP: f64 = 60.0;
pub const RANK_SEP: f64 = 80.0;
pub const MARGIN: f64 = 20.0;

/// Result of layered placement: nodes grouped by rank plus concrete
/// coordinates per node. Presentation-only; feeding coordinates back into
/// serialization is not a thing.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowchartLayout {
    layers: Vec<Vec<NodeId>>,
    positions: BTreeMap<NodeId, Position>,
}

impl FlowchartLayout {
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    pub fn positions(&self) -> &BTreeMap<NodeId, Position> {
        &self.positions
    }

    pub fn position(&self, node_id: &NodeId) -> Option<Position> {
        self.positions.get(node_id).copied()
    }

    /// Writes the computed coordinates onto the graph's nodes. Never touches
    /// identity, labels, shapes, or edges.
    pub fn apply_to(&self, graph: &mut FlowGraph) {
        for (node_id, position) in &self.positions {
            if let Some(node) = graph.node_mut(node_id) {
                node.set_position(*position);
            }
        }
    }
}

/// Deterministic layered layout.
///
/// Layering is longest-path over a deterministic topological order; nodes
/// within a layer are ordered by a single barycenter sweep against the
/// previous layer, ties broken by first-registration order. Cycles are
/// broken by forcing the earliest-registered remaining node into the order,
/// so cyclic inputs still get a deterministic (if not rank-respecting)
/// placement instead of an error.
///
/// `TopBottom`/`BottomTop` stack ranks vertically, `LeftRight`/`RightLeft`
/// horizontally; the reversed directions share their forward counterpart's
/// placement.
pub fn layout_flowchart(graph: &FlowGraph) -> FlowchartLayout {
    let ids: Vec<NodeId> = graph.nodes().map(|node| node.id().clone()).collect();
    let count = ids.len();
    let index_of: BTreeMap<&NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut indegree: Vec<usize> = vec![0; count];

    for edge in graph.edges() {
        // Endpoints missing from the node set cannot be placed; skip the edge.
        let (Some(&from), Some(&to)) = (index_of.get(edge.source()), index_of.get(edge.target()))
        else {
            continue;
        };
        outgoing[from].push(to);
        predecessors[to].push(from);
        indegree[to] += 1;
    }

    let topo = topo_order(count, &outgoing, &mut indegree);

    let mut topo_pos = vec![0usize; count];
    for (pos, &node) in topo.iter().enumerate() {
        topo_pos[node] = pos;
    }

    // Longest-path layering. Back edges introduced by cycle breaking point
    // against the topological order and are ignored here.
    let mut rank = vec![0usize; count];
    for &from in &topo {
        for &to in &outgoing[from] {
            if topo_pos[from] < topo_pos[to] {
                rank[to] = rank[to].max(rank[from] + 1);
            }
        }
    }

    let layer_count = rank.iter().copied().max().map_or(0, |max| max + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for node in 0..count {
        layers[rank[node]].push(node);
    }

    // One downward barycenter sweep against the previous layer.
    let mut prev_positions: BTreeMap<usize, usize> = BTreeMap::new();
    for layer in &mut layers {
        sort_layer_by_barycenter(layer, &prev_positions, &predecessors);
        prev_positions = layer.iter().enumerate().map(|(pos, &node)| (node, pos)).collect();
    }

    let positions = place(&ids, &layers, graph.direction());
    let layers = layers
        .into_iter()
        .map(|layer| layer.into_iter().map(|node| ids[node].clone()).collect())
        .collect();

    FlowchartLayout { layers, positions }
}

/// Kahn's algorithm over first-registration indices. When no node is ready
/// (a cycle), the earliest-registered unvisited node is forced, which keeps
/// the order total and deterministic.
fn topo_order(count: usize, outgoing: &[Vec<usize>], indegree: &mut [usize]) -> Vec<usize> {
    let mut ready: BTreeSet<usize> = (0..count).filter(|&node| indegree[node] == 0).collect();
    let mut visited = vec![false; count];
    let mut topo = Vec::with_capacity(count);

    while topo.len() < count {
        let next = match ready.iter().next().copied() {
            Some(node) => node,
            None => (0..count)
                .find(|&node| !visited[node])
                .expect("unvisited node exists while topo is incomplete"),
        };
        ready.remove(&next);
        visited[next] = true;
        topo.push(next);

        for &to in &outgoing[next] {
            if visited[to] {
                continue;
            }
            indegree[to] = indegree[to].saturating_sub(1);
            if indegree[to] == 0 {
                ready.insert(to);
            }
        }
    }

    topo
}

fn sort_layer_by_barycenter(
    layer: &mut [usize],
    prev_positions: &BTreeMap<usize, usize>,
    predecessors: &[Vec<usize>],
) {
    let barycenter = |node: usize| -> Option<(usize, usize)> {
        let (sum, count) = predecessors[node]
            .iter()
            .filter_map(|pred| prev_positions.get(pred).copied())
            .fold((0usize, 0usize), |(sum, count), pos| (sum + pos, count + 1));
        (count > 0).then_some((sum, count))
    };

    layer.sort_by(|&a, &b| {
        match (barycenter(a), barycenter(b)) {
            (None, None) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some((sum_a, count_a)), Some((sum_b, count_b))) => {
                // Compare sum_a/count_a vs sum_b/count_b without floats.
                let left = (sum_a as u128) * (count_b as u128);
                let right = (sum_b as u128) * (count_a as u128);
                left.cmp(&right).then_with(|| a.cmp(&b))
            }
        }
    });
}

fn place(ids: &[NodeId], layers: &[Vec<usize>], direction: Direction) -> BTreeMap<NodeId, Position> {
    let horizontal = direction.is_horizontal();
    let (main_extent, cross_extent) = if horizontal {
        (NODE_WIDTH, NODE_HEIGHT)
    } else {
        (NODE_HEIGHT, NODE_WIDTH)
    };
    let main_step = main_extent + RANK_SEP;
    let cross_step = cross_extent + NODE_SEP;

    let widest = layers.iter().map(Vec::len).max().unwrap_or(0);

    let mut positions = BTreeMap::new();
    for (rank, layer) in layers.iter().enumerate() {
        let main = MARGIN + rank as f64 * main_step;
        // Center each layer against the widest one.
        let lead = MARGIN + (widest - layer.len()) as f64 * cross_step / 2.0;
        for (slot, &node) in layer.iter().enumerate() {
            let cross = lead + slot as f64 * cross_step;
            let position = if horizontal {
                Position::new(main, cross)
            } else {
                Position::new(cross, main)
            };
            positions.insert(ids[node].clone(), position);
        }
    }

    positions
}
