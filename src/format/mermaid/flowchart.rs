// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ident::split_ident_prefix;

use crate::format::shape::{classify_delimited, delimiters};
use crate::model::{Direction, EdgeId, FlowEdge, FlowGraph, FlowNode, NodeId, NodeShape};

/// Connector tokens in match precedence order. `-.->` must be tried before
/// `-.-`, which is its prefix.
const CONNECTORS: [&str; 5] = ["-.->", "-.-", "-->", "---", "==>"];

/// Inline-label openers for the `<lhs> -- <label> --> <rhs>` edge form.
const INLINE_LABEL_OPENERS: [&str; 2] = ["--", "=="];

fn label_close_char(open: char) -> Option<char> {
    match open {
        '[' => Some(']'),
        '(' => Some(')'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Finds the first connector token occurring outside shape delimiters.
/// Returns `(lhs, connector, rhs)` with the connector bytes excluded from
/// both sides.
fn split_once_connector(line: &str) -> Option<(&str, &str, &str)> {
    let mut in_label: Option<char> = None;

    for (idx, ch) in line.char_indices() {
        if let Some(close) = in_label {
            if ch == close {
                in_label = None;
            }
            continue;
        }

        if let Some(close) = label_close_char(ch) {
            in_label = Some(close);
            continue;
        }

        for connector in CONNECTORS {
            if line[idx..].starts_with(connector) {
                let lhs = &line[..idx];
                let rhs = &line[idx + connector.len()..];
                if lhs.trim().is_empty() {
                    return None;
                }
                return Some((lhs, connector, rhs));
            }
        }
    }

    None
}

/// Extracts an inline edge label from the text left of a connector:
/// `A -- ok ` becomes `("A ", Some("ok"))`. Without an inline opener the
/// whole fragment is the node token.
fn split_inline_label(lhs: &str) -> (&str, Option<&str>) {
    let mut in_label: Option<char> = None;

    for (idx, ch) in lhs.char_indices() {
        if let Some(close) = in_label {
            if ch == close {
                in_label = None;
            }
            continue;
        }

        if let Some(close) = label_close_char(ch) {
            in_label = Some(close);
            continue;
        }

        for opener in INLINE_LABEL_OPENERS {
            if lhs[idx..].starts_with(opener) {
                let before = &lhs[..idx];
                let after = lhs[idx + opener.len()..].trim();
                if !before.trim().is_empty() && !after.is_empty() {
                    return (before, Some(after));
                }
                return (lhs, None);
            }
        }
    }

    (lhs, None)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSpec {
    id: String,
    label: Option<String>,
    shape: Option<NodeShape>,
}

/// Parses one node token: `<id>`, or `<id>` followed by exactly one shape
/// delimiter pair. Anything else (trailing junk, unbalanced delimiters,
/// empty id) is not a node token.
fn parse_node_token(token: &str) -> Option<NodeSpec> {
    let trimmed = token.trim();
    let (ident, rest) = split_ident_prefix(trimmed);
    if ident.is_empty() {
        return None;
    }

    if rest.is_empty() {
        return Some(NodeSpec {
            id: ident.to_owned(),
            label: None,
            shape: None,
        });
    }

    let (shape, label_raw) = classify_delimited(rest)?;
    let label = label_raw.trim();
    Some(NodeSpec {
        id: ident.to_owned(),
        label: (!label.is_empty()).then(|| label.to_owned()),
        shape: Some(shape),
    })
}

/// One fully recognized edge line: a source plus one hop per connector.
/// Built before any graph mutation so a malformed tail leaves no trace.
struct EdgeChain {
    source: NodeSpec,
    hops: Vec<(Option<String>, NodeSpec)>,
}

fn parse_edge_chain(line: &str) -> Option<EdgeChain> {
    let (lhs_raw, _connector, tail) = split_once_connector(line)?;
    let (source_raw, inline) = split_inline_label(lhs_raw);
    let source = parse_node_token(source_raw)?;

    let mut pending_inline = inline.map(str::to_owned);
    let mut hops = Vec::new();
    let mut rest = tail;

    loop {
        let mut segment = rest.trim_start();
        let mut label = pending_inline.take();

        if let Some(after) = segment.strip_prefix('|') {
            let end = after.find('|')?;
            let piped = after[..end].trim();
            if !piped.is_empty() {
                label = Some(piped.to_owned());
            }
            segment = after[end + 1..].trim_start();
        }

        match split_once_connector(segment) {
            None => {
                let target = parse_node_token(segment)?;
                hops.push((label, target));
                return Some(EdgeChain { source, hops });
            }
            Some((target_raw, _connector, next_rest)) => {
                let (target_raw, next_inline) = split_inline_label(target_raw);
                let target = parse_node_token(target_raw)?;
                hops.push((label, target));
                pending_inline = next_inline.map(str::to_owned);
                rest = next_rest;
            }
        }
    }
}

/// Registers a node spec, first occurrence winning for label and shape.
fn register_node(graph: &mut FlowGraph, spec: NodeSpec) -> NodeId {
    let NodeSpec { id, label, shape } = spec;
    let node_id = NodeId::new(id).expect("ident is a valid id segment");
    let label = label.unwrap_or_else(|| node_id.as_str().to_owned());
    graph.ensure_node(FlowNode::new_with(
        node_id.clone(),
        label,
        shape.unwrap_or_default(),
    ));
    node_id
}

fn edge_id_from_index(index: usize) -> EdgeId {
    EdgeId::new(format!("e-{index}")).expect("valid edge id")
}

fn is_group_open(trimmed: &str) -> bool {
    trimmed.split_whitespace().next() == Some("subgraph")
}

/// Parses a deliberately limited Mermaid `flowchart`/`graph` subset into a
/// [`FlowGraph`].
///
/// Supported:
/// - direction header: `graph`/`flowchart` plus `TD`/`TB`/`LR`/`RL`/`BT`
///   (`TD` canonicalizes to top-bottom; no header means top-bottom)
/// - node declarations: `<id>`, `<id>[<label>]`, `<id>(<label>)`,
///   `<id>{<label>}`, `<id>[(<label>)]`
/// - edges with connectors `-->`, `---`, `-.-`, `-.->`, `==>`, optional
///   labels in both the `-->|<label>|` and `-- <label> -->` forms, and
///   chains (`a --> b --> c`)
/// - `subgraph` … `end` regions are skipped wholesale; nodes declared inside
///   them are invisible to this version
///
/// Parsing never fails: any line matching no rule is skipped, which keeps
/// documents with unsupported syntax (styling, classDefs, other diagram
/// kinds) loadable. Nodes referenced only by edges are created with default
/// shape and label equal to their id. All nodes come back at position
/// `(0, 0)`; layout is a separate step.
pub fn parse_flowchart(input: &str) -> FlowGraph {
    let mut graph = FlowGraph::default();
    let mut edge_index = 0usize;
    let mut group_depth = 0usize;

    for raw_line in input.lines() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_group_open(trimmed) {
            group_depth += 1;
            continue;
        }
        if trimmed == "end" {
            group_depth = group_depth.saturating_sub(1);
            continue;
        }
        if group_depth > 0 {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let first = parts.next().unwrap_or_default();
        if first == "graph" || first == "flowchart" {
            if let Some(direction) = parts.next().and_then(Direction::from_token) {
                graph.set_direction(direction);
            }
            continue;
        }

        if let Some(chain) = parse_edge_chain(trimmed) {
            let mut current = register_node(&mut graph, chain.source);
            for (label, target_spec) in chain.hops {
                let target = register_node(&mut graph, target_spec);
                graph.push_edge(FlowEdge::new_with(
                    edge_id_from_index(edge_index),
                    current,
                    target.clone(),
                    label,
                ));
                edge_index += 1;
                current = target;
            }
            continue;
        }

        if let Some(spec) = parse_node_token(trimmed) {
            register_node(&mut graph, spec);
        }
    }

    graph
}

/// Serializes a [`FlowGraph`] back to Mermaid text: the direction header,
/// one declaration line per node in node order, one line per edge in edge
/// order. Labels are emitted unconditionally so the output is a pure
/// function of the graph. Coordinates are ignored.
///
/// The output re-parses (via [`parse_flowchart`]) to an isomorphic graph as
/// long as labels stay clear of the shape's closing delimiter, `|`, and
/// newlines.
pub fn serialize_flowchart(graph: &FlowGraph) -> String {
    let mut lines = Vec::with_capacity(1 + graph.node_count() + graph.edge_count());
    lines.push(format!("graph {}", graph.direction().token()));

    for node in graph.nodes() {
        let (open, close) = delimiters(node.shape());
        lines.push(format!("    {}{open}{}{close}", node.id(), node.label()));
    }

    for edge in graph.edges() {
        match edge.label() {
            Some(label) => lines.push(format!(
                "    {} -->|{label}| {}",
                edge.source(),
                edge.target()
            )),
            None => lines.push(format!("    {} --> {}", edge.source(), edge.target())),
        }
    }

    lines.join("\n")
}
