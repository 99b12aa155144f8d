// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shape grammar: the mapping between node shapes and their Mermaid
//! delimiter pairs. Pure lookup tables, no parsing state.

use crate::model::NodeShape;

/// Delimiter candidates in detection precedence order: cylinder > decision >
/// box. `[(` must be tried before `[`, otherwise every cylinder would
/// classify as a box wrapping a parenthesized label.
///
/// `(label)` is accepted on input as a box variant; serialization always
/// emits the canonical pair from [`delimiters`].
const DETECTION_TABLE: [(&str, &str, NodeShape); 4] = [
    ("[(", ")]", NodeShape::Cylinder),
    ("{", "}", NodeShape::Decision),
    ("[", "]", NodeShape::Box),
    ("(", ")", NodeShape::Box),
];

/// Canonical delimiter pair emitted for a shape.
pub fn delimiters(shape: NodeShape) -> (&'static str, &'static str) {
    match shape {
        NodeShape::Box => ("[", "]"),
        NodeShape::Decision => ("{", "}"),
        NodeShape::Cylinder => ("[(", ")]"),
    }
}

/// Classifies a delimited label fragment (`<open><label><close>`, nothing
/// else). Returns the shape and the inner label slice, untrimmed.
pub fn classify_delimited(fragment: &str) -> Option<(NodeShape, &str)> {
    for (open, close, shape) in DETECTION_TABLE {
        if fragment.len() >= open.len() + close.len()
            && fragment.starts_with(open)
            && fragment.ends_with(close)
        {
            return Some((shape, &fragment[open.len()..fragment.len() - close.len()]));
        }
    }
    None
}
