// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Splits a token into its leading Mermaid identifier and the remainder.
/// The identifier may be empty (no leading ident chars).
pub(super) fn split_ident_prefix(token: &str) -> (&str, &str) {
    let end = token
        .char_indices()
        .find(|(_, ch)| !is_ident_char(*ch))
        .map(|(idx, _)| idx)
        .unwrap_or(token.len());
    token.split_at(end)
}
