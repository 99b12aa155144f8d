// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::DocumentHeader;

const MARKER: &str = "---";

/// Splits document text into `(header, body)`.
///
/// The front matter section is delimited by a `---` line at offset 0 and the
/// next `---` line. No opening marker at offset 0, or no closing marker at
/// all, means the whole text is body. An undecodable section degrades to
/// `DocumentHeader::default()` and parsing continues; malformed metadata is
/// never fatal.
pub fn split_front_matter(text: &str) -> (DocumentHeader, &str) {
    match front_matter_sections(text) {
        Some((yaml, body)) => {
            let header = serde_yaml::from_str(yaml).unwrap_or_default();
            (header, body)
        }
        None => (DocumentHeader::default(), text),
    }
}

fn is_marker(line: &str) -> bool {
    line.trim_end_matches('\r') == MARKER
}

/// Returns the raw YAML section and the body slice, or `None` when the text
/// has no front matter. Both slices borrow from `text`; the body starts
/// right after the closing marker's line terminator.
fn front_matter_sections(text: &str) -> Option<(&str, &str)> {
    let first_line_end = text.find('\n')?;
    if !is_marker(&text[..first_line_end]) {
        return None;
    }

    let yaml_start = first_line_end + 1;
    let mut offset = yaml_start;
    while offset <= text.len() {
        let (line, line_end) = match text[offset..].find('\n') {
            Some(rel) => (&text[offset..offset + rel], Some(offset + rel)),
            None => (&text[offset..], None),
        };

        if is_marker(line) {
            let yaml = &text[yaml_start..offset];
            let body = match line_end {
                Some(end) => &text[end + 1..],
                None => "",
            };
            return Some((yaml, body));
        }

        match line_end {
            Some(end) => offset = end + 1,
            None => break,
        }
    }

    None
}
