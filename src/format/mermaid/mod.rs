// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid text format support (parse + serialize).

mod flowchart;
mod ident;

pub use flowchart::{parse_flowchart, serialize_flowchart};
