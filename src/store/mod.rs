// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for spec documents on disk.
//!
//! The store moves whole document texts in and out of a spec folder; the
//! sync core re-derives headers and blocks from text on every load.

pub mod spec_folder;

pub use spec_folder::{SpecEntry, SpecFolder, StoreError};
