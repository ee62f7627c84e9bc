// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bare instruction dumps, as written by `--dump-shaders`.

use anyhow::{bail, Context, Result};
use pgmdump_core::ShaderKind;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::section::dwords;

/// Shader stage implied by a raw dump's extension.
pub fn raw_kind(path: &Path) -> Result<ShaderKind> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("vo") => Ok(ShaderKind::Vertex),
        Some("fo") => Ok(ShaderKind::Fragment),
        Some(ext @ ("vo3" | "fo3" | "co3")) => bail!(
            "{:?}: .{} files hold a3xx shaders, which are not supported",
            path,
            ext
        ),
        _ => bail!("Invalid input file: {:?}", path),
    }
}

/// Loads a `.vo`/`.fo` file as the dword buffer it contains.
pub fn load_raw_shader(path: &Path) -> Result<(ShaderKind, Vec<u32>)> {
    let kind = raw_kind(path)?;
    let buffer =
        fs::read(path).with_context(|| format!("Failed to read shader file: {:?}", path))?;
    if buffer.len() % 4 != 0 {
        info!(
            "Ignoring {} trailing bytes of {:?}",
            buffer.len() % 4,
            path
        );
    }
    Ok((kind, dwords(&buffer)))
}
