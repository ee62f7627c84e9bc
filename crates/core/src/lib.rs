// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod config;
pub mod decoder;
pub mod disasm;
pub mod render;

mod tests;

pub use config::{DebugFlags, DisasmConfig};
pub use disasm::{DisasmReport, Disassembler};

/// Which pipeline stage a shader program was compiled for.
///
/// Only used to give exported registers a symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderKind {
    Vertex,
    Fragment,
    Compute,
}

#[derive(Debug, thiserror::Error)]
pub enum DisasmError {
    #[error("CF program needs {needed} clauses but the clause table holds {capacity}")]
    ClauseCapacityExceeded { needed: usize, capacity: usize },
    #[error("Failed to write disassembly: {0}")]
    Io(#[from] std::io::Error),
}

pub type DisasmResult<T> = Result<T, DisasmError>;

/// Recoverable problems found while decoding a possibly-corrupt capture.
///
/// Decoding stops at the point of the problem; everything before it has
/// already been rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("CF table truncated: expected {expected} clause pairs, buffer holds {parsed} ({available} dwords)")]
    TruncatedCfTable {
        expected: usize,
        parsed: usize,
        available: usize,
    },
    #[error("CF clause {clause}: instruction slot {slot:#x} is outside the {available} dword buffer")]
    SlotOutOfBounds {
        clause: usize,
        slot: u32,
        available: usize,
    },
}
