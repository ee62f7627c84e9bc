// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use bitflags::bitflags;

/// Largest CF program seen in captured traces, in clauses.
pub const DEFAULT_CLAUSE_CAPACITY: usize = 64;

bitflags! {
    /// Extra detail printed alongside the disassembly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DebugFlags: u32 {
        /// Prefix instruction and CF lines with the raw source dwords.
        const PRINT_RAW = 1 << 0;
        /// Annotate EXEC clauses with their sequence bits.
        const PRINT_VERBOSE = 1 << 1;
    }
}

#[derive(Debug, Clone)]
pub struct DisasmConfig {
    /// Nesting depth, rendered as one tab per level.
    pub indent_depth: usize,
    pub flags: DebugFlags,
    /// Maximum number of CF clauses a single program may declare.
    pub clause_capacity: usize,
}

impl Default for DisasmConfig {
    fn default() -> Self {
        Self {
            indent_depth: 0,
            flags: DebugFlags::empty(),
            clause_capacity: DEFAULT_CLAUSE_CAPACITY,
        }
    }
}

impl DisasmConfig {
    pub fn with_indent(mut self, depth: usize) -> Self {
        self.indent_depth = depth;
        self
    }

    pub fn with_flags(mut self, flags: DebugFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn raw(&self) -> bool {
        self.flags.contains(DebugFlags::PRINT_RAW)
    }

    pub fn verbose(&self) -> bool {
        self.flags.contains(DebugFlags::PRINT_VERBOSE)
    }
}
