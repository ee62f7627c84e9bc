// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Control-flow program at the head of a compiled shader.
//!
//! Clauses come in pairs packed into three dwords:
//!
//! ```text
//! dword0:  0..11  addr A     12..15  count A    16..31  sequence A
//! dword1:  8..15  opcode A   16..27  addr B     28..31  count B
//! dword2:  0..15  sequence B 24..31  opcode B
//! ```
//!
//! Nothing in the program states how many pairs there are. In every capture
//! seen so far the first non-zero address of the first pair (the first
//! instruction slot, which directly follows the CF table) equals the number
//! of pairs, so that is what is used here.

use super::field::{extract, SLOT_DWORDS};
use super::tables::{self, CfOp};
use crate::{Diagnostic, DisasmError, DisasmResult};

/// Per-slot entry of a clause's sequence bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSequence {
    /// Decode as FETCH rather than ALU.
    pub fetch: bool,
    /// Rendered as the `(S)` marker.
    pub sync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfClause<'a> {
    pub address: u32,
    pub count: u32,
    /// Two bits per instruction slot, slot 0 in the low bits.
    pub sequence: u32,
    pub opcode: u32,
    /// The pair's dwords, kept on the first clause of each pair only.
    pub dwords: Option<&'a [u32]>,
}

impl CfClause<'_> {
    pub fn op(&self) -> Option<&'static CfOp> {
        tables::cf_op(self.opcode)
    }

    pub fn is_exec(&self) -> bool {
        self.op().is_some_and(|op| op.exec)
    }

    pub fn sequence_for(&self, slot: u32) -> SlotSequence {
        let bits = if slot < 16 {
            extract(self.sequence, 2 * slot, 2)
        } else {
            0
        };
        SlotSequence {
            fetch: bits & 0x1 != 0,
            sync: bits & 0x2 != 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CfProgram<'a> {
    pub clauses: Vec<CfClause<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses the CF table at the start of `dwords`.
///
/// Fails only when the inferred table needs more than `capacity` clauses.
/// A table cut short by the end of the buffer yields the complete pairs
/// before it and a [`Diagnostic::TruncatedCfTable`].
pub fn parse_cf(dwords: &[u32], capacity: usize) -> DisasmResult<CfProgram<'_>> {
    let mut program = CfProgram::default();
    let mut expected_pairs: Option<usize> = None;

    for (pair, words) in dwords.chunks_exact(SLOT_DWORDS).enumerate() {
        let clause_a = CfClause {
            address: extract(words[0], 0, 12),
            count: extract(words[0], 12, 4),
            sequence: extract(words[0], 16, 16),
            opcode: extract(words[1], 8, 8),
            dwords: Some(words),
        };
        let clause_b = CfClause {
            address: extract(words[1], 16, 12),
            count: extract(words[1], 28, 4),
            sequence: extract(words[2], 0, 16),
            opcode: extract(words[2], 24, 8),
            dwords: None,
        };

        let expected = *expected_pairs.get_or_insert_with(|| {
            let first = if clause_a.address != 0 {
                clause_a.address
            } else {
                clause_b.address
            };
            (first as usize).max(1)
        });
        if expected * 2 > capacity {
            return Err(DisasmError::ClauseCapacityExceeded {
                needed: expected * 2,
                capacity,
            });
        }

        program.clauses.push(clause_a);
        program.clauses.push(clause_b);

        if pair + 1 == expected {
            return Ok(program);
        }
    }

    let expected = expected_pairs.unwrap_or(1);
    program.diagnostics.push(Diagnostic::TruncatedCfTable {
        expected,
        parsed: program.clauses.len() / 2,
        available: dwords.len(),
    });
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CLAUSE_CAPACITY;

    #[allow(clippy::too_many_arguments)]
    fn pair(
        addr_a: u32,
        cnt_a: u32,
        seq_a: u32,
        op_a: u32,
        addr_b: u32,
        cnt_b: u32,
        seq_b: u32,
        op_b: u32,
    ) -> [u32; 3] {
        [
            addr_a | (cnt_a << 12) | (seq_a << 16),
            (op_a << 8) | (addr_b << 16) | (cnt_b << 28),
            seq_b | (op_b << 24),
        ]
    }

    #[test]
    fn test_clause_fields() {
        let words = pair(0x123, 0x4, 0xBEEF, 0x10, 0xABC, 0x7, 0x1234, 0x20);
        let program = parse_cf(&words, 0x1000).unwrap();
        assert_eq!(program.clauses.len(), 2);
        assert!(!program.diagnostics.is_empty(), "0x123 pairs cannot fit in 3 dwords");

        let a = &program.clauses[0];
        assert_eq!((a.address, a.count, a.sequence, a.opcode), (0x123, 0x4, 0xBEEF, 0x10));
        assert_eq!(a.dwords, Some(&words[..]));

        let b = &program.clauses[1];
        assert_eq!((b.address, b.count, b.sequence, b.opcode), (0xABC, 0x7, 0x1234, 0x20));
        assert_eq!(b.dwords, None);
    }

    #[test]
    fn test_pair_count_from_first_address() {
        let mut dwords = Vec::new();
        dwords.extend(pair(3, 2, 0, 0x10, 5, 1, 0, 0x10));
        dwords.extend(pair(6, 1, 0, 0x10, 0, 0, 0, 0xc2));
        dwords.extend(pair(0, 0, 0, 0xc4, 0, 0, 0, 0x00));
        // A fourth pair that must not be parsed.
        dwords.extend(pair(9, 9, 0, 0x10, 9, 9, 0, 0x20));

        let program = parse_cf(&dwords, DEFAULT_CLAUSE_CAPACITY).unwrap();
        assert_eq!(program.clauses.len(), 6);
        assert!(program.diagnostics.is_empty());
        assert_eq!(program.clauses[5].opcode, 0x00);
    }

    #[test]
    fn test_pair_count_falls_back_to_clause_b() {
        let mut dwords = Vec::new();
        dwords.extend(pair(0, 0, 0, 0xc2, 2, 1, 0, 0x10));
        dwords.extend(pair(0, 0, 0, 0x00, 0, 0, 0, 0x00));
        dwords.extend(pair(7, 7, 0, 0x10, 7, 7, 0, 0x10));

        let program = parse_cf(&dwords, DEFAULT_CLAUSE_CAPACITY).unwrap();
        assert_eq!(program.clauses.len(), 4);
    }

    #[test]
    fn test_zero_addresses_parse_one_pair() {
        let dwords = [0u32; 9];
        let program = parse_cf(&dwords, DEFAULT_CLAUSE_CAPACITY).unwrap();
        assert_eq!(program.clauses.len(), 2);
        assert!(program.diagnostics.is_empty());
    }

    #[test]
    fn test_truncated_table() {
        let mut dwords = Vec::new();
        dwords.extend(pair(4, 1, 0, 0x10, 0, 0, 0, 0x00));
        dwords.extend(pair(0, 0, 0, 0x00, 0, 0, 0, 0x00));
        dwords.push(0xdead_beef);

        let program = parse_cf(&dwords, DEFAULT_CLAUSE_CAPACITY).unwrap();
        assert_eq!(program.clauses.len(), 4);
        assert_eq!(
            program.diagnostics,
            vec![Diagnostic::TruncatedCfTable {
                expected: 4,
                parsed: 2,
                available: 7
            }]
        );
    }

    #[test]
    fn test_empty_buffer() {
        let program = parse_cf(&[], DEFAULT_CLAUSE_CAPACITY).unwrap();
        assert!(program.clauses.is_empty());
        assert_eq!(program.diagnostics.len(), 1);
    }

    #[test]
    fn test_capacity_exceeded() {
        let words = pair(40, 0, 0, 0x10, 0, 0, 0, 0);
        let err = parse_cf(&words, DEFAULT_CLAUSE_CAPACITY).unwrap_err();
        assert!(matches!(
            err,
            DisasmError::ClauseCapacityExceeded {
                needed: 80,
                capacity: 64
            }
        ));

        // exactly at capacity is fine
        let words = pair(32, 0, 0, 0x10, 0, 0, 0, 0);
        assert!(parse_cf(&words, DEFAULT_CLAUSE_CAPACITY).is_ok());
    }

    #[test]
    fn test_sequence_bits() {
        let clause = CfClause {
            address: 1,
            count: 3,
            sequence: 0b10_01_00,
            opcode: 0x10,
            dwords: None,
        };
        assert!(clause.is_exec());
        assert_eq!(clause.sequence_for(0), SlotSequence { fetch: false, sync: false });
        assert_eq!(clause.sequence_for(1), SlotSequence { fetch: true, sync: false });
        assert_eq!(clause.sequence_for(2), SlotSequence { fetch: false, sync: true });
        assert_eq!(clause.sequence_for(15), SlotSequence { fetch: false, sync: false });
    }
}
