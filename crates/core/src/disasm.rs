// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::io::Write;

use tracing::{debug, warn};

use crate::config::DisasmConfig;
use crate::decoder::alu::decode_alu;
use crate::decoder::cf::parse_cf;
use crate::decoder::fetch::decode_fetch;
use crate::decoder::field::{Slot, SLOT_DWORDS};
use crate::render::Renderer;
use crate::{Diagnostic, DisasmResult, ShaderKind};

/// What a single disassembly pass rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisasmReport {
    pub clauses: usize,
    pub alu: usize,
    pub fetch: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl DisasmReport {
    /// True when the whole program decoded without running off the buffer.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Walks the CF program of a shader and renders every clause and the
/// instruction slots owned by its EXEC clauses.
///
/// Holds only read-only configuration, so one instance can serve any number
/// of shaders.
#[derive(Debug, Clone, Default)]
pub struct Disassembler {
    config: DisasmConfig,
}

impl Disassembler {
    pub fn new(config: DisasmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DisasmConfig {
        &self.config
    }

    pub fn disassemble<W: Write + ?Sized>(
        &self,
        dwords: &[u32],
        kind: ShaderKind,
        out: &mut W,
    ) -> DisasmResult<DisasmReport> {
        let program = parse_cf(dwords, self.config.clause_capacity)?;
        let renderer = Renderer::new(&self.config);

        let mut report = DisasmReport {
            diagnostics: program.diagnostics,
            ..Default::default()
        };
        for diagnostic in &report.diagnostics {
            warn!("{}", diagnostic);
        }

        'clauses: for (index, clause) in program.clauses.iter().enumerate() {
            debug!(
                "CF clause {}: op={:#x} addr={:#x} cnt={} seq={:#06x}",
                index, clause.opcode, clause.address, clause.count, clause.sequence
            );
            renderer.cf_clause(out, clause)?;
            report.clauses += 1;

            if !clause.is_exec() {
                continue;
            }

            for i in 0..clause.count {
                let slot_index = clause.address + i;
                let Some(slot) = Slot::from_dwords(dwords, slot_index as usize * SLOT_DWORDS)
                else {
                    let diagnostic = Diagnostic::SlotOutOfBounds {
                        clause: index,
                        slot: slot_index,
                        available: dwords.len(),
                    };
                    warn!("{}", diagnostic);
                    report.diagnostics.push(diagnostic);
                    break 'clauses;
                };

                let sequence = clause.sequence_for(i);
                if sequence.fetch {
                    let fetch = decode_fetch(&slot);
                    renderer.fetch(out, slot.words(), &fetch, sequence.sync)?;
                    report.fetch += 1;
                } else {
                    let alu = decode_alu(&slot);
                    renderer.alu(out, slot.words(), &alu, sequence.sync, kind)?;
                    report.alu += 1;
                }
            }
        }

        Ok(report)
    }

    /// Convenience wrapper rendering into a `String`.
    pub fn disassemble_to_string(
        &self,
        dwords: &[u32],
        kind: ShaderKind,
    ) -> DisasmResult<(String, DisasmReport)> {
        let mut out = Vec::new();
        let report = self.disassemble(dwords, kind, &mut out)?;
        Ok((String::from_utf8_lossy(&out).into_owned(), report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DisasmError;

    #[test]
    fn test_non_exec_clauses_carry_no_slots() {
        // ALLOC COORD(addr=1) + NOP; the one "slot" at addr 1 is never visited
        let dwords = [0x0000_0001, 0x0000_c200, 0x0000_0000, 0xffff_ffff, 0xffff_ffff, 0xffff_ffff];
        let (text, report) = Disassembler::default()
            .disassemble_to_string(&dwords, ShaderKind::Vertex)
            .unwrap();
        assert_eq!(text, "CF: ALLOC COORD SIZE(0x1)\nCF: NOP\n");
        assert_eq!(report.clauses, 2);
        assert_eq!(report.alu + report.fetch, 0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_slot_out_of_bounds_stops_decode() {
        // EXEC ADDR(1) CNT(2) but only one slot follows the CF pair
        let dwords = [0x0000_2001, 0x0000_1000, 0x0000_0000, 0x000F_0000, 0, 0];
        let (text, report) = Disassembler::default()
            .disassemble_to_string(&dwords, ShaderKind::Fragment)
            .unwrap();
        assert_eq!(text, "CF: EXEC ADDR(0x1) CNT(0x2)\n   ALU:\tADDv\tR0 = C0, C0\n");
        assert_eq!(report.alu, 1);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::SlotOutOfBounds {
                clause: 0,
                slot: 2,
                available: 6
            }]
        );
        // the second clause of the pair was never rendered
        assert_eq!(report.clauses, 1);
    }

    #[test]
    fn test_capacity_error_renders_nothing() {
        let config = DisasmConfig {
            clause_capacity: 4,
            ..Default::default()
        };
        let dwords = [0x0000_0003, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut out = Vec::new();
        let err = Disassembler::new(config)
            .disassemble(&dwords, ShaderKind::Vertex, &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            DisasmError::ClauseCapacityExceeded {
                needed: 6,
                capacity: 4
            }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_errors_propagate() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let dwords = [0u32; 3];
        let err = Disassembler::default()
            .disassemble(&dwords, ShaderKind::Vertex, &mut FailingWriter)
            .unwrap_err();
        assert!(matches!(err, DisasmError::Io(_)));
    }
}
